use wot_wiki_scraper::config::{Layout, VehicleClass};
use wot_wiki_scraper::index::IndexCrawler;
use wot_wiki_scraper::record::{headers, VehicleRecord};
use wot_wiki_scraper::DetailExtractor;

const CURRENT: &str = include_str!("fixtures/current_vehicle.html");
const CURRENT_NO_TURRET: &str = include_str!("fixtures/current_vehicle_no_turret.html");
const LEGACY: &str = include_str!("fixtures/legacy_vehicle.html");
const LISTING: &str = include_str!("fixtures/current_listing.html");

fn extract(layout: Layout, html: &str) -> VehicleRecord {
    DetailExtractor::new(layout).unwrap().extract("https://wiki.test/en/Tank:T-34", html)
}

#[test]
fn current_layout_vehicle_page() {
    let t34 = extract(Layout::Current, CURRENT);
    assert_eq!(t34.name.as_deref(), Some("T-34"));
    assert_eq!(t34.country.as_deref(), Some("USSR"));
    assert_eq!(t34.class.as_deref(), Some("Medium Tank"));
    assert_eq!(t34.tier.as_deref(), Some("5"));
    assert_eq!((t34.battle_tier_min, t34.battle_tier_max), (Some(5), Some(7)));
    assert!(!t34.premium);
    assert_eq!(t34.status, None);
    assert_eq!(t34.hit_points.as_deref(), Some("520"));
    assert_eq!(t34.hull_armor.as_deref(), Some("'45/45/40"));
    assert_eq!(t34.turret_armor.as_deref(), Some("'52/52/52"));
    assert_eq!(t34.power_ratio.as_deref(), Some("16.94"));
    assert_eq!(t34.hull_traverse.as_deref(), Some("46"));
    assert_eq!(t34.turret_traverse.as_deref(), Some("48"));
    assert_eq!(t34.view_range.as_deref(), Some("350"));
    assert_eq!(t34.signal_range.as_deref(), Some("615"));
    assert_eq!(t34.fire_chance.as_deref(), Some("20"));
    assert_eq!(t34.damage.as_deref(), Some("'110/110/175"));
    assert_eq!(t34.damage_min.as_deref(), Some("110"));
    assert_eq!(t34.damage_max.as_deref(), Some("175"));
    assert_eq!(t34.penetration.as_deref(), Some("'110/175/28"));
    assert_eq!(t34.rate_of_fire.as_deref(), Some("13.33"));
    assert_eq!(t34.aim_time.as_deref(), Some("2.3"));
    assert_eq!(t34.accuracy.as_deref(), Some("0.43"));
    assert_eq!(t34.elevation.as_deref(), Some("'-7/+25"));
}

#[test]
fn current_layout_best_guns() {
    let t34 = extract(Layout::Current, CURRENT);

    let by_damage = &t34.best_by_damage;
    assert_eq!(by_damage.name.as_deref(), Some("76 mm F-34"));
    assert_eq!(by_damage.tier, 5);
    assert_eq!(by_damage.damage, 175.0);
    assert_eq!(by_damage.penetration, 38.0);
    assert_eq!(by_damage.rate_of_fire, 13.95);
    assert_eq!(by_damage.elevation.as_deref(), Some("-7/+25"));

    let by_penetration = &t34.best_by_penetration;
    assert_eq!(by_penetration.name.as_deref(), Some("57 mm ZiS-4"));
    assert_eq!(by_penetration.penetration, 189.0);
    assert_eq!(by_penetration.damage, 85.0);
}

#[test]
fn missing_turret_armor_only_affects_that_field() {
    let full = extract(Layout::Current, CURRENT);
    let partial = extract(Layout::Current, CURRENT_NO_TURRET);
    assert_eq!(partial.turret_armor, None);

    let column = headers().iter().position(|h| *h == "Turret Armor (mm)").unwrap();
    let full_cells = full.cells("N/A");
    let partial_cells = partial.cells("N/A");
    assert_eq!(partial_cells[column], "N/A");
    for (i, (a, b)) in full_cells.iter().zip(&partial_cells).enumerate() {
        if i != column {
            assert_eq!(a, b, "column {} changed", headers()[i]);
        }
    }
}

#[test]
fn extraction_is_repeatable() {
    let extractor = DetailExtractor::new(Layout::Current).unwrap();
    let first = extractor.extract("u", CURRENT);
    let second = extractor.extract("u", CURRENT);
    assert_eq!(first, second);
    assert_eq!(first.cells("N/A"), second.cells("N/A"));
}

#[test]
fn legacy_layout_vehicle_page() {
    let tank = extract(Layout::Legacy, LEGACY);
    assert_eq!(tank.name.as_deref(), Some("Pz.Kpfw. IV Schmalturm"));
    assert!(tank.premium);
    assert_eq!(tank.status.as_deref(), Some("Premium"));
    assert_eq!(tank.country.as_deref(), Some("Germany"));
    assert_eq!(tank.class.as_deref(), Some("Medium Tank"));
    assert_eq!(tank.tier.as_deref(), Some("6"));
    assert_eq!((tank.battle_tier_min, tank.battle_tier_max), (Some(6), Some(8)));
    assert_eq!(tank.hit_points.as_deref(), Some("600"));
    assert_eq!(tank.power_ratio.as_deref(), Some("14.2"));
    assert_eq!(tank.hull_traverse.as_deref(), Some("38"));
    assert_eq!(tank.turret_traverse.as_deref(), Some("40"));
    assert_eq!(tank.view_range.as_deref(), Some("360"));
    assert_eq!(tank.signal_range.as_deref(), Some("700"));
    assert_eq!(tank.hull_armor.as_deref(), Some("'80/30/30"));
    assert_eq!(tank.turret_armor.as_deref(), Some("'50/30/30"));
    assert_eq!(tank.damage.as_deref(), Some("'110-180"));
    assert_eq!(tank.damage_min.as_deref(), Some("110"));
    assert_eq!(tank.damage_max.as_deref(), Some("180"));
    assert_eq!(tank.penetration.as_deref(), Some("'145"));
    assert_eq!(tank.rate_of_fire.as_deref(), Some("14.1"));
    assert_eq!(tank.accuracy.as_deref(), Some("0.36"));
    assert_eq!(tank.aim_time.as_deref(), Some("2.1"));
    assert_eq!(tank.elevation.as_deref(), Some("'-8/+20"));
    assert_eq!(tank.fire_chance.as_deref(), Some("20"));
    assert_eq!(tank.best_by_damage.name, None);
}

#[test]
fn listing_returns_only_requested_section() {
    let crawler = IndexCrawler::new(Layout::Current).unwrap();
    let links = crawler.collect_links(LISTING, &[VehicleClass::Light]).unwrap();
    assert_eq!(links, vec!["/en/Tank:MS-1", "/en/Tank:T-26"]);
}

#[test]
fn listing_keeps_class_order() {
    let crawler = IndexCrawler::new(Layout::Current).unwrap();
    let links = crawler.collect_links(LISTING, &VehicleClass::ALL).unwrap();
    assert_eq!(
        links,
        vec!["/en/Tank:MS-1", "/en/Tank:T-26", "/en/Tank:T-34", "/en/Tank:SU-14"]
    );
}
