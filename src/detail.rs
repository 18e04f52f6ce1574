//! Vehicle page extraction.

use scraper::{ElementRef, Html, Selector};

use crate::armament::{select_best, GunTableReader, SelectionMode};
use crate::config::Layout;
use crate::dom::{self, Elements};
use crate::error::Result;
use crate::normalize::{clean_name, damage_range, quote, tier};
use crate::record::VehicleRecord;
use crate::rules::RuleSet;

/// Vehicles whose wiki page moved after a rename.
const RENAMED: &[(&str, &str)] = &[("SU-14", "SU-14-2")];

/// Point a vehicle URL at the page of its renamed successor, if any.
pub fn rewrite_url(url: &str) -> String {
    for (old, new) in RENAMED {
        if url.len() > old.len() && url.ends_with(old) {
            let stem = &url[..url.len() - old.len()];
            return format!("{}{}", stem, new);
        }
    }
    url.to_string()
}

/// Turns one vehicle page into a [`VehicleRecord`].
///
/// Extraction never fails: anything the page does not have stays at its
/// default and the rest of the record is still filled.
pub struct DetailExtractor {
    layout: Layout,
    rules: RuleSet,
    guns: GunTableReader,
    container: Option<Selector>,
    headline: Selector,
    icon: Selector,
    position: Selector,
    battle_tiers: Selector,
}

impl DetailExtractor {
    pub fn new(layout: Layout) -> Result<Self> {
        let (container, headline, position, battle_tiers) = match layout {
            Layout::Current => (
                None,
                "div.b-performance_border span.mw-headline",
                "div.b-performance_position",
                "span.b-battles-levels_interval",
            ),
            Layout::Legacy => (
                Some(dom::selector("div.Tank")?),
                ".mw-headline",
                ".NTC tr > td",
                r#"td[style*="background-color"]"#,
            ),
        };
        Ok(Self {
            layout,
            rules: RuleSet::for_layout(layout)?,
            guns: GunTableReader::new()?,
            container,
            headline: dom::selector(headline)?,
            icon: dom::selector("img")?,
            position: dom::selector(position)?,
            battle_tiers: dom::selector(battle_tiers)?,
        })
    }

    pub fn extract(&self, url: &str, html: &str) -> VehicleRecord {
        let mut record = VehicleRecord::new(url);
        let document = Html::parse_document(html);
        let root = match &self.container {
            Some(container) => document.select(container).next(),
            None => Some(document.root_element()),
        };
        let Some(root) = root else {
            log::warn!("Something went wrong or no info found at {}!", url);
            return record;
        };
        log::info!("Found tank at {}", url);

        let elements = Elements::of(root);
        self.rules.apply(&elements, &mut record);
        self.read_name(&elements, &mut record);
        match self.layout {
            Layout::Current => self.read_position_line(&elements, &mut record),
            Layout::Legacy => self.read_position_cells(&elements, &mut record),
        }
        self.read_battle_tiers(&elements, &mut record);
        split_damage(&mut record);

        let guns = self.guns.read(&elements);
        log::debug!("{} gun(s) listed at {}", guns.len(), url);
        record.best_by_damage = select_best(&guns, SelectionMode::ByDamage);
        record.best_by_penetration = select_best(&guns, SelectionMode::ByPenetration);
        record
    }

    /// Premium, gift and unavailable vehicles carry an icon before the name;
    /// its alt text is the status.
    fn read_name(&self, elements: &Elements<'_>, record: &mut VehicleRecord) {
        let Some(headline) = elements.filter(&self.headline).next() else {
            return;
        };
        let name = clean_name(&dom::text_of(headline));
        if !name.is_empty() {
            record.name = Some(name);
        }
        if let Some(icon) = dom::first_descendant(headline, &self.icon) {
            let alt = icon.value().attr("alt").unwrap_or("").trim();
            record.premium = is_premium(alt);
            if !alt.is_empty() {
                record.status = Some(alt.to_string());
            }
        }
    }

    /// `"USSR | Heavy Tank | Tier X"`
    fn read_position_line(&self, elements: &Elements<'_>, record: &mut VehicleRecord) {
        let Some(position) = elements.filter(&self.position).next() else {
            return;
        };
        let text = dom::text_of(position);
        let parts: Vec<&str> = text.trim().split(" | ").collect();
        if let [country, class, vehicle_tier] = parts.as_slice() {
            set_position(record, country, class, vehicle_tier);
        } else {
            log::debug!("Unexpected position line: {:?}", text);
        }
    }

    fn read_position_cells(&self, elements: &Elements<'_>, record: &mut VehicleRecord) {
        let cells: Vec<String> = elements
            .filter(&self.position)
            .take(3)
            .map(|cell| dom::nth_content(cell, 0).unwrap_or_default())
            .collect();
        if let [country, class, vehicle_tier] = cells.as_slice() {
            set_position(record, country, class, vehicle_tier);
        }
    }

    fn read_battle_tiers(&self, elements: &Elements<'_>, record: &mut VehicleRecord) {
        let cells: Vec<ElementRef<'_>> = match self.layout {
            Layout::Current => elements
                .filter(&self.battle_tiers)
                .next()
                .map(|interval| interval.children().filter_map(ElementRef::wrap).collect())
                .unwrap_or_default(),
            Layout::Legacy => elements.filter(&self.battle_tiers).collect(),
        };
        let tiers: Vec<i32> = cells
            .into_iter()
            .filter_map(|cell| dom::text_of(cell).trim().parse().ok())
            .collect();
        record.battle_tier_min = tiers.iter().copied().min();
        record.battle_tier_max = tiers.iter().copied().max();
    }
}

/// Icon alt texts that mark a vehicle bought with gold or handed out as a
/// gift. Any other alt, missing ones included, is not premium.
const PREMIUM_STATUSES: &[&str] = &["Premium", "Gift"];

fn is_premium(alt: &str) -> bool {
    PREMIUM_STATUSES.iter().any(|status| status.eq_ignore_ascii_case(alt.trim()))
}

fn set_position(record: &mut VehicleRecord, country: &str, class: &str, vehicle_tier: &str) {
    let non_empty = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
    record.country = non_empty(country);
    record.class = non_empty(class);
    record.tier = non_empty(&tier(vehicle_tier.trim()));
}

/// Keep the raw damage text (quoted) and derive its min and max.
fn split_damage(record: &mut VehicleRecord) {
    let Some(raw) = record.damage.take() else {
        return;
    };
    if let Some(range) = damage_range(&raw) {
        record.damage_min = Some(range.min);
        record.damage_max = Some(range.max);
    }
    record.damage = Some(quote(&raw));
}
