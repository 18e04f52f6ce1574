//! The vehicle record and the one canonical column order written for it.

use serde::Serialize;

use crate::armament::BestGun;

/// Everything reported for one vehicle.
///
/// Every field starts absent and is written as the placeholder unless an
/// extraction rule fills it. New fields need a matching entry in [`COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub url: String,
    pub name: Option<String>,
    /// Alt text of the headline icon (Premium, Gift, ...).
    pub status: Option<String>,
    pub premium: bool,
    pub country: Option<String>,
    pub class: Option<String>,
    pub tier: Option<String>,
    pub battle_tier_min: Option<i32>,
    pub battle_tier_max: Option<i32>,
    pub power_ratio: Option<String>,
    pub hull_traverse: Option<String>,
    pub turret_traverse: Option<String>,
    pub view_range: Option<String>,
    pub signal_range: Option<String>,
    pub hit_points: Option<String>,
    pub hull_armor: Option<String>,
    pub turret_armor: Option<String>,
    pub fire_chance: Option<String>,
    pub damage: Option<String>,
    pub damage_min: Option<String>,
    pub damage_max: Option<String>,
    pub penetration: Option<String>,
    pub rate_of_fire: Option<String>,
    pub aim_time: Option<String>,
    pub accuracy: Option<String>,
    pub elevation: Option<String>,
    pub best_by_damage: BestGun,
    pub best_by_penetration: BestGun,
}

impl VehicleRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Cells in [`COLUMNS`] order, absent values replaced by `placeholder`.
    pub fn cells(&self, placeholder: &str) -> Vec<String> {
        COLUMNS
            .iter()
            .map(|column| (column.value)(self).unwrap_or_else(|| placeholder.to_string()))
            .collect()
    }
}

pub struct Column {
    pub group: &'static str,
    pub header: &'static str,
    value: fn(&VehicleRecord) -> Option<String>,
}

const DETAILS: &str = "Vehicle Details";
const DEFENSE: &str = "Defense";
const OFFENSE: &str = "Offense";
const BEST_DAMAGE: &str = "Best Gun by Damage";
const BEST_PENETRATION: &str = "Best Gun by Penetration";

fn number(v: f64) -> Option<String> {
    Some(v.to_string())
}

pub static COLUMNS: &[Column] = &[
    Column { group: DETAILS, header: "Vehicle", value: |r| r.name.clone() },
    Column { group: DETAILS, header: "Class", value: |r| r.class.clone() },
    Column { group: DETAILS, header: "Tier", value: |r| r.tier.clone() },
    Column { group: DETAILS, header: "Min Battle Tier", value: |r| r.battle_tier_min.map(|t| t.to_string()) },
    Column { group: DETAILS, header: "Max Battle Tier", value: |r| r.battle_tier_max.map(|t| t.to_string()) },
    Column { group: DETAILS, header: "Country", value: |r| r.country.clone() },
    Column {
        group: DETAILS,
        header: "Status",
        value: |r| Some(r.status.clone().unwrap_or_else(|| "Standard".to_string())),
    },
    Column {
        group: DETAILS,
        header: "Premium",
        value: |r| Some(if r.premium { "Yes" } else { "No" }.to_string()),
    },
    Column { group: DETAILS, header: "Power Ratio (hp/t)", value: |r| r.power_ratio.clone() },
    Column { group: DETAILS, header: "Traverse Speed (d/s)", value: |r| r.hull_traverse.clone() },
    Column { group: DETAILS, header: "Gun/Turret Traverse (d/s)", value: |r| r.turret_traverse.clone() },
    Column { group: DETAILS, header: "View Range (m)", value: |r| r.view_range.clone() },
    Column { group: DETAILS, header: "Signal Range (m)", value: |r| r.signal_range.clone() },
    Column { group: DEFENSE, header: "Hit Points", value: |r| r.hit_points.clone() },
    Column { group: DEFENSE, header: "Hull Armor (mm)", value: |r| r.hull_armor.clone() },
    Column { group: DEFENSE, header: "Turret Armor (mm)", value: |r| r.turret_armor.clone() },
    Column { group: DEFENSE, header: "Chance of Fire (%)", value: |r| r.fire_chance.clone() },
    Column { group: OFFENSE, header: "Damage (HP)", value: |r| r.damage.clone() },
    Column { group: OFFENSE, header: "Min Dmg (HP)", value: |r| r.damage_min.clone() },
    Column { group: OFFENSE, header: "Max Dmg (HP)", value: |r| r.damage_max.clone() },
    Column { group: OFFENSE, header: "Penetration (mm)", value: |r| r.penetration.clone() },
    Column { group: OFFENSE, header: "Rate of Fire (r/m)", value: |r| r.rate_of_fire.clone() },
    Column { group: OFFENSE, header: "Aim Time (s)", value: |r| r.aim_time.clone() },
    Column { group: OFFENSE, header: "Accuracy (m)", value: |r| r.accuracy.clone() },
    Column { group: OFFENSE, header: "Front Elevation (degrees)", value: |r| r.elevation.clone() },
    Column { group: BEST_DAMAGE, header: "Gun", value: |r| r.best_by_damage.name.clone() },
    Column { group: BEST_DAMAGE, header: "Gun Tier", value: |r| Some(r.best_by_damage.tier.to_string()) },
    Column { group: BEST_DAMAGE, header: "Damage (HP)", value: |r| number(r.best_by_damage.damage) },
    Column { group: BEST_DAMAGE, header: "Penetration (mm)", value: |r| number(r.best_by_damage.penetration) },
    Column { group: BEST_DAMAGE, header: "Rate of Fire (r/m)", value: |r| number(r.best_by_damage.rate_of_fire) },
    Column { group: BEST_DAMAGE, header: "Aim Time (s)", value: |r| number(r.best_by_damage.aim_time) },
    Column { group: BEST_DAMAGE, header: "Accuracy (m)", value: |r| number(r.best_by_damage.accuracy) },
    Column { group: BEST_DAMAGE, header: "Elevation (degrees)", value: |r| r.best_by_damage.elevation.clone() },
    Column { group: BEST_PENETRATION, header: "Gun", value: |r| r.best_by_penetration.name.clone() },
    Column { group: BEST_PENETRATION, header: "Gun Tier", value: |r| Some(r.best_by_penetration.tier.to_string()) },
    Column { group: BEST_PENETRATION, header: "Damage (HP)", value: |r| number(r.best_by_penetration.damage) },
    Column { group: BEST_PENETRATION, header: "Penetration (mm)", value: |r| number(r.best_by_penetration.penetration) },
    Column { group: BEST_PENETRATION, header: "Rate of Fire (r/m)", value: |r| number(r.best_by_penetration.rate_of_fire) },
    Column { group: BEST_PENETRATION, header: "Aim Time (s)", value: |r| number(r.best_by_penetration.aim_time) },
    Column { group: BEST_PENETRATION, header: "Accuracy (m)", value: |r| number(r.best_by_penetration.accuracy) },
    Column { group: BEST_PENETRATION, header: "Elevation (degrees)", value: |r| r.best_by_penetration.elevation.clone() },
];

/// Group header row: each group name above the first column of its group.
pub fn group_headers() -> Vec<&'static str> {
    let mut previous = "";
    COLUMNS
        .iter()
        .map(|column| {
            if column.group == previous {
                ""
            } else {
                previous = column.group;
                column.group
            }
        })
        .collect()
}

pub fn headers() -> Vec<&'static str> {
    COLUMNS.iter().map(|column| column.header).collect()
}
