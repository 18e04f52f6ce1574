//! Gun table parsing and best-gun selection.

use std::cmp::Ordering;

use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::Serialize;

use crate::dom::{self, Elements};
use crate::error::Result;
use crate::normalize::{leading_number, strip_degrees, tier_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShellKind {
    Ap,
    Apcr,
    Heat,
    He,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFamily {
    ArmorPiercing,
    HighExplosive,
}

impl ShellKind {
    pub fn parse(s: &str) -> Option<ShellKind> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AP" => Some(ShellKind::Ap),
            "APCR" => Some(ShellKind::Apcr),
            "HEAT" => Some(ShellKind::Heat),
            "HE" => Some(ShellKind::He),
            _ => None,
        }
    }

    pub fn family(self) -> ShellFamily {
        match self {
            ShellKind::He => ShellFamily::HighExplosive,
            _ => ShellFamily::ArmorPiercing,
        }
    }
}

/// One round a gun can fire, keyed by its position in the slash lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    pub index: usize,
    pub kind: ShellKind,
    pub damage: f64,
    pub penetration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GunEntry {
    pub name: String,
    pub tier: i32,
    pub rounds: Vec<Round>,
    pub rate_of_fire: f64,
    pub aim_time: f64,
    pub accuracy: f64,
    pub elevation: Option<String>,
}

/// The winning gun and round, flattened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestGun {
    pub name: Option<String>,
    pub tier: i32,
    pub damage: f64,
    pub penetration: f64,
    pub rate_of_fire: f64,
    pub aim_time: f64,
    pub accuracy: f64,
    pub elevation: Option<String>,
}

impl Default for BestGun {
    fn default() -> Self {
        Self {
            name: None,
            tier: -1,
            damage: 0.0,
            penetration: 0.0,
            rate_of_fire: 0.0,
            aim_time: 0.0,
            accuracy: 0.0,
            elevation: None,
        }
    }
}

impl BestGun {
    fn from_round(gun: &GunEntry, round: &Round) -> Self {
        Self {
            name: Some(gun.name.clone()),
            tier: gun.tier,
            damage: round.damage,
            penetration: round.penetration,
            rate_of_fire: gun.rate_of_fire,
            aim_time: gun.aim_time,
            accuracy: gun.accuracy,
            elevation: gun.elevation.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    ByDamage,
    ByPenetration,
}

impl SelectionMode {
    fn compare(self, a: (&GunEntry, &Round), b: (&GunEntry, &Round)) -> Ordering {
        let ((gun_a, round_a), (gun_b, round_b)) = (a, b);
        let (primary, secondary) = match self {
            SelectionMode::ByDamage => (
                round_a.damage.total_cmp(&round_b.damage),
                round_a.penetration.total_cmp(&round_b.penetration),
            ),
            SelectionMode::ByPenetration => (
                round_a.penetration.total_cmp(&round_b.penetration),
                round_a.damage.total_cmp(&round_b.damage),
            ),
        };
        primary
            .then(secondary)
            .then(gun_a.rate_of_fire.total_cmp(&gun_b.rate_of_fire))
    }
}

/// Pick the best round over both shell families of every gun.
///
/// Only a strictly better candidate replaces the current one, so on a full
/// tie the first gun in table order wins.
pub fn select_best(guns: &[GunEntry], mode: SelectionMode) -> BestGun {
    let mut best: Option<(&GunEntry, &Round)> = None;
    for family in [ShellFamily::ArmorPiercing, ShellFamily::HighExplosive] {
        for gun in guns {
            for round in gun.rounds.iter().filter(|r| r.kind.family() == family) {
                let better = match best {
                    None => true,
                    Some(current) => mode.compare((gun, round), current) == Ordering::Greater,
                };
                if better {
                    best = Some((gun, round));
                }
            }
        }
    }
    best.map(|(gun, round)| BestGun::from_round(gun, round))
        .unwrap_or_default()
}

/// Locates the gun table on a vehicle page and reads its rows.
pub struct GunTableReader {
    anchor: Selector,
    label: Regex,
    table: Selector,
    row: Selector,
    header_cell: Selector,
    cell: Selector,
    name: Regex,
    tier: Regex,
    damage: Regex,
    penetration: Regex,
    rate_of_fire: Regex,
    aim_time: Regex,
    accuracy: Regex,
    elevation: Regex,
    shells: Regex,
}

impl GunTableReader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            anchor: dom::selector("span, th, h2, h3, h4, b, div")?,
            label: Regex::new(r"^\s*Guns?\s*$")?,
            table: dom::selector("table")?,
            row: dom::selector("tr")?,
            header_cell: dom::selector("th")?,
            cell: dom::selector("td")?,
            name: Regex::new(r"(?i)^\s*(gun|name)\b")?,
            tier: Regex::new(r"(?i)^\s*(tier|level)\b")?,
            damage: Regex::new(r"(?i)damage")?,
            penetration: Regex::new(r"(?i)penetration")?,
            rate_of_fire: Regex::new(r"(?i)rate\s+of\s+fire")?,
            aim_time: Regex::new(r"(?i)aim")?,
            accuracy: Regex::new(r"(?i)accuracy|dispersion")?,
            elevation: Regex::new(r"(?i)elevation")?,
            shells: Regex::new(r"(?i)^\s*(shells?|shell\s+types?)\s*$")?,
        })
    }

    /// Guns listed in the first table after a "Guns" label; empty when the
    /// page has no such table or the table has no damage column.
    pub fn read(&self, elements: &Elements<'_>) -> Vec<GunEntry> {
        let Some(label) = elements.find_labelled(&self.anchor, &self.label) else {
            log::debug!("No gun table label on page");
            return Vec::new();
        };
        let Some(table) = elements.find_next(label, &self.table).and_then(|i| elements.get(i)) else {
            log::debug!("No gun table after label");
            return Vec::new();
        };
        self.read_table(table)
    }

    fn read_table(&self, table: ElementRef<'_>) -> Vec<GunEntry> {
        let mut headers: Vec<String> = Vec::new();
        let mut guns = Vec::new();
        for row in table.select(&self.row) {
            if headers.is_empty() {
                headers = row
                    .select(&self.header_cell)
                    .map(|th| dom::text_of(th).trim().to_string())
                    .collect();
                if !headers.is_empty() {
                    continue;
                }
            }
            let cells: Vec<String> = row
                .select(&self.cell)
                .map(|td| dom::text_of(td).trim().to_string())
                .collect();
            if cells.is_empty() || headers.is_empty() {
                continue;
            }
            let row = Row {
                headers: &headers,
                cells: &cells,
            };
            let Some(damage) = row.get(&self.damage) else {
                continue;
            };
            let damages = split_values(damage);
            let penetrations = row.get(&self.penetration).map(split_values).unwrap_or_default();
            let kinds: Vec<Option<ShellKind>> = row
                .get(&self.shells)
                .map(|s| s.split('/').map(ShellKind::parse).collect())
                .unwrap_or_default();
            let rounds = (0..damages.len().max(penetrations.len()))
                .map(|index| Round {
                    index,
                    kind: kinds.get(index).copied().flatten().unwrap_or(ShellKind::Ap),
                    damage: damages.get(index).copied().unwrap_or(0.0),
                    penetration: penetrations.get(index).copied().unwrap_or(0.0),
                })
                .collect();
            guns.push(GunEntry {
                name: row.get(&self.name).unwrap_or_default().to_string(),
                tier: row.get(&self.tier).map(tier_number).unwrap_or(-1),
                rounds,
                rate_of_fire: row.get(&self.rate_of_fire).and_then(leading_number).unwrap_or(0.0),
                aim_time: row.get(&self.aim_time).and_then(leading_number).unwrap_or(0.0),
                accuracy: row.get(&self.accuracy).and_then(leading_number).unwrap_or(0.0),
                elevation: row.get(&self.elevation)
                    .map(|e| strip_degrees(e).trim().to_string())
                    .filter(|e| !e.is_empty()),
            });
        }
        guns
    }
}

/// Body row cells looked up by header label.
struct Row<'c> {
    headers: &'c [String],
    cells: &'c [String],
}

impl<'c> Row<'c> {
    fn get(&self, pattern: &Regex) -> Option<&'c str> {
        let index = self.headers.iter().position(|h| pattern.is_match(h))?;
        self.cells.get(index).map(String::as_str)
    }
}

fn split_values(cell: &str) -> Vec<f64> {
    cell.split('/')
        .map(|v| leading_number(v).unwrap_or(0.0))
        .collect()
}
