//! Declarative label-anchored field rules.
//!
//! A rule names a label (tag + text pattern), how to get from the label to
//! its value, and how to clean the value up. Each wiki layout is one table of
//! rules; a markup change on the site should only ever break single rows.

use regex::Regex;
use scraper::{ElementRef, Node, Selector};

use crate::config::Layout;
use crate::dom::{self, Elements};
use crate::error::Result;
use crate::normalize::{quote, strip_degrees, trim_chars};
use crate::record::VehicleRecord;

/// Record fields filled by simple rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PowerRatio,
    HullTraverse,
    TurretTraverse,
    ViewRange,
    SignalRange,
    HitPoints,
    HullArmor,
    TurretArmor,
    FireChance,
    Damage,
    Penetration,
    RateOfFire,
    AimTime,
    Accuracy,
    Elevation,
}

impl Field {
    pub fn slot(self, record: &mut VehicleRecord) -> &mut Option<String> {
        match self {
            Field::PowerRatio => &mut record.power_ratio,
            Field::HullTraverse => &mut record.hull_traverse,
            Field::TurretTraverse => &mut record.turret_traverse,
            Field::ViewRange => &mut record.view_range,
            Field::SignalRange => &mut record.signal_range,
            Field::HitPoints => &mut record.hit_points,
            Field::HullArmor => &mut record.hull_armor,
            Field::TurretArmor => &mut record.turret_armor,
            Field::FireChance => &mut record.fire_chance,
            Field::Damage => &mut record.damage,
            Field::Penetration => &mut record.penetration,
            Field::RateOfFire => &mut record.rate_of_fire,
            Field::AimTime => &mut record.aim_time,
            Field::Accuracy => &mut record.accuracy,
            Field::Elevation => &mut record.elevation,
        }
    }
}

/// How to get from the label to the value.
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// Text of the closest `span.top` before the label.
    PrecedingTop,
    /// Text node after the icon `<div>` in the closest `span.top` before the label.
    PrecedingTopAfterIcon,
    /// Text of the closest element matching the CSS before the label.
    PrecedingCell(&'static str),
    /// First content of the next `span.top` (of its `<div>`, if it has one).
    FollowingTop,
    /// Next `<td>`: a cell wrapping a `<span>` holds the value in `span.top`,
    /// a plain cell holds it directly.
    FollowingArmorCell,
    /// Contents 0 and 2 of the next `span.top`, joined (min and max of an arc).
    FollowingSplitPair,
}

#[derive(Debug, Clone, Copy)]
pub enum Normalize {
    StripDegrees,
    TrimChars(&'static str),
    Quote,
}

impl Normalize {
    fn apply(self, value: String) -> String {
        match self {
            Normalize::StripDegrees => strip_degrees(&value),
            Normalize::TrimChars(set) => trim_chars(&value, set).to_string(),
            Normalize::Quote => quote(&value),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub field: Field,
    pub tag: &'static str,
    pub label: &'static str,
    pub strategy: Strategy,
    pub normalize: &'static [Normalize],
}

const fn rule(field: Field, tag: &'static str, label: &'static str, strategy: Strategy) -> RuleSpec {
    RuleSpec {
        field,
        tag,
        label,
        strategy,
        normalize: &[],
    }
}

const fn rule_with(
    field: Field,
    tag: &'static str,
    label: &'static str,
    strategy: Strategy,
    normalize: &'static [Normalize],
) -> RuleSpec {
    RuleSpec {
        field,
        tag,
        label,
        strategy,
        normalize,
    }
}

const QUOTED: &[Normalize] = &[Normalize::Quote];
const ARC: &[Normalize] = &[Normalize::StripDegrees, Normalize::Quote];

/// wiki.wargaming.net: `<span>` labels, values before them.
pub const CURRENT_RULES: &[RuleSpec] = &[
    rule(Field::HullTraverse, "span", r"^\s*Traverse", Strategy::PrecedingTop),
    rule(Field::TurretTraverse, "span", "Turret Traverse", Strategy::PrecedingTop),
    rule(Field::TurretTraverse, "span", "Gun Traverse Speed", Strategy::PrecedingTop),
    rule(Field::HitPoints, "span", "Hit Points", Strategy::PrecedingTop),
    rule(Field::PowerRatio, "span", "Power/Wt Ratio", Strategy::PrecedingTop),
    rule(Field::FireChance, "span", "Chance of Fire", Strategy::PrecedingTop),
    rule_with(Field::TurretArmor, "span", "Turret Armor", Strategy::PrecedingTop, QUOTED),
    rule(Field::Damage, "span", "Damage", Strategy::PrecedingTop),
    rule_with(Field::Penetration, "span", "Penetration", Strategy::PrecedingTop, QUOTED),
    rule_with(Field::Elevation, "span", "Elevation Arc", Strategy::PrecedingTop, ARC),
    rule(Field::RateOfFire, "span", "Rate of Fire", Strategy::PrecedingTopAfterIcon),
    rule(Field::Accuracy, "span", "Accuracy", Strategy::PrecedingTopAfterIcon),
    rule(Field::AimTime, "span", "Aim time", Strategy::PrecedingTopAfterIcon),
    rule(Field::ViewRange, "span", "View Range", Strategy::PrecedingTopAfterIcon),
    rule(Field::SignalRange, "span", "Signal Range", Strategy::PrecedingTopAfterIcon),
    rule_with(
        Field::HullArmor,
        "span",
        "Hull Armor",
        Strategy::PrecedingCell("span.t-performance_right"),
        &[Normalize::TrimChars(" m"), Normalize::Quote],
    ),
];

/// wiki.worldoftanks.com: `<th>` labels, values after them.
pub const LEGACY_RULES: &[RuleSpec] = &[
    rule(Field::RateOfFire, "th", "Rate of Fire", Strategy::FollowingTop),
    rule(Field::HullTraverse, "th", r"^\s*Traverse", Strategy::FollowingTop),
    rule(Field::Accuracy, "th", "Accuracy", Strategy::FollowingTop),
    rule(Field::AimTime, "th", "Aim time", Strategy::FollowingTop),
    rule(Field::TurretTraverse, "th", "Turret Traverse", Strategy::FollowingTop),
    rule(Field::TurretTraverse, "th", "Gun Traverse Speed", Strategy::FollowingTop),
    rule(Field::ViewRange, "th", "View Range", Strategy::FollowingTop),
    rule(Field::SignalRange, "th", "Signal Range", Strategy::FollowingTop),
    rule(Field::HitPoints, "th", "Hit Points", Strategy::FollowingTop),
    rule(Field::PowerRatio, "th", "Power/Wt Ratio", Strategy::FollowingTop),
    rule_with(Field::Penetration, "th", "Penetration", Strategy::FollowingTop, QUOTED),
    rule(Field::FireChance, "th", "Chance of Fire", Strategy::FollowingTop),
    rule(Field::Damage, "th", "Damage", Strategy::FollowingTop),
    rule_with(Field::HullArmor, "th", "Hull Armor", Strategy::FollowingArmorCell, QUOTED),
    rule_with(Field::TurretArmor, "th", "Turret Armor", Strategy::FollowingArmorCell, QUOTED),
    rule_with(Field::Elevation, "th", "Elevation Arc", Strategy::FollowingSplitPair, ARC),
];

pub fn specs(layout: Layout) -> &'static [RuleSpec] {
    match layout {
        Layout::Current => CURRENT_RULES,
        Layout::Legacy => LEGACY_RULES,
    }
}

enum Locate {
    PrecedingTop,
    PrecedingTopAfterIcon,
    PrecedingCell(Selector),
    FollowingTop,
    FollowingArmorCell,
    FollowingSplitPair,
}

struct FieldRule {
    field: Field,
    tag: Selector,
    label: Regex,
    locate: Locate,
    normalize: &'static [Normalize],
}

/// Compiled rule table for one layout.
pub struct RuleSet {
    rules: Vec<FieldRule>,
    top: Selector,
    div: Selector,
    td: Selector,
}

impl RuleSet {
    pub fn new(specs: &[RuleSpec]) -> Result<Self> {
        let rules = specs
            .iter()
            .map(|spec| -> Result<FieldRule> {
                let locate = match spec.strategy {
                    Strategy::PrecedingTop => Locate::PrecedingTop,
                    Strategy::PrecedingTopAfterIcon => Locate::PrecedingTopAfterIcon,
                    Strategy::PrecedingCell(css) => Locate::PrecedingCell(dom::selector(css)?),
                    Strategy::FollowingTop => Locate::FollowingTop,
                    Strategy::FollowingArmorCell => Locate::FollowingArmorCell,
                    Strategy::FollowingSplitPair => Locate::FollowingSplitPair,
                };
                Ok(FieldRule {
                    field: spec.field,
                    tag: dom::selector(spec.tag)?,
                    label: Regex::new(spec.label)?,
                    locate,
                    normalize: spec.normalize,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rules,
            top: dom::selector("span.top")?,
            div: dom::selector("div")?,
            td: dom::selector("td")?,
        })
    }

    pub fn for_layout(layout: Layout) -> Result<Self> {
        Self::new(specs(layout))
    }

    /// Fill the record from every rule that finds a value. When several rules
    /// target one field, the first one in table order that finds a value wins.
    pub fn apply(&self, elements: &Elements<'_>, record: &mut VehicleRecord) {
        for rule in &self.rules {
            if rule.field.slot(record).is_some() {
                continue;
            }
            let Some(label) = elements.find_labelled(&rule.tag, &rule.label) else {
                log::debug!("No label matching {:?} for {:?}", rule.label.as_str(), rule.field);
                continue;
            };
            let Some(raw) = self.locate(&rule.locate, elements, label) else {
                log::debug!("No value next to label {:?}", rule.label.as_str());
                continue;
            };
            let raw = raw.trim().to_string();
            if raw.is_empty() {
                continue;
            }
            let value = rule.normalize.iter().fold(raw, |value, step| step.apply(value));
            *rule.field.slot(record) = Some(value);
        }
    }

    fn locate(&self, locate: &Locate, elements: &Elements<'_>, label: usize) -> Option<String> {
        match locate {
            Locate::PrecedingTop => elements.find_previous(label, &self.top).map(dom::text_of),
            Locate::PrecedingTopAfterIcon => {
                let top = elements.find_previous(label, &self.top)?;
                dom::text_after(top, &self.div).map(|text| text.trim_matches('\n').to_string())
            }
            Locate::PrecedingCell(cell) => elements.find_previous(label, cell).map(dom::text_of),
            Locate::FollowingTop => {
                let top = elements.get(elements.find_next(label, &self.top)?)?;
                match dom::first_descendant(top, &self.div) {
                    Some(div) => dom::nth_content(div, 0),
                    None => dom::nth_content(top, 0),
                }
            }
            Locate::FollowingArmorCell => {
                let index = elements.find_next(label, &self.td)?;
                let cell = elements.get(index)?;
                if starts_with_span(cell) {
                    let top = elements.get(elements.find_next(index, &self.top)?)?;
                    dom::nth_content(top, 0)
                } else {
                    dom::nth_content(cell, 0)
                }
            }
            Locate::FollowingSplitPair => {
                let top = elements.get(elements.find_next(label, &self.top)?)?;
                let min = dom::nth_content(top, 0)?;
                let max = dom::nth_content(top, 2)?;
                Some(format!("{}{}", min.trim(), max.trim()))
            }
        }
    }
}

fn starts_with_span(cell: ElementRef<'_>) -> bool {
    cell.first_child()
        .is_some_and(|node| matches!(node.value(), Node::Element(el) if el.name() == "span"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn apply(layout: Layout, html: &str) -> VehicleRecord {
        let document = Html::parse_document(html);
        let elements = Elements::of_document(&document);
        let mut record = VehicleRecord::default();
        RuleSet::for_layout(layout).unwrap().apply(&elements, &mut record);
        record
    }

    #[test]
    fn all_rule_tables_compile() {
        assert!(RuleSet::for_layout(Layout::Current).is_ok());
        assert!(RuleSet::for_layout(Layout::Legacy).is_ok());
    }

    #[test]
    fn preceding_top_value() {
        let record = apply(
            Layout::Current,
            r#"<div><span class="top">740</span><span class="t-performance_left">Hit Points</span></div>"#,
        );
        assert_eq!(record.hit_points.as_deref(), Some("740"));
    }

    #[test]
    fn value_after_icon() {
        let record = apply(
            Layout::Current,
            "<div><span class=\"top\"><div class=\"icon\"></div>\n15.79\n</span><span>Rate of Fire</span></div>",
        );
        assert_eq!(record.rate_of_fire.as_deref(), Some("15.79"));
    }

    #[test]
    fn hull_armor_trims_unit_and_quotes() {
        let record = apply(
            Layout::Current,
            r#"<div><span class="t-performance_right">100/76/51 mm</span><span>Hull Armor</span></div>"#,
        );
        assert_eq!(record.hull_armor.as_deref(), Some("'100/76/51"));
    }

    #[test]
    fn first_matching_rule_wins() {
        let record = apply(
            Layout::Current,
            r#"<div><span class="top">44</span><span>Gun Traverse Speed</span>
               <span class="top">30</span><span>Turret Traverse</span></div>"#,
        );
        assert_eq!(record.turret_traverse.as_deref(), Some("30"));
    }

    #[test]
    fn legacy_armor_cells_both_shapes() {
        let record = apply(
            Layout::Legacy,
            r#"<table>
               <tr><th>Hull Armor</th><td><span class="stock">80/60/40</span> <span class="top">90/60/40</span></td></tr>
               <tr><th>Turret Armor</th><td>120/80/80</td></tr>
               </table>"#,
        );
        assert_eq!(record.hull_armor.as_deref(), Some("'90/60/40"));
        assert_eq!(record.turret_armor.as_deref(), Some("'120/80/80"));
    }

    #[test]
    fn legacy_elevation_arc_reassembled() {
        let record = apply(
            Layout::Legacy,
            "<table><tr><th>Elevation Arc</th><td><span class=\"top\">-8\u{b0}<br>/+20\u{b0}</span></td></tr></table>",
        );
        assert_eq!(record.elevation.as_deref(), Some("'-8/+20"));
    }

    #[test]
    fn legacy_value_inside_div() {
        let record = apply(
            Layout::Legacy,
            r#"<table><tr><th>Rate of Fire</th><td><span class="top"><div>12.5</div></span></td></tr></table>"#,
        );
        assert_eq!(record.rate_of_fire.as_deref(), Some("12.5"));
    }

    #[test]
    fn missing_labels_leave_fields_empty() {
        let record = apply(Layout::Current, "<p>nothing here</p>");
        assert_eq!(record, VehicleRecord::default());
    }
}
