//! Value clean-up applied after a rule has found its raw text.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

const ROMAN_TIERS: [(&str, &str); 10] = [
    ("I", "1"),
    ("II", "2"),
    ("III", "3"),
    ("IV", "4"),
    ("V", "5"),
    ("VI", "6"),
    ("VII", "7"),
    ("VIII", "8"),
    ("IX", "9"),
    ("X", "10"),
];

/// Characters observed in vehicle names that spreadsheets choke on.
const NAME_SUBSTITUTIONS: [(char, &str); 5] = [
    ('\u{a0}', ""),
    ('\u{df}', "B"),
    ('\u{e4}', "a"),
    ('\u{e2}', "a"),
    ('\u{f6}', "o"),
];

/// `"VIII"` -> `"8"`. Anything outside I..X is returned unchanged.
pub fn roman_tier(tier: &str) -> String {
    ROMAN_TIERS
        .iter()
        .find(|(roman, _)| *roman == tier)
        .map(|(_, decimal)| decimal.to_string())
        .unwrap_or_else(|| tier.to_string())
}

/// `"Tier VIII"` -> `"8"`.
///
/// The characters of `"Tier "` are trimmed from both ends as a set, so the
/// uppercase numerals survive.
pub fn tier(raw: &str) -> String {
    roman_tier(trim_chars(raw, "Tier "))
}

/// Roman or decimal tier as a number, -1 if neither.
pub fn tier_number(raw: &str) -> i32 {
    tier(raw.trim()).parse().unwrap_or(-1)
}

pub fn trim_chars<'a>(s: &'a str, set: &str) -> &'a str {
    s.trim_matches(|c| set.contains(c))
}

pub fn strip_degrees(s: &str) -> String {
    s.replace('\u{b0}', "")
}

/// Leading quote so spreadsheets keep the value as literal text.
pub fn quote(s: &str) -> String {
    format!("'{}", s)
}

pub fn clean_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match NAME_SUBSTITUTIONS.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => out.push_str(to),
            None => out.push(ch),
        }
    }
    out.trim().to_string()
}

/// Integer or float as written on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub fn parse(s: &str) -> Option<Num> {
        let s = s.trim();
        if s.contains('.') {
            s.parse().ok().map(Num::Float)
        } else {
            s.parse().ok().map(Num::Int)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    fn cmp_value(&self, other: &Num) -> Ordering {
        self.as_f64().total_cmp(&other.as_f64())
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Num::Int(i) => write!(f, "{}", i),
            Num::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Minimum and maximum damage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageRange {
    pub min: String,
    pub max: String,
}

static HYPHEN_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9.]+-[0-9.]+").expect("hardcoded regex pattern is valid"));

/// Split a damage figure.
///
/// `"120-180"` is a range and splits on the hyphen; `"50/75.5/60"` lists one
/// value per round and reduces numerically to its extremes. A single number
/// is both min and max.
pub fn damage_range(raw: &str) -> Option<DamageRange> {
    let raw = raw.trim();
    if HYPHEN_RANGE.is_match(raw) {
        let (min, max) = raw.split_once('-')?;
        return Some(DamageRange {
            min: min.trim().to_string(),
            max: max.trim().to_string(),
        });
    }
    let values: Vec<Num> = raw.split('/').filter_map(Num::parse).collect();
    let min = values.iter().copied().min_by(Num::cmp_value)?;
    let max = values.iter().copied().max_by(Num::cmp_value)?;
    Some(DamageRange {
        min: min.to_string(),
        max: max.to_string(),
    })
}

/// Leading number of a cell such as `"16.67 r/m"` or `"2.3 s"`.
pub fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_tiers_map_exactly() {
        let expected = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];
        let numerals = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];
        for (numeral, decimal) in numerals.iter().zip(expected) {
            assert_eq!(roman_tier(numeral), decimal);
        }
        assert_eq!(roman_tier("XI"), "XI");
        assert_eq!(roman_tier("Prototype"), "Prototype");
    }

    #[test]
    fn tier_strips_label() {
        assert_eq!(tier("Tier VIII"), "8");
        assert_eq!(tier("Tier IV "), "4");
        assert_eq!(tier_number("IX"), 9);
        assert_eq!(tier_number("7"), 7);
        assert_eq!(tier_number("??"), -1);
    }

    #[test]
    fn hyphenated_damage_splits() {
        assert_eq!(
            damage_range("120-180"),
            Some(DamageRange {
                min: "120".into(),
                max: "180".into()
            })
        );
    }

    #[test]
    fn range_pattern_is_anchored() {
        assert!(HYPHEN_RANGE.is_match("110-180"));
        assert!(HYPHEN_RANGE.is_match("0.5-1.5 s"));
        assert!(!HYPHEN_RANGE.is_match("HE 110-180"));
        assert_eq!(damage_range("90-150").map(|r| r.max), Some("150".to_string()));
    }

    #[test]
    fn slash_damage_reduces_numerically() {
        assert_eq!(
            damage_range("50/75.5/60"),
            Some(DamageRange {
                min: "50".into(),
                max: "75.5".into()
            })
        );
        // a string comparison would pick "9" as the maximum
        let range = damage_range("110/9/175").unwrap();
        assert_eq!((range.min.as_str(), range.max.as_str()), ("9", "175"));
    }

    #[test]
    fn unparseable_damage_is_none() {
        assert_eq!(damage_range("unknown"), None);
        assert_eq!(damage_range(""), None);
    }

    #[test]
    fn names_use_fixed_substitutions() {
        assert_eq!(clean_name("Pz.Kpfw. V-IV\u{a0}"), "Pz.Kpfw. V-IV");
        assert_eq!(clean_name("L\u{f6}we"), "Lowe");
        assert_eq!(clean_name("Gro\u{df}traktor"), "GroBtraktor");
        assert_eq!(clean_name("Char B1 \u{e9}"), "Char B1 \u{e9}");
    }

    #[test]
    fn leading_numbers() {
        assert_eq!(leading_number("16.67 r/m"), Some(16.67));
        assert_eq!(leading_number(" -10 "), Some(-10.0));
        assert_eq!(leading_number("n/a"), None);
    }

    #[test]
    fn degrees_and_quotes() {
        assert_eq!(quote(&strip_degrees("-10\u{b0}/+20\u{b0}")), "'-10/+20");
        assert_eq!(trim_chars(" 80 mm", " m"), "80");
    }
}
