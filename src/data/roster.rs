//! Champion roster entries, decoded from imported sheet rows: a fixed set of
//! known fields plus arbitrary boolean flags kept in an explicit side map.
//! Champions are never created by the app; they arrive via import only.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::data::companion::Row;

pub const STAR_POWER_LEVELS: usize = 6;

const STAR_POWER_COLUMNS: [&str; STAR_POWER_LEVELS] = [
    "Star_power_1",
    "Star_power_2",
    "Star_power_3",
    "Star_power_4",
    "Star_power_5",
    "Star_power_6",
];

const KNOWN_COLUMNS: [&str; 6] = [
    "Champion_name",
    "Region",
    "Region_2",
    "Champion_level",
    "Unlocked",
    "Fragments",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Champion {
    pub name: String,
    pub region: String,
    pub region_2: Option<String>,
    pub level: i64,
    pub unlocked: bool,
    pub fragments: i64,
    pub star_power: [bool; STAR_POWER_LEVELS],
    /// Boolean columns outside the known set, preserved generically.
    pub extra_flags: BTreeMap<String, bool>,
}

impl Champion {
    /// Decode a stored roster row. Rows without a champion name are skipped.
    pub fn from_row(row: &Row) -> Option<Champion> {
        let name = value_to_string(row.get("Champion_name"));
        if name.is_empty() {
            return None;
        }

        let mut star_power = [false; STAR_POWER_LEVELS];
        for (index, column) in STAR_POWER_COLUMNS.iter().enumerate() {
            star_power[index] = value_to_bool(row.get(*column));
        }

        let region_2 = match value_to_string(row.get("Region_2")) {
            value if value.is_empty() => None,
            value => Some(value),
        };

        let mut extra_flags = BTreeMap::new();
        for (column, value) in row {
            if KNOWN_COLUMNS.contains(&column.as_str())
                || STAR_POWER_COLUMNS.contains(&column.as_str())
            {
                continue;
            }
            if let Some(flag) = value_as_bool(value) {
                extra_flags.insert(column.clone(), flag);
            }
        }

        Some(Champion {
            name,
            region: value_to_string(row.get("Region")),
            region_2,
            level: value_to_i64(row.get("Champion_level")),
            unlocked: value_to_bool(row.get("Unlocked")),
            fragments: value_to_i64(row.get("Fragments")),
            star_power,
            extra_flags,
        })
    }

    /// Highest star level whose flag is set. Monotonicity of the flags is a
    /// convention, not enforced; gaps surface through the validation pass.
    pub fn star_rank(&self) -> u8 {
        let mut rank = 0;
        for (index, set) in self.star_power.iter().enumerate() {
            if *set {
                rank = index as u8 + 1;
            }
        }
        rank
    }

    /// Merge this champion back onto its stored row. Unrecognized non-boolean
    /// columns on the row are left untouched; the name is the match key and
    /// is never rewritten.
    pub fn apply_to_row(&self, row: &mut Row) {
        row.insert("Region".to_string(), self.region.clone().into());
        if let Some(region_2) = &self.region_2 {
            row.insert("Region_2".to_string(), region_2.clone().into());
        }
        row.insert("Champion_level".to_string(), self.level.into());
        row.insert("Unlocked".to_string(), self.unlocked.into());
        row.insert("Fragments".to_string(), self.fragments.into());
        for (index, column) in STAR_POWER_COLUMNS.iter().enumerate() {
            row.insert(column.to_string(), self.star_power[index].into());
        }
        for (column, flag) in &self.extra_flags {
            row.insert(column.clone(), (*flag).into());
        }
    }

    /// Full row representation, for payloads and fresh projections.
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("Champion_name".to_string(), self.name.clone().into());
        self.apply_to_row(&mut row);
        row
    }
}

/// Read-side roster projection: substring search, region match against either
/// region column, minimum level, and exact-match star ranks.
#[derive(Debug, Clone, Default)]
pub struct RosterFilter {
    pub search: String,
    pub region: Option<String>,
    pub min_level: i64,
    pub star_ranks: Vec<u8>,
}

impl RosterFilter {
    pub fn matches(&self, champion: &Champion) -> bool {
        if !self.search.is_empty()
            && !champion
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
        {
            return false;
        }
        if let Some(region) = &self.region {
            let secondary = champion.region_2.as_deref() == Some(region.as_str());
            if &champion.region != region && !secondary {
                return false;
            }
        }
        if champion.level < self.min_level {
            return false;
        }
        if !self.star_ranks.is_empty() && !self.star_ranks.contains(&champion.star_rank()) {
            return false;
        }
        true
    }
}

pub(crate) fn value_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn value_to_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn value_to_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0) != 0.0,
        Some(Value::String(text)) => {
            let text = text.trim();
            text.eq_ignore_ascii_case("true")
                || text.eq_ignore_ascii_case("yes")
                || text == "1"
        }
        _ => false,
    }
}

/// Strict boolean reading for the extra-flag sweep: only booleans and
/// true/false strings count; anything else is not a flag column.
fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) if text.trim().eq_ignore_ascii_case("true") => Some(true),
        Value::String(text) if text.trim().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn decodes_known_fields_and_extra_flags() {
        let champion = Champion::from_row(&row(&[
            ("Champion_name", "Ahri".into()),
            ("Region", "Ionia".into()),
            ("Champion_level", 12.into()),
            ("Unlocked", "TRUE".into()),
            ("Star_power_1", true.into()),
            ("Star_power_2", "true".into()),
            ("Fragments", "30".into()),
            ("Has_skin", true.into()),
            ("Notes", "free text".into()),
        ]))
        .expect("row should decode");

        assert_eq!(champion.name, "Ahri");
        assert_eq!(champion.level, 12);
        assert!(champion.unlocked);
        assert_eq!(champion.fragments, 30);
        assert_eq!(champion.star_rank(), 2);
        assert_eq!(champion.extra_flags.get("Has_skin"), Some(&true));
        assert!(!champion.extra_flags.contains_key("Notes"));
    }

    #[test]
    fn rows_without_a_name_are_skipped() {
        assert!(Champion::from_row(&row(&[("Region", "Ionia".into())])).is_none());
        assert!(Champion::from_row(&row(&[("Champion_name", "  ".into())])).is_none());
    }

    #[test]
    fn star_rank_is_the_highest_set_flag() {
        let champion = Champion::from_row(&row(&[
            ("Champion_name", "Zed".into()),
            ("Star_power_1", true.into()),
            ("Star_power_4", true.into()),
        ]))
        .expect("row should decode");
        assert_eq!(champion.star_rank(), 4);
    }

    #[test]
    fn filter_matches_secondary_region_and_star_ranks() {
        let champion = Champion::from_row(&row(&[
            ("Champion_name", "Jinx".into()),
            ("Region", "Piltover".into()),
            ("Region_2", "Zaun".into()),
            ("Champion_level", 20.into()),
            ("Star_power_1", true.into()),
        ]))
        .expect("row should decode");

        let filter = RosterFilter {
            region: Some("Zaun".to_string()),
            star_ranks: vec![1],
            ..RosterFilter::default()
        };
        assert!(filter.matches(&champion));

        let mismatch = RosterFilter {
            min_level: 30,
            ..RosterFilter::default()
        };
        assert!(!mismatch.matches(&champion));
    }

    #[test]
    fn apply_to_row_preserves_unknown_columns() {
        let mut stored = row(&[
            ("Champion_name", "Ahri".into()),
            ("Notes", "keep me".into()),
            ("Champion_level", 1.into()),
        ]);
        let mut champion = Champion::from_row(&stored).expect("row should decode");
        champion.level = 13;
        champion.apply_to_row(&mut stored);

        assert_eq!(stored.get("Notes"), Some(&Value::from("keep me")));
        assert_eq!(stored.get("Champion_level"), Some(&Value::from(13)));
    }
}
