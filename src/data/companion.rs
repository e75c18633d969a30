//! The sheet-shaped companion blob (`lorCompanionData`): every imported sheet
//! stored verbatim as generic rows, the roster read and edited through it,
//! and the Mutators/Tags export projections kept in sync alongside it.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::data::roster::{value_to_string, Champion};
use crate::data::store::{JsonStore, COMPANION_KEY};

pub type Row = serde_json::Map<String, Value>;
pub type SheetMap = BTreeMap<String, Vec<Row>>;

pub const ROSTER_SHEET: &str = "Roster";
pub const MUTATORS_SHEET: &str = "Mutators";
pub const TAGS_SHEET: &str = "Tags";

#[derive(Debug, Default)]
pub struct CompanionData {
    sheets: SheetMap,
}

impl CompanionData {
    pub fn load(store: &JsonStore) -> CompanionData {
        CompanionData {
            sheets: store.load(COMPANION_KEY).unwrap_or_default(),
        }
    }

    pub fn sheets(&self) -> &SheetMap {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> &[Row] {
        self.sheets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Overwrite one sheet in memory. Callers persist when the batch is done.
    pub fn set_sheet(&mut self, name: &str, rows: Vec<Row>) {
        self.sheets.insert(name.to_string(), rows);
    }

    /// Replace the whole blob with a freshly imported sheet set.
    pub fn replace_all(&mut self, sheets: SheetMap) {
        self.sheets = sheets;
    }

    /// Champions decoded from the `Roster` sheet. Rows that fail to decode
    /// (no name) are skipped.
    pub fn champions(&self) -> Vec<Champion> {
        self.sheet(ROSTER_SHEET)
            .iter()
            .filter_map(Champion::from_row)
            .collect()
    }

    /// Merge an edited champion back onto its stored roster row, matched by
    /// name. Returns false (no mutation) when the champion is unknown.
    pub fn update_champion(&mut self, store: &JsonStore, champion: &Champion) -> bool {
        let Some(rows) = self.sheets.get_mut(ROSTER_SHEET) else {
            return false;
        };
        for row in rows.iter_mut() {
            if value_to_string(row.get("Champion_name")) == champion.name {
                champion.apply_to_row(row);
                self.persist(store);
                return true;
            }
        }
        false
    }

    pub fn persist(&self, store: &JsonStore) {
        store.save(COMPANION_KEY, &self.sheets);
    }

    pub fn reset(&mut self) {
        self.sheets.clear();
    }
}
