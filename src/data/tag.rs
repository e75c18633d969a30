//! Tags: named bundles of default champion recommendations, keyed by name.
//! Mutators reference tags weakly by name; deleting a mutator never touches
//! its tags. There is no tag delete or rename — saving under a new name
//! leaves the old entry behind as history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::companion::Row;
use crate::data::store::{JsonStore, TAGS_KEY};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagData {
    #[serde(default)]
    pub good_champions: String,
    #[serde(default)]
    pub bad_champions: String,
}

#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: BTreeMap<String, TagData>,
}

impl TagRegistry {
    pub fn load(store: &JsonStore) -> TagRegistry {
        TagRegistry {
            tags: store.load(TAGS_KEY).unwrap_or_default(),
        }
    }

    pub fn list(&self) -> &BTreeMap<String, TagData> {
        &self.tags
    }

    pub fn get(&self, name: &str) -> Option<&TagData> {
        self.tags.get(name)
    }

    /// Insert or overwrite the entry for `name` (last write wins) and persist
    /// the whole mapping. An empty trimmed name is rejected without mutation.
    pub fn update(&mut self, store: &JsonStore, name: &str, data: TagData) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.tags.insert(name.to_string(), data);
        self.persist(store);
        true
    }

    /// Rows for the `Tags` sheet of the export projection.
    pub fn export_rows(&self) -> Vec<Row> {
        self.tags
            .iter()
            .map(|(name, data)| {
                let mut row = Row::new();
                row.insert("Tag_name".to_string(), name.clone().into());
                row.insert(
                    "Good_champions".to_string(),
                    data.good_champions.clone().into(),
                );
                row.insert(
                    "Bad_champions".to_string(),
                    data.bad_champions.clone().into(),
                );
                row
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.tags.clear();
    }

    fn persist(&self, store: &JsonStore) {
        store.save(TAGS_KEY, &self.tags);
    }
}
