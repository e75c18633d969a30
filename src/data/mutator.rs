//! Mutator records and their registry: named encounter modifiers with a
//! rarity, champion recommendations and strategy notes.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::data::companion::Row;
use crate::data::store::{JsonStore, MUTATORS_KEY};
use crate::data::tag::TagRegistry;

/// Rarity tier. Anything outside the four known names coerces to Common on
/// decode, so historical blobs and sloppy spreadsheets stay loadable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn parse(value: &str) -> Rarity {
        match value.trim() {
            "Rare" => Rarity::Rare,
            "Epic" => Rarity::Epic,
            "Legendary" => Rarity::Legendary,
            _ => Rarity::Common,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

impl From<String> for Rarity {
    fn from(value: String) -> Rarity {
        Rarity::parse(&value)
    }
}

impl From<Rarity> for String {
    fn from(value: Rarity) -> String {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutator {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub description: String,
    #[serde(default)]
    pub good_champions: String,
    #[serde(default)]
    pub bad_champions: String,
    #[serde(default)]
    pub strategy: String,
    /// Delimited list of tag names; empty when untagged.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

/// Fields for a new mutator before an id is assigned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutatorDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub good_champions: String,
    #[serde(default)]
    pub bad_champions: String,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub tag: String,
}

/// Split a delimited champion (or tag-name) list on commas and semicolons,
/// trimming entries and dropping blanks.
pub fn split_champion_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Union `extra` into `base`: deduplicated, first appearance wins,
/// comma-joined.
pub fn union_champion_lists(base: &str, extra: &str) -> String {
    let mut merged: Vec<String> = Vec::new();
    for entry in split_champion_list(base)
        .into_iter()
        .chain(split_champion_list(extra))
    {
        if !merged.contains(&entry) {
            merged.push(entry);
        }
    }
    merged.join(", ")
}

/// Ids are millisecond timestamps as strings; a sequence suffix keeps them
/// pairwise distinct when several records are created inside one tick (or
/// when the clock steps backwards).
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_millis: i64,
    sequence: u32,
}

impl IdGenerator {
    pub fn next(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        if now <= self.last_millis && self.last_millis != 0 {
            self.sequence += 1;
            format!("{}-{}", self.last_millis, self.sequence)
        } else {
            self.last_millis = now;
            self.sequence = 0;
            now.to_string()
        }
    }

    /// Fresh synthetic id for bulk-imported rows.
    pub fn next_imported(&mut self) -> String {
        format!("imported-{}", self.next())
    }
}

#[derive(Debug, Default)]
pub struct MutatorRegistry {
    mutators: Vec<Mutator>,
    ids: IdGenerator,
}

impl MutatorRegistry {
    pub fn load(store: &JsonStore) -> MutatorRegistry {
        MutatorRegistry {
            mutators: store.load(MUTATORS_KEY).unwrap_or_default(),
            ids: IdGenerator::default(),
        }
    }

    /// Insertion order, never sorted.
    pub fn list(&self) -> &[Mutator] {
        &self.mutators
    }

    pub fn get(&self, id: &str) -> Option<&Mutator> {
        self.mutators.iter().find(|mutator| mutator.id == id)
    }

    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    /// Add a mutator. An empty trimmed name or description is a silent no-op.
    /// Tags attached to the draft pull the tag registry's stored champion
    /// lists into the record: union, first appearance wins, explicit entries
    /// ahead of inherited ones.
    pub fn add(
        &mut self,
        store: &JsonStore,
        draft: MutatorDraft,
        tags: &TagRegistry,
    ) -> Option<&Mutator> {
        if draft.name.trim().is_empty() || draft.description.trim().is_empty() {
            return None;
        }

        let tag_names = split_champion_list(&draft.tag);
        let mut good_champions = draft.good_champions;
        let mut bad_champions = draft.bad_champions;
        for tag_name in &tag_names {
            if let Some(data) = tags.get(tag_name) {
                good_champions = union_champion_lists(&good_champions, &data.good_champions);
                bad_champions = union_champion_lists(&bad_champions, &data.bad_champions);
            }
        }

        self.mutators.push(Mutator {
            id: self.ids.next(),
            name: draft.name,
            rarity: draft.rarity,
            description: draft.description,
            good_champions,
            bad_champions,
            strategy: draft.strategy,
            tag: draft.tag,
        });
        self.persist(store);
        self.mutators.last()
    }

    /// Replace the record whose id matches. A missing id is a silent no-op.
    pub fn edit(&mut self, store: &JsonStore, updated: Mutator) -> bool {
        match self
            .mutators
            .iter_mut()
            .find(|mutator| mutator.id == updated.id)
        {
            Some(slot) => {
                *slot = updated;
                self.persist(store);
                true
            }
            None => false,
        }
    }

    /// Remove the record whose id matches. A missing id is a silent no-op.
    pub fn delete(&mut self, store: &JsonStore, id: &str) -> bool {
        let before = self.mutators.len();
        self.mutators.retain(|mutator| mutator.id != id);
        if self.mutators.len() == before {
            return false;
        }
        self.persist(store);
        true
    }

    /// Append-only bulk insert. Imported rows are authoritative: no tag
    /// inference, no deduplication against existing records.
    pub fn add_imported(&mut self, store: &JsonStore, imported: Vec<Mutator>) -> usize {
        let count = imported.len();
        if count == 0 {
            return 0;
        }
        self.mutators.extend(imported);
        self.persist(store);
        count
    }

    /// Rows for the `Mutators` sheet of the export projection, mapping the
    /// internal fields back to the external column names.
    pub fn export_rows(&self) -> Vec<Row> {
        self.mutators
            .iter()
            .map(|mutator| {
                let mut row = Row::new();
                row.insert("Mutator_name".to_string(), mutator.name.clone().into());
                row.insert("Rarity".to_string(), mutator.rarity.as_str().into());
                row.insert("Mutator".to_string(), mutator.description.clone().into());
                row.insert(
                    "Good_champions".to_string(),
                    mutator.good_champions.clone().into(),
                );
                row.insert(
                    "Bad_champions".to_string(),
                    mutator.bad_champions.clone().into(),
                );
                row.insert("Strategy".to_string(), mutator.strategy.clone().into());
                row.insert("Mutator_tags".to_string(), mutator.tag.clone().into());
                row
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.mutators.clear();
    }

    fn persist(&self, store: &JsonStore) {
        store.save(MUTATORS_KEY, &self.mutators);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn champion_lists_split_on_commas_and_semicolons() {
        assert_eq!(
            split_champion_list("Ahri, Zed ;; Jinx"),
            vec!["Ahri", "Zed", "Jinx"]
        );
        assert!(split_champion_list("  ").is_empty());
    }

    #[test]
    fn union_keeps_first_appearance_order() {
        assert_eq!(union_champion_lists("C;A", "A,B"), "C, A, B");
        assert_eq!(union_champion_lists("", "A,B"), "A, B");
    }

    #[test]
    fn rarity_coerces_unknown_names_to_common() {
        assert_eq!(Rarity::parse("Mythic"), Rarity::Common);
        assert_eq!(Rarity::parse(" Legendary "), Rarity::Legendary);
    }

    #[test]
    fn id_generator_never_repeats_inside_one_tick() {
        let mut ids = IdGenerator::default();
        let generated: Vec<String> = (0..200).map(|_| ids.next()).collect();
        let mut deduped = generated.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), generated.len());
    }
}
