//! Process-wide data store: owns the JSON store and the live registries, and
//! fans out change notifications so the host can re-render what it shows
//! instead of reloading everything.
//!
//! Construct one per process with an explicit root (or `open_default` for the
//! environment-configured one) and route every collaborator operation
//! through it; the registries stay the single in-memory copy of their slice.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::data::commits::{ChampionCommit, CommitError, CommitTracker};
use crate::data::companion::{CompanionData, SheetMap, MUTATORS_SHEET, TAGS_SHEET};
use crate::data::export::{self, ExportError};
use crate::data::mutator::{Mutator, MutatorDraft, MutatorRegistry};
use crate::data::roster::Champion;
use crate::data::store::{
    data_dir_from_env, JsonStore, COMMITS_KEY, COMPANION_KEY, MUTATORS_KEY, TAGS_KEY,
};
use crate::data::tag::{TagData, TagRegistry};
use crate::data::validate::{validate_collections, ValidationReport};
use crate::data::workbook::{self, ImportError, ImportReport};

/// Which slice of the store changed, for subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Mutators,
    Tags,
    Roster,
    Commits,
    All,
}

pub type ChangeListener = Box<dyn Fn(Change)>;

pub struct DataStore {
    store: JsonStore,
    mutators: MutatorRegistry,
    tags: TagRegistry,
    companion: CompanionData,
    commits: CommitTracker,
    listeners: Vec<ChangeListener>,
}

impl DataStore {
    /// Load every registry from the given root. Missing or malformed keys
    /// come up empty; nothing here fails.
    pub fn open(root: impl Into<PathBuf>) -> DataStore {
        let store = JsonStore::new(root);
        DataStore {
            mutators: MutatorRegistry::load(&store),
            tags: TagRegistry::load(&store),
            companion: CompanionData::load(&store),
            commits: CommitTracker::load(&store),
            store,
            listeners: Vec::new(),
        }
    }

    pub fn open_default() -> DataStore {
        DataStore::open(data_dir_from_env())
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }

    /// Register a changed-registry callback; fired after every mutation.
    pub fn subscribe(&mut self, listener: impl Fn(Change) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self, change: Change) {
        for listener in &self.listeners {
            listener(change);
        }
    }

    // ---- mutators ----

    pub fn mutators(&self) -> &[Mutator] {
        self.mutators.list()
    }

    pub fn add_mutator(&mut self, draft: MutatorDraft) -> Option<Mutator> {
        let added = self.mutators.add(&self.store, draft, &self.tags).cloned();
        if added.is_some() {
            self.sync_projection(MUTATORS_SHEET);
            self.notify(Change::Mutators);
        }
        added
    }

    pub fn edit_mutator(&mut self, updated: Mutator) -> bool {
        let changed = self.mutators.edit(&self.store, updated);
        if changed {
            self.sync_projection(MUTATORS_SHEET);
            self.notify(Change::Mutators);
        }
        changed
    }

    pub fn delete_mutator(&mut self, id: &str) -> bool {
        let changed = self.mutators.delete(&self.store, id);
        if changed {
            self.sync_projection(MUTATORS_SHEET);
            self.notify(Change::Mutators);
        }
        changed
    }

    pub fn add_imported_mutators(&mut self, imported: Vec<Mutator>) -> usize {
        let count = self.mutators.add_imported(&self.store, imported);
        if count > 0 {
            self.sync_projection(MUTATORS_SHEET);
            self.notify(Change::Mutators);
        }
        count
    }

    // ---- tags ----

    pub fn tags(&self) -> &BTreeMap<String, TagData> {
        self.tags.list()
    }

    pub fn tag_data(&self, name: &str) -> Option<&TagData> {
        self.tags.get(name)
    }

    pub fn update_tag(&mut self, name: &str, data: TagData) -> bool {
        let changed = self.tags.update(&self.store, name, data);
        if changed {
            self.sync_projection(TAGS_SHEET);
            self.notify(Change::Tags);
        }
        changed
    }

    // ---- roster ----

    pub fn roster(&self) -> Vec<Champion> {
        self.companion.champions()
    }

    pub fn update_champion(&mut self, champion: &Champion) -> bool {
        let changed = self.companion.update_champion(&self.store, champion);
        if changed {
            self.notify(Change::Roster);
        }
        changed
    }

    /// Every stored sheet, projections included.
    pub fn sheets(&self) -> &SheetMap {
        self.companion.sheets()
    }

    // ---- monthly-challenge commits ----

    pub fn commits(&self) -> &[ChampionCommit] {
        self.commits.list()
    }

    pub fn commit_champion(&mut self, stage: u32, champion: &str) -> Result<(), CommitError> {
        self.commits.commit(&self.store, stage, champion)?;
        self.notify(Change::Commits);
        Ok(())
    }

    pub fn record_victory(&mut self, stage: u32) -> Result<ChampionCommit, CommitError> {
        let commit = self.commits.record_victory(&self.store, stage)?;
        self.notify(Change::Commits);
        Ok(commit)
    }

    pub fn record_defeat(&mut self, stage: u32) -> Result<ChampionCommit, CommitError> {
        let commit = self.commits.record_defeat(&self.store, stage)?;
        self.notify(Change::Commits);
        Ok(commit)
    }

    pub fn clear_commit(&mut self, stage: u32) -> Result<ChampionCommit, CommitError> {
        let commit = self.commits.clear_commit(&self.store, stage)?;
        self.notify(Change::Commits);
        Ok(commit)
    }

    pub fn champion_available(&self, champion: &str) -> bool {
        self.commits.is_available(champion)
    }

    /// Roster entries still under the monthly usage cap.
    pub fn available_champions(&self) -> Vec<Champion> {
        self.roster()
            .into_iter()
            .filter(|champion| self.commits.is_available(&champion.name))
            .collect()
    }

    // ---- import / export bridge ----

    /// Import a whole workbook: stash every sheet verbatim, append the
    /// mutator sheets' records, and refresh the export projections. A parse
    /// failure aborts before any mutation.
    pub fn import_workbook(&mut self, path: &Path) -> Result<ImportReport, ImportError> {
        let sheets = workbook::read_workbook(path)?;

        let mut imported = Vec::new();
        for (name, rows) in &sheets {
            if workbook::is_mutator_sheet(name) {
                imported.extend(workbook::mutators_from_rows(rows, self.mutators.ids_mut()));
            }
        }

        let sheet_count = sheets.len();
        let mutator_count = imported.len();
        self.companion.replace_all(sheets);
        if mutator_count > 0 {
            self.mutators.add_imported(&self.store, imported);
        }
        self.companion
            .set_sheet(MUTATORS_SHEET, self.mutators.export_rows());
        self.companion.set_sheet(TAGS_SHEET, self.tags.export_rows());
        self.companion.persist(&self.store);
        self.notify(Change::All);

        Ok(ImportReport {
            source_path: path.display().to_string(),
            sheet_count,
            mutator_count,
        })
    }

    /// Import mutator records from a headered CSV.
    pub fn import_mutators_csv(&mut self, path: &Path) -> Result<ImportReport, ImportError> {
        let imported = workbook::mutators_from_csv(path, self.mutators.ids_mut())?;
        let mutator_count = self.add_imported_mutators(imported);
        Ok(ImportReport {
            source_path: path.display().to_string(),
            sheet_count: 1,
            mutator_count,
        })
    }

    /// The workbook-shaped snapshot: registry projections plus raw sheets.
    pub fn export_snapshot(&self) -> SheetMap {
        export::export_snapshot(self.companion.sheets(), &self.mutators, &self.tags)
    }

    /// Write the snapshot into `dir` under the fixed export file name.
    pub fn export_workbook(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        export::export_workbook(&self.export_snapshot(), dir)
    }

    // ---- maintenance ----

    pub fn validate(&self) -> ValidationReport {
        validate_collections(
            self.mutators.list(),
            self.tags.list(),
            &self.roster(),
            self.commits.list(),
        )
    }

    /// Wipe all four keys and the in-memory copies.
    pub fn clear_all(&mut self) {
        self.store.remove(MUTATORS_KEY);
        self.store.remove(TAGS_KEY);
        self.store.remove(COMPANION_KEY);
        self.store.remove(COMMITS_KEY);
        self.mutators.reset();
        self.tags.reset();
        self.companion.reset();
        self.commits.reset();
        self.notify(Change::All);
    }

    fn sync_projection(&mut self, sheet: &str) {
        let rows = match sheet {
            MUTATORS_SHEET => self.mutators.export_rows(),
            TAGS_SHEET => self.tags.export_rows(),
            _ => return,
        };
        self.companion.set_sheet(sheet, rows);
        self.companion.persist(&self.store);
    }
}
