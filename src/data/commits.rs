//! Monthly-challenge commitment tracking: one champion fielded per stage, an
//! append-only result history, and a per-champion usage cap for the month.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::roster::Champion;
use crate::data::store::{JsonStore, COMMITS_KEY};

pub const STAGE_COUNT: u32 = 70;
pub const MAX_CHAMPION_USES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionCommit {
    pub stage: u32,
    pub champion_name: String,
    #[serde(default)]
    pub victories: u32,
    #[serde(default)]
    pub defeats: u32,
    pub is_committed: bool,
}

impl ChampionCommit {
    /// A commit counts toward the usage cap once it has seen any result.
    pub fn is_used(&self) -> bool {
        self.victories > 0 || self.defeats > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    StageOutOfRange(u32),
    StageOccupied(u32),
    StageVacant(u32),
    ChampionUnavailable(String),
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageOutOfRange(stage) => {
                write!(f, "stage {stage} is outside 1..={STAGE_COUNT}")
            }
            Self::StageOccupied(stage) => {
                write!(f, "stage {stage} already has a committed champion")
            }
            Self::StageVacant(stage) => write!(f, "stage {stage} has no committed champion"),
            Self::ChampionUnavailable(name) => {
                write!(f, "{name} has already been used {MAX_CHAMPION_USES} times")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct CommitTracker {
    commits: Vec<ChampionCommit>,
}

impl CommitTracker {
    pub fn load(store: &JsonStore) -> CommitTracker {
        CommitTracker {
            commits: store.load(COMMITS_KEY).unwrap_or_default(),
        }
    }

    /// Full history, settled records included.
    pub fn list(&self) -> &[ChampionCommit] {
        &self.commits
    }

    pub fn active_commit(&self, stage: u32) -> Option<&ChampionCommit> {
        self.commits
            .iter()
            .find(|commit| commit.stage == stage && commit.is_committed)
    }

    /// Times a champion has been used this month: commits with any recorded
    /// result, across all stages.
    pub fn uses_of(&self, champion: &str) -> usize {
        self.commits
            .iter()
            .filter(|commit| commit.champion_name == champion && commit.is_used())
            .count()
    }

    pub fn is_available(&self, champion: &str) -> bool {
        self.uses_of(champion) < MAX_CHAMPION_USES
    }

    /// Field a champion against a stage. An occupied stage is rejected, never
    /// overwritten; a capped champion is rejected with its own error.
    pub fn commit(
        &mut self,
        store: &JsonStore,
        stage: u32,
        champion: &str,
    ) -> Result<(), CommitError> {
        if stage == 0 || stage > STAGE_COUNT {
            return Err(CommitError::StageOutOfRange(stage));
        }
        if self.active_commit(stage).is_some() {
            return Err(CommitError::StageOccupied(stage));
        }
        if !self.is_available(champion) {
            return Err(CommitError::ChampionUnavailable(champion.to_string()));
        }
        self.commits.push(ChampionCommit {
            stage,
            champion_name: champion.to_string(),
            victories: 0,
            defeats: 0,
            is_committed: true,
        });
        self.persist(store);
        Ok(())
    }

    /// A win at the stage. The record stays committed: the same champion can
    /// win repeatedly at one stage.
    pub fn record_victory(
        &mut self,
        store: &JsonStore,
        stage: u32,
    ) -> Result<ChampionCommit, CommitError> {
        let commit = self.active_commit_mut(stage)?;
        commit.victories += 1;
        let snapshot = commit.clone();
        self.persist(store);
        Ok(snapshot)
    }

    /// A loss at the stage. The stage frees up; the loss counts toward the
    /// champion's usage cap permanently.
    pub fn record_defeat(
        &mut self,
        store: &JsonStore,
        stage: u32,
    ) -> Result<ChampionCommit, CommitError> {
        let commit = self.active_commit_mut(stage)?;
        commit.defeats += 1;
        commit.is_committed = false;
        let snapshot = commit.clone();
        self.persist(store);
        Ok(snapshot)
    }

    /// Withdraw the commitment without penalty: the flag flips, no counters
    /// move.
    pub fn clear_commit(
        &mut self,
        store: &JsonStore,
        stage: u32,
    ) -> Result<ChampionCommit, CommitError> {
        let commit = self.active_commit_mut(stage)?;
        commit.is_committed = false;
        let snapshot = commit.clone();
        self.persist(store);
        Ok(snapshot)
    }

    /// Read-side projection: champions still under the usage cap.
    pub fn available_champions<'a>(&self, champions: &'a [Champion]) -> Vec<&'a Champion> {
        champions
            .iter()
            .filter(|champion| self.is_available(&champion.name))
            .collect()
    }

    pub fn reset(&mut self) {
        self.commits.clear();
    }

    fn active_commit_mut(&mut self, stage: u32) -> Result<&mut ChampionCommit, CommitError> {
        self.commits
            .iter_mut()
            .find(|commit| commit.stage == stage && commit.is_committed)
            .ok_or(CommitError::StageVacant(stage))
    }

    fn persist(&self, store: &JsonStore) {
        store.save(COMMITS_KEY, &self.commits);
    }
}
