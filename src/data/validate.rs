//! Dataset diagnostics: structural checks over the persisted collections.
//! Nothing here mutates data; the report is for the CLI and for callers that
//! want to show "your data has problems" without fixing anything silently.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::data::commits::{ChampionCommit, MAX_CHAMPION_USES, STAGE_COUNT};
use crate::data::mutator::{split_champion_list, Mutator};
use crate::data::roster::Champion;
use crate::data::tag::TagData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Run every check over the four collections.
pub fn validate_collections(
    mutators: &[Mutator],
    tags: &BTreeMap<String, TagData>,
    champions: &[Champion],
    commits: &[ChampionCommit],
) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_mutators(&mut report, mutators, tags);
    check_roster(&mut report, champions);
    check_commits(&mut report, champions, commits);
    report
}

fn check_mutators(
    report: &mut ValidationReport,
    mutators: &[Mutator],
    tags: &BTreeMap<String, TagData>,
) {
    let mut seen_ids = HashSet::new();
    for mutator in mutators {
        let context = format!("mutator '{}'", mutator.name);
        if !seen_ids.insert(mutator.id.clone()) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate id '{}'", mutator.id),
            );
        }
        if mutator.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Warning,
                format!("mutator '{}'", mutator.id),
                "record has an empty name",
            );
        }
        if mutator.description.trim().is_empty() {
            report.push(
                ValidationSeverity::Warning,
                context.clone(),
                "record has an empty description",
            );
        }
        for tag_name in split_champion_list(&mutator.tag) {
            if !tags.contains_key(&tag_name) {
                report.push(
                    ValidationSeverity::Info,
                    context.clone(),
                    format!("references unsaved tag '{tag_name}'"),
                );
            }
        }
    }
}

fn check_roster(report: &mut ValidationReport, champions: &[Champion]) {
    let mut seen_names = HashSet::new();
    for champion in champions {
        let context = format!("champion '{}'", champion.name);
        if !seen_names.insert(champion.name.clone()) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                "duplicate roster entry",
            );
        }
        // Star flags are conventionally monotonic; a gap means the sheet that
        // produced them disagrees with itself.
        let rank = champion.star_rank() as usize;
        for level in 0..rank {
            if !champion.star_power[level] {
                report.push(
                    ValidationSeverity::Warning,
                    context.clone(),
                    format!("star power skips level {}", level + 1),
                );
            }
        }
    }
}

fn check_commits(
    report: &mut ValidationReport,
    champions: &[Champion],
    commits: &[ChampionCommit],
) {
    let roster_names: HashSet<&str> = champions.iter().map(|c| c.name.as_str()).collect();
    let mut active_per_stage: HashMap<u32, usize> = HashMap::new();
    let mut uses_per_champion: HashMap<&str, usize> = HashMap::new();

    for commit in commits {
        let context = format!("stage {}", commit.stage);
        if commit.stage == 0 || commit.stage > STAGE_COUNT {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("stage is outside 1..={STAGE_COUNT}"),
            );
        }
        if commit.is_committed {
            *active_per_stage.entry(commit.stage).or_default() += 1;
        }
        if commit.is_used() {
            *uses_per_champion
                .entry(commit.champion_name.as_str())
                .or_default() += 1;
        }
        if !roster_names.is_empty() && !roster_names.contains(commit.champion_name.as_str()) {
            report.push(
                ValidationSeverity::Warning,
                context,
                format!(
                    "committed champion '{}' is not on the roster",
                    commit.champion_name
                ),
            );
        }
    }

    for (stage, active) in active_per_stage {
        if active > 1 {
            report.push(
                ValidationSeverity::Error,
                format!("stage {stage}"),
                format!("{active} commits are active at once"),
            );
        }
    }
    for (champion, uses) in uses_per_champion {
        if uses > MAX_CHAMPION_USES {
            report.push(
                ValidationSeverity::Warning,
                format!("champion '{champion}'"),
                format!("used {uses} times, over the cap of {MAX_CHAMPION_USES}"),
            );
        }
    }
}
