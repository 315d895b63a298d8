//! Checkpoint - Save/Load Match State
//!
//! A match can be paused between months and resumed later. The snapshot
//! holds the roster, the ledger and the calendar position; the rule set is
//! supplied again on restore and must hash to the value recorded at save.
//!
//! # Critical Invariants
//!
//! - **Config Matching**: a snapshot only restores under the same rule set
//! - **Ledger Integrity**: ledger players match the roster, and the ledger
//!   holds exactly one row per settled month

use crate::models::ledger::ScoreLedger;
use crate::rules::{RuleSet, RuleSetError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CheckpointError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config hash mismatch: snapshot {expected}, rules {actual}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("State validation error: {0}")]
    StateValidation(String),
}

impl From<RuleSetError> for CheckpointError {
    fn from(err: RuleSetError) -> Self {
        CheckpointError::Serialization(err.to_string())
    }
}

/// Match state between two months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub roster: Vec<String>,
    pub ledger: ScoreLedger,
    pub months_played: u32,
    pub months_per_match: u32,

    /// SHA256 hash of the rule set in force (for validation)
    pub config_hash: String,
}

impl MatchSnapshot {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }
}

/// Validate snapshot integrity against the rule set it is restored with
pub fn validate_snapshot(snapshot: &MatchSnapshot, rules: &RuleSet) -> Result<(), CheckpointError> {
    // 1. Config matching
    let actual = rules.config_hash()?;
    if actual != snapshot.config_hash {
        return Err(CheckpointError::ConfigMismatch {
            expected: snapshot.config_hash.clone(),
            actual,
        });
    }

    // 2. Ledger covers exactly the roster
    if snapshot.ledger.players() != snapshot.roster.as_slice() {
        return Err(CheckpointError::StateValidation(format!(
            "Ledger players {:?} do not match roster {:?}",
            snapshot.ledger.players(),
            snapshot.roster
        )));
    }

    // 3. One ledger row per settled month
    let recorded = snapshot.ledger.months_recorded();
    if recorded != snapshot.months_played as usize {
        return Err(CheckpointError::StateValidation(format!(
            "Ledger holds {} months, calendar says {}",
            recorded, snapshot.months_played
        )));
    }

    if snapshot.months_per_match == 0 {
        return Err(CheckpointError::StateValidation(
            "Match length must be at least one month".to_string(),
        ));
    }
    if snapshot.months_played > snapshot.months_per_match {
        return Err(CheckpointError::StateValidation(format!(
            "{} months played in a {}-month match",
            snapshot.months_played, snapshot.months_per_match
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RulePreset;

    fn snapshot(rules: &RuleSet) -> MatchSnapshot {
        MatchSnapshot {
            roster: vec!["A".to_string(), "B".to_string()],
            ledger: ScoreLedger::new(&["A", "B"], 60),
            months_played: 0,
            months_per_match: 12,
            config_hash: rules.config_hash().unwrap(),
        }
    }

    #[test]
    fn test_valid_snapshot_passes() {
        let rules = RulePreset::Hachihachi.load();
        assert!(validate_snapshot(&snapshot(&rules), &rules).is_ok());
    }

    #[test]
    fn test_different_rules_rejected() {
        let rules = RulePreset::Hachihachi.load();
        let other = RulePreset::HachihachiHouse.load();
        assert!(matches!(
            validate_snapshot(&snapshot(&rules), &other),
            Err(CheckpointError::ConfigMismatch { .. })
        ));
    }

    #[test]
    fn test_month_count_mismatch_rejected() {
        let rules = RulePreset::Hachihachi.load();
        let mut snap = snapshot(&rules);
        snap.months_played = 3;
        assert!(matches!(
            validate_snapshot(&snap, &rules),
            Err(CheckpointError::StateValidation(_))
        ));
    }

    #[test]
    fn test_zero_month_match_rejected() {
        let rules = RulePreset::Hachihachi.load();
        let mut snap = snapshot(&rules);
        snap.months_per_match = 0;
        assert_eq!(
            validate_snapshot(&snap, &rules),
            Err(CheckpointError::StateValidation(
                "Match length must be at least one month".to_string()
            ))
        );
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let rules = RulePreset::KoiKoi.load();
        let snap = snapshot(&rules);
        let restored = MatchSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(restored, snap);
    }
}
