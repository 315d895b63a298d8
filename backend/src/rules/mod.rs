//! Rule Set Model
//!
//! A `RuleSet` is the complete, immutable-per-round configuration of a match:
//! card unit values, the three named hand tables and the feature toggles that
//! gate the field multiplier and the side payments.
//!
//! # Hand tables
//!
//! - **Declared hands** (dekiyaku): round-ending combinations declared by the winner
//! - **Hand bonuses** (teyaku): small combinations any active player may hold
//! - **Special hands**: alternate round-ending rules that void hand bonuses
//!
//! Tables keep insertion order so presets and edited rule sets list their hands
//! the way they were defined.
//!
//! # Critical Invariants
//!
//! 1. Hand names are unique within a table
//! 2. Every hand score lies in `0..=MAX_SCORE`
//!
//! # Example
//!
//! ```rust
//! use hanafuda_settlement_core_rs::rules::{HandDefinition, HandTableKind, RuleSet};
//!
//! let mut rules = RuleSet::default();
//! rules
//!     .add_hand(HandTableKind::Declared, HandDefinition::fixed("kiku-ni-sakazuki", 3))
//!     .unwrap();
//! assert!(rules.declared_hands.contains("kiku-ni-sakazuki"));
//! ```

pub mod presets;

pub use presets::RulePreset;

use crate::models::round::OutcomeKind;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Card total of a full hachihachi deck (48 cards at 20/10/5/1)
pub const HACHIHACHI_CARD_TOTAL: i64 = 264;

/// Starting score per player in a hachihachi match
pub const HACHIHACHI_INITIAL_SCORE: i64 = 60;

/// Largest magnitude accepted for any configured or entered score
pub const MAX_SCORE: i64 = 1_000_000;

/// Errors raised while building, editing or loading a rule set
#[derive(Debug, Error, PartialEq)]
pub enum RuleSetError {
    #[error("Hand '{name}' already exists in the {table} table")]
    DuplicateHand { table: HandTableKind, name: String },

    #[error("Hand '{name}' not found in the {table} table")]
    UnknownHand { table: HandTableKind, name: String },

    #[error("Hand '{name}' has negative score {score}")]
    NegativeScore { name: String, score: i64 },

    #[error("Score {score} of '{name}' exceeds the limit of {max}", max = MAX_SCORE)]
    ScoreOutOfRange { name: String, score: i64 },

    #[error("Hand name must not be empty")]
    EmptyHandName,

    #[error("Unknown rule preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid rule set JSON: {0}")]
    Json(String),
}

/// Game family the rule set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameFamily {
    KoiKoi,
    Hachihachi,
}

/// Unit scores are displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreUnit {
    /// 12 ten = 1 kan
    KanTen,
    /// mon (also written "bun")
    #[serde(alias = "bun")]
    Mon,
}

/// The four point-bearing card categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardCategory {
    Bright,
    Animal,
    Ribbon,
    Chaff,
}

impl CardCategory {
    pub const ALL: [CardCategory; 4] = [
        CardCategory::Bright,
        CardCategory::Animal,
        CardCategory::Ribbon,
        CardCategory::Chaff,
    ];
}

/// Point value of one captured card per category
///
/// Missing values deserialize as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardUnitValues {
    pub bright: i64,
    pub animal: i64,
    pub ribbon: i64,
    pub chaff: i64,
}

impl CardUnitValues {
    /// Standard 20/10/5/1 card values
    pub fn standard() -> Self {
        Self {
            bright: 20,
            animal: 10,
            ribbon: 5,
            chaff: 1,
        }
    }

    pub fn get(&self, category: CardCategory) -> i64 {
        match category {
            CardCategory::Bright => self.bright,
            CardCategory::Animal => self.animal,
            CardCategory::Ribbon => self.ribbon,
            CardCategory::Chaff => self.chaff,
        }
    }

    pub fn set(&mut self, category: CardCategory, value: i64) {
        match category {
            CardCategory::Bright => self.bright = value,
            CardCategory::Animal => self.animal = value,
            CardCategory::Ribbon => self.ribbon = value,
            CardCategory::Chaff => self.chaff = value,
        }
    }
}

/// Which of the three hand tables a hand lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandTableKind {
    Declared,
    Bonus,
    Special,
}

impl fmt::Display for HandTableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandTableKind::Declared => write!(f, "declared-hand"),
            HandTableKind::Bonus => write!(f, "hand-bonus"),
            HandTableKind::Special => write!(f, "special-hand"),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_per_item_score() -> i64 {
    1
}

fn default_item_unit() -> String {
    "cards".to_string()
}

/// One named scoring combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandDefinition {
    pub name: String,

    /// Base score of the hand
    pub score: i64,

    /// Inactive hands stay in the table but cannot be claimed
    #[serde(default = "default_true")]
    pub active: bool,

    /// Variable hands add `per_item_score` for every extra item counted
    #[serde(default)]
    pub is_variable: bool,

    #[serde(default = "default_per_item_score")]
    pub per_item_score: i64,

    #[serde(default = "default_item_unit")]
    pub item_unit: String,

    /// Declared-hand table only: the hatto prohibition applies to this hand
    #[serde(default)]
    pub hatto_applicable: bool,
}

impl HandDefinition {
    /// Active, fixed-score hand without hatto
    pub fn fixed(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
            active: true,
            is_variable: false,
            per_item_score: default_per_item_score(),
            item_unit: default_item_unit(),
            hatto_applicable: false,
        }
    }

    /// Mark the hand variable, scoring `per_item_score` per extra `item_unit`
    pub fn variable(mut self, per_item_score: i64, item_unit: impl Into<String>) -> Self {
        self.is_variable = true;
        self.per_item_score = per_item_score;
        self.item_unit = item_unit.into();
        self
    }

    pub fn with_hatto(mut self) -> Self {
        self.hatto_applicable = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Score of the hand once `extra_items` are counted
    ///
    /// Extra items are ignored for fixed hands.
    pub fn value_with_extras(&self, extra_items: u32) -> i64 {
        if self.is_variable {
            self.score + i64::from(extra_items) * self.per_item_score
        } else {
            self.score
        }
    }
}

/// Hand scores must lie in `0..=MAX_SCORE`
fn check_hand_score(name: &str, score: i64) -> Result<(), RuleSetError> {
    if score < 0 {
        return Err(RuleSetError::NegativeScore {
            name: name.to_string(),
            score,
        });
    }
    if score > MAX_SCORE {
        return Err(RuleSetError::ScoreOutOfRange {
            name: name.to_string(),
            score,
        });
    }
    Ok(())
}

/// Ordered table of uniquely named hands
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandTable {
    hands: Vec<HandDefinition>,
}

impl HandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from definitions, rejecting duplicates and negative scores
    pub fn from_hands(
        kind: HandTableKind,
        hands: impl IntoIterator<Item = HandDefinition>,
    ) -> Result<Self, RuleSetError> {
        let mut table = Self::new();
        for hand in hands {
            table.insert(kind, hand)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, kind: HandTableKind, hand: HandDefinition) -> Result<(), RuleSetError> {
        if hand.name.is_empty() {
            return Err(RuleSetError::EmptyHandName);
        }
        check_hand_score(&hand.name, hand.score)?;
        check_hand_score(&hand.name, hand.per_item_score)?;
        if self.contains(&hand.name) {
            return Err(RuleSetError::DuplicateHand {
                table: kind,
                name: hand.name,
            });
        }
        self.hands.push(hand);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&HandDefinition> {
        self.hands.iter().find(|h| h.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut HandDefinition> {
        self.hands.iter_mut().find(|h| h.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandDefinition> {
        self.hands.iter()
    }

    /// Hands offered for selection
    pub fn active_hands(&self) -> impl Iterator<Item = &HandDefinition> {
        self.hands.iter().filter(|h| h.active)
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    fn validate(&self, kind: HandTableKind) -> Result<(), RuleSetError> {
        let mut seen = HashSet::new();
        for hand in &self.hands {
            if hand.name.is_empty() {
                return Err(RuleSetError::EmptyHandName);
            }
            check_hand_score(&hand.name, hand.score)?;
            check_hand_score(&hand.name, hand.per_item_score)?;
            if !seen.insert(hand.name.as_str()) {
                return Err(RuleSetError::DuplicateHand {
                    table: kind,
                    name: hand.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Complete rule configuration of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub game_name: GameFamily,
    pub score_unit: ScoreUnit,
    pub card_unit_values: CardUnitValues,

    /// Small / large / exceptional field multiplier (ba)
    #[serde(default)]
    pub field_multiplier_enabled: bool,

    /// Sit-out fee (orichin)
    #[serde(default)]
    pub sit_out_fee_enabled: bool,

    /// Catch-up fee (oikomi)
    #[serde(default)]
    pub catch_up_fee_enabled: bool,

    /// Forced-loss fee (mizuten)
    #[serde(default)]
    pub forced_loss_fee_enabled: bool,

    #[serde(default)]
    pub declared_hands: HandTable,

    #[serde(default)]
    pub hand_bonuses: HandTable,

    #[serde(default)]
    pub special_hands: HandTable,
}

impl Default for RuleSet {
    fn default() -> Self {
        presets::koikoi_default()
    }
}

impl RuleSet {
    pub fn table(&self, kind: HandTableKind) -> &HandTable {
        match kind {
            HandTableKind::Declared => &self.declared_hands,
            HandTableKind::Bonus => &self.hand_bonuses,
            HandTableKind::Special => &self.special_hands,
        }
    }

    fn table_mut(&mut self, kind: HandTableKind) -> &mut HandTable {
        match kind {
            HandTableKind::Declared => &mut self.declared_hands,
            HandTableKind::Bonus => &mut self.hand_bonuses,
            HandTableKind::Special => &mut self.special_hands,
        }
    }

    fn hand_mut(&mut self, kind: HandTableKind, name: &str) -> Result<&mut HandDefinition, RuleSetError> {
        self.table_mut(kind)
            .get_mut(name)
            .ok_or_else(|| RuleSetError::UnknownHand {
                table: kind,
                name: name.to_string(),
            })
    }

    /// Append a new hand to a table
    pub fn add_hand(&mut self, kind: HandTableKind, hand: HandDefinition) -> Result<(), RuleSetError> {
        self.table_mut(kind).insert(kind, hand)
    }

    pub fn set_hand_score(&mut self, kind: HandTableKind, name: &str, score: i64) -> Result<(), RuleSetError> {
        check_hand_score(name, score)?;
        self.hand_mut(kind, name)?.score = score;
        Ok(())
    }

    pub fn set_hand_active(&mut self, kind: HandTableKind, name: &str, active: bool) -> Result<(), RuleSetError> {
        self.hand_mut(kind, name)?.active = active;
        Ok(())
    }

    /// Toggle the hatto prohibition on a declared hand
    pub fn set_hatto_applicable(&mut self, name: &str, applicable: bool) -> Result<(), RuleSetError> {
        self.hand_mut(HandTableKind::Declared, name)?.hatto_applicable = applicable;
        Ok(())
    }

    /// Check table invariants (unique names, scores within `0..=MAX_SCORE`)
    pub fn validate(&self) -> Result<(), RuleSetError> {
        for category in CardCategory::ALL {
            let value = self.card_unit_values.get(category);
            if value.abs() > MAX_SCORE {
                return Err(RuleSetError::ScoreOutOfRange {
                    name: format!("{:?}", category).to_lowercase(),
                    score: value,
                });
            }
        }
        self.declared_hands.validate(HandTableKind::Declared)?;
        self.hand_bonuses.validate(HandTableKind::Bonus)?;
        self.special_hands.validate(HandTableKind::Special)
    }

    /// Parse and validate a rule set snapshot
    pub fn from_json(json: &str) -> Result<Self, RuleSetError> {
        let rules: RuleSet =
            serde_json::from_str(json).map_err(|e| RuleSetError::Json(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn to_json(&self) -> Result<String, RuleSetError> {
        serde_json::to_string_pretty(self).map_err(|e| RuleSetError::Json(e.to_string()))
    }

    /// SHA-256 fingerprint of the snapshot, hex encoded
    ///
    /// Two rule sets with the same content always produce the same hash.
    pub fn config_hash(&self) -> Result<String, RuleSetError> {
        let json = serde_json::to_string(self).map_err(|e| RuleSetError::Json(e.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Expected sum of active players' card scores, if the family has one
    pub fn fixed_card_total(&self) -> Option<i64> {
        match self.game_name {
            GameFamily::Hachihachi => Some(HACHIHACHI_CARD_TOTAL),
            GameFamily::KoiKoi => None,
        }
    }

    /// Starting ledger score for each player
    pub fn initial_score(&self) -> i64 {
        match self.game_name {
            GameFamily::Hachihachi => HACHIHACHI_INITIAL_SCORE,
            GameFamily::KoiKoi => 0,
        }
    }

    /// How a round of this family is usually decided
    pub fn default_outcome_kind(&self) -> OutcomeKind {
        match self.game_name {
            GameFamily::KoiKoi => OutcomeKind::DeclaredHand,
            GameFamily::Hachihachi => OutcomeKind::NoHand,
        }
    }
}
