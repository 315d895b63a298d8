//! Detection Translator
//!
//! The external card recognizer returns `(identifier, confidence)` pairs.
//! Identifiers look like `<card>-<abbr>-<variant>`; the second `-` separated
//! segment names the card category.
//!
//! - Unknown abbreviations count as Chaff
//! - Identifiers without a second segment are skipped
//! - An empty list (including recognizer failure) is a zero tally

use super::cards::CardTally;
use crate::rules::CardCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum recognizer confidence for a detection to be counted
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// One recognizer detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub identifier: String,
    pub confidence: f64,
}

impl Detection {
    pub fn new(identifier: impl Into<String>, confidence: f64) -> Self {
        Self {
            identifier: identifier.into(),
            confidence,
        }
    }
}

/// Keep identifiers whose confidence is at least `threshold`, in order
pub fn filter_confident(detections: &[Detection], threshold: f64) -> Vec<String> {
    detections
        .iter()
        .filter(|d| d.confidence >= threshold)
        .map(|d| d.identifier.clone())
        .collect()
}

/// Abbreviation → card category lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap {
    entries: HashMap<String, CardCategory>,
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::from_pairs([
            ("hkr", CardCategory::Bright),
            ("tne", CardCategory::Animal),
            ("tan", CardCategory::Ribbon),
            ("kas", CardCategory::Chaff),
        ])
    }
}

impl CategoryMap {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, CardCategory)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(abbr, category)| (abbr.to_string(), category))
                .collect(),
        }
    }

    /// Category for an abbreviation, Chaff when unknown
    pub fn classify(&self, abbreviation: &str) -> CardCategory {
        self.entries
            .get(abbreviation)
            .copied()
            .unwrap_or(CardCategory::Chaff)
    }
}

/// Fold recognized identifiers into a card tally
///
/// # Example
///
/// ```rust
/// use hanafuda_settlement_core_rs::rules::CardCategory;
/// use hanafuda_settlement_core_rs::scoring::{translate_detections, CategoryMap};
///
/// let map = CategoryMap::from_pairs([("hkr", CardCategory::Bright)]);
/// let tally = translate_detections(&["A-hkr-1", "B-xyz-2"], &map);
/// assert_eq!((tally.bright, tally.chaff), (1, 1));
/// ```
pub fn translate_detections<S: AsRef<str>>(identifiers: &[S], map: &CategoryMap) -> CardTally {
    let mut tally = CardTally::default();
    for identifier in identifiers {
        match identifier.as_ref().split('-').nth(1) {
            Some(abbreviation) => tally.add(map.classify(abbreviation)),
            None => continue,
        }
    }
    tally
}
