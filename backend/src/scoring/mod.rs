//! Card scoring
//!
//! Turns a player's raw round input into a base score:
//! - **cards**: counted card piles → score via the rule set's unit values
//! - **detection**: recognized card identifiers → card tally → score
//! - **cache**: content-addressed cache of recognizer output (caller-owned)

pub mod cache;
pub mod cards;
pub mod detection;

pub use cache::DetectionCache;
pub use cards::{score_cards, CardTally};
pub use detection::{
    filter_confident, translate_detections, CategoryMap, Detection, CONFIDENCE_THRESHOLD,
};

use crate::models::round::PlayerCapture;
use crate::rules::RuleSet;

/// Base score of one player's capture under `rules`
///
/// Recognition captures are translated with the standard category map.
pub fn capture_score(capture: &PlayerCapture, rules: &RuleSet) -> i64 {
    match capture {
        PlayerCapture::ManualScore(score) => *score,
        PlayerCapture::CardTally(tally) => score_cards(tally, &rules.card_unit_values),
        PlayerCapture::Recognition(identifiers) => {
            let tally = translate_detections(identifiers, &CategoryMap::default());
            score_cards(&tally, &rules.card_unit_values)
        }
    }
}
