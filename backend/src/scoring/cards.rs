//! Card tally → score conversion

use crate::rules::{CardCategory, CardUnitValues};
use serde::{Deserialize, Serialize};

/// Count of captured cards per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardTally {
    pub bright: u32,
    pub animal: u32,
    pub ribbon: u32,
    pub chaff: u32,
}

impl CardTally {
    pub fn new(bright: u32, animal: u32, ribbon: u32, chaff: u32) -> Self {
        Self {
            bright,
            animal,
            ribbon,
            chaff,
        }
    }

    pub fn count(&self, category: CardCategory) -> u32 {
        match category {
            CardCategory::Bright => self.bright,
            CardCategory::Animal => self.animal,
            CardCategory::Ribbon => self.ribbon,
            CardCategory::Chaff => self.chaff,
        }
    }

    /// Count one more card of `category`
    pub fn add(&mut self, category: CardCategory) {
        match category {
            CardCategory::Bright => self.bright += 1,
            CardCategory::Animal => self.animal += 1,
            CardCategory::Ribbon => self.ribbon += 1,
            CardCategory::Chaff => self.chaff += 1,
        }
    }

    pub fn total_cards(&self) -> u32 {
        self.bright + self.animal + self.ribbon + self.chaff
    }
}

/// `Σ count[c] × unit_value[c]`
///
/// # Example
///
/// ```rust
/// use hanafuda_settlement_core_rs::rules::CardUnitValues;
/// use hanafuda_settlement_core_rs::scoring::{score_cards, CardTally};
///
/// let tally = CardTally::new(5, 9, 10, 23);
/// assert_eq!(score_cards(&tally, &CardUnitValues::standard()), 263);
/// ```
pub fn score_cards(tally: &CardTally, values: &CardUnitValues) -> i64 {
    CardCategory::ALL
        .iter()
        .map(|&c| i64::from(tally.count(c)) * values.get(c))
        .sum()
}
