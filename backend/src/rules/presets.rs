//! Built-in rule presets
//!
//! Loading a preset yields a complete `RuleSet` snapshot; callers replace their
//! current rule set with it wholesale.

use super::{
    CardUnitValues, GameFamily, HandDefinition, HandTable, RuleSet, RuleSetError, ScoreUnit,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named rule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RulePreset {
    KoiKoi,
    Hachihachi,
    /// Hachihachi as played at home: no side payments, inoshikacho added
    HachihachiHouse,
}

impl RulePreset {
    pub const ALL: [RulePreset; 3] = [
        RulePreset::KoiKoi,
        RulePreset::Hachihachi,
        RulePreset::HachihachiHouse,
    ];

    pub fn load(self) -> RuleSet {
        match self {
            RulePreset::KoiKoi => koikoi_default(),
            RulePreset::Hachihachi => hachihachi_default(),
            RulePreset::HachihachiHouse => hachihachi_house(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RulePreset::KoiKoi => "koi-koi",
            RulePreset::Hachihachi => "hachihachi",
            RulePreset::HachihachiHouse => "hachihachi-house",
        }
    }
}

impl FromStr for RulePreset {
    type Err = RuleSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "koi-koi" | "koikoi" => Ok(RulePreset::KoiKoi),
            "hachihachi" => Ok(RulePreset::Hachihachi),
            "hachihachi-house" | "house" => Ok(RulePreset::HachihachiHouse),
            _ => Err(RuleSetError::UnknownPreset(s.to_string())),
        }
    }
}

// Preset tables are static and known-valid, so they are built directly.
fn table(hands: Vec<HandDefinition>) -> HandTable {
    let mut table = HandTable::new();
    table.hands = hands;
    table
}

fn hachihachi_bonuses() -> HandTable {
    table(vec![
        HandDefinition::fixed("sanbon", 24),
        HandDefinition::fixed("tatesanbon", 36),
        HandDefinition::fixed("aka", 36),
        HandDefinition::fixed("tan-ichi", 36),
        HandDefinition::fixed("toichi", 36),
        HandDefinition::fixed("hikari-ichi", 48),
        HandDefinition::fixed("karasu", 48),
        HandDefinition::fixed("kuttsuki", 48),
        HandDefinition::fixed("teshi", 72),
        HandDefinition::fixed("haneken", 84),
        HandDefinition::fixed("hifushi", 96),
        HandDefinition::fixed("shiso", 240),
        HandDefinition::fixed("nisanbon", 72),
        HandDefinition::fixed("nitatesanbon", 96),
    ])
}

fn hachihachi_special_hands() -> HandTable {
    table(vec![
        HandDefinition::fixed("su-juroku", 144).variable(24, "cards"),
        HandDefinition::fixed("futa-hachi", 120).variable(12, "points"),
        HandDefinition::fixed("so-hachi", 120),
    ])
}

fn hachihachi_base(declared_hands: HandTable, fees_enabled: bool) -> RuleSet {
    RuleSet {
        game_name: GameFamily::Hachihachi,
        score_unit: ScoreUnit::KanTen,
        card_unit_values: CardUnitValues::standard(),
        field_multiplier_enabled: true,
        sit_out_fee_enabled: fees_enabled,
        catch_up_fee_enabled: fees_enabled,
        forced_loss_fee_enabled: fees_enabled,
        declared_hands,
        hand_bonuses: hachihachi_bonuses(),
        special_hands: hachihachi_special_hands(),
    }
}

/// Standard hachihachi: all side payments enabled
pub fn hachihachi_default() -> RuleSet {
    hachihachi_base(
        table(vec![
            HandDefinition::fixed("goko", 144),
            HandDefinition::fixed("shiko", 120).with_hatto(),
            HandDefinition::fixed("akatan", 84).with_hatto(),
            HandDefinition::fixed("aotan", 84).with_hatto(),
            HandDefinition::fixed("nanatan", 120).variable(1, "cards"),
        ]),
        true,
    )
}

/// House hachihachi: side payments off, inoshikacho counted
pub fn hachihachi_house() -> RuleSet {
    hachihachi_base(
        table(vec![
            HandDefinition::fixed("goko", 144),
            HandDefinition::fixed("shiko", 120).with_hatto(),
            HandDefinition::fixed("inoshikacho", 84).with_hatto(),
            HandDefinition::fixed("akatan", 84).with_hatto(),
            HandDefinition::fixed("aotan", 84).with_hatto(),
            HandDefinition::fixed("nanatan", 120).variable(1, "cards"),
        ]),
        false,
    )
}

/// Koi-koi: declared hands only, scored in mon
pub fn koikoi_default() -> RuleSet {
    RuleSet {
        game_name: GameFamily::KoiKoi,
        score_unit: ScoreUnit::Mon,
        card_unit_values: CardUnitValues::standard(),
        field_multiplier_enabled: false,
        sit_out_fee_enabled: false,
        catch_up_fee_enabled: false,
        forced_loss_fee_enabled: false,
        declared_hands: table(vec![
            HandDefinition::fixed("goko", 15),
            HandDefinition::fixed("shiko", 10),
            HandDefinition::fixed("ame-shiko", 8),
            HandDefinition::fixed("sanko", 6),
            HandDefinition::fixed("inoshikacho", 5),
            HandDefinition::fixed("akatan", 6),
            HandDefinition::fixed("aotan", 6),
            HandDefinition::fixed("hanami-de-ippai", 5),
            HandDefinition::fixed("tsukimi-de-ippai", 5),
            HandDefinition::fixed("tane", 1).variable(1, "cards"),
            HandDefinition::fixed("tanzaku", 1).variable(1, "cards"),
            HandDefinition::fixed("kasu", 1).variable(1, "cards"),
        ]),
        hand_bonuses: HandTable::new(),
        special_hands: HandTable::new(),
    }
}
