//! Round input
//!
//! Everything the settlement engine needs to know about one round that was
//! already played: who took part, what each active player captured, how the
//! round was decided, the hand bonuses held, and the side-payment amounts.
//!
//! A `RoundInput` is created fresh each round and discarded after settlement.
//!
//! # Example
//!
//! ```rust
//! use hanafuda_settlement_core_rs::models::round::{HandClaim, Outcome, RoundInput};
//!
//! let input = RoundInput::new(Outcome::declared("Tom", vec![HandClaim::new("shiko")]))
//!     .with_hatto_player("Ann");
//! assert!(input.outcome.winner() == Some("Tom"));
//! ```

use crate::scoring::CardTally;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an active player's base score is supplied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerCapture {
    /// Counted card piles
    CardTally(CardTally),
    /// Score entered directly
    ManualScore(i64),
    /// Confidence-filtered identifiers from the card recognizer
    Recognition(Vec<String>),
}

/// One claimed hand; `extra_items` only counts for variable hands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandClaim {
    pub name: String,
    #[serde(default)]
    pub extra_items: u32,
}

impl HandClaim {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra_items: 0,
        }
    }

    pub fn with_extra_items(mut self, extra_items: u32) -> Self {
        self.extra_items = extra_items;
        self
    }
}

/// Discriminant of `Outcome`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    NoHand,
    DeclaredHand,
    SpecialHand,
}

/// How the round was decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// No declared hand: settled on captured card scores
    NoHand,

    /// A declared hand (dekiyaku) ended the round
    DeclaredHand {
        winner: Option<String>,
        #[serde(default)]
        hands: Vec<HandClaim>,
        /// Losers who broke the hatto prohibition
        #[serde(default)]
        hatto_players: Vec<String>,
    },

    /// A special hand ended the round; hand bonuses are void
    SpecialHand {
        winner: Option<String>,
        #[serde(default)]
        hands: Vec<HandClaim>,
    },
}

impl Outcome {
    pub fn declared(winner: impl Into<String>, hands: Vec<HandClaim>) -> Self {
        Outcome::DeclaredHand {
            winner: Some(winner.into()),
            hands,
            hatto_players: Vec::new(),
        }
    }

    pub fn special(winner: impl Into<String>, hands: Vec<HandClaim>) -> Self {
        Outcome::SpecialHand {
            winner: Some(winner.into()),
            hands,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::NoHand => OutcomeKind::NoHand,
            Outcome::DeclaredHand { .. } => OutcomeKind::DeclaredHand,
            Outcome::SpecialHand { .. } => OutcomeKind::SpecialHand,
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            Outcome::NoHand => None,
            Outcome::DeclaredHand { winner, .. } | Outcome::SpecialHand { winner, .. } => {
                winner.as_deref()
            }
        }
    }
}

/// Hand bonuses (teyaku) one player holds this round
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusClaim {
    pub hands: Vec<String>,
    /// Jump-in (tobikomi) checkbox
    pub jump_in: bool,
    /// Escape-hand (nukeyaku) checkbox
    pub escape_hand: bool,
}

impl BonusClaim {
    pub fn new<S: Into<String>>(hands: impl IntoIterator<Item = S>) -> Self {
        Self {
            hands: hands.into_iter().map(Into::into).collect(),
            jump_in: false,
            escape_hand: false,
        }
    }

    pub fn with_jump_in(mut self) -> Self {
        self.jump_in = true;
        self
    }

    pub fn with_escape_hand(mut self) -> Self {
        self.escape_hand = true;
        self
    }
}

/// Fees a sit-out player declared this round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SitOutFees {
    /// Sit-out fee (orichin), paid to the round leader
    pub sit_out_fee: u32,
    /// Catch-up fee (oikomi), collected from every active player
    pub catch_up_fee: u32,
}

/// Field state (ba)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    #[default]
    Small,
    Large,
    Exceptional,
}

impl FieldState {
    pub fn multiplier(self) -> i64 {
        match self {
            FieldState::Small => 1,
            FieldState::Large => 2,
            FieldState::Exceptional => 4,
        }
    }
}

fn default_custom_multiplier() -> u32 {
    1
}

/// Complete input for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundInput {
    /// Players taking part; `None` means the whole roster
    #[serde(default)]
    pub active_players: Option<Vec<String>>,

    #[serde(default)]
    pub captures: BTreeMap<String, PlayerCapture>,

    pub outcome: Outcome,

    #[serde(default)]
    pub bonuses: BTreeMap<String, BonusClaim>,

    /// Fees keyed by sit-out player
    #[serde(default)]
    pub fees: BTreeMap<String, SitOutFees>,

    /// Player assessed the forced-loss fee (mizuten)
    #[serde(default)]
    pub forced_loss_player: Option<String>,

    #[serde(default)]
    pub field_state: FieldState,

    #[serde(default = "default_custom_multiplier")]
    pub custom_multiplier: u32,
}

impl RoundInput {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            active_players: None,
            captures: BTreeMap::new(),
            outcome,
            bonuses: BTreeMap::new(),
            fees: BTreeMap::new(),
            forced_loss_player: None,
            field_state: FieldState::Small,
            custom_multiplier: 1,
        }
    }

    pub fn with_active_players<S: Into<String>>(mut self, players: impl IntoIterator<Item = S>) -> Self {
        self.active_players = Some(players.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_capture(mut self, player: impl Into<String>, capture: PlayerCapture) -> Self {
        self.captures.insert(player.into(), capture);
        self
    }

    pub fn with_bonus(mut self, player: impl Into<String>, claim: BonusClaim) -> Self {
        self.bonuses.insert(player.into(), claim);
        self
    }

    pub fn with_fees(mut self, player: impl Into<String>, fees: SitOutFees) -> Self {
        self.fees.insert(player.into(), fees);
        self
    }

    pub fn with_forced_loss(mut self, player: impl Into<String>) -> Self {
        self.forced_loss_player = Some(player.into());
        self
    }

    pub fn with_field_state(mut self, field_state: FieldState) -> Self {
        self.field_state = field_state;
        self
    }

    pub fn with_custom_multiplier(mut self, multiplier: u32) -> Self {
        self.custom_multiplier = multiplier;
        self
    }

    /// Flag a loser as having broken the hatto prohibition
    ///
    /// Has no effect unless the outcome is a declared hand.
    pub fn with_hatto_player(mut self, player: impl Into<String>) -> Self {
        if let Outcome::DeclaredHand { hatto_players, .. } = &mut self.outcome {
            hatto_players.push(player.into());
        }
        self
    }
}
