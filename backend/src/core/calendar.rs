//! Match calendar
//!
//! A match is played in discrete months, one round per month. This module
//! tracks how many months have been settled and which one comes next.

use serde::{Deserialize, Serialize};

/// Months in a standard match (one per flower month)
pub const MONTHS_PER_MATCH: u32 = 12;

/// Tracks match progress in months
///
/// # Example
/// ```
/// use hanafuda_settlement_core_rs::MatchCalendar;
///
/// let mut calendar = MatchCalendar::new(12);
/// assert_eq!(calendar.current_month(), 1);
///
/// calendar.advance_month();
/// assert_eq!(calendar.current_month(), 2);
/// assert_eq!(calendar.months_played(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCalendar {
    /// Months settled so far
    months_played: u32,
    /// Length of the match in months
    months_per_match: u32,
}

impl Default for MatchCalendar {
    fn default() -> Self {
        Self::new(MONTHS_PER_MATCH)
    }
}

impl MatchCalendar {
    /// Create a calendar for a match of `months_per_match` months
    pub fn new(months_per_match: u32) -> Self {
        assert!(months_per_match > 0, "months_per_match must be positive");
        Self {
            months_played: 0,
            months_per_match,
        }
    }

    /// Calendar resumed after `months_played` settled months
    pub fn resume(months_per_match: u32, months_played: u32) -> Self {
        let mut calendar = Self::new(months_per_match);
        calendar.months_played = months_played.min(months_per_match);
        calendar
    }

    pub fn advance_month(&mut self) {
        self.months_played += 1;
    }

    /// Month the next round settles into (1-indexed)
    pub fn current_month(&self) -> u32 {
        self.months_played + 1
    }

    pub fn months_played(&self) -> u32 {
        self.months_played
    }

    pub fn months_remaining(&self) -> u32 {
        self.months_per_match.saturating_sub(self.months_played)
    }

    /// Whether every month of the match has been settled
    ///
    /// # Example
    /// ```
    /// use hanafuda_settlement_core_rs::MatchCalendar;
    ///
    /// let mut calendar = MatchCalendar::new(2);
    /// calendar.advance_month();
    /// assert!(!calendar.is_finished());
    /// calendar.advance_month();
    /// assert!(calendar.is_finished());
    /// ```
    pub fn is_finished(&self) -> bool {
        self.months_played >= self.months_per_match
    }

    pub fn months_per_match(&self) -> u32 {
        self.months_per_match
    }

    pub fn reset(&mut self) {
        self.months_played = 0;
    }
}
