//! Ordered per-player score map
//!
//! Settlement stages read and mutate a running map of player → signed points.
//! Iteration order is the order players were inserted (roster join order),
//! which the tie-breaking rules depend on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player: String,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSheet {
    entries: Vec<PlayerScore>,
}

impl ScoreSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet with every player at 0
    pub fn zeroed<I, S>(players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: players
                .into_iter()
                .map(|p| PlayerScore {
                    player: p.into(),
                    score: 0,
                })
                .collect(),
        }
    }

    pub fn get(&self, player: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.player == player)
            .map(|e| e.score)
    }

    /// Score of `player`, 0 when absent
    pub fn value(&self, player: &str) -> i64 {
        self.get(player).unwrap_or(0)
    }

    pub fn contains(&self, player: &str) -> bool {
        self.get(player).is_some()
    }

    /// Overwrite a score, appending the player if absent
    pub fn set(&mut self, player: &str, score: i64) {
        match self.entries.iter_mut().find(|e| e.player == player) {
            Some(entry) => entry.score = score,
            None => self.entries.push(PlayerScore {
                player: player.to_string(),
                score,
            }),
        }
    }

    /// Add `amount` to a score, appending the player if absent
    pub fn add(&mut self, player: &str, amount: i64) {
        let current = self.value(player);
        self.set(player, current + amount);
    }

    pub fn total(&self) -> i64 {
        self.entries.iter().map(|e| e.score).sum()
    }

    /// First player holding the highest score
    pub fn leader(&self) -> Option<&str> {
        let mut best: Option<&PlayerScore> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.score > b.score) {
                best = Some(entry);
            }
        }
        best.map(|e| e.player.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|e| (e.player.as_str(), e.score))
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.player.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_all_zero(&self) -> bool {
        self.entries.iter().all(|e| e.score == 0)
    }
}
