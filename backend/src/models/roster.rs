//! Player roster
//!
//! Players are identified by unique name strings and ordered by join order.
//! Colliding names are suffixed before they enter the roster: the first
//! occurrence keeps its name, later ones become `name_1`, `name_2`, ...
//!
//! # Critical Invariants
//!
//! 1. Names are unique and non-empty
//! 2. Roster size stays within `MIN_PLAYERS..=MAX_PLAYERS`

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 7;

/// Roster size from which players may sit a round out
pub const SIT_OUT_ROSTER_SIZE: usize = 4;

#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    #[error("Player name must not be empty")]
    EmptyName,

    #[error("Roster needs at least {min} players, got {count}")]
    TooFewPlayers { min: usize, count: usize },

    #[error("Roster is limited to {max} players")]
    TooManyPlayers { max: usize },
}

/// Resolve name collisions by suffixing later occurrences
///
/// Suffixes skip any name already taken, so the output is always unique.
///
/// # Example
///
/// ```rust
/// use hanafuda_settlement_core_rs::models::roster::resolve_unique_names;
///
/// assert_eq!(
///     resolve_unique_names(&["Tom", "Tom", "Ann"]),
///     vec!["Tom", "Tom_1", "Ann"]
/// );
/// ```
pub fn resolve_unique_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut resolved = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        let unique = if taken.contains(name) {
            let counter = next_suffix.entry(name.to_string()).or_insert(1);
            loop {
                let candidate = format!("{}_{}", name, counter);
                *counter += 1;
                if !taken.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            name.to_string()
        };
        taken.insert(unique.clone());
        resolved.push(unique);
    }

    resolved
}

/// Ordered, duplicate-free list of players in a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    players: Vec<String>,
}

impl TryFrom<Vec<String>> for Roster {
    type Error = RosterError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Roster::new(&names)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.players
    }
}

impl Roster {
    /// Create a roster, suffixing duplicate names
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, RosterError> {
        if names.iter().any(|n| n.as_ref().is_empty()) {
            return Err(RosterError::EmptyName);
        }
        if names.len() < MIN_PLAYERS {
            return Err(RosterError::TooFewPlayers {
                min: MIN_PLAYERS,
                count: names.len(),
            });
        }
        if names.len() > MAX_PLAYERS {
            return Err(RosterError::TooManyPlayers { max: MAX_PLAYERS });
        }
        Ok(Self {
            players: resolve_unique_names(names),
        })
    }

    /// Late join; returns the (possibly suffixed) name the player got
    pub fn add_player(&mut self, name: &str) -> Result<String, RosterError> {
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RosterError::TooManyPlayers { max: MAX_PLAYERS });
        }
        let mut combined = self.players.clone();
        combined.push(name.to_string());
        let unique = resolve_unique_names(&combined)
            .pop()
            .unwrap_or_else(|| name.to_string());
        self.players.push(unique.clone());
        Ok(unique)
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether players may sit rounds out (roster of 4 or more)
    pub fn allows_sit_out(&self) -> bool {
        self.players.len() >= SIT_OUT_ROSTER_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicates_unchanged() {
        assert_eq!(resolve_unique_names(&["A", "B"]), vec!["A", "B"]);
    }

    #[test]
    fn test_triple_duplicate() {
        assert_eq!(
            resolve_unique_names(&["Tom", "Tom", "Tom"]),
            vec!["Tom", "Tom_1", "Tom_2"]
        );
    }

    #[test]
    fn test_suffix_skips_taken_names() {
        assert_eq!(
            resolve_unique_names(&["Tom_1", "Tom", "Tom"]),
            vec!["Tom_1", "Tom", "Tom_2"]
        );
    }

    #[test]
    fn test_roster_size_limits() {
        assert_eq!(
            Roster::new(&["solo"]).unwrap_err(),
            RosterError::TooFewPlayers { min: 2, count: 1 }
        );
        let eight: Vec<String> = (0..8).map(|i| format!("p{}", i)).collect();
        assert_eq!(
            Roster::new(&eight).unwrap_err(),
            RosterError::TooManyPlayers { max: 7 }
        );
        assert_eq!(Roster::new(&["a", ""]).unwrap_err(), RosterError::EmptyName);
    }

    #[test]
    fn test_late_join_resolves_name() {
        let mut roster = Roster::new(&["Tom", "Ann"]).unwrap();
        assert_eq!(roster.add_player("Tom").unwrap(), "Tom_1");
        assert_eq!(roster.add_player("Kai").unwrap(), "Kai");
        assert_eq!(roster.players(), &["Tom", "Ann", "Tom_1", "Kai"]);
        assert!(roster.allows_sit_out());
    }

    #[test]
    fn test_late_join_respects_cap() {
        let seven: Vec<String> = (0..7).map(|i| format!("p{}", i)).collect();
        let mut roster = Roster::new(&seven).unwrap();
        assert!(roster.add_player("late").is_err());
    }

    #[test]
    fn test_deserialize_resolves_duplicates() {
        let roster: Roster = serde_json::from_str(r#"["Tom","Tom","Ann"]"#).unwrap();
        assert_eq!(roster.players(), &["Tom", "Tom_1", "Ann"]);
    }
}
