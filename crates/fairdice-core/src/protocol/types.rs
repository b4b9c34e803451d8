//! Protocol types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique match identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(Uuid);

impl MatchId {
    /// Create a new random match ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchId({})", self.0)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two sides of a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// The human verifier, who contributes to every exchange
    User,
    /// The automated committer
    Opponent,
}

impl Party {
    /// Get the other side
    pub fn other(&self) -> Party {
        match self {
            Party::User => Party::Opponent,
            Party::Opponent => Party::User,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::User => write!(f, "User"),
            Party::Opponent => write!(f, "Opponent"),
        }
    }
}

/// Final result of a completed match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    UserWins,
    OpponentWins,
    Tie,
}

impl MatchOutcome {
    /// Derive the outcome by comparing cumulative scores
    pub fn from_scores(scores: &Scores) -> Self {
        use std::cmp::Ordering;

        match scores.user.cmp(&scores.opponent) {
            Ordering::Greater => MatchOutcome::UserWins,
            Ordering::Less => MatchOutcome::OpponentWins,
            Ordering::Equal => MatchOutcome::Tie,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::UserWins => "user wins",
            MatchOutcome::OpponentWins => "opponent wins",
            MatchOutcome::Tie => "tie",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Running score. Only ever increases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub user: u32,
    pub opponent: u32,
}

impl Scores {
    pub fn award(&mut self, party: Party) {
        match party {
            Party::User => self.user += 1,
            Party::Opponent => self.opponent += 1,
        }
    }

    pub fn get(&self, party: Party) -> u32 {
        match party {
            Party::User => self.user,
            Party::Opponent => self.opponent,
        }
    }
}
