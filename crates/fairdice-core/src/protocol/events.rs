//! Transcript events emitted to the output sink, and input requests.

use crate::crypto::Commitment;
use crate::dice::{Die, DieSet};
use crate::exchange::ExchangeResult;
use crate::protocol::{MatchId, MatchOutcome, Party, Scores};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an exchange decides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExchangePurpose {
    /// Coin flip: 0 means the user picks a die first
    MoveOrder,
    /// Face index rolled for one party's die
    Roll { round: u32, party: Party },
}

impl fmt::Display for ExchangePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangePurpose::MoveOrder => write!(f, "move order"),
            ExchangePurpose::Roll { round, party } => write!(f, "round {} {} roll", round, party),
        }
    }
}

/// Input the engine is waiting for
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputRequest {
    /// A contribution in `[0, modulus)` for the exchange behind `commitment`
    Contribution {
        purpose: ExchangePurpose,
        modulus: u32,
        commitment: Commitment,
    },
    /// Index of a die in the set; only `options` are still available
    DieSelection { options: Vec<usize> },
}

/// Structured transcript record. Secret keys and values only ever appear in
/// `ExchangeRevealed`, after the counterpart's contribution is fixed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MatchEvent {
    MatchStarted {
        match_id: MatchId,
        dice: DieSet,
    },
    CommitmentPublished {
        purpose: ExchangePurpose,
        modulus: u32,
        commitment: Commitment,
    },
    InputRejected {
        reason: String,
    },
    ContributionReceived {
        purpose: ExchangePurpose,
        contribution: u32,
    },
    ExchangeRevealed {
        purpose: ExchangePurpose,
        result: ExchangeResult,
    },
    /// Revealed materials do not reproduce the published commitment
    FairnessViolation {
        purpose: ExchangePurpose,
        commitment: Commitment,
    },
    MoveOrderDecided {
        first: Party,
    },
    DieAssigned {
        party: Party,
        index: usize,
        die: Die,
    },
    RollResolved {
        round: u32,
        party: Party,
        face_index: u32,
        face: i64,
        verified: bool,
    },
    RoundResolved {
        round: u32,
        user_face: i64,
        opponent_face: i64,
        winner: Option<Party>,
        scores: Scores,
    },
    MatchCompleted {
        outcome: MatchOutcome,
        scores: Scores,
    },
    MatchAborted {
        round: Option<u32>,
    },
}
