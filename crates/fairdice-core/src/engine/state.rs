//! Match state and phases.

use super::MATCH_ROUNDS;
use crate::dice::{Die, DieSet};
use crate::exchange::{FairValueExchange, COIN_FLIP_MODULUS, DIE_ROLL_MODULUS};
use crate::protocol::{ExchangePurpose, InputRequest, MatchId, MatchOutcome, Party, Scores};
use serde::{Deserialize, Serialize};

/// Current phase. Phases awaiting a contribution own their in-flight exchange.
#[derive(Debug)]
pub enum Phase {
    /// Coin flip deciding who picks a die first
    MoveOrder { exchange: FairValueExchange },
    /// Waiting for the user to pick one of `options`
    DieSelection { options: Vec<usize> },
    /// Rolling the opponent's die for the current round
    OpponentRoll { exchange: FairValueExchange },
    /// Rolling the user's die; the opponent's face is already fixed
    UserRoll {
        exchange: FairValueExchange,
        opponent_face: i64,
    },
    /// All rounds played
    Complete { outcome: MatchOutcome },
    /// Ended early without a winner
    Aborted,
}

/// Phase label without the attached exchange
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseTag {
    MoveOrder,
    DieAssignment,
    Round,
    Completion,
    Aborted,
}

impl Phase {
    pub fn tag(&self) -> PhaseTag {
        match self {
            Phase::MoveOrder { .. } => PhaseTag::MoveOrder,
            Phase::DieSelection { .. } => PhaseTag::DieAssignment,
            Phase::OpponentRoll { .. } | Phase::UserRoll { .. } => PhaseTag::Round,
            Phase::Complete { .. } => PhaseTag::Completion,
            Phase::Aborted => PhaseTag::Aborted,
        }
    }
}

/// Everything known about one match, passed by value through each transition
#[derive(Debug)]
pub struct MatchState {
    pub(super) match_id: MatchId,
    pub(super) dice: DieSet,
    pub(super) first_mover: Option<Party>,
    pub(super) user_die: Option<usize>,
    pub(super) opponent_die: Option<usize>,
    pub(super) scores: Scores,
    pub(super) ties: u32,
    pub(super) round_number: u32,
    pub(super) phase: Phase,
}

impl MatchState {
    pub(super) fn new(dice: DieSet, exchange: FairValueExchange) -> Self {
        Self {
            match_id: MatchId::new(),
            dice,
            first_mover: None,
            user_die: None,
            opponent_die: None,
            scores: Scores::default(),
            ties: 0,
            round_number: 1,
            phase: Phase::MoveOrder { exchange },
        }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn dice(&self) -> &DieSet {
        &self.dice
    }

    pub fn first_mover(&self) -> Option<Party> {
        self.first_mover
    }

    /// Index into the die set of the die assigned to `party`
    pub fn die_index(&self, party: Party) -> Option<usize> {
        match party {
            Party::User => self.user_die,
            Party::Opponent => self.opponent_die,
        }
    }

    pub fn die(&self, party: Party) -> Option<&Die> {
        self.die_index(party).and_then(|i| self.dice.get(i))
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    /// Rounds that awarded no point
    pub fn ties(&self) -> u32 {
        self.ties
    }

    /// Round being played; exceeds the match length once the match is over
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, Phase::Complete { .. } | Phase::Aborted)
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        match self.phase {
            Phase::Complete { outcome } => Some(outcome),
            _ => None,
        }
    }

    /// Round number if a round is in progress
    pub fn current_round(&self) -> Option<u32> {
        match self.phase {
            Phase::OpponentRoll { .. } | Phase::UserRoll { .. } => Some(self.round_number),
            _ => None,
        }
    }

    /// Dice still free to be assigned
    pub fn available_dice(&self) -> Vec<usize> {
        (0..self.dice.len())
            .filter(|i| Some(*i) != self.user_die && Some(*i) != self.opponent_die)
            .collect()
    }

    /// Input the current phase is waiting for, if any
    pub fn pending_request(&self) -> Option<InputRequest> {
        match &self.phase {
            Phase::MoveOrder { exchange } => Some(InputRequest::Contribution {
                purpose: ExchangePurpose::MoveOrder,
                modulus: COIN_FLIP_MODULUS,
                commitment: *exchange.commitment(),
            }),
            Phase::DieSelection { options } => Some(InputRequest::DieSelection {
                options: options.clone(),
            }),
            Phase::OpponentRoll { exchange } => Some(InputRequest::Contribution {
                purpose: ExchangePurpose::Roll {
                    round: self.round_number,
                    party: Party::Opponent,
                },
                modulus: DIE_ROLL_MODULUS,
                commitment: *exchange.commitment(),
            }),
            Phase::UserRoll { exchange, .. } => Some(InputRequest::Contribution {
                purpose: ExchangePurpose::Roll {
                    round: self.round_number,
                    party: Party::User,
                },
                modulus: DIE_ROLL_MODULUS,
                commitment: *exchange.commitment(),
            }),
            Phase::Complete { .. } | Phase::Aborted => None,
        }
    }

    pub(super) fn rounds_remaining(&self) -> bool {
        self.round_number <= MATCH_ROUNDS
    }
}
