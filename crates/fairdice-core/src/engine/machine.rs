//! RoundEngine: the match transition function.

use super::{Committer, MatchState, Phase};
use crate::dice::DieSet;
use crate::error::MatchError;
use crate::exchange::{ExchangeResult, FairValueExchange, COIN_FLIP_MODULUS, DIE_ROLL_MODULUS};
use crate::protocol::{ExchangePurpose, MatchEvent, MatchOutcome, Party};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// One line of input from the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerInput {
    /// Stop the match now, without a winner
    Abort,
    /// A contribution or die index, validated by the phase that receives it
    Value(String),
}

impl PlayerInput {
    /// `x` or `exit` (any case) aborts; anything else is a value
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("x") || trimmed.eq_ignore_ascii_case("exit") {
            PlayerInput::Abort
        } else {
            PlayerInput::Value(trimmed.to_string())
        }
    }
}

impl From<&str> for PlayerInput {
    fn from(line: &str) -> Self {
        Self::parse(line)
    }
}

/// Result of applying one input
#[derive(Debug)]
pub struct Transition {
    pub state: MatchState,
    pub events: Vec<MatchEvent>,
}

/// Sequences a match: move order, die assignment, then scored rounds.
///
/// The engine holds only the committer; all match data lives in the
/// `MatchState` handed in and returned by each call.
pub struct RoundEngine<C> {
    committer: C,
}

impl<C: Committer> RoundEngine<C> {
    pub fn new(committer: C) -> Self {
        Self { committer }
    }

    /// Open a match and publish the move-order commitment
    pub fn start(&mut self, dice: DieSet) -> Result<Transition, MatchError> {
        let mut events = Vec::new();
        let exchange = self
            .committer
            .open_exchange(ExchangePurpose::MoveOrder, COIN_FLIP_MODULUS)?;
        let mut state = MatchState::new(dice, exchange);
        info!(match_id = %state.match_id, dice = state.dice.len(), "Match started");

        events.push(MatchEvent::MatchStarted {
            match_id: state.match_id,
            dice: state.dice.clone(),
        });
        if let Phase::MoveOrder { exchange } = &mut state.phase {
            events.push(published(ExchangePurpose::MoveOrder, exchange));
        }

        Ok(Transition { state, events })
    }

    /// Apply one input to the current phase.
    ///
    /// Invalid input is reported as `InputRejected` and leaves the phase,
    /// including any in-flight exchange, exactly as it was.
    pub fn apply(&mut self, mut state: MatchState, input: PlayerInput) -> Result<Transition, MatchError> {
        let mut events = Vec::new();
        let round = state.current_round();
        let phase = std::mem::replace(&mut state.phase, Phase::Aborted);

        let value = match input {
            PlayerInput::Abort => {
                state.phase = match phase {
                    done @ (Phase::Complete { .. } | Phase::Aborted) => {
                        events.push(rejected("The match is already over"));
                        done
                    }
                    _ => {
                        // Any unrevealed exchange is dropped here with its key and secret
                        warn!(match_id = %state.match_id, ?round, "Match aborted");
                        events.push(MatchEvent::MatchAborted { round });
                        Phase::Aborted
                    }
                };
                return Ok(Transition { state, events });
            }
            PlayerInput::Value(value) => value,
        };

        state.phase = match phase {
            Phase::MoveOrder { exchange } => {
                self.resolve_move_order(&mut state, exchange, &value, &mut events)?
            }
            Phase::DieSelection { options } => {
                self.resolve_die_selection(&mut state, options, &value, &mut events)?
            }
            Phase::OpponentRoll { exchange } => {
                self.resolve_opponent_roll(&mut state, exchange, &value, &mut events)?
            }
            Phase::UserRoll {
                exchange,
                opponent_face,
            } => self.resolve_user_roll(&mut state, exchange, opponent_face, &value, &mut events)?,
            done @ (Phase::Complete { .. } | Phase::Aborted) => {
                events.push(rejected("The match is already over"));
                done
            }
        };

        Ok(Transition { state, events })
    }

    fn resolve_move_order(
        &mut self,
        state: &mut MatchState,
        mut exchange: FairValueExchange,
        value: &str,
        events: &mut Vec<MatchEvent>,
    ) -> Result<Phase, MatchError> {
        let purpose = ExchangePurpose::MoveOrder;
        if !take_contribution(&mut exchange, purpose, value, events) {
            return Ok(Phase::MoveOrder { exchange });
        }

        let result = finish(exchange, purpose, events)?;
        let first = if result.combined_outcome == 0 {
            Party::User
        } else {
            Party::Opponent
        };
        state.first_mover = Some(first);
        info!(match_id = %state.match_id, %first, "Move order decided");
        events.push(MatchEvent::MoveOrderDecided { first });

        if first == Party::Opponent {
            self.assign_opponent_die(state, events)?;
        }
        Ok(Phase::DieSelection {
            options: state.available_dice(),
        })
    }

    fn resolve_die_selection(
        &mut self,
        state: &mut MatchState,
        options: Vec<usize>,
        value: &str,
        events: &mut Vec<MatchEvent>,
    ) -> Result<Phase, MatchError> {
        let choice = value.parse::<usize>().ok().filter(|i| options.contains(i));
        let Some(index) = choice else {
            warn!(input = value, "Rejected die selection");
            events.push(rejected(&format!(
                "Invalid die choice {:?}: pick one of {:?}",
                value, options
            )));
            return Ok(Phase::DieSelection { options });
        };

        state.user_die = Some(index);
        if let Some(die) = state.dice.get(index) {
            events.push(MatchEvent::DieAssigned {
                party: Party::User,
                index,
                die: die.clone(),
            });
        }
        if state.opponent_die.is_none() {
            self.assign_opponent_die(state, events)?;
        }
        info!(
            match_id = %state.match_id,
            user_die = ?state.user_die,
            opponent_die = ?state.opponent_die,
            "Dice assigned"
        );

        self.open_round(state, events)
    }

    fn resolve_opponent_roll(
        &mut self,
        state: &mut MatchState,
        mut exchange: FairValueExchange,
        value: &str,
        events: &mut Vec<MatchEvent>,
    ) -> Result<Phase, MatchError> {
        let purpose = ExchangePurpose::Roll {
            round: state.round_number,
            party: Party::Opponent,
        };
        if !take_contribution(&mut exchange, purpose, value, events) {
            return Ok(Phase::OpponentRoll { exchange });
        }

        let result = finish(exchange, purpose, events)?;
        let opponent_face = roll_face(state, Party::Opponent, &result, events)?;

        let purpose = ExchangePurpose::Roll {
            round: state.round_number,
            party: Party::User,
        };
        let mut exchange = self.committer.open_exchange(purpose, DIE_ROLL_MODULUS)?;
        events.push(published(purpose, &mut exchange));
        Ok(Phase::UserRoll {
            exchange,
            opponent_face,
        })
    }

    fn resolve_user_roll(
        &mut self,
        state: &mut MatchState,
        mut exchange: FairValueExchange,
        opponent_face: i64,
        value: &str,
        events: &mut Vec<MatchEvent>,
    ) -> Result<Phase, MatchError> {
        let round = state.round_number;
        let purpose = ExchangePurpose::Roll {
            round,
            party: Party::User,
        };
        if !take_contribution(&mut exchange, purpose, value, events) {
            return Ok(Phase::UserRoll {
                exchange,
                opponent_face,
            });
        }

        let result = finish(exchange, purpose, events)?;
        let user_face = roll_face(state, Party::User, &result, events)?;

        let winner = match user_face.cmp(&opponent_face) {
            Ordering::Greater => Some(Party::User),
            Ordering::Less => Some(Party::Opponent),
            Ordering::Equal => None,
        };
        match winner {
            Some(party) => state.scores.award(party),
            None => state.ties += 1,
        }
        info!(
            match_id = %state.match_id,
            round,
            user_face,
            opponent_face,
            ?winner,
            "Round resolved"
        );
        events.push(MatchEvent::RoundResolved {
            round,
            user_face,
            opponent_face,
            winner,
            scores: state.scores,
        });

        state.round_number += 1;
        if state.rounds_remaining() {
            return self.open_round(state, events);
        }

        let outcome = MatchOutcome::from_scores(&state.scores);
        info!(match_id = %state.match_id, %outcome, "Match completed");
        events.push(MatchEvent::MatchCompleted {
            outcome,
            scores: state.scores,
        });
        Ok(Phase::Complete { outcome })
    }

    fn open_round(
        &mut self,
        state: &MatchState,
        events: &mut Vec<MatchEvent>,
    ) -> Result<Phase, MatchError> {
        let purpose = ExchangePurpose::Roll {
            round: state.round_number,
            party: Party::Opponent,
        };
        let mut exchange = self.committer.open_exchange(purpose, DIE_ROLL_MODULUS)?;
        events.push(published(purpose, &mut exchange));
        Ok(Phase::OpponentRoll { exchange })
    }

    /// The opponent takes a die from those still free
    fn assign_opponent_die(
        &mut self,
        state: &mut MatchState,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), MatchError> {
        let options = state.available_dice();
        let Some(&fallback) = options.first() else {
            return Err(MatchError::InvalidState(
                "No die left for the opponent".to_string(),
            ));
        };
        let pick = self.committer.pick_die(&options);
        let index = if options.contains(&pick) {
            pick
        } else {
            warn!(pick, ?options, "Committer picked an unavailable die");
            fallback
        };

        state.opponent_die = Some(index);
        if let Some(die) = state.dice.get(index) {
            events.push(MatchEvent::DieAssigned {
                party: Party::Opponent,
                index,
                die: die.clone(),
            });
        }
        Ok(())
    }
}

fn rejected(reason: &str) -> MatchEvent {
    MatchEvent::InputRejected {
        reason: reason.to_string(),
    }
}

fn published(purpose: ExchangePurpose, exchange: &mut FairValueExchange) -> MatchEvent {
    let commitment = exchange.publish();
    debug!(%purpose, %commitment, "Commitment published");
    MatchEvent::CommitmentPublished {
        purpose,
        modulus: exchange.modulus(),
        commitment,
    }
}

fn take_contribution(
    exchange: &mut FairValueExchange,
    purpose: ExchangePurpose,
    value: &str,
    events: &mut Vec<MatchEvent>,
) -> bool {
    match exchange.submit(value) {
        Ok(contribution) => {
            events.push(MatchEvent::ContributionReceived {
                purpose,
                contribution,
            });
            true
        }
        Err(err) => {
            warn!(%purpose, %err, "Rejected contribution");
            events.push(rejected(&err.to_string()));
            false
        }
    }
}

fn finish(
    exchange: FairValueExchange,
    purpose: ExchangePurpose,
    events: &mut Vec<MatchEvent>,
) -> Result<ExchangeResult, MatchError> {
    let result = exchange.reveal()?.verify();
    events.push(MatchEvent::ExchangeRevealed {
        purpose,
        result: result.clone(),
    });
    if !result.commitment_valid {
        warn!(%purpose, commitment = %result.commitment, "Fairness violation");
        events.push(MatchEvent::FairnessViolation {
            purpose,
            commitment: result.commitment,
        });
    }
    Ok(result)
}

fn roll_face(
    state: &MatchState,
    party: Party,
    result: &ExchangeResult,
    events: &mut Vec<MatchEvent>,
) -> Result<i64, MatchError> {
    let face = state
        .die(party)
        .and_then(|die| die.face(result.combined_outcome))
        .ok_or_else(|| MatchError::InvalidState(format!("{} has no die to roll", party)))?;

    events.push(MatchEvent::RollResolved {
        round: state.round_number,
        party,
        face_index: result.combined_outcome,
        face,
        verified: result.commitment_valid,
    });
    Ok(face)
}
