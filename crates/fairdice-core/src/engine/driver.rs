//! Driver loop: poll input, apply the transition, emit outputs.

use super::{Committer, InputSource, OutputSink, Phase, PlayerInput, RoundEngine};
use crate::dice::DieSet;
use crate::error::{MatchError, Result};
use crate::protocol::{MatchOutcome, Scores};
use serde::{Deserialize, Serialize};

/// How a driven match ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEnd {
    Completed { outcome: MatchOutcome, scores: Scores },
    /// No winner is declared for an aborted match
    Aborted { round: Option<u32> },
}

/// Play one match to completion or abort.
///
/// A closed input source counts as an abort.
pub fn run_match<C, I, O>(
    engine: &mut RoundEngine<C>,
    dice: DieSet,
    input: &mut I,
    output: &mut O,
) -> Result<MatchEnd>
where
    C: Committer,
    I: InputSource + ?Sized,
    O: OutputSink + ?Sized,
{
    let mut transition = engine.start(dice)?;
    let mut aborted_round = None;

    loop {
        for event in &transition.events {
            output.emit(event)?;
        }

        let state = transition.state;
        match state.phase() {
            Phase::Complete { outcome } => {
                return Ok(MatchEnd::Completed {
                    outcome: *outcome,
                    scores: state.scores(),
                });
            }
            Phase::Aborted => return Ok(MatchEnd::Aborted { round: aborted_round }),
            _ => {}
        }

        let request = state.pending_request().ok_or_else(|| {
            MatchError::InvalidState("Live phase is not waiting for input".to_string())
        })?;
        let player_input = match input.request_input(&request) {
            Ok(line) => PlayerInput::parse(&line),
            Err(MatchError::InputClosed) => PlayerInput::Abort,
            Err(err) => return Err(err),
        };

        if player_input == PlayerInput::Abort {
            aborted_round = state.current_round();
        }
        transition = engine.apply(state, player_input)?;
    }
}
