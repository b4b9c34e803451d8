//! Match engine.
//!
//! This module provides:
//! - Committer, the automated party that opens exchanges and picks dice
//! - MatchState, the exclusively owned state threaded through every transition
//! - RoundEngine, the transition function `(state, input) -> (state, events)`
//! - run_match, a driver loop over InputSource and OutputSink collaborators

mod committer;
mod driver;
mod io;
mod machine;
mod state;

pub use committer::{Committer, RandomCommitter, ScriptedCommitter};
pub use driver::{run_match, MatchEnd};
pub use io::{InputSource, OutputSink, RecordingSink, ScriptedInput};
pub use machine::{PlayerInput, RoundEngine, Transition};
pub use state::{MatchState, Phase, PhaseTag};

/// Rounds in every match
pub const MATCH_ROUNDS: u32 = 3;
