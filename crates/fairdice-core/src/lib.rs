//! Fair Dice Core Library
//!
//! This crate provides the commit-reveal primitives, the fair value
//! exchange and the match engine for a provably fair dice game between a
//! human verifier and an automated committer.

pub mod crypto;
pub mod dice;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod protocol;

pub use crypto::{commit, generate_key, verify, Commitment, SecretKey};
pub use dice::{estimate_win_rate, win_rate_table, Die, DieSet};
pub use engine::{
    run_match, Committer, InputSource, MatchEnd, MatchState, OutputSink, PlayerInput,
    RandomCommitter, RoundEngine, MATCH_ROUNDS,
};
pub use error::{DiceError, ExchangeError, MatchError, Result};
pub use exchange::{ExchangeResult, FairValueExchange};
pub use protocol::{ExchangePurpose, InputRequest, MatchEvent, MatchId, MatchOutcome, Party, Scores};
