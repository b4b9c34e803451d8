//! Dice definitions, die-set loading and win-rate estimation.

mod die;
mod probability;

pub use die::{Die, DieSet, FACES_PER_DIE, MIN_DICE};
pub use probability::{estimate_win_rate, exact_win_rate, win_rate_table, DEFAULT_TRIALS};
