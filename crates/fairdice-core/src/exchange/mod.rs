//! Fair value exchange: commit, contribute, reveal, verify.
//!
//! The committing party publishes HMAC(key, secret) before the counterpart
//! contributes. The outcome is `(secret + contribution) mod n`, uniform over
//! `[0, n)` whenever either input is uniform and independent of the other.

mod fair_value;

pub use fair_value::{combine, ExchangeResult, ExchangeState, FairValueExchange, RevealedExchange};

/// Modulus for the move-order coin flip
pub const COIN_FLIP_MODULUS: u32 = 2;

/// Modulus for a die-face roll index
pub const DIE_ROLL_MODULUS: u32 = 6;
