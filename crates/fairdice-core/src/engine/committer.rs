//! The automated committing party.

use crate::error::ExchangeError;
use crate::exchange::FairValueExchange;
use crate::protocol::ExchangePurpose;
use rand::rngs::{StdRng, ThreadRng};
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use std::collections::VecDeque;

/// Source of the opponent's secrets and die choices
pub trait Committer {
    /// Open a fresh exchange (new key, new secret) for `purpose`
    fn open_exchange(
        &mut self,
        purpose: ExchangePurpose,
        modulus: u32,
    ) -> Result<FairValueExchange, ExchangeError>;

    /// Choose one of `options` (die indices). `options` is never empty.
    fn pick_die(&mut self, options: &[usize]) -> usize;
}

/// Committer drawing everything uniformly from a cryptographic generator
pub struct RandomCommitter<R> {
    rng: R,
}

impl RandomCommitter<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomCommitter<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> RandomCommitter<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore + CryptoRng> Committer for RandomCommitter<R> {
    fn open_exchange(
        &mut self,
        _purpose: ExchangePurpose,
        modulus: u32,
    ) -> Result<FairValueExchange, ExchangeError> {
        FairValueExchange::new(modulus, &mut self.rng)
    }

    fn pick_die(&mut self, options: &[usize]) -> usize {
        options[self.rng.gen_range(0..options.len())]
    }
}

/// Committer replaying a fixed script of secret values and die picks.
///
/// Keys still come from a seeded cryptographic generator, so commitments
/// stay genuine. Once a script runs dry it falls back to uniform draws.
pub struct ScriptedCommitter {
    secrets: VecDeque<u32>,
    picks: VecDeque<usize>,
    rng: StdRng,
}

impl ScriptedCommitter {
    pub fn new(
        secrets: impl IntoIterator<Item = u32>,
        picks: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            secrets: secrets.into_iter().collect(),
            picks: picks.into_iter().collect(),
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Secrets not yet consumed
    pub fn remaining_secrets(&self) -> usize {
        self.secrets.len()
    }
}

impl Committer for ScriptedCommitter {
    fn open_exchange(
        &mut self,
        _purpose: ExchangePurpose,
        modulus: u32,
    ) -> Result<FairValueExchange, ExchangeError> {
        match self.secrets.pop_front() {
            Some(secret) => FairValueExchange::with_secret(modulus, secret, &mut self.rng),
            None => FairValueExchange::new(modulus, &mut self.rng),
        }
    }

    fn pick_die(&mut self, options: &[usize]) -> usize {
        match self.picks.pop_front() {
            Some(pick) if options.contains(&pick) => pick,
            _ => options[self.rng.gen_range(0..options.len())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_pick_stays_within_options() {
        let mut committer = RandomCommitter::with_rng(StdRng::seed_from_u64(5));
        for _ in 0..100 {
            let pick = committer.pick_die(&[1, 3]);
            assert!(pick == 1 || pick == 3);
        }
    }

    #[test]
    fn test_random_exchange_has_requested_modulus() {
        let mut committer = RandomCommitter::new();
        let exchange = committer
            .open_exchange(ExchangePurpose::MoveOrder, 2)
            .unwrap();
        assert_eq!(exchange.modulus(), 2);
    }

    #[test]
    fn test_scripted_secrets_are_committed() {
        let mut committer = ScriptedCommitter::new([4], []);
        let mut exchange = committer
            .open_exchange(ExchangePurpose::MoveOrder, 6)
            .unwrap();
        assert_eq!(committer.remaining_secrets(), 0);

        exchange.publish();
        exchange.accept_contribution(0).unwrap();
        let result = exchange.reveal().unwrap().verify();
        assert_eq!(result.secret_value, 4);
        assert!(result.commitment_valid);
    }

    #[test]
    fn test_scripted_pick_outside_options_falls_back() {
        let mut committer = ScriptedCommitter::new([], [0, 2]);
        let fallback = committer.pick_die(&[1, 2]);
        assert!(fallback == 1 || fallback == 2);
        assert_eq!(committer.pick_die(&[1, 2]), 2);
    }
}
