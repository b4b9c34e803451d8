//! FairValueExchange state machine.

use crate::crypto::{Commitment, SecretKey};
use crate::error::ExchangeError;
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of an in-flight exchange
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeState {
    /// Secret drawn and committed, commitment not yet disclosed
    Committed,
    /// Commitment disclosed, waiting for the counterpart
    AwaitingContribution,
    /// Key and secret disclosed, outcome fixed
    Revealed,
    /// Commitment rechecked against the disclosed materials
    Verified,
}

/// Additive blinding: `(secret + contribution) mod modulus`
pub fn combine(secret_value: u32, contribution: u32, modulus: u32) -> u32 {
    ((u64::from(secret_value) + u64::from(contribution)) % u64::from(modulus)) as u32
}

/// One commit-reveal-and-combine run producing a value in `[0, modulus)`.
///
/// The key and secret value never leave this struct until [`reveal`]
/// consumes it. Dropping an unrevealed exchange discards them.
///
/// [`reveal`]: FairValueExchange::reveal
pub struct FairValueExchange {
    modulus: u32,
    key: SecretKey,
    secret_value: u32,
    commitment: Commitment,
    state: ExchangeState,
    contribution: Option<u32>,
}

impl FairValueExchange {
    /// Start an exchange with a uniformly drawn secret value
    pub fn new<R: RngCore + CryptoRng>(modulus: u32, rng: &mut R) -> Result<Self, ExchangeError> {
        check_modulus(modulus)?;
        let secret_value = rng.gen_range(0..modulus);
        Self::with_secret(modulus, secret_value, rng)
    }

    /// Start an exchange committing to a caller-chosen secret value
    pub fn with_secret<R: RngCore + CryptoRng>(
        modulus: u32,
        secret_value: u32,
        rng: &mut R,
    ) -> Result<Self, ExchangeError> {
        check_modulus(modulus)?;
        if secret_value >= modulus {
            return Err(ExchangeError::SecretOutOfRange {
                value: secret_value,
                modulus,
            });
        }

        let key = SecretKey::generate(rng);
        let commitment = Commitment::new(&key, secret_value);
        tracing::debug!(modulus, %commitment, "Opened fair value exchange");

        Ok(Self {
            modulus,
            key,
            secret_value,
            commitment,
            state: ExchangeState::Committed,
            contribution: None,
        })
    }

    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    pub fn contribution(&self) -> Option<u32> {
        self.contribution
    }

    /// Swap in a forged commitment, as a dishonest committer would
    #[cfg(test)]
    pub(crate) fn with_commitment(mut self, commitment: Commitment) -> Self {
        self.commitment = commitment;
        self
    }

    /// Disclose the commitment; contributions are accepted only after this
    pub fn publish(&mut self) -> Commitment {
        if self.state == ExchangeState::Committed {
            self.state = ExchangeState::AwaitingContribution;
        }
        self.commitment
    }

    /// Parse and accept a raw contribution line
    pub fn submit(&mut self, input: &str) -> Result<u32, ExchangeError> {
        let trimmed = input.trim();
        let value = trimmed
            .parse::<u32>()
            .map_err(|_| ExchangeError::InvalidContribution {
                input: trimmed.to_string(),
                modulus: self.modulus,
            })?;
        self.accept_contribution(value)?;
        Ok(value)
    }

    /// Accept the counterpart's contribution in `[0, modulus)`.
    ///
    /// On error nothing changes: the same commitment stays live and the
    /// caller may resubmit.
    pub fn accept_contribution(&mut self, contribution: u32) -> Result<(), ExchangeError> {
        if self.state != ExchangeState::AwaitingContribution {
            return Err(ExchangeError::NotPublished);
        }
        if self.contribution.is_some() {
            return Err(ExchangeError::ContributionAlreadyAccepted);
        }
        if contribution >= self.modulus {
            return Err(ExchangeError::InvalidContribution {
                input: contribution.to_string(),
                modulus: self.modulus,
            });
        }

        self.contribution = Some(contribution);
        tracing::debug!(contribution, modulus = self.modulus, "Accepted contribution");
        Ok(())
    }

    /// Disclose key and secret and fix the combined outcome
    pub fn reveal(self) -> Result<RevealedExchange, ExchangeError> {
        let contribution = self.contribution.ok_or(ExchangeError::ContributionMissing)?;

        Ok(RevealedExchange {
            modulus: self.modulus,
            combined_outcome: combine(self.secret_value, contribution, self.modulus),
            key: self.key,
            secret_value: self.secret_value,
            contribution,
            commitment: self.commitment,
        })
    }
}

impl fmt::Debug for FairValueExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FairValueExchange")
            .field("modulus", &self.modulus)
            .field("commitment", &self.commitment)
            .field("state", &self.state)
            .field("contribution", &self.contribution)
            .finish_non_exhaustive()
    }
}

fn check_modulus(modulus: u32) -> Result<(), ExchangeError> {
    if modulus < 2 {
        return Err(ExchangeError::InvalidModulus(modulus));
    }
    Ok(())
}

/// Exchange after reveal, before the commitment is rechecked
#[derive(Debug)]
pub struct RevealedExchange {
    modulus: u32,
    key: SecretKey,
    secret_value: u32,
    contribution: u32,
    combined_outcome: u32,
    commitment: Commitment,
}

impl RevealedExchange {
    pub fn state(&self) -> ExchangeState {
        ExchangeState::Revealed
    }

    pub fn combined_outcome(&self) -> u32 {
        self.combined_outcome
    }

    /// Recompute the commitment over the disclosed key and secret
    pub fn verify(self) -> ExchangeResult {
        let commitment_valid = self.commitment.verify(&self.key, self.secret_value);
        if !commitment_valid {
            tracing::warn!(commitment = %self.commitment, "Revealed secret does not match commitment");
        }

        ExchangeResult {
            modulus: self.modulus,
            key: self.key,
            secret_value: self.secret_value,
            contribution: self.contribution,
            combined_outcome: self.combined_outcome,
            commitment: self.commitment,
            commitment_valid,
        }
    }
}

/// Everything disclosed by a finished exchange
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResult {
    pub modulus: u32,
    pub key: SecretKey,
    pub secret_value: u32,
    pub contribution: u32,
    pub combined_outcome: u32,
    pub commitment: Commitment,
    pub commitment_valid: bool,
}

impl ExchangeResult {
    pub fn state(&self) -> ExchangeState {
        ExchangeState::Verified
    }

    /// Independent recheck from the disclosed materials alone
    pub fn audit(&self) -> bool {
        self.modulus >= 2
            && self.secret_value < self.modulus
            && self.contribution < self.modulus
            && self.commitment.verify(&self.key, self.secret_value)
            && self.combined_outcome == combine(self.secret_value, self.contribution, self.modulus)
    }
}
