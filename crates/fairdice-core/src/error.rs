//! Error types for the fair dice protocol.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors raised by a single fair value exchange
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("Invalid modulus {0}: an exchange needs at least two outcomes")]
    InvalidModulus(u32),

    #[error("Secret value {value} is outside [0, {modulus})")]
    SecretOutOfRange { value: u32, modulus: u32 },

    #[error("Invalid contribution {input:?}: enter a whole number from 0 to {}", .modulus - 1)]
    InvalidContribution { input: String, modulus: u32 },

    #[error("Commitment has not been published yet")]
    NotPublished,

    #[error("Contribution already accepted")]
    ContributionAlreadyAccepted,

    #[error("No contribution has been accepted")]
    ContributionMissing,
}

/// Invalid die set, detected before a match starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("At least {required} dice are required, got {found}")]
    TooFewDice { found: usize, required: usize },

    #[error("Die #{die} must have exactly 6 faces, got {found}")]
    WrongFaceCount { die: usize, found: usize },

    #[error("Die #{die} has a non-numeric face: {face:?}")]
    InvalidFace { die: usize, face: String },
}

/// Errors that end a driven match
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Invalid dice: {0}")]
    Dice(#[from] DiceError),

    #[error("Invalid match state: {0}")]
    InvalidState(String),

    #[error("Input source closed")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for MatchError {
    fn from(err: std::io::Error) -> Self {
        MatchError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_contribution_message_names_range() {
        let err = ExchangeError::InvalidContribution {
            input: "7".to_string(),
            modulus: 6,
        };

        assert_eq!(
            err.to_string(),
            "Invalid contribution \"7\": enter a whole number from 0 to 5"
        );
    }

    #[test]
    fn test_dice_error_converts_into_match_error() {
        let err: MatchError = DiceError::TooFewDice {
            found: 2,
            required: 3,
        }
        .into();

        assert!(matches!(err, MatchError::Dice(DiceError::TooFewDice { .. })));
    }
}
