//! Protocol types and transcript events.

mod events;
mod types;

pub use events::{ExchangePurpose, InputRequest, MatchEvent};
pub use types::{MatchId, MatchOutcome, Party, Scores};
