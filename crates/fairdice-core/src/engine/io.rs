//! Input and output collaborators.

use crate::error::MatchError;
use crate::exchange::ExchangeResult;
use crate::protocol::{InputRequest, MatchEvent};
use std::collections::VecDeque;

/// Supplies one raw line per request: a contribution, a die index, or `x` to abort
pub trait InputSource {
    /// Return `MatchError::InputClosed` when no more input will arrive
    fn request_input(&mut self, request: &InputRequest) -> Result<String, MatchError>;
}

/// Receives transcript events as plain data
pub trait OutputSink {
    fn emit(&mut self, event: &MatchEvent) -> Result<(), MatchError>;
}

/// In-memory input source replaying a fixed list of lines
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    requests: Vec<InputRequest>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            requests: Vec::new(),
        }
    }

    /// Every request seen so far, in order
    pub fn requests(&self) -> &[InputRequest] {
        &self.requests
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl InputSource for ScriptedInput {
    fn request_input(&mut self, request: &InputRequest) -> Result<String, MatchError> {
        self.requests.push(request.clone());
        self.lines.pop_front().ok_or(MatchError::InputClosed)
    }
}

/// In-memory sink keeping every event
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Vec<MatchEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<MatchEvent> {
        self.events
    }

    /// Results of every revealed exchange, in order
    pub fn revealed(&self) -> Vec<&ExchangeResult> {
        self.events
            .iter()
            .filter_map(|event| match event {
                MatchEvent::ExchangeRevealed { result, .. } => Some(result),
                _ => None,
            })
            .collect()
    }
}

impl OutputSink for RecordingSink {
    fn emit(&mut self, event: &MatchEvent) -> Result<(), MatchError> {
        self.events.push(event.clone());
        Ok(())
    }
}
