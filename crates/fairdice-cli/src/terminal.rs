//! Terminal input sources and transcript sinks.

use dialoguer::{console::Term, Input, Select};
use fairdice_core::{
    Commitment, DieSet, ExchangePurpose, InputRequest, InputSource, MatchError, MatchEvent,
    OutputSink, Party,
};
use std::io::{self, BufRead, Write};

/// Line the input sources answer with to abort the match
const ABORT_LINE: &str = "x";

fn commitment_line(purpose: &ExchangePurpose, commitment: &Commitment) -> String {
    format!("Commitment for {}: {}", purpose, commitment)
}

fn contribution_prompt(modulus: u32) -> String {
    format!(
        "Add your number modulo {} (0..{}, or 'x' to exit)",
        modulus,
        modulus - 1
    )
}

/// One `[index] faces` label per die still on offer
fn die_labels(dice: &DieSet, options: &[usize]) -> Vec<String> {
    options
        .iter()
        .filter_map(|&index| dice.get(index).map(|die| format!("[{}] {}", index, die)))
        .collect()
}

/// Map a menu choice back to the line the engine expects. The entry after
/// the dice, or a cancelled menu, aborts.
fn selection_line(options: &[usize], choice: Option<usize>) -> String {
    match choice.and_then(|i| options.get(i)) {
        Some(index) => index.to_string(),
        None => ABORT_LINE.to_string(),
    }
}

fn dialog_error(err: dialoguer::Error) -> MatchError {
    MatchError::Io(err.to_string())
}

/// Interactive prompts for a terminal session, drawn on stderr
pub struct DialogInput {
    dice: DieSet,
    term: Term,
}

impl DialogInput {
    pub fn new(dice: DieSet) -> Self {
        Self {
            dice,
            term: Term::stderr(),
        }
    }
}

impl InputSource for DialogInput {
    fn request_input(&mut self, request: &InputRequest) -> Result<String, MatchError> {
        match request {
            InputRequest::Contribution {
                purpose,
                modulus,
                commitment,
            } => {
                self.term.write_line(&commitment_line(purpose, commitment))?;
                Input::<String>::new()
                    .with_prompt(contribution_prompt(*modulus))
                    .allow_empty(true)
                    .interact_text_on(&self.term)
                    .map_err(dialog_error)
            }
            InputRequest::DieSelection { options } => {
                let mut items = die_labels(&self.dice, options);
                items.push("Exit match".to_string());
                let choice = Select::new()
                    .with_prompt("Choose your die")
                    .items(&items[..])
                    .default(0)
                    .interact_on_opt(&self.term)
                    .map_err(dialog_error)?;
                Ok(selection_line(options, choice))
            }
        }
    }
}

/// Reads one line per request from `reader`, prompting on `prompt`.
/// Used when stdin is a pipe or file.
pub struct TerminalInput<R, W> {
    dice: DieSet,
    reader: R,
    prompt: W,
}

impl TerminalInput<io::StdinLock<'static>, Box<dyn Write>> {
    /// Prompts go to stdout for text transcripts and to stderr when stdout
    /// carries JSON lines.
    pub fn new(dice: DieSet, prompt_on_stdout: bool) -> Self {
        let prompt: Box<dyn Write> = if prompt_on_stdout {
            Box::new(io::stdout())
        } else {
            Box::new(io::stderr())
        };
        Self::with_io(dice, io::stdin().lock(), prompt)
    }
}

impl<R: BufRead, W: Write> TerminalInput<R, W> {
    pub fn with_io(dice: DieSet, reader: R, prompt: W) -> Self {
        Self { dice, reader, prompt }
    }

    fn write_prompt(&mut self, request: &InputRequest) -> io::Result<()> {
        match request {
            InputRequest::Contribution {
                purpose,
                modulus,
                commitment,
            } => {
                writeln!(self.prompt, "{}", commitment_line(purpose, commitment))?;
                write!(self.prompt, "{}: ", contribution_prompt(*modulus))?;
            }
            InputRequest::DieSelection { options } => {
                writeln!(self.prompt, "Choose your die:")?;
                for label in die_labels(&self.dice, options) {
                    writeln!(self.prompt, "  {}", label)?;
                }
                write!(self.prompt, "Die index (or 'x' to exit): ")?;
            }
        }
        self.prompt.flush()
    }
}

impl<R: BufRead, W: Write> InputSource for TerminalInput<R, W> {
    fn request_input(&mut self, request: &InputRequest) -> Result<String, MatchError> {
        self.write_prompt(request)?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(MatchError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Human-readable transcript
pub struct TerminalOutput<W> {
    out: W,
}

impl TerminalOutput<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalOutput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, event: &MatchEvent) -> io::Result<()> {
        let out = &mut self.out;
        match event {
            MatchEvent::MatchStarted { match_id, dice } => {
                writeln!(out, "Match {} with {} dice", match_id, dice.len())?;
            }
            // The prompt already shows the commitment
            MatchEvent::CommitmentPublished { .. } => {}
            MatchEvent::InputRejected { reason } => writeln!(out, "{}", reason)?,
            MatchEvent::ContributionReceived { contribution, .. } => {
                writeln!(out, "You added {}", contribution)?;
            }
            MatchEvent::ExchangeRevealed { purpose, result } => {
                writeln!(out, "Reveal for {}:", purpose)?;
                writeln!(out, "  key:          {}", result.key.to_hex())?;
                writeln!(out, "  secret value: {}", result.secret_value)?;
                writeln!(out, "  your number:  {}", result.contribution)?;
                writeln!(
                    out,
                    "  outcome:      ({} + {}) mod {} = {}",
                    result.secret_value, result.contribution, result.modulus, result.combined_outcome
                )?;
                writeln!(
                    out,
                    "  HMAC check:   {}",
                    if result.commitment_valid { "valid" } else { "INVALID" }
                )?;
            }
            MatchEvent::FairnessViolation { purpose, commitment } => {
                writeln!(
                    out,
                    "WARNING: the {} reveal does not match commitment {}. The opponent cheated.",
                    purpose, commitment
                )?;
            }
            MatchEvent::MoveOrderDecided { first } => match first {
                Party::User => writeln!(out, "You choose your die first.")?,
                Party::Opponent => writeln!(out, "The opponent chooses first.")?,
            },
            MatchEvent::DieAssigned { party, index, die } => match party {
                Party::User => writeln!(out, "You take die [{}] {}", index, die)?,
                Party::Opponent => writeln!(out, "Opponent takes die [{}] {}", index, die)?,
            },
            MatchEvent::RollResolved { party, face_index, face, .. } => {
                writeln!(out, "{} rolled face {} showing {}", party, face_index, face)?;
            }
            MatchEvent::RoundResolved {
                round,
                user_face,
                opponent_face,
                winner,
                scores,
            } => {
                let verdict = match winner {
                    Some(Party::User) => "you win the round",
                    Some(Party::Opponent) => "opponent wins the round",
                    None => "tie, no point",
                };
                writeln!(
                    out,
                    "Round {}: you {} vs opponent {}: {} (score {}-{})",
                    round, user_face, opponent_face, verdict, scores.user, scores.opponent
                )?;
            }
            MatchEvent::MatchCompleted { outcome, scores } => {
                writeln!(out, "Final score {}-{}: {}", scores.user, scores.opponent, outcome)?;
            }
            MatchEvent::MatchAborted { .. } => writeln!(out, "Match abandoned.")?,
        }
        out.flush()
    }
}

impl<W: Write> OutputSink for TerminalOutput<W> {
    fn emit(&mut self, event: &MatchEvent) -> Result<(), MatchError> {
        Ok(self.render(event)?)
    }
}

/// One JSON object per event, newline-delimited
pub struct JsonLinesOutput<W> {
    out: W,
}

impl JsonLinesOutput<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesOutput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for JsonLinesOutput<W> {
    fn emit(&mut self, event: &MatchEvent) -> Result<(), MatchError> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
