//! Fair Dice terminal front end
//!
//! Plays a best-of-three non-transitive dice match against the computer.
//! Every random decision is a fair value exchange the player can audit.

mod config;
mod table;
mod terminal;

use clap::Parser;
use config::{CliConfig, ConfigError};
use fairdice_core::{
    run_match, DiceError, DieSet, InputSource, MatchEnd, MatchError, OutputSink, RandomCommitter,
    RoundEngine,
};
use std::io::IsTerminal;
use terminal::{DialogInput, JsonLinesOutput, TerminalInput, TerminalOutput};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "fairdice")]
#[command(about = "Provably fair non-transitive dice against the computer")]
#[command(version)]
struct Cli {
    /// Dice as comma-separated faces, at least three, e.g. 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3
    dice: Vec<String>,

    /// Print how to play and the win-probability table, then exit
    #[arg(long)]
    help_table: bool,

    /// Monte Carlo samples per die pair in the probability table. If omitted,
    /// `FAIRDICE_TRIALS` or 100000 is used.
    #[arg(long)]
    trials: Option<u32>,

    /// Write the transcript as JSON lines instead of text. Also enabled by `FAIRDICE_JSON=1`.
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}\nExample: fairdice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3")]
    Dice(#[from] DiceError),

    #[error(transparent)]
    Match(#[from] MatchError),
}

fn main() {
    let cli = Cli::parse();
    let config = match CliConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", CliError::from(e));
            std::process::exit(1);
        }
    };

    // Initialize logging on stderr so it never mixes with the transcript
    let log_level = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("fairdice={},fairdice_core={}", log_level, log_level))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let asked_help = cli.dice.len() == 1 && cli.dice[0].eq_ignore_ascii_case("help");
    debug!(?config, "Resolved configuration");

    let result = if cli.help_table || asked_help || cli.dice.is_empty() {
        let dice = if asked_help { &[][..] } else { &cli.dice[..] };
        show_help(dice, &config)
    } else {
        play(&cli.dice, &config)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn show_help(args: &[String], config: &CliConfig) -> Result<(), CliError> {
    let dice = if args.is_empty() {
        DieSet::default_set()
    } else {
        DieSet::parse(args)?
    };

    println!("How to play:");
    println!("  1. Provide at least 3 dice, each with exactly 6 integer faces.");
    println!("     Example: fairdice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3");
    println!("  2. A fair coin flip decides who picks a die first.");
    println!("  3. Three rounds are played; the higher roll wins each round.");
    println!("  4. Before every random value the computer shows an HMAC of its");
    println!("     secret. You add your own number, then the key is revealed so");
    println!("     you can check the computer did not change its value.");
    println!("  5. Type 'x' at any prompt to leave.");
    println!();
    println!("Probability table (chance the row die beats the column die):");
    println!("{}", table::render(&dice, config.trials));
    Ok(())
}

fn play(args: &[String], config: &CliConfig) -> Result<(), CliError> {
    let dice = DieSet::parse(args)?;

    if !config.json {
        println!("Probability table (chance the row die beats the column die):");
        println!("{}", table::render(&dice, config.trials));
    }

    let mut input: Box<dyn InputSource> = if std::io::stdin().is_terminal() {
        Box::new(DialogInput::new(dice.clone()))
    } else {
        Box::new(TerminalInput::new(dice.clone(), !config.json))
    };
    let mut output: Box<dyn OutputSink> = if config.json {
        Box::new(JsonLinesOutput::stdout())
    } else {
        Box::new(TerminalOutput::stdout())
    };

    let mut engine = RoundEngine::new(RandomCommitter::new());
    let end = run_match(&mut engine, dice, input.as_mut(), output.as_mut())?;

    match end {
        MatchEnd::Completed { outcome, scores } => {
            info!(%outcome, user = scores.user, opponent = scores.opponent, "Match finished");
        }
        MatchEnd::Aborted { round } => info!(?round, "Match abandoned"),
    }
    Ok(())
}
