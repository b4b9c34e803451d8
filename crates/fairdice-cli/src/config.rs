//! Runtime settings for the `fairdice` binary.
//!
//! Settings resolve in layers: built-in defaults, then `FAIRDICE_*`
//! environment variables, then command-line flags.

use crate::Cli;
use fairdice_core::dice::DEFAULT_TRIALS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TRIALS_ENV: &str = "FAIRDICE_TRIALS";
pub const JSON_ENV: &str = "FAIRDICE_JSON";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not valid: {expected}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Monte Carlo samples per die pair in the probability table
    pub trials: u32,
    /// Transcript as JSON lines instead of text
    pub json: bool,
    /// Debug-level logging
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            json: false,
            verbose: false,
        }
    }
}

impl CliConfig {
    /// Resolve against the process environment and the parsed flags
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self::default()
            .with_env(|var| std::env::var(var).ok())?
            .with_flags(cli))
    }

    /// Apply environment overrides; `lookup` returns a variable's value if set
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(TRIALS_ENV) {
            self.trials = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: TRIALS_ENV,
                value: value.clone(),
                expected: "a whole number of samples",
            })?;
        }
        if let Some(value) = lookup(JSON_ENV) {
            self.json = parse_switch(&value).ok_or_else(|| ConfigError::InvalidEnv {
                var: JSON_ENV,
                value: value.clone(),
                expected: "one of 1, 0, true, false, yes, no, on, off",
            })?;
        }
        Ok(self)
    }

    /// Apply flags given on the command line. Absent flags keep the lower layers.
    pub fn with_flags(mut self, cli: &Cli) -> Self {
        if let Some(trials) = cli.trials {
            self.trials = trials;
        }
        if cli.json {
            self.json = true;
        }
        if cli.verbose {
            self.verbose = true;
        }
        self
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.trials, 100_000);
        assert!(!config.json);
        assert!(!config.verbose);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = CliConfig::default()
            .with_env(env(&[(TRIALS_ENV, "2500"), (JSON_ENV, "1")]))
            .unwrap();

        assert_eq!(config.trials, 2500);
        assert!(config.json);
    }

    #[test]
    fn test_env_switch_spellings() {
        for (value, expected) in [("TRUE", true), ("yes", true), ("off", false), ("0", false)] {
            let config = CliConfig::default().with_env(env(&[(JSON_ENV, value)])).unwrap();
            assert_eq!(config.json, expected, "{}", value);
        }
    }

    #[test]
    fn test_invalid_env_is_reported() {
        let err = CliConfig::default()
            .with_env(env(&[(TRIALS_ENV, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: TRIALS_ENV, .. }));

        let err = CliConfig::default()
            .with_env(env(&[(JSON_ENV, "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("FAIRDICE_JSON"));
    }

    #[test]
    fn test_flags_override_env() {
        let cli = Cli::parse_from(["fairdice", "--trials", "500", "--verbose", "1,2,3,4,5,6"]);
        let config = CliConfig::default()
            .with_env(env(&[(TRIALS_ENV, "2500"), (JSON_ENV, "true")]))
            .unwrap()
            .with_flags(&cli);

        assert_eq!(config.trials, 500);
        assert!(config.json);
        assert!(config.verbose);
        assert_eq!(cli.dice, vec!["1,2,3,4,5,6".to_string()]);
    }

    #[test]
    fn test_resolve_reads_process_environment() {
        // The only test touching the real FAIRDICE_TRIALS variable
        std::env::set_var(TRIALS_ENV, "1234");
        let resolved = CliConfig::resolve(&Cli::parse_from(["fairdice"]));
        std::env::remove_var(TRIALS_ENV);

        assert_eq!(resolved.unwrap().trials, 1234);
    }
}
