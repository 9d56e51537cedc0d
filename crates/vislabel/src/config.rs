//! CLI configuration parsed from environment variables.
//!
//! Every setting can be overridden via environment variables prefixed with
//! `VISLABEL_`; command line flags take precedence over both.

use std::env;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;
use visibility_expr::ParserOptions;

use crate::error::CliError;

/// Verbosity of diagnostics written to stderr.
///
/// Defaults to `Warn` so diagnostics do not drown the command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Every event, including per-label evaluation traces.
    Trace,
    /// Parser rejections and command summaries.
    Debug,
    /// Evaluation decisions.
    Info,
    /// Only problems worth a user's attention.
    #[default]
    Warn,
    /// Only failed commands.
    Error,
}

impl LogLevel {
    const NAMES: [(&'static str, Self); 6] = [
        ("trace", Self::Trace),
        ("debug", Self::Debug),
        ("info", Self::Info),
        ("warn", Self::Warn),
        ("warning", Self::Warn),
        ("error", Self::Error),
    ];

    /// Maximum tracing level this setting lets through.
    #[must_use]
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, level)| level)
            .ok_or_else(|| {
                CliError::InvalidConfig(format!(
                    "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
                ))
            })
    }
}

/// Configuration for the `vislabel` command.
///
/// # Environment Variables
///
/// - `VISLABEL_LOG_LEVEL`: Sets the log level (trace, debug, info, warn,
///   error)
/// - `VISLABEL_MAX_DEPTH`: Maximum parenthesis nesting accepted in labels
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
    /// Maximum parenthesis nesting depth.
    pub max_depth: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            max_depth: ParserOptions::DEFAULT_MAX_DEPTH,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Falls back to defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if an environment variable contains
    /// an invalid value.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a variable contains an invalid
    /// value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = match lookup("VISLABEL_LOG_LEVEL") {
            Some(val) => val.parse()?,
            None => LogLevel::default(),
        };

        let max_depth = match lookup("VISLABEL_MAX_DEPTH") {
            Some(val) => val.parse().map_err(|_| {
                CliError::InvalidConfig(format!(
                    "invalid max depth '{val}', expected a non-negative integer"
                ))
            })?,
            None => ParserOptions::DEFAULT_MAX_DEPTH,
        };

        Ok(Self {
            log_level,
            max_depth,
        })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for CLI overrides that should take precedence over
    /// environment-based defaults.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>, max_depth: Option<usize>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }

        if let Some(depth) = max_depth {
            self.max_depth = depth;
        }

        self
    }

    /// Parser options derived from this configuration.
    #[must_use]
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions::new().with_max_depth(self.max_depth)
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("trace", LogLevel::Trace)]
    #[case("debug", LogLevel::Debug)]
    #[case("INFO", LogLevel::Info)]
    #[case("warning", LogLevel::Warn)]
    #[case("Error", LogLevel::Error)]
    fn log_level_parses_valid_values(#[case] input: &str, #[case] expected: LogLevel) {
        assert_eq!(input.parse::<LogLevel>().ok(), Some(expected));
    }

    #[test]
    fn log_level_rejects_invalid_values() {
        let result = "loud".parse::<LogLevel>();
        assert!(result.unwrap_err().to_string().contains("unknown log level"));
    }

    #[test]
    fn log_levels_map_to_tracing_filters() {
        assert_eq!(LogLevel::Trace.level_filter(), LevelFilter::TRACE);
        assert_eq!(LogLevel::default().level_filter(), LevelFilter::WARN);
        assert_eq!(LogLevel::Error.level_filter(), LevelFilter::ERROR);
    }

    #[test]
    fn defaults_match_parser_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.max_depth, ParserOptions::DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn reads_values_from_lookup() {
        let config = CliConfig::from_lookup(|key| match key {
            "VISLABEL_LOG_LEVEL" => Some("debug".into()),
            "VISLABEL_MAX_DEPTH" => Some("8".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.parser_options().max_depth(), 8);
    }

    #[test]
    fn rejects_non_numeric_depth() {
        let err = CliConfig::from_lookup(|key| {
            (key == "VISLABEL_MAX_DEPTH").then(|| "deep".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("invalid max depth 'deep'"));
    }

    #[test]
    fn overrides_take_precedence() {
        let config = CliConfig::default().apply_overrides(Some(LogLevel::Error), Some(4));
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.max_depth, 4);

        let config = CliConfig::default().apply_overrides(None, None);
        assert_eq!(config.log_level, LogLevel::Warn);
    }
}
