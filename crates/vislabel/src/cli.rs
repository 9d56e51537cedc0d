//! Command dispatch for the `vislabel` entrypoint.

use std::io::Write;

use clap::{Args, Parser, Subcommand};
use eyre::{Context, Result};
use tracing::{debug, info};
use visibility_expr::{
    Authorisations, Visibility, VisibilityError, VisibilityEvaluator, quote_with,
};

use crate::config::{CliConfig, LogLevel};
use crate::error::CliError;
use crate::output::{
    CheckReport, write_line, write_reports_json, write_syntax_error, write_valid,
};

/// Validate, normalise and evaluate visibility labels.
#[derive(Parser, Debug)]
#[command(name = "vislabel", version, about)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
    /// Maximum parenthesis nesting accepted in labels.
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Supported commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate labels and print their parse trees.
    Check(CheckArgs),
    /// Decide whether a set of authorisations may see a label.
    Eval(EvalArgs),
    /// Print the canonical spelling of a label.
    Normalise {
        /// Label to normalise.
        expression: String,
    },
    /// Quote tokens so they can be embedded in a label.
    Quote {
        /// Tokens to quote.
        #[arg(required = true)]
        tokens: Vec<String>,
    },
}

/// Arguments for `vislabel check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Labels to validate.
    #[arg(required = true)]
    pub expressions: Vec<String>,
    /// Emit JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `vislabel eval`.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Label to evaluate.
    pub expression: String,
    /// Comma-separated authorisation tokens held by the caller.
    #[arg(long, default_value = "")]
    pub auths: String,
}

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every label was valid and, for `eval`, access was granted.
    Success,
    /// At least one label failed to parse.
    Invalid,
    /// The label was valid but the authorisations do not satisfy it.
    Denied,
}

impl Outcome {
    /// Process exit code reported for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Invalid => 1,
            Self::Denied => 3,
        }
    }
}

/// Run `command`, writing its output to `out`.
///
/// # Errors
///
/// Returns an error when the authorisation list is malformed or the output
/// cannot be written. Invalid labels are reported on `out` and surface as
/// [`Outcome::Invalid`] instead.
pub fn run(command: &Commands, config: &CliConfig, out: &mut dyn Write) -> Result<Outcome> {
    let outcome = match command {
        Commands::Check(args) => handle_check(args, config, out)?,
        Commands::Eval(args) => handle_eval(args, config, out)?,
        Commands::Normalise { expression } => handle_normalise(expression, config, out)?,
        Commands::Quote { tokens } => handle_quote(tokens, config, out)?,
    };
    out.flush().wrap_err("failed to flush command output")?;
    Ok(outcome)
}

fn parse(expression: &str, config: &CliConfig) -> Result<Visibility, VisibilityError> {
    Visibility::with_options(expression, &config.parser_options())
}

fn handle_check(args: &CheckArgs, config: &CliConfig, out: &mut dyn Write) -> Result<Outcome> {
    let results: Vec<_> = args
        .expressions
        .iter()
        .map(|expression| parse(expression, config))
        .collect();
    let invalid = results.iter().filter(|result| result.is_err()).count();
    debug!(total = results.len(), invalid, "checked labels");

    if args.json {
        let reports: Vec<_> = results
            .iter()
            .map(|result| match result {
                Ok(vis) => CheckReport::from(vis),
                Err(VisibilityError::Syntax(info)) => CheckReport::from(info),
            })
            .collect();
        write_reports_json(out, &reports)?;
    } else {
        for result in &results {
            match result {
                Ok(vis) => write_valid(out, vis)?,
                Err(VisibilityError::Syntax(info)) => write_syntax_error(out, info)?,
            }
        }
    }

    Ok(if invalid == 0 {
        Outcome::Success
    } else {
        Outcome::Invalid
    })
}

fn handle_eval(args: &EvalArgs, config: &CliConfig, out: &mut dyn Write) -> Result<Outcome> {
    let auths = Authorisations::from_comma_separated(&args.auths).map_err(CliError::from)?;
    let vis = match parse(&args.expression, config) {
        Ok(vis) => vis,
        Err(VisibilityError::Syntax(info)) => {
            write_syntax_error(out, &info)?;
            return Ok(Outcome::Invalid);
        }
    };
    let admitted = VisibilityEvaluator::new(&auths).evaluate(&vis);
    info!(label = %vis, auths = %auths, admitted, "evaluated label");
    if admitted {
        write_line(out, "admit")?;
        Ok(Outcome::Success)
    } else {
        write_line(out, "deny")?;
        Ok(Outcome::Denied)
    }
}

fn handle_normalise(expression: &str, config: &CliConfig, out: &mut dyn Write) -> Result<Outcome> {
    let options = config.parser_options();
    let normal = match parse(expression, config).and_then(|vis| vis.normalised_with(&options)) {
        Ok(normal) => normal,
        Err(VisibilityError::Syntax(info)) => {
            write_syntax_error(out, &info)?;
            return Ok(Outcome::Invalid);
        }
    };
    write_line(out, &String::from_utf8_lossy(normal.expression()))?;
    Ok(Outcome::Success)
}

fn handle_quote(tokens: &[String], config: &CliConfig, out: &mut dyn Write) -> Result<Outcome> {
    let charset = config.parser_options().charset();
    for token in tokens {
        let quoted = quote_with(token.as_bytes(), charset);
        write_line(out, &String::from_utf8_lossy(&quoted))?;
    }
    Ok(Outcome::Success)
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests assert command outcomes")]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run_to_string(command: &Commands, config: &CliConfig) -> (Outcome, String) {
        let mut buffer = Vec::new();
        let outcome = run(command, config, &mut buffer).expect("command runs");
        (outcome, String::from_utf8(buffer).expect("output is UTF-8"))
    }

    fn eval(expression: &str, auths: &str) -> Commands {
        Commands::Eval(EvalArgs {
            expression: expression.into(),
            auths: auths.into(),
        })
    }

    #[rstest]
    #[case::admitted_by_disjunct("(A&B)|C", "C", Outcome::Success, "admit\n")]
    #[case::partial_conjunction("(A&B)|C", "A", Outcome::Denied, "deny\n")]
    #[case::full_conjunction("(A&B)|C", "A,B", Outcome::Success, "admit\n")]
    #[case::empty_label("", "", Outcome::Success, "admit\n")]
    fn eval_reports_decision(
        #[case] expression: &str,
        #[case] auths: &str,
        #[case] expected: Outcome,
        #[case] text: &str,
    ) {
        let (outcome, output) = run_to_string(&eval(expression, auths), &CliConfig::default());
        assert_eq!(outcome, expected);
        assert_eq!(output, text);
    }

    #[test]
    fn eval_reports_syntax_errors() {
        let (outcome, output) = run_to_string(&eval("A|", "A"), &CliConfig::default());
        assert_eq!(outcome, Outcome::Invalid);
        assert!(output.starts_with("error: empty term at byte 2"));
    }

    #[test]
    fn eval_rejects_empty_authorisation_tokens() {
        let mut buffer = Vec::new();
        let err = run(&eval("A", "A,,B"), &CliConfig::default(), &mut buffer)
            .expect_err("empty token should be rejected");
        assert!(err.to_string().contains("empty authorisation token at index 1"));
    }

    #[test]
    fn check_flags_any_invalid_label() {
        let command = Commands::Check(CheckArgs {
            expressions: vec!["A&B".into(), "A&B|C".into()],
            json: false,
        });
        let (outcome, output) = run_to_string(&command, &CliConfig::default());
        assert_eq!(outcome, Outcome::Invalid);
        assert!(output.contains("ok [A&B]\n  and\n    term A\n    term B\n"));
        assert!(output.contains("error: cannot mix & and | at byte 3"));
    }

    #[test]
    fn check_honours_depth_limit() {
        let command = Commands::Check(CheckArgs {
            expressions: vec!["((A))".into()],
            json: true,
        });
        let config = CliConfig::default().apply_overrides(None, Some(1));
        let (outcome, output) = run_to_string(&command, &config);
        assert_eq!(outcome, Outcome::Invalid);
        assert!(output.contains("nesting depth limit exceeded"));
    }

    #[test]
    fn normalise_prints_canonical_form() {
        let command = Commands::Normalise {
            expression: "(C|B)&A&A".into(),
        };
        let (outcome, output) = run_to_string(&command, &CliConfig::default());
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(output, "A&(B|C)\n");
    }

    #[test]
    fn quote_wraps_only_when_needed() {
        let command = Commands::Quote {
            tokens: vec!["admin".into(), "team lead".into(), r#"a"b"#.into()],
        };
        let (_, output) = run_to_string(&command, &CliConfig::default());
        assert_eq!(output, "admin\n\"team lead\"\n\"a\\\"b\"\n");
    }

    #[rstest]
    #[case(Outcome::Success, 0)]
    #[case(Outcome::Invalid, 1)]
    #[case(Outcome::Denied, 3)]
    fn outcomes_map_to_exit_codes(#[case] outcome: Outcome, #[case] code: u8) {
        assert_eq!(outcome.exit_code(), code);
    }
}
