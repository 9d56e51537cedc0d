//! Error types for the `vislabel` command.

use thiserror::Error;
use visibility_expr::AuthorisationError;

/// Errors that stop a `vislabel` command before it produces a result.
///
/// Invalid labels are not errors here: commands report them on stdout and
/// finish with [`Outcome::Invalid`](crate::cli::Outcome::Invalid).
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The authorisation list was malformed.
    #[error("invalid authorisations: {0}")]
    Authorisation(#[from] AuthorisationError),
}
