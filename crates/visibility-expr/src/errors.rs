//! Error types shared by the parser, visibility and authorisation modules.

use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Classification of a visibility expression syntax error.
///
/// # Examples
/// ```
/// use visibility_expr::SyntaxErrorKind;
/// assert_eq!(SyntaxErrorKind::MixedOperators.message(), "cannot mix & and |");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// Opening and closing parentheses do not balance, or nesting is too deep.
    MismatchedParenthesis,
    /// `&` and `|` appear at the same nesting level without grouping.
    MixedOperators,
    /// An operator, parenthesis or end of input was found where a term was expected.
    EmptyTerm,
    /// Two terms are adjacent with no operator between them.
    MissingOperator,
    /// A quoted term is never closed.
    UnclosedQuote,
    /// A backslash inside quotes escapes something other than `\` or `"`.
    InvalidEscape,
    /// A byte outside the authorisation character set appears outside quotes.
    InvalidCharacter,
    /// A boolean node ended up with fewer than two children.
    ///
    /// Every operator is preceded by a checked sub-term and followed by one
    /// checked at the next operator or group end, so well-formed parsing
    /// never yields this kind. It guards the two-children invariant of
    /// [`Node::And`](crate::Node::And) and [`Node::Or`](crate::Node::Or).
    MissingTerm,
}

impl SyntaxErrorKind {
    /// Default human-readable description of the error kind.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MismatchedParenthesis => "parenthesis mismatch",
            Self::MixedOperators => "cannot mix & and |",
            Self::EmptyTerm => "empty term",
            Self::MissingOperator => "expression needs & or |",
            Self::UnclosedQuote => "unclosed quote",
            Self::InvalidEscape => "invalid escaping within quotes",
            Self::InvalidCharacter => "invalid character",
            Self::MissingTerm => "missing term",
        }
    }
}

/// Location and context of a syntax error.
///
/// The info keeps the full source expression so callers can point at the
/// offending byte when reporting the failure.
///
/// # Examples
/// ```
/// use visibility_expr::{SyntaxErrorInfo, SyntaxErrorKind};
/// let info = SyntaxErrorInfo::new(SyntaxErrorKind::EmptyTerm, b"A&&B", 2);
/// assert_eq!(info.position, 2);
/// assert_eq!(info.expression_text(), "A&&B");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Classification of the failure.
    pub kind: SyntaxErrorKind,
    /// Human-readable reason.
    pub message: &'static str,
    /// The complete expression that failed to parse.
    pub expression: Vec<u8>,
    /// Zero-based byte offset at which the problem was detected.
    pub position: usize,
}

impl SyntaxErrorInfo {
    /// Create an error description using the kind's default message.
    #[must_use]
    pub fn new(kind: SyntaxErrorKind, expression: &[u8], position: usize) -> Self {
        Self::with_message(kind, kind.message(), expression, position)
    }

    /// Create an error description with a message more specific than the
    /// kind's default.
    #[must_use]
    pub fn with_message(
        kind: SyntaxErrorKind,
        message: &'static str,
        expression: &[u8],
        position: usize,
    ) -> Self {
        Self {
            kind,
            message,
            expression: expression.to_vec(),
            position,
        }
    }

    /// The source expression as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn expression_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.expression)
    }

    /// The byte at the reported position, if the position lies inside the
    /// expression.
    #[must_use]
    pub fn offending_byte(&self) -> Option<u8> {
        self.expression.get(self.position).copied()
    }
}

impl fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.offending_byte()) {
            (SyntaxErrorKind::InvalidCharacter, Some(byte)) => write!(
                f,
                "{} (0x{byte:02x}) at byte {} (zero-based) in [{}]",
                self.message,
                self.position,
                self.expression_text()
            ),
            _ => write!(
                f,
                "{} at byte {} (zero-based) in [{}]",
                self.message,
                self.position,
                self.expression_text()
            ),
        }
    }
}

/// Errors surfaced while constructing a visibility expression.
///
/// # Examples
/// ```
/// use visibility_expr::{SyntaxErrorInfo, SyntaxErrorKind, VisibilityError};
/// let info = SyntaxErrorInfo::new(SyntaxErrorKind::UnclosedQuote, b"\"ABC", 0);
/// let err = VisibilityError::Syntax(info.clone());
/// assert_eq!(err.to_string(), info.to_string());
/// assert_eq!(err.kind(), SyntaxErrorKind::UnclosedQuote);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisibilityError {
    /// The expression is not well formed.
    #[error("{0}")]
    Syntax(SyntaxErrorInfo),
}

impl VisibilityError {
    /// Kind of the underlying syntax error.
    #[must_use]
    pub fn kind(&self) -> SyntaxErrorKind {
        match self {
            Self::Syntax(info) => info.kind,
        }
    }

    /// Byte offset at which the problem was detected.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::Syntax(info) => info.position,
        }
    }
}

/// Errors surfaced while building an authorisation set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorisationError {
    /// A token with no bytes was supplied.
    #[error("empty authorisation token at index {index}")]
    EmptyToken {
        /// Position of the token in the supplied sequence.
        index: usize,
    },
}

pub(crate) fn syntax_error(
    kind: SyntaxErrorKind,
    expression: &[u8],
    position: usize,
) -> VisibilityError {
    VisibilityError::Syntax(SyntaxErrorInfo::new(kind, expression, position))
}
