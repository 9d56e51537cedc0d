//! Recursive-descent parser for visibility expressions.
//!
//! The grammar has two operators, `&` and `|`, with no precedence between
//! them: mixing both at one nesting level is rejected rather than resolved.
//! Terms are runs of authorisation characters or double-quoted literals in
//! which `\` escapes `\` and `"`. Parentheses group sub-expressions.

mod cursor;
mod group;
#[cfg(test)]
pub(crate) mod test_support;

use crate::charset::{AuthCharPredicate, is_valid_auth_char};
use crate::errors::VisibilityError;
use crate::node::Node;

use cursor::Cursor;
use group::parse_group;

/// Settings applied while parsing an expression.
///
/// # Examples
/// ```
/// use visibility_expr::{ParserOptions, SyntaxErrorKind, parse_expression_with};
/// let options = ParserOptions::default().with_max_depth(1);
/// assert!(parse_expression_with(b"(A|B)&C", &options).is_ok());
/// let err = parse_expression_with(b"((A|B)&C)", &options).unwrap_err();
/// assert_eq!(err.kind(), SyntaxErrorKind::MismatchedParenthesis);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    charset: AuthCharPredicate,
    max_depth: usize,
}

impl ParserOptions {
    /// Nesting depth accepted when no explicit limit is configured.
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    /// Options with the default character set and nesting limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            charset: is_valid_auth_char,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the predicate validating bytes of unquoted terms.
    #[must_use]
    pub const fn with_charset(mut self, charset: AuthCharPredicate) -> Self {
        self.charset = charset;
        self
    }

    /// Limit how deeply parentheses may nest.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Predicate validating bytes of unquoted terms.
    #[must_use]
    pub const fn charset(&self) -> AuthCharPredicate {
        self.charset
    }

    /// Maximum accepted parenthesis nesting depth.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an expression with the default [`ParserOptions`].
///
/// # Errors
/// Returns [`VisibilityError`] when the expression is not well formed.
///
/// # Examples
/// ```
/// use visibility_expr::{Node, parse_expression};
/// assert_eq!(parse_expression(b"")?, Node::Empty);
/// assert_eq!(parse_expression(b"A")?, Node::Term { start: 0, end: 1 });
/// # Ok::<(), visibility_expr::VisibilityError>(())
/// ```
pub fn parse_expression(expression: &[u8]) -> Result<Node, VisibilityError> {
    parse_expression_with(expression, &ParserOptions::default())
}

/// Parse an expression into a validated tree.
///
/// The empty expression yields [`Node::Empty`]. Otherwise the input is
/// consumed in a single forward pass; recursion depth equals parenthesis
/// nesting depth and is capped by [`ParserOptions::max_depth`].
///
/// # Errors
/// Returns [`VisibilityError`] when the expression is not well formed.
pub fn parse_expression_with(
    expression: &[u8],
    options: &ParserOptions,
) -> Result<Node, VisibilityError> {
    if expression.is_empty() {
        return Ok(Node::Empty);
    }
    let mut cursor = Cursor::new(expression);
    parse_group(&mut cursor, options, None).inspect_err(|err| {
        log::debug!("rejected visibility expression: {err}");
    })
}
