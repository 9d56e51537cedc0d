//! Immutable visibility label binding raw bytes to their parse tree.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::errors::VisibilityError;
use crate::node::{Node, Terms};
use crate::parser::{ParserOptions, parse_expression_with};

/// A validated visibility expression.
///
/// Equality and hashing consider only the raw expression bytes, so two
/// labels with equivalent trees but different spellings are distinct values.
///
/// # Examples
/// ```
/// use visibility_expr::Visibility;
/// let grouped = Visibility::new("(A&B)")?;
/// let plain = Visibility::new("A&B")?;
/// assert_ne!(grouped, plain);
/// assert_eq!(plain.to_string(), "[A&B]");
/// # Ok::<(), visibility_expr::VisibilityError>(())
/// ```
#[derive(Clone, Default)]
pub struct Visibility {
    expression: Box<[u8]>,
    tree: Node,
}

impl Visibility {
    /// Parse an expression given as text or bytes.
    ///
    /// Text is taken as its UTF-8 encoding, so a string and its encoded bytes
    /// produce identical values.
    ///
    /// # Errors
    /// Returns [`VisibilityError`] when the expression is not well formed.
    pub fn new(expression: impl Into<Vec<u8>>) -> Result<Self, VisibilityError> {
        Self::with_options(expression, &ParserOptions::default())
    }

    /// Parse an expression with custom [`ParserOptions`].
    ///
    /// # Errors
    /// Returns [`VisibilityError`] when the expression is not well formed.
    pub fn with_options(
        expression: impl Into<Vec<u8>>,
        options: &ParserOptions,
    ) -> Result<Self, VisibilityError> {
        let expression = expression.into().into_boxed_slice();
        let tree = parse_expression_with(&expression, options)?;
        Ok(Self { expression, tree })
    }

    /// The label with no expression, admitting every caller.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The raw expression exactly as supplied.
    #[must_use]
    pub fn expression(&self) -> &[u8] {
        &self.expression
    }

    /// The validated parse tree.
    #[must_use]
    pub fn parse_tree(&self) -> &Node {
        &self.tree
    }

    /// Whether the expression is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }

    /// Effective values of every term, in source order.
    #[must_use]
    pub fn terms(&self) -> Terms<'_, '_> {
        self.tree.terms(&self.expression)
    }

    /// The canonical spelling of this label, using the default options.
    ///
    /// # Errors
    /// Returns [`VisibilityError`] if the normalised expression fails to
    /// parse, which indicates a bug in normalisation.
    ///
    /// # Examples
    /// ```
    /// use visibility_expr::Visibility;
    /// let vis = Visibility::new("(C|B)&A&A")?;
    /// assert_eq!(vis.normalised()?.expression(), b"A&(B|C)");
    /// # Ok::<(), visibility_expr::VisibilityError>(())
    /// ```
    pub fn normalised(&self) -> Result<Self, VisibilityError> {
        self.normalised_with(&ParserOptions::default())
    }

    /// The canonical spelling of this label under custom options.
    ///
    /// # Errors
    /// Returns [`VisibilityError`] if the normalised expression fails to
    /// parse under `options`.
    pub fn normalised_with(&self, options: &ParserOptions) -> Result<Self, VisibilityError> {
        Self::with_options(
            self.tree.normalise(&self.expression, options.charset()),
            options,
        )
    }
}

impl PartialEq for Visibility {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl Eq for Visibility {}

impl Hash for Visibility {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.expression.hash(state);
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", String::from_utf8_lossy(&self.expression))
    }
}

impl fmt::Debug for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Visibility")
            .field(&String::from_utf8_lossy(&self.expression))
            .finish()
    }
}

impl AsRef<[u8]> for Visibility {
    fn as_ref(&self) -> &[u8] {
        &self.expression
    }
}

impl FromStr for Visibility {
    type Err = VisibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Visibility {
    type Error = VisibilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Visibility {
    type Error = VisibilityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&[u8]> for Visibility {
    type Error = VisibilityError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<Vec<u8>> for Visibility {
    type Error = VisibilityError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
