//! Parse tree produced by the visibility expression parser.
//!
//! Term nodes do not own any bytes. They record a half-open byte range into
//! the expression they were parsed from, so every accessor that yields term
//! content takes that expression as an argument.

use std::borrow::Cow;
use std::ops::Range;

use crate::charset::{AuthCharPredicate, quote_with, unescape};

/// Node of a parsed visibility expression.
///
/// Boolean nodes always hold at least two children and never directly
/// contain a child of their own operator type.
///
/// # Examples
/// ```
/// use visibility_expr::{Node, Visibility};
/// let vis = Visibility::new("A&B&C")?;
/// let Node::And(children) = vis.parse_tree() else {
///     panic!("expected a conjunction");
/// };
/// assert_eq!(children.len(), 3);
/// # Ok::<(), visibility_expr::VisibilityError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// The empty expression. Admits every caller.
    Empty,
    /// A single, possibly quoted, authorisation token.
    Term {
        /// Offset of the first byte of the term, including any opening quote.
        start: usize,
        /// Offset one past the last byte of the term, including any closing quote.
        end: usize,
    },
    /// Conjunction of two or more sub-expressions.
    And(Vec<Node>),
    /// Disjunction of two or more sub-expressions.
    Or(Vec<Node>),
}

/// Discriminant of a [`Node`], ordered as normalisation sorts siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeType {
    /// See [`Node::Empty`].
    Empty,
    /// See [`Node::Term`].
    Term,
    /// See [`Node::Or`].
    Or,
    /// See [`Node::And`].
    And,
}

impl Node {
    /// Sentinel tree of the empty expression.
    pub const EMPTY: Self = Self::Empty;

    /// Discriminant of this node.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Empty => NodeType::Empty,
            Self::Term { .. } => NodeType::Term,
            Self::And(_) => NodeType::And,
            Self::Or(_) => NodeType::Or,
        }
    }

    /// Children of a boolean node; empty for terms and the empty node.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::And(children) | Self::Or(children) => children,
            Self::Empty | Self::Term { .. } => &[],
        }
    }

    /// Byte range of a term within its expression, quotes included.
    #[must_use]
    pub const fn term_range(&self) -> Option<Range<usize>> {
        match self {
            Self::Term { start, end } => Some(*start..*end),
            _ => None,
        }
    }

    /// Whether this node is a term written in double quotes.
    #[must_use]
    pub fn is_quoted(&self, expression: &[u8]) -> bool {
        match self {
            Self::Term { start, .. } => expression.get(*start) == Some(&b'"'),
            _ => false,
        }
    }

    /// Effective value of a term: the raw span for unquoted terms, the
    /// unescaped body for quoted ones.
    ///
    /// Returns `None` for non-term nodes or when the range does not fit the
    /// supplied expression.
    ///
    /// # Examples
    /// ```
    /// use visibility_expr::Visibility;
    /// let vis = Visibility::new(r#""A\"B""#)?;
    /// let term = vis.parse_tree().term(vis.expression());
    /// assert_eq!(term.as_deref(), Some(&b"A\"B"[..]));
    /// # Ok::<(), visibility_expr::VisibilityError>(())
    /// ```
    #[must_use]
    pub fn term<'a>(&self, expression: &'a [u8]) -> Option<Cow<'a, [u8]>> {
        let Self::Term { start, end } = *self else {
            return None;
        };
        if self.is_quoted(expression) {
            let body = expression.get(start.saturating_add(1)..end.saturating_sub(1))?;
            Some(unescape(body))
        } else {
            expression.get(start..end).map(Cow::Borrowed)
        }
    }

    /// Depth-first iterator over the effective values of every term.
    #[must_use]
    pub fn terms<'n, 'a>(&'n self, expression: &'a [u8]) -> Terms<'n, 'a> {
        Terms {
            stack: vec![self],
            expression,
        }
    }

    /// Render the canonical form of this tree.
    ///
    /// Siblings are sorted and deduplicated, same-operator groups are merged
    /// and terms are re-quoted with `is_valid`, so the output always parses
    /// back under the same character set.
    #[must_use]
    pub fn normalise(&self, expression: &[u8], is_valid: AuthCharPredicate) -> Vec<u8> {
        let mut out = Vec::with_capacity(expression.len());
        if let Some(canonical) = Canonical::from_node(self, expression) {
            canonical.render(&mut out, is_valid, false);
        }
        out
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Iterator returned by [`Node::terms`].
#[derive(Debug)]
pub struct Terms<'n, 'a> {
    stack: Vec<&'n Node>,
    expression: &'a [u8],
}

impl<'a> Iterator for Terms<'_, 'a> {
    type Item = Cow<'a, [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Empty => {}
                Node::Term { .. } => {
                    if let Some(term) = node.term(self.expression) {
                        return Some(term);
                    }
                }
                Node::And(children) | Node::Or(children) => {
                    self.stack.extend(children.iter().rev());
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Canonical<'a> {
    Term(Cow<'a, [u8]>),
    Or(Vec<Canonical<'a>>),
    And(Vec<Canonical<'a>>),
}

impl<'a> Canonical<'a> {
    fn from_node(node: &Node, expression: &'a [u8]) -> Option<Self> {
        match node {
            Node::Empty => None,
            Node::Term { .. } => node.term(expression).map(Self::Term),
            Node::And(children) => Self::group(children, expression, NodeType::And),
            Node::Or(children) => Self::group(children, expression, NodeType::Or),
        }
    }

    fn group(children: &[Node], expression: &'a [u8], op: NodeType) -> Option<Self> {
        let mut merged = Vec::with_capacity(children.len());
        for child in children.iter().filter_map(|c| Self::from_node(c, expression)) {
            match (op, child) {
                (NodeType::And, Self::And(inner)) | (NodeType::Or, Self::Or(inner)) => {
                    merged.extend(inner);
                }
                (_, other) => merged.push(other),
            }
        }
        merged.sort();
        merged.dedup();
        if merged.len() < 2 {
            return merged.pop();
        }
        Some(if op == NodeType::And {
            Self::And(merged)
        } else {
            Self::Or(merged)
        })
    }

    fn render(&self, out: &mut Vec<u8>, is_valid: AuthCharPredicate, nested: bool) {
        let (children, op) = match self {
            Self::Term(term) => {
                out.extend_from_slice(&quote_with(term, is_valid));
                return;
            }
            Self::And(children) => (children, b'&'),
            Self::Or(children) => (children, b'|'),
        };
        if nested {
            out.push(b'(');
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push(op);
            }
            child.render(out, is_valid, true);
        }
        if nested {
            out.push(b')');
        }
    }
}
