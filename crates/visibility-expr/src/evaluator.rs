//! Decide whether a set of authorisations may see a labelled element.
//!
//! An empty label admits everyone. A term admits when its effective value is
//! one of the caller's tokens; `&` requires every child to admit and `|` any
//! child.

use crate::authorisations::Authorisations;
use crate::node::Node;
use crate::visibility::Visibility;

/// Evaluates visibility labels against one caller's authorisations.
///
/// # Examples
/// ```
/// use visibility_expr::{Authorisations, Visibility, VisibilityEvaluator};
/// let auths = Authorisations::new(["C"])?;
/// let evaluator = VisibilityEvaluator::new(&auths);
/// assert!(evaluator.evaluate(&Visibility::new("(A&B)|C")?));
/// assert!(!evaluator.evaluate(&Visibility::new("A&C")?));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VisibilityEvaluator<'a> {
    auths: &'a Authorisations,
}

impl<'a> VisibilityEvaluator<'a> {
    /// Create an evaluator over `auths`.
    #[must_use]
    pub const fn new(auths: &'a Authorisations) -> Self {
        Self { auths }
    }

    /// Whether the caller may see an element carrying `visibility`.
    #[must_use]
    pub fn evaluate(&self, visibility: &Visibility) -> bool {
        let admitted = self.evaluate_node(visibility.expression(), visibility.parse_tree());
        log::trace!("{visibility} admitted={admitted} for [{}]", self.auths);
        admitted
    }

    /// Evaluate a tree parsed from `expression`.
    ///
    /// The tree must have been parsed from exactly these bytes; a term whose
    /// range falls outside `expression` never admits.
    #[must_use]
    pub fn evaluate_node(&self, expression: &[u8], node: &Node) -> bool {
        match node {
            Node::Empty => true,
            Node::Term { .. } => node
                .term(expression)
                .is_some_and(|term| self.auths.contains(&term)),
            Node::And(children) => children.iter().all(|c| self.evaluate_node(expression, c)),
            Node::Or(children) => children.iter().any(|c| self.evaluate_node(expression, c)),
        }
    }
}
