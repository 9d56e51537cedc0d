//! Visibility expressions for access-controlled data.
//!
//! A visibility expression is a boolean label such as `(admin&audit)|ops`
//! attached to a stored element. The crate parses labels into validated
//! trees, wraps them in an immutable [`Visibility`] value and evaluates them
//! against a caller's [`Authorisations`].
//!
//! ```
//! use visibility_expr::{Authorisations, Visibility, VisibilityEvaluator};
//!
//! let label = Visibility::new("(admin&audit)|ops")?;
//! let auths = Authorisations::new(["admin", "audit"])?;
//! assert!(VisibilityEvaluator::new(&auths).evaluate(&label));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod authorisations;
mod charset;
mod errors;
mod evaluator;
mod node;
mod parser;
mod visibility;

pub use authorisations::Authorisations;
pub use charset::{AuthCharPredicate, is_valid_auth_char, quote, quote_with};
pub use errors::{AuthorisationError, SyntaxErrorInfo, SyntaxErrorKind, VisibilityError};
pub use evaluator::VisibilityEvaluator;
pub use node::{Node, NodeType, Terms};
pub use parser::{ParserOptions, parse_expression, parse_expression_with};
pub use visibility::Visibility;
