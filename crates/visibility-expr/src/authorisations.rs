//! The set of authorisation tokens held by a caller.

use std::collections::BTreeSet;
use std::fmt;

use crate::errors::AuthorisationError;

/// Immutable set of authorisation tokens.
///
/// Tokens are opaque byte strings; duplicates collapse and empty tokens are
/// rejected.
///
/// # Examples
/// ```
/// use visibility_expr::Authorisations;
/// let auths = Authorisations::new(["admin", "ops", "admin"])?;
/// assert_eq!(auths.len(), 2);
/// assert!(auths.contains(b"ops"));
/// # Ok::<(), visibility_expr::AuthorisationError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Authorisations {
    tokens: BTreeSet<Vec<u8>>,
}

impl Authorisations {
    /// Build a set from any sequence of tokens.
    ///
    /// # Errors
    /// Returns [`AuthorisationError::EmptyToken`] if a token has no bytes.
    pub fn new<I, T>(tokens: I) -> Result<Self, AuthorisationError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut set = BTreeSet::new();
        for (index, token) in tokens.into_iter().enumerate() {
            let token = token.as_ref();
            if token.is_empty() {
                return Err(AuthorisationError::EmptyToken { index });
            }
            set.insert(token.to_vec());
        }
        Ok(Self { tokens: set })
    }

    /// Build a set from a comma-separated list such as `admin,ops`.
    ///
    /// An empty string yields the empty set.
    ///
    /// # Errors
    /// Returns [`AuthorisationError::EmptyToken`] for empty list entries.
    pub fn from_comma_separated(list: &str) -> Result<Self, AuthorisationError> {
        if list.is_empty() {
            return Ok(Self::default());
        }
        Self::new(list.split(','))
    }

    /// Whether the set holds `token`.
    #[must_use]
    pub fn contains(&self, token: &[u8]) -> bool {
        self.tokens.contains(token)
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the set holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.tokens.iter().map(Vec::as_slice)
    }
}

impl fmt::Display for Authorisations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(&String::from_utf8_lossy(token))?;
        }
        Ok(())
    }
}
