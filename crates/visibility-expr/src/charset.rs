//! Authorisation character set and term quoting.
//!
//! Unquoted terms may only contain bytes accepted by an [`AuthCharPredicate`].
//! Anything else has to be written inside double quotes, which [`quote`] does
//! for arbitrary tokens.

use std::borrow::Cow;

/// Predicate deciding whether a byte may appear in an unquoted term.
pub type AuthCharPredicate = fn(u8) -> bool;

/// Default authorisation character set: ASCII letters, digits and `_-:./`.
///
/// # Examples
/// ```
/// use visibility_expr::is_valid_auth_char;
/// assert!(is_valid_auth_char(b'a'));
/// assert!(is_valid_auth_char(b':'));
/// assert!(!is_valid_auth_char(b'!'));
/// assert!(!is_valid_auth_char(b'&'));
/// ```
#[must_use]
pub const fn is_valid_auth_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b':' | b'.' | b'/')
}

/// Quote a token so that it can be embedded in a visibility expression.
///
/// Tokens made solely of valid authorisation characters are returned
/// unchanged. Otherwise the token is wrapped in double quotes with `\` and `"`
/// escaped.
///
/// # Examples
/// ```
/// use visibility_expr::quote;
/// assert_eq!(quote(b"ABC").as_ref(), b"ABC");
/// assert_eq!(quote(b"A&B").as_ref(), b"\"A&B\"");
/// assert_eq!(quote(br#"A"B"#).as_ref(), br#""A\"B""#);
/// ```
#[must_use]
pub fn quote(term: &[u8]) -> Cow<'_, [u8]> {
    quote_with(term, is_valid_auth_char)
}

/// Bytes the parser treats as syntax before consulting the character set.
const fn is_grammar_byte(byte: u8) -> bool {
    matches!(byte, b'&' | b'|' | b'(' | b')' | b'"' | b'\\')
}

/// Quote a token against a custom authorisation character predicate.
///
/// Operators, parentheses, quotes and backslashes always force quoting, even
/// when `is_valid` accepts them, so the result parses back to a single term.
///
/// # Examples
/// ```
/// use visibility_expr::quote_with;
/// let anything: fn(u8) -> bool = |_| true;
/// assert_eq!(quote_with(b"A B", anything).as_ref(), b"A B");
/// assert_eq!(quote_with(b"A&B", anything).as_ref(), b"\"A&B\"");
/// ```
#[must_use]
pub fn quote_with(term: &[u8], is_valid: AuthCharPredicate) -> Cow<'_, [u8]> {
    if !term.is_empty() && term.iter().all(|&b| !is_grammar_byte(b) && is_valid(b)) {
        return Cow::Borrowed(term);
    }
    let mut quoted = Vec::with_capacity(term.len().saturating_add(2));
    quoted.push(b'"');
    for &b in term {
        if matches!(b, b'"' | b'\\') {
            quoted.push(b'\\');
        }
        quoted.push(b);
    }
    quoted.push(b'"');
    Cow::Owned(quoted)
}

/// Remove the escapes from the body of a quoted term.
///
/// `body` is the content strictly between the quotes. It has already been
/// validated by the parser, so every backslash is followed by `\` or `"`.
pub(crate) fn unescape(body: &[u8]) -> Cow<'_, [u8]> {
    if !body.contains(&b'\\') {
        return Cow::Borrowed(body);
    }
    let mut out = Vec::with_capacity(body.len());
    let mut escaped = false;
    for &b in body {
        if b == b'\\' && !escaped {
            escaped = true;
            continue;
        }
        escaped = false;
        out.push(b);
    }
    Cow::Owned(out)
}
