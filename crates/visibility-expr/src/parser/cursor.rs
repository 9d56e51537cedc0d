//! Byte cursor shared by every nesting level of the parser.

use crate::errors::{SyntaxErrorInfo, SyntaxErrorKind, VisibilityError, syntax_error};

/// Read position and open-parenthesis depth over one expression.
///
/// The cursor only moves forward; the parser never backtracks.
#[derive(Debug)]
pub(crate) struct Cursor<'e> {
    expression: &'e [u8],
    index: usize,
    depth: usize,
}

impl<'e> Cursor<'e> {
    pub(crate) const fn new(expression: &'e [u8]) -> Self {
        Self {
            expression,
            index: 0,
            depth: 0,
        }
    }

    /// Offset of the next unread byte.
    pub(crate) const fn index(&self) -> usize {
        self.index
    }

    pub(crate) const fn depth(&self) -> usize {
        self.depth
    }

    /// Consume the next byte, returning it with its offset.
    pub(crate) fn bump(&mut self) -> Option<(usize, u8)> {
        let byte = *self.expression.get(self.index)?;
        let at = self.index;
        self.index += 1;
        Some((at, byte))
    }

    pub(crate) fn open_group(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    pub(crate) fn close_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn error(&self, kind: SyntaxErrorKind, position: usize) -> VisibilityError {
        syntax_error(kind, self.expression, position)
    }

    pub(crate) fn error_with_message(
        &self,
        kind: SyntaxErrorKind,
        message: &'static str,
        position: usize,
    ) -> VisibilityError {
        VisibilityError::Syntax(SyntaxErrorInfo::with_message(
            kind,
            message,
            self.expression,
            position,
        ))
    }
}
