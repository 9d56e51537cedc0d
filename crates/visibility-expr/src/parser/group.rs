//! Per-nesting-level parser state.
//!
//! Each parenthesised group, and the top level of the expression, is parsed
//! by [`parse_group`]. The state it keeps mirrors the grammar directly: where
//! the group and the current sub-term started, whether the sub-term is a
//! finished quoted literal, a pending parenthesised expression and the
//! boolean node accumulated so far.

use crate::errors::{SyntaxErrorKind, VisibilityError};
use crate::node::Node;

use super::ParserOptions;
use super::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
}

impl Operator {
    const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'&' => Some(Self::And),
            b'|' => Some(Self::Or),
            _ => None,
        }
    }

    fn into_node(self, children: Vec<Node>) -> Node {
        match self {
            Self::And => Node::And(children),
            Self::Or => Node::Or(children),
        }
    }

    /// Append `child`, splicing its children in when it uses this operator.
    fn attach(self, children: &mut Vec<Node>, child: Node) {
        match (self, child) {
            (Self::And, Node::And(inner)) | (Self::Or, Node::Or(inner)) => children.extend(inner),
            (_, other) => children.push(other),
        }
    }
}

#[derive(Debug)]
struct Group {
    subterm_start: usize,
    subterm_complete: bool,
    expr: Option<Node>,
    result: Option<(Operator, Vec<Node>)>,
}

impl Group {
    const fn new(start: usize) -> Self {
        Self {
            subterm_start: start,
            subterm_complete: false,
            expr: None,
            result: None,
        }
    }

    fn reset_subterm(&mut self, start: usize) {
        self.subterm_start = start;
        self.subterm_complete = false;
    }

    /// Close the sub-term spanning `subterm_start..end`.
    ///
    /// A non-empty span becomes a term unless a parenthesised expression is
    /// already pending; an empty span yields the pending expression.
    fn take_subterm(&mut self, cursor: &Cursor<'_>, end: usize) -> Result<Node, VisibilityError> {
        let start = self.subterm_start;
        match (start == end, self.expr.take()) {
            (false, None) => Ok(Node::Term { start, end }),
            (false, Some(_)) => Err(cursor.error(SyntaxErrorKind::MissingOperator, start)),
            (true, Some(expr)) => Ok(expr),
            (true, None) => Err(cursor.error(SyntaxErrorKind::EmptyTerm, start)),
        }
    }

    fn quoted(&mut self, cursor: &mut Cursor<'_>, at: usize) -> Result<(), VisibilityError> {
        if self.subterm_start != at {
            return Err(cursor.error(SyntaxErrorKind::MissingOperator, at));
        }
        loop {
            match cursor.bump() {
                None => return Err(cursor.error(SyntaxErrorKind::UnclosedQuote, at)),
                Some((_, b'"')) => break,
                Some((escape_at, b'\\')) => match cursor.bump() {
                    Some((_, b'\\' | b'"')) => {}
                    Some(_) => {
                        return Err(cursor.error(SyntaxErrorKind::InvalidEscape, escape_at));
                    }
                    None => return Err(cursor.error(SyntaxErrorKind::UnclosedQuote, at)),
                },
                Some(_) => {}
            }
        }
        if cursor.index() == at + 2 {
            return Err(cursor.error(SyntaxErrorKind::EmptyTerm, at));
        }
        self.subterm_complete = true;
        Ok(())
    }

    fn operator(
        &mut self,
        cursor: &Cursor<'_>,
        op: Operator,
        at: usize,
    ) -> Result<(), VisibilityError> {
        let term = self.take_subterm(cursor, at)?;
        let (current, children) = self.result.get_or_insert_with(|| (op, Vec::new()));
        if *current != op {
            return Err(cursor.error(SyntaxErrorKind::MixedOperators, at));
        }
        op.attach(children, term);
        self.reset_subterm(cursor.index());
        Ok(())
    }

    fn plain(
        &self,
        cursor: &Cursor<'_>,
        options: &ParserOptions,
        at: usize,
        byte: u8,
    ) -> Result<(), VisibilityError> {
        if self.subterm_complete {
            return Err(cursor.error(SyntaxErrorKind::MissingOperator, at));
        }
        if !(options.charset())(byte) {
            return Err(cursor.error(SyntaxErrorKind::InvalidCharacter, at));
        }
        Ok(())
    }

    /// Finish the group at `end`, the offset of its closing parenthesis or
    /// the end of the expression.
    fn close(mut self, cursor: &Cursor<'_>, end: usize) -> Result<Node, VisibilityError> {
        let child = self.take_subterm(cursor, end)?;
        let Some((op, mut children)) = self.result else {
            return Ok(child);
        };
        op.attach(&mut children, child);
        if children.len() < 2 {
            return Err(cursor.error(SyntaxErrorKind::MissingTerm, end));
        }
        Ok(op.into_node(children))
    }
}

/// Parse one nesting level.
///
/// `open` is the offset of the parenthesis that opened this group, or `None`
/// at the top level. A nested group returns at its closing parenthesis; the
/// top level returns at the end of input.
pub(super) fn parse_group(
    cursor: &mut Cursor<'_>,
    options: &ParserOptions,
    open: Option<usize>,
) -> Result<Node, VisibilityError> {
    let mut group = Group::new(cursor.index());

    while let Some((at, byte)) = cursor.bump() {
        if let Some(op) = Operator::from_byte(byte) {
            group.operator(cursor, op, at)?;
            continue;
        }
        match byte {
            b'"' => group.quoted(cursor, at)?,
            b'(' => {
                if group.subterm_start != at || group.expr.is_some() {
                    return Err(cursor.error(SyntaxErrorKind::MissingOperator, at));
                }
                if cursor.depth() >= options.max_depth() {
                    return Err(cursor.error_with_message(
                        SyntaxErrorKind::MismatchedParenthesis,
                        "nesting depth limit exceeded",
                        at,
                    ));
                }
                cursor.open_group();
                let inner = parse_group(cursor, options, Some(at))?;
                group.expr = Some(inner);
                group.reset_subterm(cursor.index());
            }
            b')' => {
                if open.is_none() {
                    return Err(cursor.error(SyntaxErrorKind::MismatchedParenthesis, at));
                }
                cursor.close_group();
                return group.close(cursor, at);
            }
            _ => group.plain(cursor, options, at, byte)?,
        }
    }

    if let Some(open_at) = open {
        return Err(cursor.error(SyntaxErrorKind::MismatchedParenthesis, open_at));
    }
    group.close(cursor, cursor.index())
}
