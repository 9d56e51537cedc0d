//! Test helpers for asserting parser outcomes.
use super::parse_expression;
use crate::errors::VisibilityError;
use crate::node::Node;

pub(crate) fn parse_ok(expression: &str) -> Node {
    match parse_expression(expression.as_bytes()) {
        Ok(node) => node,
        Err(err) => panic!("expression should parse: {err}"),
    }
}

pub(crate) fn parse_err(expression: &str) -> VisibilityError {
    match parse_expression(expression.as_bytes()) {
        Ok(node) => panic!("expression should fail to parse, got {node:?}"),
        Err(err) => err,
    }
}
