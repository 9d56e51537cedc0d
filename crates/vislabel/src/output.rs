//! Helpers for rendering command output.

use std::borrow::Cow;
use std::io::Write;

use eyre::{Context, Result};
use serde::Serialize;
use visibility_expr::{Node, SyntaxErrorInfo, Visibility};

pub(crate) fn write_valid(writer: &mut dyn Write, vis: &Visibility) -> Result<()> {
    writeln!(writer, "ok {vis}").wrap_err_with(|| format!("failed to write result for {vis}"))?;
    write_tree(writer, vis.expression(), vis.parse_tree(), 1)
}

fn source_text<'a>(expression: &'a [u8], node: &Node) -> Cow<'a, str> {
    node.term_range()
        .and_then(|range| expression.get(range))
        .map_or(Cow::Borrowed(""), String::from_utf8_lossy)
}

pub(crate) fn write_tree(
    writer: &mut dyn Write,
    expression: &[u8],
    node: &Node,
    depth: usize,
) -> Result<()> {
    let indent = "  ".repeat(depth);
    let written = match node {
        Node::Empty => writeln!(writer, "{indent}empty"),
        Node::Term { .. } => writeln!(writer, "{indent}term {}", source_text(expression, node)),
        Node::And(_) => writeln!(writer, "{indent}and"),
        Node::Or(_) => writeln!(writer, "{indent}or"),
    };
    written.wrap_err("failed to write parse tree")?;
    for child in node.children() {
        write_tree(writer, expression, child, depth + 1)?;
    }
    Ok(())
}

/// Column of the offending byte once the expression is rendered as text.
fn caret_column(info: &SyntaxErrorInfo) -> usize {
    let prefix = info.expression.get(..info.position).unwrap_or(&info.expression);
    String::from_utf8_lossy(prefix).chars().count()
}

pub(crate) fn write_syntax_error(writer: &mut dyn Write, info: &SyntaxErrorInfo) -> Result<()> {
    writeln!(
        writer,
        "error: {info}\n  {}\n  {}^",
        info.expression_text(),
        " ".repeat(caret_column(info))
    )
    .wrap_err("failed to write syntax error")
}

pub(crate) fn write_line(writer: &mut dyn Write, line: &str) -> Result<()> {
    writeln!(writer, "{line}").wrap_err_with(|| format!("failed to write '{line}'"))
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum TreeReport {
    Empty,
    Term { value: String, quoted: bool },
    And { children: Vec<TreeReport> },
    Or { children: Vec<TreeReport> },
}

impl TreeReport {
    fn from_node(expression: &[u8], node: &Node) -> Self {
        let children = || {
            node.children()
                .iter()
                .map(|child| Self::from_node(expression, child))
                .collect()
        };
        match node {
            Node::Empty => Self::Empty,
            Node::Term { .. } => Self::Term {
                value: node
                    .term(expression)
                    .map(|term| String::from_utf8_lossy(&term).into_owned())
                    .unwrap_or_default(),
                quoted: node.is_quoted(expression),
            },
            Node::And(_) => Self::And {
                children: children(),
            },
            Node::Or(_) => Self::Or {
                children: children(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorReport {
    kind: String,
    message: &'static str,
    position: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct CheckReport {
    expression: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<TreeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport>,
}

impl From<&Visibility> for CheckReport {
    fn from(vis: &Visibility) -> Self {
        Self {
            expression: String::from_utf8_lossy(vis.expression()).into_owned(),
            valid: true,
            tree: Some(TreeReport::from_node(vis.expression(), vis.parse_tree())),
            error: None,
        }
    }
}

impl From<&SyntaxErrorInfo> for CheckReport {
    fn from(info: &SyntaxErrorInfo) -> Self {
        Self {
            expression: info.expression_text().into_owned(),
            valid: false,
            tree: None,
            error: Some(ErrorReport {
                kind: format!("{:?}", info.kind),
                message: info.message,
                position: info.position,
            }),
        }
    }
}

pub(crate) fn write_reports_json(writer: &mut dyn Write, reports: &[CheckReport]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, reports)
        .wrap_err("failed to serialise check reports")?;
    writeln!(writer).wrap_err("failed to terminate JSON output")
}
