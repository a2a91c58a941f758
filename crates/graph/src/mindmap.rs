//! Rebuild flat `parent|relation|child` edges from the query engine's
//! indented mindmap rendering:
//!
//! ```text
//! MINDMAP:
//! AI
//!   -[enables]->
//!   Automation
//!     -[uses]->
//!     Robotics
//!   -[improves]->
//!   Search
//! ```
//!
//! A single pass keeps the path from the root as a stack of `(name, indent)`
//! frames. A relation marker reads the next node line, pops every frame that
//! is not shallower than that node, and links the node to whatever is left
//! on top.

use std::fmt::Write as _;
use std::iter::Peekable;

use tracing::warn;

use crate::error::{GraphError, Result};
use crate::schema::Triple;

pub const MINDMAP_HEADER: &str = "MINDMAP:";
pub const MINDMAP_DATA_HEADER: &str = "MINDMAP_DATA:";

const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    name: &'a str,
    indent: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// `-[relation]->`
    Relation(&'a str),
    Node { name: &'a str, indent: usize },
    /// Already flat `a|r|b`, as the engine prints for `--query mindmap`.
    Flat(Triple),
}

fn indent_of(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

fn relation_label(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix("-[")
        .and_then(|rest| rest.strip_suffix("]->"))
        .map(str::trim)
}

fn flat_edge(trimmed: &str) -> Option<Triple> {
    let fields: Vec<&str> = trimmed.split('|').map(str::trim).collect();
    match fields.as_slice() {
        [source, relation, target]
            if !source.is_empty() && !relation.is_empty() && !target.is_empty() =>
        {
            Some(Triple::new(*source, *relation, *target))
        }
        _ => None,
    }
}

fn classify(raw: &str) -> Option<Line<'_>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(label) = relation_label(trimmed) {
        return Some(Line::Relation(label));
    }
    if let Some(edge) = flat_edge(trimmed) {
        return Some(Line::Flat(edge));
    }
    Some(Line::Node {
        name: trimmed,
        indent: indent_of(raw),
    })
}

fn is_header(line: &str) -> bool {
    matches!(line.trim(), MINDMAP_HEADER | MINDMAP_DATA_HEADER)
}

/// Parse a mindmap rendering into edges, in traversal order.
pub fn parse_mindmap(text: &str) -> Result<Vec<Triple>> {
    let mut lines = text.lines().skip_while(|line| line.trim().is_empty());
    match lines.next() {
        Some(header) if is_header(header) => {}
        _ => return Err(GraphError::MissingHeader),
    }

    Ok(link_lines(lines.filter_map(classify).peekable()))
}

fn link_lines<'a, I>(mut body: Peekable<I>) -> Vec<Triple>
where
    I: Iterator<Item = Line<'a>>,
{
    let mut stack: Vec<Frame<'a>> = Vec::new();
    let mut edges = Vec::new();

    while let Some(line) = body.next() {
        match line {
            Line::Flat(edge) => edges.push(edge),
            Line::Node { name, indent } => stack.push(Frame { name, indent }),
            Line::Relation(relation) => {
                let Some(Line::Node { name, indent }) =
                    body.next_if(|next| matches!(next, Line::Node { .. }))
                else {
                    warn!(relation, "Relation marker is not followed by a node, dropping it");
                    continue;
                };

                while stack.last().is_some_and(|top| top.indent >= indent) {
                    stack.pop();
                }

                match stack.last() {
                    Some(parent) if !relation.is_empty() => {
                        edges.push(Triple::new(parent.name, relation, name));
                    }
                    Some(_) => warn!(child = name, "Empty relation label, edge dropped"),
                    None => warn!(child = name, "No parent at this depth, edge dropped"),
                }

                stack.push(Frame { name, indent });
            }
        }
    }

    edges
}

/// Render edges in the normalized flat form: `MINDMAP_DATA:` then one
/// `parent|relation|child` line per edge.
pub fn render_flat(edges: &[Triple]) -> String {
    let mut out = String::with_capacity(MINDMAP_DATA_HEADER.len() + 1 + edges.len() * 32);
    out.push_str(MINDMAP_DATA_HEADER);
    out.push('\n');
    for edge in edges {
        let _ = writeln!(out, "{edge}");
    }
    out
}

/// Hierarchical mindmap text in, normalized flat mindmap text out.
pub fn reconstruct(text: &str) -> Result<String> {
    Ok(render_flat(&parse_mindmap(text)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_edge() {
        let input = "MINDMAP:\nAI\n  -[enables]->\n  Automation\n";
        assert_eq!(
            reconstruct(input).unwrap(),
            "MINDMAP_DATA:\nAI|enables|Automation\n"
        );
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(reconstruct("MINDMAP_DATA:").unwrap(), "MINDMAP_DATA:\n");
        assert_eq!(reconstruct("MINDMAP:\n\n\n").unwrap(), "MINDMAP_DATA:\n");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            reconstruct("AI\n  -[enables]->\n  Automation"),
            Err(GraphError::MissingHeader)
        ));
        assert!(matches!(reconstruct(""), Err(GraphError::MissingHeader)));
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("    -[uses]->"), Some(Line::Relation("uses")));
        assert_eq!(
            classify("\tPython"),
            Some(Line::Node { name: "Python", indent: 4 })
        );
        assert_eq!(
            classify("A|uses|B"),
            Some(Line::Flat(Triple::new("A", "uses", "B")))
        );
        assert_eq!(classify("   "), None);
    }

    #[test]
    fn test_dangling_marker_is_dropped() {
        let input = "MINDMAP:\nAI\n  -[enables]->\n  -[uses]->\n  Robotics\n  -[improves]->";
        assert_eq!(
            parse_mindmap(input).unwrap(),
            vec![Triple::new("AI", "uses", "Robotics")]
        );
    }
}
