//! The flat Graph Document: sorted `NODE:` lines followed by `EDGE:` lines.
//!
//! This is the wire contract with the query engine, which reads it line by
//! line and splits edges on the first two `|` characters. No escaping exists,
//! so anything containing `|` or a line break is refused on the way out.

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use tracing::warn;

use crate::error::{GraphError, Result};
use crate::schema::{EntitySet, Triple};

pub const NODE_PREFIX: &str = "NODE:";
pub const EDGE_PREFIX: &str = "EDGE:";

/// True when `value` can be written as a node name or edge field without
/// corrupting the line format.
pub fn is_wire_safe(value: &str) -> bool {
    !value.is_empty() && value.trim() == value && !value.contains(['|', '\n', '\r'])
}

fn triple_is_wire_safe(triple: &Triple) -> bool {
    is_wire_safe(&triple.source) && is_wire_safe(&triple.relation) && is_wire_safe(&triple.target)
}

/// In-memory form of a Graph Document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphDocument {
    nodes: BTreeSet<String>,
    edges: BTreeSet<Triple>,
}

impl GraphDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from one extraction run: triples collapse as exact
    /// tuples, self-loops are dropped, and values that would break the line
    /// format are skipped with a warning.
    pub fn from_extraction<I>(entities: &EntitySet, triples: I) -> Self
    where
        I: IntoIterator<Item = Triple>,
    {
        let mut document = Self::new();

        for entity in entities {
            if is_wire_safe(entity) {
                document.nodes.insert(entity.clone());
            } else {
                warn!(entity = %entity.escape_debug(), "Skipping node that cannot be serialized");
            }
        }

        for triple in triples {
            if triple.is_self_loop() {
                continue;
            }
            if !triple_is_wire_safe(&triple) {
                let rendered = triple.to_string();
                warn!(edge = %rendered.escape_debug(), "Skipping edge that cannot be serialized");
                continue;
            }
            document.edges.insert(triple);
        }

        document
    }

    pub fn nodes(&self) -> &BTreeSet<String> {
        &self.nodes
    }

    pub fn edges(&self) -> &BTreeSet<Triple> {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let _ = writeln!(out, "{NODE_PREFIX} {node}");
        }
        for edge in &self.edges {
            let _ = writeln!(out, "{EDGE_PREFIX} {edge}");
        }
        out
    }

    /// Parse a document, failing on the first `EDGE:` line that does not
    /// have three `|`-separated fields.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_lines(text, true)
    }

    /// Parse a document, skipping malformed edge lines. Used on documents
    /// that came from outside this crate (hosted backend output, files on
    /// disk).
    pub fn parse_lenient(text: &str) -> Self {
        // Only strict mode can fail.
        Self::parse_lines(text, false).unwrap_or_default()
    }

    fn parse_lines(text: &str, strict: bool) -> Result<Self> {
        let mut document = Self::new();

        for (idx, line) in text.lines().enumerate() {
            if let Some(rest) = line.strip_prefix(NODE_PREFIX) {
                let name = rest.trim();
                if !name.is_empty() {
                    document.nodes.insert(name.to_string());
                }
            } else if let Some(rest) = line.strip_prefix(EDGE_PREFIX) {
                match parse_edge(rest) {
                    Some(triple) => {
                        document.edges.insert(triple);
                    }
                    None if strict => {
                        return Err(GraphError::MalformedEdge {
                            line: idx + 1,
                            content: line.to_string(),
                        });
                    }
                    None => {}
                }
            }
        }

        Ok(document)
    }
}

/// Splits like the query engine: first field up to the first `|`, relation
/// up to the second, target is the rest.
fn parse_edge(rest: &str) -> Option<Triple> {
    let mut fields = rest.trim().splitn(3, '|');
    let source = fields.next()?.trim();
    let relation = fields.next()?.trim();
    let target = fields.next()?.trim();

    if source.is_empty() || relation.is_empty() || target.is_empty() {
        return None;
    }
    Some(Triple::new(source, relation, target))
}

impl fmt::Display for GraphDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Deduplicate `triples`, sort `entities`, and emit the Graph Document text.
pub fn serialize(entities: &EntitySet, triples: &[Triple]) -> String {
    GraphDocument::from_extraction(entities, triples.iter().cloned()).to_text()
}
