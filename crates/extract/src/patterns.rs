//! Deterministic relationship extraction from fixed connective phrases.
//!
//! Each template captures a free-text span on either side of its connective.
//! Both spans must resolve to candidate entities for a triple to be emitted.
//! Overlapping templates may emit the same fact twice; the serializer
//! deduplicates.

use graph::{EntitySet, Triple};
use regex::Regex;
use std::sync::OnceLock;

use crate::normalizer::{EntityResolver, collapse_whitespace};

const SPAN: &str = r"(\w+(?:\s+\w+)*)";

/// `(relation, connective)` in the order they are tried. The longer copula
/// forms come before plain `is a`.
pub const TEMPLATES: [(&str, &str); 8] = [
    ("is_type_of", r"is\s+a\s+type\s+of"),
    ("is_subset_of", r"is\s+a\s+subset\s+of"),
    ("is_a", r"is\s+an?"),
    ("uses", r"uses"),
    ("prevents", r"prevents"),
    ("improves", r"improves"),
    ("enables", r"enables"),
    ("revolutionized", r"revolutionized"),
];

static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();

fn patterns() -> &'static [(&'static str, Regex)] {
    PATTERNS.get_or_init(|| {
        TEMPLATES
            .iter()
            .map(|(relation, connective)| {
                let re = Regex::new(&format!(r"(?i){SPAN}\s+{connective}\s+{SPAN}"))
                    .expect("static regex is valid");
                (*relation, re)
            })
            .collect()
    })
}

pub fn extract_relationships(text: &str, entities: &EntitySet) -> Vec<Triple> {
    let resolver = EntityResolver::new(entities);
    let mut triples = Vec::new();

    for (relation, re) in patterns() {
        for caps in re.captures_iter(text) {
            let source = collapse_whitespace(&caps[1]);
            let target = collapse_whitespace(&caps[2]);

            if let (Some(source), Some(target)) = (resolver.resolve(&source), resolver.resolve(&target)) {
                triples.push(Triple::new(source, *relation, target));
            }
        }
    }

    triples
}
