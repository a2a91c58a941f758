use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Candidate entities for one document.
///
/// A `BTreeSet` iterates lexicographically, so everything that walks the set
/// (fuzzy resolution, pair selection, `NODE:` output) is reproducible.
pub type EntitySet = BTreeSet<String>;

/// A directed `(source, relation, target)` fact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub source: String,
    pub relation: String,
    pub target: String,
}

impl Triple {
    pub fn new(
        source: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            relation: relation.into(),
            target: target.into(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Renders as `source|relation|target`, the field layout shared by `EDGE:`
/// lines and flat mindmap output.
impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.source, self.relation, self.target)
    }
}
