use graph::EntitySet;
use regex::Regex;
use std::sync::OnceLock;

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static PUNCTUATION_RE: OnceLock<Regex> = OnceLock::new();
static COPULA_RE: OnceLock<Regex> = OnceLock::new();

fn whitespace_re() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

fn punctuation_re() -> &'static Regex {
    PUNCTUATION_RE.get_or_init(|| Regex::new(r#"[.,!?;:'"|]"#).expect("static regex is valid"))
}

fn copula_re() -> &'static Regex {
    COPULA_RE.get_or_init(|| Regex::new(r"^(?:is|are|was|were)\s+").expect("static regex is valid"))
}

/// Collapse whitespace runs (including line breaks) to one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    whitespace_re().replace_all(s, " ").trim().to_string()
}

/// Maps loosely matched text spans onto canonical entities.
///
/// Exact membership wins; otherwise the first entity, in lexicographic order,
/// where either lowercase string contains the other. Partial names such as
/// `"pandas library"` therefore land on `"Pandas"`, at the cost of false hits
/// on short spans.
pub struct EntityResolver<'a> {
    entities: &'a EntitySet,
    /// (lowercase form, canonical entity), in set order
    lowered: Vec<(String, &'a str)>,
}

impl<'a> EntityResolver<'a> {
    pub fn new(entities: &'a EntitySet) -> Self {
        let lowered = entities
            .iter()
            .filter(|e| !e.is_empty())
            .map(|e| (e.to_lowercase(), e.as_str()))
            .collect();
        Self { entities, lowered }
    }

    pub fn resolve(&self, span: &str) -> Option<&'a str> {
        if span.trim().is_empty() {
            return None;
        }

        if let Some(entity) = self.entities.get(span) {
            return Some(entity.as_str());
        }

        let needle = span.to_lowercase();
        self.lowered
            .iter()
            .find(|(lowered, _)| lowered.contains(&needle) || needle.contains(lowered.as_str()))
            .map(|(_, entity)| *entity)
    }
}

/// One-off resolution; build an [`EntityResolver`] when resolving many spans
/// against the same set.
pub fn resolve(span: &str, entities: &EntitySet) -> Option<String> {
    EntityResolver::new(entities).resolve(span).map(str::to_string)
}

/// Drop whole-word occurrences of `name` from a lowercased phrase; a name
/// inside a longer word ("rust" in "trusted") is left alone.
fn remove_name(phrase: &str, name: &str) -> String {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return phrase.to_string();
    }
    match Regex::new(&format!(r"(^|\W){}(\W|$)", regex::escape(&name))) {
        Ok(re) => re.replace_all(phrase, "${1} ${2}").into_owned(),
        Err(_) => phrase.to_string(),
    }
}

/// Turn a generated relation phrase into an edge label.
///
/// Phrases mentioning "none" or of three characters or fewer mean "no
/// relation". Otherwise the entity names, punctuation and a leading copula
/// are removed and the remaining words joined with `_`.
pub fn normalize_relation(phrase: &str, source: &str, target: &str) -> Option<String> {
    let phrase = phrase.trim().to_lowercase();
    if phrase.contains("none") || phrase.chars().count() <= 3 {
        return None;
    }

    let phrase = remove_name(&phrase, source);
    let phrase = remove_name(&phrase, target);
    let phrase = punctuation_re().replace_all(&phrase, " ");
    let phrase = collapse_whitespace(&phrase);
    let phrase = copula_re().replace(&phrase, "");

    let label = phrase.split_whitespace().collect::<Vec<_>>().join("_");
    if label.is_empty() { None } else { Some(label) }
}
