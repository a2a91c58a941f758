pub fn build_relation_prompt(source: &str, target: &str, context: &str) -> String {
    format!(
        "Describe the relationship between '{source}' and '{target}' in one short phrase. \
If no relationship, say 'none'.\n\nText: {context}"
    )
}

pub fn build_document_prompt(text: &str) -> String {
    format!(
        r#"Build a knowledge graph from the following text.

OUTPUT FORMAT:
NODE: <entity name>
EDGE: <source entity>|<relation>|<target entity>

RULES:
- One fact per line, nothing else: no markdown, no code blocks, no explanations
- List every NODE line first, then every EDGE line
- Every EDGE source and target must also appear as a NODE
- Relations are short lowercase verbs with underscores instead of spaces: "uses", "is_a", "is_type_of", "enables"
- Never use the "|" character inside an entity or relation
- Skip entities shorter than three characters

TEXT:
{text}

GRAPH:"#
    )
}
