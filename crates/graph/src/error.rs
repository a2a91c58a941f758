//! Errors raised while reading the graph text formats.

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("mindmap input must start with `MINDMAP:` or `MINDMAP_DATA:`")]
    MissingHeader,

    #[error("malformed edge on line {line}: {content:?}")]
    MalformedEdge { line: usize, content: String },
}
