pub mod document;
pub mod error;
pub mod mindmap;
pub mod schema;

pub use document::{GraphDocument, is_wire_safe, serialize};
pub use error::{GraphError, Result};
pub use mindmap::{MINDMAP_DATA_HEADER, MINDMAP_HEADER, parse_mindmap, reconstruct, render_flat};
pub use schema::{EntitySet, Triple};
