pub mod config;
pub mod logging;
pub mod pipeline;
pub mod probe;

pub use config::AppConfig;
pub use pipeline::{Pipeline, RunSummary};
pub use probe::{RuntimeState, RuntimeStatus, probe_runtimes};
