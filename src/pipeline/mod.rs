//! Processing pipeline components.

mod coordinator;
mod orchestrator;

pub use coordinator::collect_input_files;
pub use orchestrator::{Pipeline, UrlClassification};
