//! Pipeline composition and execution for document-feature matrices.

mod runner;

pub use runner::{Pipeline, PipelineConfig, PipelineOutput, PipelineStep};
