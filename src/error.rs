//! Error and warning types for the composable-dfm library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum DfmError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid count value '{value}' at row {row}, column {col}")]
    InvalidCount {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Duplicate {axis} label '{label}'")]
    DuplicateLabel { axis: String, label: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Pipeline step {step} ({name}) failed: {source}")]
    Pipeline {
        step: usize,
        name: String,
        #[source]
        source: Box<DfmError>,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, DfmError>;

/// Non-fatal conditions reported alongside a fully computed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DfmWarning {
    /// An argument was supplied that the operation does not use.
    UnusedArgument(String),
    /// A requested sample size was larger than the population and was clamped.
    SampleClamped { requested: usize, available: usize },
}

impl DfmWarning {
    /// Emit the warning through the `log` facade.
    pub(crate) fn log(&self) {
        log::warn!("{}", self);
    }
}

impl std::fmt::Display for DfmWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DfmWarning::UnusedArgument(name) => {
                write!(f, "argument '{}' is not used", name)
            }
            DfmWarning::SampleClamped {
                requested,
                available,
            } => write!(
                f,
                "nsample ({}) exceeds the {} retained features; using {}",
                requested, available, available
            ),
        }
    }
}
