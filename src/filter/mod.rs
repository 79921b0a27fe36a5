//! Feature filtering for document-feature matrices.

pub mod trim;

pub use trim::{trim, trim_with_rng, trim_with_stats, TrimConfig, TrimReport};
