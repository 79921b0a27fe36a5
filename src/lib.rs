//! Composable Document-Feature Matrix (DFM) Utilities
//!
//! This library provides trimming, sorting, sampling and frequency profiling
//! for sparse document-feature matrices produced by a tokenization layer.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (Dfm, ResampledDfm, Corpus) and accessors
//! - **filter**: Feature trimming by count and document frequency
//! - **transform**: Sorting by marginal totals and random sampling
//! - **profile**: Top-feature rankings with replicate intervals, sparsity
//! - **pipeline**: Pipeline composition and execution
//!
//! Plain and resampled matrices share the [`data::DocFeatureMatrix`]
//! capability, so every operation accepts either one.
//!
//! # Example
//!
//! ```no_run
//! use composable_dfm::prelude::*;
//!
//! let x = Dfm::from_tsv("dfm.tsv").unwrap();
//!
//! let trimmed = trim(&x, &TrimConfig::new().with_min_count(5.0).with_sparsity(0.9)).unwrap();
//! let top = top_features(&trimmed, &TopFeaturesConfig::new(20)).unwrap();
//! println!("{}", top);
//! ```

pub mod data;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod profile;
pub mod transform;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        docnames, features, ndoc, nfeature, Corpus, Dfm, DfmMeta, DfmRef, DocFeatureMatrix,
        ResampledDfm, TextRef, Weighting,
    };
    pub use crate::error::{DfmError, DfmWarning, Result};
    pub use crate::filter::{trim, trim_with_rng, trim_with_stats, TrimConfig, TrimReport};
    pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineOutput, PipelineStep};
    pub use crate::profile::{
        profile_sparsity, quantile, top_features, FeatureCount, FeatureInterval, FeatureRanking,
        SparsityProfile, TopFeatures, TopFeaturesConfig,
    };
    pub use crate::transform::{
        sample_dfm, sample_dfm_with_rng, sort_dfm, Margin, SampleConfig, SampleUnit,
    };
}
