//! Data structures for document-feature analysis.

mod accessors;
mod corpus;
mod dfm;
mod matrix;
mod meta;
mod resampled;

pub use accessors::{docnames, features, ndoc, nfeature, TextRef};
pub use corpus::Corpus;
pub use dfm::Dfm;
pub use matrix::{DfmRef, DocFeatureMatrix};
pub use meta::{DfmMeta, Weighting};
pub use resampled::ResampledDfm;
