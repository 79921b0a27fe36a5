//! Order-changing and subsetting transformations.

pub mod sample;
pub mod sort;

pub use sample::{sample_dfm, sample_dfm_with_rng, SampleConfig, SampleUnit};
pub use sort::{sort_dfm, Margin};
