//! Profiling primitives: frequency rankings and sparsity.

mod quantile;
mod sparsity;
mod top_features;

pub use quantile::quantile;
pub use sparsity::{profile_sparsity, SparsityProfile};
pub use top_features::{
    top_features, FeatureCount, FeatureInterval, FeatureRanking, TopFeatures, TopFeaturesConfig,
};
