//! Random sampling of documents or features.

use crate::data::DocFeatureMatrix;
use crate::error::{DfmError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Dimension along which units are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleUnit {
    #[default]
    Documents,
    Features,
}

impl SampleUnit {
    fn label(self) -> &'static str {
        match self {
            SampleUnit::Documents => "documents",
            SampleUnit::Features => "features",
        }
    }
}

impl FromStr for SampleUnit {
    type Err = DfmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "documents" => Ok(SampleUnit::Documents),
            "features" => Ok(SampleUnit::Features),
            other => Err(DfmError::InvalidArgument(format!(
                "what must be \"documents\" or \"features\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Configuration for [`sample_dfm`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Number of units to draw. Defaults to every unit along `what`.
    pub size: Option<usize>,
    /// Draw with replacement.
    pub replace: bool,
    /// Per-unit selection weights; uniform when absent.
    pub prob: Option<Vec<f64>>,
    /// Dimension to sample.
    pub what: SampleUnit,
    /// Seed for the default random source.
    pub seed: Option<u64>,
}

impl SampleConfig {
    /// Sample `size` documents.
    pub fn documents(size: usize) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    /// Sample `size` features.
    pub fn features(size: usize) -> Self {
        Self {
            size: Some(size),
            what: SampleUnit::Features,
            ..Default::default()
        }
    }

    /// Set sampling with replacement.
    pub fn with_replacement(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Set per-unit selection weights.
    pub fn with_prob(mut self, prob: Vec<f64>) -> Self {
        self.prob = Some(prob);
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Draw a random subset of documents or features.
///
/// Uses `config.seed` when set, otherwise an entropy-seeded generator.
pub fn sample_dfm<M: DocFeatureMatrix>(x: &M, config: &SampleConfig) -> Result<M> {
    let mut rng = seeded_rng(config.seed);
    sample_dfm_with_rng(x, config, &mut rng)
}

/// Draw a random subset of documents or features from an explicit random source.
///
/// The result keeps the drawn order. Sampling with replacement may repeat
/// units, and each repeat carries the original label.
pub fn sample_dfm_with_rng<M, R>(x: &M, config: &SampleConfig, rng: &mut R) -> Result<M>
where
    M: DocFeatureMatrix,
    R: Rng + ?Sized,
{
    let population = match config.what {
        SampleUnit::Documents => x.ndoc(),
        SampleUnit::Features => x.nfeature(),
    };
    let size = config.size.unwrap_or(population);

    if !config.replace && size > population {
        return Err(DfmError::InvalidArgument(format!(
            "size cannot exceed the number of {}",
            config.what.label()
        )));
    }

    let indices = draw_indices(rng, population, size, config.replace, config.prob.as_deref())?;

    log::debug!(
        "Sampled {} of {} {} ({} replacement)",
        size,
        population,
        config.what.label(),
        if config.replace { "with" } else { "without" }
    );

    match config.what {
        SampleUnit::Documents => x.select_docs(&indices),
        SampleUnit::Features => x.select_features(&indices),
    }
}

/// Seeded ChaCha generator, or entropy-seeded when no seed is given.
pub(crate) fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Draw `size` indices from `0..population` in draw order.
pub(crate) fn draw_indices<R: Rng + ?Sized>(
    rng: &mut R,
    population: usize,
    size: usize,
    replace: bool,
    prob: Option<&[f64]>,
) -> Result<Vec<usize>> {
    if size == 0 {
        return Ok(Vec::new());
    }
    if population == 0 {
        return Err(DfmError::InvalidArgument(
            "cannot sample from an empty population".to_string(),
        ));
    }

    let Some(prob) = prob else {
        return Ok(if replace {
            (0..size).map(|_| rng.gen_range(0..population)).collect()
        } else {
            index::sample(rng, population, size).into_vec()
        });
    };

    if prob.len() != population {
        return Err(DfmError::DimensionMismatch {
            expected: population,
            actual: prob.len(),
        });
    }
    if prob.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(DfmError::InvalidArgument(
            "prob must contain finite, non-negative weights".to_string(),
        ));
    }
    let positive = prob.iter().filter(|&&p| p > 0.0).count();
    if positive == 0 || (!replace && positive < size) {
        return Err(DfmError::InvalidArgument(
            "too few positive probabilities".to_string(),
        ));
    }

    let mut weights = prob.to_vec();
    let mut dist = WeightedIndex::new(&weights)
        .map_err(|e| DfmError::InvalidArgument(format!("invalid prob: {}", e)))?;

    let mut drawn = Vec::with_capacity(size);
    for _ in 0..size {
        let idx = dist.sample(&mut *rng);
        drawn.push(idx);
        if !replace && drawn.len() < size {
            weights[idx] = 0.0;
            dist = WeightedIndex::new(&weights)
                .map_err(|e| DfmError::InvalidArgument(format!("invalid prob: {}", e)))?;
        }
    }

    Ok(drawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dfm, ResampledDfm};
    use nalgebra::DMatrix;
    use std::collections::HashSet;

    fn create_test_dfm() -> Dfm {
        // 5 documents × 4 features
        let values: Vec<f64> = (0..20).map(|v| (v % 7) as f64).collect();
        let dense = DMatrix::from_row_slice(5, 4, &values);
        Dfm::from_dense(
            &dense,
            (1..=5).map(|i| format!("doc{}", i)).collect(),
            vec!["w", "x", "y", "z"].into_iter().map(String::from).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_sample_documents_without_replacement() {
        let x = create_test_dfm();
        for seed in 0..20 {
            let config = SampleConfig::documents(3).with_seed(seed);
            let sampled = sample_dfm(&x, &config).unwrap();

            assert_eq!(sampled.ndoc(), 3);
            assert_eq!(sampled.features(), x.features());
            let unique: HashSet<&String> = sampled.docnames().iter().collect();
            assert_eq!(unique.len(), 3);
        }
    }

    #[test]
    fn test_sample_keeps_rows_intact() {
        let x = create_test_dfm();
        let config = SampleConfig::documents(5).with_seed(7);
        let sampled = sample_dfm(&x, &config).unwrap();

        for (new_row, name) in sampled.docnames().iter().enumerate() {
            let old_row = x.docnames().iter().position(|d| d == name).unwrap();
            assert_eq!(sampled.row_dense(new_row), x.row_dense(old_row));
        }
    }

    #[test]
    fn test_sample_features_with_replacement_may_repeat() {
        let x = create_test_dfm();
        let config = SampleConfig::features(40).with_replacement(true).with_seed(3);
        let sampled = sample_dfm(&x, &config).unwrap();

        assert_eq!(sampled.nfeature(), 40);
        let unique: HashSet<&String> = sampled.features().iter().collect();
        assert!(unique.len() < 40);
    }

    #[test]
    fn test_size_exceeding_population() {
        let x = create_test_dfm();
        let err = sample_dfm(&x, &SampleConfig::documents(6).with_seed(1)).unwrap_err();
        assert!(matches!(err, DfmError::InvalidArgument(msg) if msg.contains("documents")));

        assert!(sample_dfm(&x, &SampleConfig::documents(6).with_replacement(true)).is_ok());
    }

    #[test]
    fn test_default_size_is_a_permutation() {
        let x = create_test_dfm();
        let config = SampleConfig {
            what: SampleUnit::Features,
            seed: Some(11),
            ..Default::default()
        };
        let sampled = sample_dfm(&x, &config).unwrap();
        let mut labels = sampled.features().to_vec();
        labels.sort();
        assert_eq!(labels, x.features());
    }

    #[test]
    fn test_prob_restricts_draws() {
        let x = create_test_dfm();
        let config = SampleConfig::documents(2)
            .with_prob(vec![0.0, 1.0, 0.0, 3.0, 0.0])
            .with_seed(5);
        let sampled = sample_dfm(&x, &config).unwrap();

        let mut names = sampled.docnames().to_vec();
        names.sort();
        assert_eq!(names, vec!["doc2", "doc4"]);
    }

    #[test]
    fn test_invalid_prob() {
        let x = create_test_dfm();
        let too_few = SampleConfig::documents(3).with_prob(vec![0.0, 1.0, 0.0, 3.0, 0.0]);
        assert!(sample_dfm(&x, &too_few).is_err());

        let wrong_len = SampleConfig::documents(1).with_prob(vec![1.0, 1.0]);
        assert!(matches!(
            sample_dfm(&x, &wrong_len),
            Err(DfmError::DimensionMismatch { .. })
        ));

        let negative = SampleConfig::documents(1).with_prob(vec![1.0, -1.0, 1.0, 1.0, 1.0]);
        assert!(sample_dfm(&x, &negative).is_err());
    }

    #[test]
    fn test_same_seed_same_sample() {
        let x = create_test_dfm();
        let config = SampleConfig::features(3).with_seed(99);
        let a = sample_dfm(&x, &config).unwrap();
        let b = sample_dfm(&x, &config).unwrap();
        assert_eq!(a.features(), b.features());
    }

    #[test]
    fn test_sample_resampled_keeps_replicates_aligned() {
        let x = create_test_dfm();
        let stack = ResampledDfm::new(vec![x.clone(), x]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let sampled = sample_dfm_with_rng(&stack, &SampleConfig::documents(4), &mut rng).unwrap();

        assert_eq!(sampled.ndoc(), 4);
        assert_eq!(
            sampled.replicates()[0].to_dense(),
            sampled.replicates()[1].to_dense()
        );
    }

    #[test]
    fn test_what_from_str() {
        assert_eq!("features".parse::<SampleUnit>().unwrap(), SampleUnit::Features);
        assert!("terms".parse::<SampleUnit>().is_err());
    }
}
