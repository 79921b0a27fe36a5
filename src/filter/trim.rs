//! Threshold-based feature trimming.
//!
//! A feature is kept when its total count reaches `min_count` AND it occurs
//! in at least `min_doc` documents. Thresholds below 1 are fractions: a
//! fractional `min_count` is scaled by the number of features and a
//! fractional `min_doc` by the number of documents, and the scaled value is
//! rounded to the nearest whole count. A value of exactly 1 is the absolute
//! count 1.
//!
//! # Example
//!
//! ```ignore
//! use composable_dfm::filter::{trim, TrimConfig};
//!
//! let config = TrimConfig::new().with_min_count(2.0).with_min_doc(2.0);
//! let trimmed = trim(&dfm, &config)?;
//! ```

use crate::data::DocFeatureMatrix;
use crate::error::{DfmError, DfmWarning, Result};
use crate::transform::sample::seeded_rng;
use crate::transform::{sort_dfm, Margin};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for [`trim`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Minimum total count per feature (fraction of the feature count when < 1).
    pub min_count: f64,
    /// Minimum number of documents per feature (fraction of documents when < 1).
    /// `None` means 1.
    pub min_doc: Option<f64>,
    /// Maximum proportion of documents a feature may be absent from.
    /// Equivalent to `min_doc = 1 - sparsity`.
    pub sparsity: Option<f64>,
    /// Keep a uniform random sample of this many retained features.
    pub nsample: Option<usize>,
    /// Log progress at info level.
    pub verbose: bool,
    /// Seed for the default random source.
    pub seed: Option<u64>,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            min_count: 1.0,
            min_doc: None,
            sparsity: None,
            nsample: None,
            verbose: true,
            seed: None,
        }
    }
}

impl TrimConfig {
    /// Create a config with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum total count.
    pub fn with_min_count(mut self, min_count: f64) -> Self {
        self.min_count = min_count;
        self
    }

    /// Set the minimum document frequency.
    pub fn with_min_doc(mut self, min_doc: f64) -> Self {
        self.min_doc = Some(min_doc);
        self
    }

    /// Set the maximum sparsity.
    pub fn with_sparsity(mut self, sparsity: f64) -> Self {
        self.sparsity = Some(sparsity);
        self
    }

    /// Set the number of retained features to sample.
    pub fn with_nsample(mut self, nsample: usize) -> Self {
        self.nsample = Some(nsample);
        self
    }

    /// Set progress logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Resolve the document threshold from `min_doc` and `sparsity`.
    fn resolved_min_doc(&self) -> Result<f64> {
        match (self.min_doc, self.sparsity) {
            (None, None) => Ok(1.0),
            (Some(min_doc), None) => Ok(min_doc),
            (None, Some(sparsity)) => {
                check_sparsity(sparsity)?;
                Ok(1.0 - sparsity)
            }
            (Some(min_doc), Some(sparsity)) => {
                check_sparsity(sparsity)?;
                if (min_doc - (1.0 - sparsity)).abs() > 1e-12 {
                    return Err(DfmError::InvalidArgument(format!(
                        "min_doc ({}) and sparsity ({}) both set a document threshold and disagree",
                        min_doc, sparsity
                    )));
                }
                Ok(min_doc)
            }
        }
    }

    /// Validate the thresholds and scale fractional ones to absolute counts.
    ///
    /// A scaled threshold is rounded to the nearest whole count.
    pub fn effective_thresholds(&self, nfeature: usize, ndoc: usize) -> Result<(f64, f64)> {
        let min_doc = self.resolved_min_doc()?;

        if !(self.min_count > 0.0) {
            return Err(DfmError::InvalidArgument(format!(
                "min_count must be > 0, got {}",
                self.min_count
            )));
        }
        if !(min_doc > 0.0) {
            return Err(DfmError::InvalidArgument(format!(
                "min_doc must be > 0, got {}",
                min_doc
            )));
        }

        let min_count = if self.min_count < 1.0 {
            (self.min_count * nfeature as f64).round()
        } else {
            self.min_count
        };
        let min_doc = if min_doc < 1.0 {
            (min_doc * ndoc as f64).round()
        } else {
            min_doc
        };

        Ok((min_count, min_doc))
    }
}

fn check_sparsity(sparsity: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&sparsity) {
        return Err(DfmError::InvalidArgument(format!(
            "sparsity must be between 0 and 1, got {}",
            sparsity
        )));
    }
    Ok(())
}

/// What a trim removed and kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimReport {
    /// Number of features before trimming.
    pub n_before: usize,
    /// Count threshold after fraction scaling.
    pub effective_min_count: f64,
    /// Document threshold after fraction scaling.
    pub effective_min_doc: f64,
    /// Features whose total count is below the count threshold.
    pub removed_by_count: usize,
    /// Features found in fewer documents than the document threshold.
    pub removed_by_doc: usize,
    /// Features passing both thresholds.
    pub n_retained: usize,
    /// Size of the random feature sample, when one was drawn.
    pub n_sampled: Option<usize>,
    /// Number of features in the result.
    pub n_after: usize,
    pub warnings: Vec<DfmWarning>,
}

impl std::fmt::Display for TrimReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Trim Result")?;
        writeln!(f, "  Before:           {} features", self.n_before)?;
        writeln!(
            f,
            "  Below min count ({}): {} features",
            self.effective_min_count, self.removed_by_count
        )?;
        writeln!(
            f,
            "  Below min docs ({}):  {} features",
            self.effective_min_doc, self.removed_by_doc
        )?;
        writeln!(f, "  Retained:         {} features", self.n_retained)?;
        if let Some(n) = self.n_sampled {
            writeln!(f, "  Sampled:          {} features", n)?;
        }
        writeln!(f, "  After:            {} features", self.n_after)?;
        Ok(())
    }
}

/// Trim features by minimum count and document frequency.
///
/// The result is sorted by decreasing feature total. Metadata is carried
/// over unchanged.
pub fn trim<M: DocFeatureMatrix>(x: &M, config: &TrimConfig) -> Result<M> {
    trim_with_stats(x, config).map(|(trimmed, _)| trimmed)
}

/// Trim features and report what each stage removed.
pub fn trim_with_stats<M: DocFeatureMatrix>(x: &M, config: &TrimConfig) -> Result<(M, TrimReport)> {
    let mut rng = seeded_rng(config.seed);
    trim_with_rng(x, config, &mut rng)
}

/// Trim features, drawing any `nsample` subsample from `rng`.
pub fn trim_with_rng<M, R>(x: &M, config: &TrimConfig, rng: &mut R) -> Result<(M, TrimReport)>
where
    M: DocFeatureMatrix,
    R: Rng + ?Sized,
{
    let n_before = x.nfeature();
    let (min_count, min_doc) = config.effective_thresholds(n_before, x.ndoc())?;

    let totals = x.feature_totals();
    let doc_freq = x.doc_freq();

    let passes_count: Vec<bool> = totals.iter().map(|&t| t >= min_count).collect();
    let passes_doc: Vec<bool> = doc_freq.iter().map(|&d| d as f64 >= min_doc).collect();
    let removed_by_count = passes_count.iter().filter(|&&p| !p).count();
    let removed_by_doc = passes_doc.iter().filter(|&&p| !p).count();

    if config.verbose {
        log::info!(
            "Features occurring fewer than {} times: {}",
            min_count,
            removed_by_count
        );
        log::info!(
            "Features occurring in fewer than {} documents: {}",
            min_doc,
            removed_by_doc
        );
    }

    let keep: Vec<usize> = (0..n_before)
        .filter(|&j| passes_count[j] && passes_doc[j])
        .collect();

    if keep.is_empty() {
        return Err(DfmError::EmptyResult(format!(
            "No features remain after trimming with min_count = {} and min_doc = {}",
            min_count, min_doc
        )));
    }
    let n_retained = keep.len();

    if config.nsample == Some(0) {
        return Err(DfmError::EmptyResult(
            "nsample = 0 leaves no features".to_string(),
        ));
    }

    let mut warnings = Vec::new();
    let mut n_sampled = None;
    let selected = match config.nsample {
        Some(requested) => {
            if requested > n_retained {
                let warning = DfmWarning::SampleClamped {
                    requested,
                    available: n_retained,
                };
                warning.log();
                warnings.push(warning);
            }
            let size = requested.min(n_retained);
            if config.verbose {
                log::info!("Retaining a random sample of {} features", size);
            }
            n_sampled = Some(size);
            let mut picked = index::sample(rng, n_retained, size).into_vec();
            picked.sort_unstable();
            picked.into_iter().map(|i| keep[i]).collect()
        }
        None => keep,
    };

    let trimmed = sort_dfm(&x.select_features(&selected)?, true, Margin::Features)?;

    let report = TrimReport {
        n_before,
        effective_min_count: min_count,
        effective_min_doc: min_doc,
        removed_by_count,
        removed_by_doc,
        n_retained,
        n_sampled,
        n_after: trimmed.nfeature(),
        warnings,
    };

    Ok((trimmed, report))
}
