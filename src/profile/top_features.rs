//! Most and least frequent features.
//!
//! For a plain matrix the ranking is by column total. For a resampled matrix
//! the ranking and the reported frequency come from the first replicate, and
//! each ranked feature also gets a percentile interval of its total across
//! all replicates. The first-replicate frequency is not the replicate mean,
//! so it can fall outside its own interval.

use crate::data::{DfmRef, DocFeatureMatrix};
use crate::error::{DfmError, DfmWarning, Result};
use crate::profile::quantile::quantile;
use crate::transform::sort::order_by;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for [`top_features`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopFeaturesConfig {
    /// Number of features to report.
    pub n: usize,
    /// Report the most frequent features (false: the least frequent).
    pub decreasing: bool,
    /// Coverage of the replicate interval, in `[0, 1]`.
    pub ci: f64,
    /// Unrecognized settings. Each one produces an `UnusedArgument` warning.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for TopFeaturesConfig {
    fn default() -> Self {
        Self {
            n: 10,
            decreasing: true,
            ci: 0.95,
            extra: BTreeMap::new(),
        }
    }
}

impl TopFeaturesConfig {
    /// Rank the top `n` features.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            ..Default::default()
        }
    }

    /// Set ranking direction.
    pub fn with_decreasing(mut self, decreasing: bool) -> Self {
        self.decreasing = decreasing;
        self
    }

    /// Set interval coverage.
    pub fn with_ci(mut self, ci: f64) -> Self {
        self.ci = ci;
        self
    }
}

/// A feature and its total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCount {
    pub feature: String,
    pub count: f64,
}

/// A feature, its first-replicate total and its replicate interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInterval {
    pub feature: String,
    pub freq: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Ranked features, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureRanking {
    Counts(Vec<FeatureCount>),
    Intervals(Vec<FeatureInterval>),
}

impl FeatureRanking {
    pub fn len(&self) -> usize {
        match self {
            FeatureRanking::Counts(rows) => rows.len(),
            FeatureRanking::Intervals(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Feature names in rank order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            FeatureRanking::Counts(rows) => rows.iter().map(|r| r.feature.as_str()).collect(),
            FeatureRanking::Intervals(rows) => rows.iter().map(|r| r.feature.as_str()).collect(),
        }
    }

    /// Ranked frequencies (first-replicate totals for intervals).
    pub fn values(&self) -> Vec<f64> {
        match self {
            FeatureRanking::Counts(rows) => rows.iter().map(|r| r.count).collect(),
            FeatureRanking::Intervals(rows) => rows.iter().map(|r| r.freq).collect(),
        }
    }
}

/// Result of [`top_features`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFeatures {
    pub ranking: FeatureRanking,
    pub warnings: Vec<DfmWarning>,
}

impl std::fmt::Display for TopFeatures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.ranking {
            FeatureRanking::Counts(rows) => {
                for row in rows {
                    writeln!(f, "{:<20} {}", row.feature, row.count)?;
                }
            }
            FeatureRanking::Intervals(rows) => {
                writeln!(f, "{:<20} {:>10} {:>10} {:>10}", "", "freq", "ciLow", "ciHigh")?;
                for row in rows {
                    writeln!(
                        f,
                        "{:<20} {:>10} {:>10.2} {:>10.2}",
                        row.feature, row.freq, row.ci_low, row.ci_high
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Report the `n` most (or least) frequent features.
///
/// `n` is clamped to the number of features.
pub fn top_features<M: DocFeatureMatrix>(x: &M, config: &TopFeaturesConfig) -> Result<TopFeatures> {
    let warnings: Vec<DfmWarning> = config
        .extra
        .keys()
        .map(|key| DfmWarning::UnusedArgument(key.clone()))
        .collect();
    for warning in &warnings {
        warning.log();
    }

    let ranking = match x.as_dfm_ref() {
        DfmRef::Plain(dfm) => {
            let totals = dfm.feature_totals();
            let order = order_by(&totals, config.decreasing);
            let rows = order
                .into_iter()
                .take(config.n)
                .map(|j| FeatureCount {
                    feature: dfm.features()[j].clone(),
                    count: totals[j],
                })
                .collect();
            FeatureRanking::Counts(rows)
        }
        DfmRef::Resampled(stack) => {
            if !(0.0..=1.0).contains(&config.ci) {
                return Err(DfmError::InvalidArgument(format!(
                    "ci must be between 0 and 1, got {}",
                    config.ci
                )));
            }
            let lower_p = (1.0 - config.ci) / 2.0;
            let upper_p = 1.0 - lower_p;

            let replicate_totals = stack.replicate_feature_totals();
            let first = &replicate_totals[0];
            let order = order_by(first, config.decreasing);

            let mut rows = Vec::with_capacity(config.n.min(order.len()));
            for j in order.into_iter().take(config.n) {
                let across: Vec<f64> = replicate_totals.iter().map(|t| t[j]).collect();
                let bounds = quantile(&across, lower_p).zip(quantile(&across, upper_p));
                let (ci_low, ci_high) = bounds.ok_or_else(|| {
                    DfmError::InvalidArgument("no replicates to compute an interval from".to_string())
                })?;
                rows.push(FeatureInterval {
                    feature: stack.features()[j].clone(),
                    freq: first[j],
                    ci_low,
                    ci_high,
                });
            }
            FeatureRanking::Intervals(rows)
        }
    };

    Ok(TopFeatures { ranking, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dfm, ResampledDfm};
    use nalgebra::DMatrix;

    fn dfm_from(values: &[f64]) -> Dfm {
        // 2 documents × 4 features
        let dense = DMatrix::from_row_slice(2, 4, values);
        Dfm::from_dense(
            &dense,
            vec!["d1".to_string(), "d2".to_string()],
            vec!["the", "cat", "sat", "mat"].into_iter().map(String::from).collect(),
        )
        .unwrap()
    }

    fn create_test_dfm() -> Dfm {
        // totals: the=10, cat=3, sat=1, mat=6
        dfm_from(&[6.0, 1.0, 0.0, 2.0, 4.0, 2.0, 1.0, 4.0])
    }

    #[test]
    fn test_top_features_decreasing() {
        let x = create_test_dfm();
        let top = top_features(&x, &TopFeaturesConfig::new(3)).unwrap();

        assert_eq!(top.ranking.names(), vec!["the", "mat", "cat"]);
        assert_eq!(top.ranking.values(), vec![10.0, 6.0, 3.0]);
        assert!(top.warnings.is_empty());
    }

    #[test]
    fn test_bottom_features() {
        let x = create_test_dfm();
        let config = TopFeaturesConfig::new(2).with_decreasing(false);
        let top = top_features(&x, &config).unwrap();
        assert_eq!(top.ranking.names(), vec!["sat", "cat"]);
    }

    #[test]
    fn test_n_is_clamped() {
        let x = create_test_dfm();
        let top = top_features(&x, &TopFeaturesConfig::new(50)).unwrap();
        assert_eq!(top.ranking.len(), 4);

        let values = top.ranking.values();
        assert!(values.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_unused_arguments_warn() {
        let x = create_test_dfm();
        let config: TopFeaturesConfig =
            serde_json::from_str(r#"{"n": 2, "scheme": "count"}"#).unwrap();
        let top = top_features(&x, &config).unwrap();

        assert_eq!(top.ranking.len(), 2);
        assert_eq!(
            top.warnings,
            vec![DfmWarning::UnusedArgument("scheme".to_string())]
        );
    }

    #[test]
    fn test_resampled_intervals() {
        let replicates = vec![
            create_test_dfm(),
            dfm_from(&[5.0, 0.0, 0.0, 1.0, 3.0, 1.0, 0.0, 2.0]), // 8, 1, 0, 3
            dfm_from(&[7.0, 2.0, 1.0, 3.0, 5.0, 2.0, 1.0, 5.0]), // 12, 4, 2, 8
            dfm_from(&[6.0, 1.0, 2.0, 2.0, 3.0, 1.0, 1.0, 3.0]), // 9, 2, 3, 5
        ];
        let stack = ResampledDfm::new(replicates).unwrap();
        let top = top_features(&stack, &TopFeaturesConfig::new(2).with_ci(0.5)).unwrap();

        let FeatureRanking::Intervals(rows) = &top.ranking else {
            panic!("expected intervals for a resampled dfm");
        };
        assert_eq!(rows.len(), 2);

        // "the" across replicates: 10, 8, 12, 9 -> quartiles 8.75 and 10.5
        assert_eq!(rows[0].feature, "the");
        assert_eq!(rows[0].freq, 10.0);
        assert!((rows[0].ci_low - 8.75).abs() < 1e-12);
        assert!((rows[0].ci_high - 10.5).abs() < 1e-12);

        // "mat" across replicates: 6, 3, 8, 5 -> quartiles 4.5 and 6.5
        assert_eq!(rows[1].feature, "mat");
        assert_eq!(rows[1].freq, 6.0);
        assert!((rows[1].ci_low - 4.5).abs() < 1e-12);
        assert!((rows[1].ci_high - 6.5).abs() < 1e-12);

        for row in rows {
            assert!(row.ci_low <= row.ci_high);
        }
    }

    #[test]
    fn test_single_replicate_interval_collapses() {
        let stack = ResampledDfm::new(vec![create_test_dfm()]).unwrap();
        let top = top_features(&stack, &TopFeaturesConfig::new(1)).unwrap();
        assert_eq!(
            top.ranking,
            FeatureRanking::Intervals(vec![FeatureInterval {
                feature: "the".to_string(),
                freq: 10.0,
                ci_low: 10.0,
                ci_high: 10.0,
            }])
        );
    }

    #[test]
    fn test_invalid_ci() {
        let stack = ResampledDfm::new(vec![create_test_dfm()]).unwrap();
        assert!(top_features(&stack, &TopFeaturesConfig::new(1).with_ci(1.5)).is_err());
    }
}
