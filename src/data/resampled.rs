//! Stacks of bootstrap-replicated document-feature matrices.

use crate::data::dfm::Dfm;
use crate::data::meta::DfmMeta;
use crate::error::{DfmError, Result};

/// R resampled replicates of a document-feature matrix.
///
/// All replicates share the same shape and feature labels. Replicate 0 is the
/// rank-defining replicate: its document names, totals and orderings stand in
/// for the stack as a whole.
#[derive(Debug, Clone)]
pub struct ResampledDfm {
    replicates: Vec<Dfm>,
}

impl ResampledDfm {
    /// Create a resampled matrix from its replicates.
    pub fn new(replicates: Vec<Dfm>) -> Result<Self> {
        let first = replicates.first().ok_or_else(|| {
            DfmError::InvalidArgument("a resampled dfm needs at least one replicate".to_string())
        })?;

        for (idx, replicate) in replicates.iter().enumerate().skip(1) {
            if replicate.ndoc() != first.ndoc() {
                return Err(DfmError::DimensionMismatch {
                    expected: first.ndoc(),
                    actual: replicate.ndoc(),
                });
            }
            if replicate.features() != first.features() {
                return Err(DfmError::InvalidArgument(format!(
                    "replicate {} does not share the feature labels of replicate 0",
                    idx
                )));
            }
        }

        Ok(Self { replicates })
    }

    /// Number of replicates.
    #[inline]
    pub fn n_replicates(&self) -> usize {
        self.replicates.len()
    }

    /// All replicates, rank-defining replicate first.
    #[inline]
    pub fn replicates(&self) -> &[Dfm] {
        &self.replicates
    }

    /// The rank-defining replicate.
    #[inline]
    pub fn first(&self) -> &Dfm {
        &self.replicates[0]
    }

    #[inline]
    pub fn docnames(&self) -> &[String] {
        self.first().docnames()
    }

    #[inline]
    pub fn features(&self) -> &[String] {
        self.first().features()
    }

    #[inline]
    pub fn meta(&self) -> &DfmMeta {
        self.first().meta()
    }

    /// Feature totals for every replicate, indexed `[replicate][feature]`.
    pub fn replicate_feature_totals(&self) -> Vec<Vec<f64>> {
        self.replicates.iter().map(Dfm::feature_totals).collect()
    }

    /// Apply the same transformation to every replicate.
    pub(crate) fn map_replicates<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(&Dfm) -> Result<Dfm>,
    {
        let replicates = self
            .replicates
            .iter()
            .map(f)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { replicates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn replicate(values: &[f64], features: &[&str]) -> Dfm {
        let dense = DMatrix::from_row_slice(2, features.len(), values);
        Dfm::from_dense(
            &dense,
            vec!["d1".to_string(), "d2".to_string()],
            features.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_requires_replicate() {
        assert!(matches!(
            ResampledDfm::new(vec![]),
            Err(DfmError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_feature_labels_must_match() {
        let a = replicate(&[1.0, 2.0, 3.0, 4.0], &["x", "y"]);
        let b = replicate(&[1.0, 2.0, 3.0, 4.0], &["y", "x"]);
        assert!(ResampledDfm::new(vec![a, b]).is_err());
    }

    #[test]
    fn test_replicate_totals() {
        let a = replicate(&[1.0, 2.0, 3.0, 4.0], &["x", "y"]);
        let b = replicate(&[0.0, 1.0, 5.0, 0.0], &["x", "y"]);
        let stack = ResampledDfm::new(vec![a, b]).unwrap();

        assert_eq!(stack.n_replicates(), 2);
        assert_eq!(stack.features(), &["x", "y"]);
        assert_eq!(
            stack.replicate_feature_totals(),
            vec![vec![4.0, 6.0], vec![5.0, 1.0]]
        );
    }
}
