//! Sparsity profiling for document-feature matrices.

use crate::data::Dfm;
use crate::profile::quantile::quantile;
use serde::{Deserialize, Serialize};

/// Profile of sparsity characteristics in a document-feature matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparsityProfile {
    /// Total number of cells (documents × features).
    pub total_entries: usize,
    /// Number of non-zero cells.
    pub nonzero_entries: usize,
    /// Overall sparsity (proportion of zeros).
    pub sparsity: f64,
    /// Proportion of documents each feature is absent from.
    pub feature_sparsity: Vec<f64>,
    /// Proportion of features each document lacks.
    pub doc_sparsity: Vec<f64>,
    /// Median sparsity across features.
    pub median_feature_sparsity: f64,
    /// Median sparsity across documents.
    pub median_doc_sparsity: f64,
}

impl SparsityProfile {
    /// Features absent from more than `sparsity` of documents.
    ///
    /// This is a plain proportion test. It can differ from trim's document
    /// rule, which rounds `1 - sparsity` of the documents to a whole count and
    /// treats `sparsity = 0` as the absolute threshold of one document.
    pub fn features_sparser_than(&self, sparsity: f64) -> Vec<usize> {
        self.feature_sparsity
            .iter()
            .enumerate()
            .filter(|(_, &s)| s > sparsity)
            .map(|(i, _)| i)
            .collect()
    }
}

impl std::fmt::Display for SparsityProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sparsity Profile")?;
        writeln!(f, "  Total cells:       {}", self.total_entries)?;
        writeln!(f, "  Non-zero cells:    {}", self.nonzero_entries)?;
        writeln!(f, "  Overall sparsity:  {:.2}%", self.sparsity * 100.0)?;
        writeln!(f, "  Median feature sparsity:  {:.2}%", self.median_feature_sparsity * 100.0)?;
        writeln!(f, "  Median document sparsity: {:.2}%", self.median_doc_sparsity * 100.0)?;
        Ok(())
    }
}

/// Profile sparsity characteristics of a document-feature matrix.
pub fn profile_sparsity(x: &Dfm) -> SparsityProfile {
    let ndoc = x.ndoc();
    let nfeature = x.nfeature();
    let total_entries = ndoc * nfeature;
    let nonzero_entries = x.doc_freq().iter().sum::<usize>();

    let feature_sparsity: Vec<f64> = x
        .doc_freq()
        .iter()
        .map(|&df| proportion_absent(df, ndoc))
        .collect();

    let doc_sparsity: Vec<f64> = x
        .data()
        .outer_iterator()
        .map(|row| {
            let present = row.iter().filter(|(_, &v)| v > 0.0).count();
            proportion_absent(present, nfeature)
        })
        .collect();

    SparsityProfile {
        total_entries,
        nonzero_entries,
        sparsity: if total_entries == 0 {
            0.0
        } else {
            (total_entries - nonzero_entries) as f64 / total_entries as f64
        },
        median_feature_sparsity: quantile(&feature_sparsity, 0.5).unwrap_or(0.0),
        median_doc_sparsity: quantile(&doc_sparsity, 0.5).unwrap_or(0.0),
        feature_sparsity,
        doc_sparsity,
    }
}

fn proportion_absent(present: usize, of: usize) -> f64 {
    if of == 0 {
        0.0
    } else {
        (of - present) as f64 / of as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{trim, TrimConfig};
    use nalgebra::DMatrix;

    #[test]
    fn test_profile_sparsity() {
        let dense = DMatrix::from_row_slice(
            2,
            4,
            &[
                1.0, 0.0, 3.0, 0.0, //
                1.0, 0.0, 0.0, 0.0,
            ],
        );
        let x = Dfm::from_dense(
            &dense,
            vec!["a".to_string(), "b".to_string()],
            (0..4).map(|i| format!("f{}", i)).collect(),
        )
        .unwrap();

        let profile = profile_sparsity(&x);
        assert_eq!(profile.total_entries, 8);
        assert_eq!(profile.nonzero_entries, 3);
        assert!((profile.sparsity - 5.0 / 8.0).abs() < 1e-12);
        assert_eq!(profile.feature_sparsity, vec![0.0, 1.0, 0.5, 1.0]);
        assert_eq!(profile.doc_sparsity, vec![0.5, 0.75]);
        assert_eq!(profile.median_feature_sparsity, 0.75);
        assert_eq!(profile.features_sparser_than(0.5), vec![1, 3]);
    }

    #[test]
    fn test_sparser_than_zero_differs_from_trim() {
        let dense = DMatrix::from_row_slice(
            2,
            3,
            &[
                1.0, 3.0, 0.0, //
                1.0, 0.0, 0.0,
            ],
        );
        let x = Dfm::from_dense(
            &dense,
            vec!["a".to_string(), "b".to_string()],
            vec!["x".to_string(), "y".to_string(), "z".to_string()],
        )
        .unwrap();

        let profile = profile_sparsity(&x);
        assert_eq!(profile.features_sparser_than(0.0), vec![1, 2]);

        // sparsity 0 gives min_doc = 1 document, so "y" survives the trim
        let config = TrimConfig::new().with_sparsity(0.0).with_verbose(false);
        let trimmed = trim(&x, &config).unwrap();
        assert_eq!(trimmed.features(), &["y", "x"]);
    }
}
