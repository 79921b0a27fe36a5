//! Document-feature matrix with sparse storage.

use crate::data::meta::DfmMeta;
use crate::error::{DfmError, Result};
use rayon::prelude::*;
use sprs::{CsMat, TriMat};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A sparse matrix of feature counts across documents.
///
/// Rows represent documents, columns represent features.
/// Uses CSR (Compressed Sparse Row) format, so per-document reductions walk a
/// single row and per-feature reductions accumulate over stored entries only.
#[derive(Debug, Clone)]
pub struct Dfm {
    /// Sparse matrix in CSR format (documents × features)
    data: CsMat<f64>,
    /// Document names (row labels)
    docnames: Vec<String>,
    /// Feature names (column labels)
    features: Vec<String>,
    /// Weighting and producer settings
    meta: DfmMeta,
}

impl Dfm {
    /// Create a new Dfm from a sparse matrix and labels.
    ///
    /// Labels must be unique along each axis and every stored value must be
    /// finite and non-negative.
    pub fn new(data: CsMat<f64>, docnames: Vec<String>, features: Vec<String>) -> Result<Self> {
        let data = if data.is_csr() { data } else { data.to_csr() };
        check_unique("document", &docnames)?;
        check_unique("feature", &features)?;
        for (row, row_vec) in data.outer_iterator().enumerate() {
            for (col, &val) in row_vec.iter() {
                if !val.is_finite() || val < 0.0 {
                    return Err(DfmError::InvalidCount {
                        value: val.to_string(),
                        row,
                        col,
                    });
                }
            }
        }
        Self::from_parts(data, docnames, features, DfmMeta::default())
    }

    /// Assemble a matrix without the label-uniqueness check.
    ///
    /// Subsets drawn with replacement legitimately repeat labels.
    pub(crate) fn from_parts(
        data: CsMat<f64>,
        docnames: Vec<String>,
        features: Vec<String>,
        meta: DfmMeta,
    ) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != docnames.len() {
            return Err(DfmError::DimensionMismatch {
                expected: nrows,
                actual: docnames.len(),
            });
        }
        if ncols != features.len() {
            return Err(DfmError::DimensionMismatch {
                expected: ncols,
                actual: features.len(),
            });
        }
        Ok(Self {
            data,
            docnames,
            features,
            meta,
        })
    }

    /// Replace the metadata.
    pub fn with_meta(mut self, meta: DfmMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Load a matrix from a TSV file.
    ///
    /// Expected format:
    /// - First row: header with feature names (first column is the document ID header)
    /// - Subsequent rows: document name followed by counts
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or_else(|| DfmError::EmptyResult("Empty TSV file".to_string()))??;
        let header: Vec<&str> = header_line.split('\t').collect();
        if header.len() < 2 {
            return Err(DfmError::EmptyResult(
                "TSV must have at least one feature".to_string(),
            ));
        }
        let features: Vec<String> = header[1..].iter().map(|s| s.to_string()).collect();
        let n_features = features.len();

        let mut triplets: Vec<(usize, usize, f64)> = Vec::new();
        let mut docnames: Vec<String> = Vec::new();

        for line_result in lines {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            let row_idx = docnames.len();
            let fields: Vec<&str> = line.split('\t').collect();
            docnames.push(fields[0].to_string());

            for (col_idx, value_str) in fields[1..].iter().enumerate() {
                if col_idx >= n_features {
                    break;
                }
                let value: f64 = value_str
                    .trim()
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| DfmError::InvalidCount {
                        value: value_str.to_string(),
                        row: row_idx,
                        col: col_idx,
                    })?;
                if value > 0.0 {
                    triplets.push((row_idx, col_idx, value));
                }
            }
        }

        let mut tri_mat = TriMat::new((docnames.len(), n_features));
        for (row, col, val) in triplets {
            tri_mat.add_triplet(row, col, val);
        }

        Self::new(tri_mat.to_csr(), docnames, features)
    }

    /// Write the matrix to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        write!(writer, "doc_id")?;
        for feature in &self.features {
            write!(writer, "\t{}", feature)?;
        }
        writeln!(writer)?;

        for (row_idx, docname) in self.docnames.iter().enumerate() {
            write!(writer, "{}", docname)?;
            for value in self.row_dense(row_idx) {
                write!(writer, "\t{}", value)?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Get the value at (doc, feature), returning 0 for missing entries.
    #[inline]
    pub fn get(&self, doc: usize, feature: usize) -> f64 {
        self.data.get(doc, feature).copied().unwrap_or(0.0)
    }

    /// Number of documents (rows).
    #[inline]
    pub fn ndoc(&self) -> usize {
        self.data.rows()
    }

    /// Number of features (columns).
    #[inline]
    pub fn nfeature(&self) -> usize {
        self.data.cols()
    }

    /// Total number of stored non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.nnz()
    }

    /// Document names in row order.
    #[inline]
    pub fn docnames(&self) -> &[String] {
        &self.docnames
    }

    /// Feature names in column order.
    #[inline]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    #[inline]
    pub fn meta(&self) -> &DfmMeta {
        &self.meta
    }

    /// Get the underlying sparse matrix.
    #[inline]
    pub fn data(&self) -> &CsMat<f64> {
        &self.data
    }

    /// Get a dense vector for a specific document.
    pub fn row_dense(&self, doc: usize) -> Vec<f64> {
        let mut dense = vec![0.0; self.nfeature()];
        if let Some(row_vec) = self.data.outer_view(doc) {
            for (col, &val) in row_vec.iter() {
                dense[col] = val;
            }
        }
        dense
    }

    /// Total count per document (row sums).
    pub fn doc_totals(&self) -> Vec<f64> {
        (0..self.ndoc())
            .into_par_iter()
            .map(|row| {
                self.data
                    .outer_view(row)
                    .map(|v| v.iter().map(|(_, &val)| val).sum())
                    .unwrap_or(0.0)
            })
            .collect()
    }

    /// Total count per feature (column sums).
    pub fn feature_totals(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.nfeature()];
        for row_vec in self.data.outer_iterator() {
            for (col, &val) in row_vec.iter() {
                sums[col] += val;
            }
        }
        sums
    }

    /// Number of documents in which each feature has a non-zero value.
    pub fn doc_freq(&self) -> Vec<usize> {
        let mut freq = vec![0usize; self.nfeature()];
        for row_vec in self.data.outer_iterator() {
            for (col, &val) in row_vec.iter() {
                if val > 0.0 {
                    freq[col] += 1;
                }
            }
        }
        freq
    }

    /// Proportion of cells that are zero.
    pub fn sparsity(&self) -> f64 {
        let total = self.ndoc() * self.nfeature();
        if total == 0 {
            return 0.0;
        }
        let nonzero = self
            .data
            .data()
            .iter()
            .filter(|&&v| v != 0.0)
            .count();
        (total - nonzero) as f64 / total as f64
    }

    /// Select documents (rows) by index, in the given order.
    ///
    /// Indices may repeat; each repeat is an independent copy of the row.
    pub fn select_docs(&self, indices: &[usize]) -> Result<Self> {
        let mut tri_mat = TriMat::new((indices.len(), self.nfeature()));
        let mut new_docnames = Vec::with_capacity(indices.len());

        for (new_row, &old_row) in indices.iter().enumerate() {
            if old_row >= self.ndoc() {
                return Err(DfmError::InvalidArgument(format!(
                    "Document index {} out of bounds",
                    old_row
                )));
            }
            new_docnames.push(self.docnames[old_row].clone());

            if let Some(row_vec) = self.data.outer_view(old_row) {
                for (col, &val) in row_vec.iter() {
                    tri_mat.add_triplet(new_row, col, val);
                }
            }
        }

        Self::from_parts(
            tri_mat.to_csr(),
            new_docnames,
            self.features.clone(),
            self.meta.clone(),
        )
    }

    /// Select features (columns) by index, in the given order.
    ///
    /// Indices may repeat; each repeat is an independent copy of the column.
    pub fn select_features(&self, indices: &[usize]) -> Result<Self> {
        let csc = self.data.to_csc();
        let mut tri_mat = TriMat::new((self.ndoc(), indices.len()));
        let mut new_features = Vec::with_capacity(indices.len());

        for (new_col, &old_col) in indices.iter().enumerate() {
            if old_col >= self.nfeature() {
                return Err(DfmError::InvalidArgument(format!(
                    "Feature index {} out of bounds",
                    old_col
                )));
            }
            new_features.push(self.features[old_col].clone());

            if let Some(col_vec) = csc.outer_view(old_col) {
                for (row, &val) in col_vec.iter() {
                    tri_mat.add_triplet(row, new_col, val);
                }
            }
        }

        Self::from_parts(
            tri_mat.to_csr(),
            self.docnames.clone(),
            new_features,
            self.meta.clone(),
        )
    }

    /// Convert to a dense matrix.
    pub fn to_dense(&self) -> nalgebra::DMatrix<f64> {
        let mut dense = nalgebra::DMatrix::zeros(self.ndoc(), self.nfeature());
        for (row, row_vec) in self.data.outer_iterator().enumerate() {
            for (col, &val) in row_vec.iter() {
                dense[(row, col)] = val;
            }
        }
        dense
    }

    /// Create from a dense matrix (documents × features).
    pub fn from_dense(
        data: &nalgebra::DMatrix<f64>,
        docnames: Vec<String>,
        features: Vec<String>,
    ) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        let mut tri_mat = TriMat::new((nrows, ncols));

        for row in 0..nrows {
            for col in 0..ncols {
                let val = data[(row, col)];
                if val != 0.0 {
                    tri_mat.add_triplet(row, col, val);
                }
            }
        }

        Self::new(tri_mat.to_csr(), docnames, features)
    }
}

impl std::fmt::Display for Dfm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Document-feature matrix of: {} document{}, {} feature{} ({:.1}% sparse).",
            self.ndoc(),
            if self.ndoc() == 1 { "" } else { "s" },
            self.nfeature(),
            if self.nfeature() == 1 { "" } else { "s" },
            self.sparsity() * 100.0
        )
    }
}

fn check_unique(axis: &str, labels: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(DfmError::DuplicateLabel {
                axis: axis.to_string(),
                label: label.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::meta::Weighting;
    use tempfile::NamedTempFile;

    fn create_test_dfm() -> Dfm {
        // 3 documents × 3 features
        let mut tri_mat = TriMat::new((3, 3));
        tri_mat.add_triplet(0, 0, 5.0);
        tri_mat.add_triplet(1, 0, 3.0);
        tri_mat.add_triplet(0, 1, 1.0);
        tri_mat.add_triplet(0, 2, 2.0);
        tri_mat.add_triplet(1, 2, 2.0);
        tri_mat.add_triplet(2, 2, 2.0);

        let docnames = vec!["d1".to_string(), "d2".to_string(), "d3".to_string()];
        let features = vec!["the".to_string(), "cat".to_string(), "dog".to_string()];
        Dfm::new(tri_mat.to_csr(), docnames, features).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let x = create_test_dfm();
        assert_eq!(x.ndoc(), 3);
        assert_eq!(x.nfeature(), 3);
        assert_eq!(x.nnz(), 6);
    }

    #[test]
    fn test_totals_and_doc_freq() {
        let x = create_test_dfm();
        assert_eq!(x.feature_totals(), vec![8.0, 1.0, 6.0]);
        assert_eq!(x.doc_totals(), vec![8.0, 5.0, 2.0]);
        assert_eq!(x.doc_freq(), vec![2, 1, 3]);
    }

    #[test]
    fn test_sparsity_and_display() {
        let x = create_test_dfm();
        assert!((x.sparsity() - 3.0 / 9.0).abs() < 1e-12);
        let printed = x.to_string();
        assert!(printed.contains("3 documents, 3 features (33.3% sparse)"));
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let tri_mat: TriMat<f64> = TriMat::new((2, 1));
        let result = Dfm::new(
            tri_mat.to_csr(),
            vec!["a".to_string(), "a".to_string()],
            vec!["f".to_string()],
        );
        assert!(matches!(result, Err(DfmError::DuplicateLabel { .. })));
    }

    #[test]
    fn test_negative_value_rejected() {
        let mut tri_mat = TriMat::new((1, 1));
        tri_mat.add_triplet(0, 0, -1.0);
        let result = Dfm::new(tri_mat.to_csr(), vec!["d".to_string()], vec!["f".to_string()]);
        assert!(matches!(result, Err(DfmError::InvalidCount { .. })));
    }

    #[test]
    fn test_dimension_mismatch() {
        let tri_mat: TriMat<f64> = TriMat::new((2, 2));
        let result = Dfm::new(tri_mat.to_csr(), vec!["d".to_string()], vec![]);
        assert!(matches!(result, Err(DfmError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_select_features_with_repeats() {
        let x = create_test_dfm().with_meta(DfmMeta::with_weighting(Weighting::Relative));
        let subset = x.select_features(&[2, 0, 2]).unwrap();

        assert_eq!(subset.features(), &["dog", "the", "dog"]);
        assert_eq!(subset.get(0, 0), 2.0);
        assert_eq!(subset.get(0, 1), 5.0);
        assert_eq!(subset.get(2, 2), 2.0);
        assert_eq!(subset.meta().weighting, Weighting::Relative);
    }

    #[test]
    fn test_select_docs() {
        let x = create_test_dfm();
        let subset = x.select_docs(&[2, 0]).unwrap();

        assert_eq!(subset.docnames(), &["d3", "d1"]);
        assert_eq!(subset.row_dense(0), vec![0.0, 0.0, 2.0]);
        assert_eq!(subset.row_dense(1), vec![5.0, 1.0, 2.0]);
    }

    #[test]
    fn test_select_out_of_bounds() {
        let x = create_test_dfm();
        assert!(x.select_docs(&[3]).is_err());
        assert!(x.select_features(&[7]).is_err());
    }

    #[test]
    fn test_tsv_roundtrip() {
        let x = create_test_dfm();

        let temp_file = NamedTempFile::new().unwrap();
        x.to_tsv(temp_file.path()).unwrap();

        let loaded = Dfm::from_tsv(temp_file.path()).unwrap();
        assert_eq!(loaded.docnames(), x.docnames());
        assert_eq!(loaded.features(), x.features());
        assert_eq!(loaded.to_dense(), x.to_dense());
    }

    #[test]
    fn test_dense_conversion() {
        let dense = nalgebra::DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 4.0]);
        let x = Dfm::from_dense(
            &dense,
            vec!["a".to_string(), "b".to_string()],
            vec!["f1".to_string(), "f2".to_string()],
        )
        .unwrap();
        assert_eq!(x.nnz(), 2);
        assert_eq!(x.to_dense(), dense);
    }
}
