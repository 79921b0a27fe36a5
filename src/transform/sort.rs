//! Reordering documents and features by marginal totals.

use crate::data::DocFeatureMatrix;
use crate::error::{DfmError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Matrix dimension targeted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Margin {
    /// Columns.
    #[default]
    Features,
    /// Rows.
    Docs,
    /// Rows and columns, each by its own totals.
    Both,
}

impl FromStr for Margin {
    type Err = DfmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "features" => Ok(Margin::Features),
            "docs" => Ok(Margin::Docs),
            "both" => Ok(Margin::Both),
            other => Err(DfmError::InvalidArgument(format!(
                "margin must be one of \"features\", \"docs\" or \"both\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Sort a matrix by its marginal totals.
///
/// Rows are ordered by row sums and columns by column sums. With
/// `Margin::Both` the two orderings are computed independently. Ties keep
/// their original relative order, so sorting an already sorted matrix is a
/// no-op.
pub fn sort_dfm<M: DocFeatureMatrix>(x: &M, decreasing: bool, margin: Margin) -> Result<M> {
    let mut sorted = x.clone();

    if matches!(margin, Margin::Docs | Margin::Both) {
        let order = order_by(&x.doc_totals(), decreasing);
        sorted = sorted.select_docs(&order)?;
    }
    if matches!(margin, Margin::Features | Margin::Both) {
        let order = order_by(&x.feature_totals(), decreasing);
        sorted = sorted.select_features(&order)?;
    }

    log::debug!(
        "Sorted {} documents and {} features by {:?} ({})",
        sorted.ndoc(),
        sorted.nfeature(),
        margin,
        if decreasing { "decreasing" } else { "increasing" }
    );

    Ok(sorted)
}

/// Stable ordering permutation of `values`.
pub(crate) fn order_by(values: &[f64], decreasing: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    if decreasing {
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    } else {
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    }
    order
}
