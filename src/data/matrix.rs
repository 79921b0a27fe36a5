//! Shared capability of plain and resampled document-feature matrices.

use crate::data::dfm::Dfm;
use crate::data::meta::DfmMeta;
use crate::data::resampled::ResampledDfm;
use crate::error::Result;

/// Borrowed view of either matrix kind, for operations whose behavior
/// differs between them.
#[derive(Debug, Clone, Copy)]
pub enum DfmRef<'a> {
    Plain(&'a Dfm),
    Resampled(&'a ResampledDfm),
}

impl<'a> From<&'a Dfm> for DfmRef<'a> {
    fn from(x: &'a Dfm) -> Self {
        DfmRef::Plain(x)
    }
}

impl<'a> From<&'a ResampledDfm> for DfmRef<'a> {
    fn from(x: &'a ResampledDfm) -> Self {
        DfmRef::Resampled(x)
    }
}

/// Operations common to [`Dfm`] and [`ResampledDfm`].
///
/// Totals and document frequencies come from the rank-defining replicate of
/// a resampled matrix. Index selections apply to every replicate.
pub trait DocFeatureMatrix: Clone + Sized {
    fn docnames(&self) -> &[String];

    fn features(&self) -> &[String];

    fn meta(&self) -> &DfmMeta;

    fn ndoc(&self) -> usize {
        self.docnames().len()
    }

    fn nfeature(&self) -> usize {
        self.features().len()
    }

    /// Column sums.
    fn feature_totals(&self) -> Vec<f64>;

    /// Row sums.
    fn doc_totals(&self) -> Vec<f64>;

    /// Non-zero document count per feature.
    fn doc_freq(&self) -> Vec<usize>;

    fn select_docs(&self, indices: &[usize]) -> Result<Self>;

    fn select_features(&self, indices: &[usize]) -> Result<Self>;

    fn as_dfm_ref(&self) -> DfmRef<'_>;
}

impl DocFeatureMatrix for Dfm {
    fn docnames(&self) -> &[String] {
        Dfm::docnames(self)
    }

    fn features(&self) -> &[String] {
        Dfm::features(self)
    }

    fn meta(&self) -> &DfmMeta {
        Dfm::meta(self)
    }

    fn feature_totals(&self) -> Vec<f64> {
        Dfm::feature_totals(self)
    }

    fn doc_totals(&self) -> Vec<f64> {
        Dfm::doc_totals(self)
    }

    fn doc_freq(&self) -> Vec<usize> {
        Dfm::doc_freq(self)
    }

    fn select_docs(&self, indices: &[usize]) -> Result<Self> {
        Dfm::select_docs(self, indices)
    }

    fn select_features(&self, indices: &[usize]) -> Result<Self> {
        Dfm::select_features(self, indices)
    }

    fn as_dfm_ref(&self) -> DfmRef<'_> {
        DfmRef::Plain(self)
    }
}

impl DocFeatureMatrix for ResampledDfm {
    fn docnames(&self) -> &[String] {
        ResampledDfm::docnames(self)
    }

    fn features(&self) -> &[String] {
        ResampledDfm::features(self)
    }

    fn meta(&self) -> &DfmMeta {
        ResampledDfm::meta(self)
    }

    fn feature_totals(&self) -> Vec<f64> {
        self.first().feature_totals()
    }

    fn doc_totals(&self) -> Vec<f64> {
        self.first().doc_totals()
    }

    fn doc_freq(&self) -> Vec<usize> {
        self.first().doc_freq()
    }

    fn select_docs(&self, indices: &[usize]) -> Result<Self> {
        self.map_replicates(|rep| rep.select_docs(indices))
    }

    fn select_features(&self, indices: &[usize]) -> Result<Self> {
        self.map_replicates(|rep| rep.select_features(indices))
    }

    fn as_dfm_ref(&self) -> DfmRef<'_> {
        DfmRef::Resampled(self)
    }
}
