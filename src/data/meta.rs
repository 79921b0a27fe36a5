//! Non-structural annotations carried by document-feature matrices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weighting scheme applied to the cell values of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Raw term counts.
    #[default]
    Frequency,
    /// Counts divided by the document total.
    Relative,
    /// Relative frequencies scaled by 100.
    Percentage,
    /// 1 + log10 of the count for non-zero cells.
    LogAve,
    /// Term frequency times inverse document frequency.
    TfIdf,
}

impl std::fmt::Display for Weighting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Weighting::Frequency => "frequency",
            Weighting::Relative => "relative",
            Weighting::Percentage => "percentage",
            Weighting::LogAve => "logave",
            Weighting::TfIdf => "tfidf",
        };
        f.write_str(name)
    }
}

/// Metadata that travels with a matrix through every transformation.
///
/// Trimming, sorting and sampling never inspect these fields; they copy them
/// onto the value they return.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DfmMeta {
    /// Weighting applied upstream.
    pub weighting: Weighting,
    /// Free-form settings recorded by the producer (tokenizer options, etc.).
    pub settings: BTreeMap<String, String>,
}

impl DfmMeta {
    /// Create metadata with the given weighting and no settings.
    pub fn with_weighting(weighting: Weighting) -> Self {
        Self {
            weighting,
            settings: BTreeMap::new(),
        }
    }

    /// Record a setting, replacing any previous value.
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.settings.insert(key.to_string(), value.to_string());
        self
    }
}
