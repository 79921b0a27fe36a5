//! Untokenized collections of named texts.

use crate::error::{DfmError, Result};

/// A collection of documents before tokenization.
///
/// Only document-level metadata is available; feature-level questions need
/// a [`Dfm`](crate::data::Dfm) built from it first.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    docnames: Vec<String>,
    texts: Vec<String>,
}

impl Corpus {
    /// Create a corpus from `(docname, text)` pairs.
    pub fn new<I, S, T>(docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let (docnames, texts): (Vec<String>, Vec<String>) = docs
            .into_iter()
            .map(|(name, text)| (name.into(), text.into()))
            .unzip();

        let mut seen = std::collections::HashSet::new();
        for name in &docnames {
            if !seen.insert(name.as_str()) {
                return Err(DfmError::DuplicateLabel {
                    axis: "document".to_string(),
                    label: name.clone(),
                });
            }
        }

        Ok(Self { docnames, texts })
    }

    #[inline]
    pub fn docnames(&self) -> &[String] {
        &self.docnames
    }

    #[inline]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    #[inline]
    pub fn ndoc(&self) -> usize {
        self.docnames.len()
    }
}
