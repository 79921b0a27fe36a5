//! Metadata readers over any text object.

use crate::data::corpus::Corpus;
use crate::data::dfm::Dfm;
use crate::data::resampled::ResampledDfm;
use crate::error::{DfmError, Result};

/// Borrowed view over the text objects the accessors understand.
#[derive(Debug, Clone, Copy)]
pub enum TextRef<'a> {
    Corpus(&'a Corpus),
    Dfm(&'a Dfm),
    Resampled(&'a ResampledDfm),
}

impl<'a> From<&'a Corpus> for TextRef<'a> {
    fn from(x: &'a Corpus) -> Self {
        TextRef::Corpus(x)
    }
}

impl<'a> From<&'a Dfm> for TextRef<'a> {
    fn from(x: &'a Dfm) -> Self {
        TextRef::Dfm(x)
    }
}

impl<'a> From<&'a ResampledDfm> for TextRef<'a> {
    fn from(x: &'a ResampledDfm) -> Self {
        TextRef::Resampled(x)
    }
}

/// Feature names, in column order.
pub fn features<'a>(x: impl Into<TextRef<'a>>) -> Result<&'a [String]> {
    match x.into() {
        TextRef::Dfm(x) => Ok(x.features()),
        TextRef::Resampled(x) => Ok(x.features()),
        TextRef::Corpus(_) => Err(not_tokenized("features")),
    }
}

/// Document names, in row order.
pub fn docnames<'a>(x: impl Into<TextRef<'a>>) -> &'a [String] {
    match x.into() {
        TextRef::Corpus(x) => x.docnames(),
        TextRef::Dfm(x) => x.docnames(),
        TextRef::Resampled(x) => x.docnames(),
    }
}

/// Number of features.
///
/// A corpus has no features until it has been tokenized, so asking one for
/// its feature count is `NotImplemented`.
pub fn nfeature<'a>(x: impl Into<TextRef<'a>>) -> Result<usize> {
    features(x).map(<[String]>::len)
}

/// Number of documents.
pub fn ndoc<'a>(x: impl Into<TextRef<'a>>) -> usize {
    docnames(x).len()
}

fn not_tokenized(what: &str) -> DfmError {
    DfmError::NotImplemented(format!(
        "{} is not defined for a corpus; tokenize it into a dfm first",
        what
    ))
}
