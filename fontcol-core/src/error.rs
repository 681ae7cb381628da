//! Typed failures of the reconciliation engine (made by FontLab https://www.fontlab.com/)

use thiserror::Error;

use crate::introspect::MetadataQuery;
use crate::record::FontLocation;

/// Everything that can go wrong between raw introspection text and a variant list.
///
/// All of these abort the run. The one recoverable condition, an unpaired
/// family/style layout, lives in [`crate::expand::IllegalStyle`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("line {line}: expected {expected} fields, found {found}: {text:?}")]
    MalformedRecord {
        line: usize,
        expected: usize,
        found: usize,
        text: String,
    },

    #[error("line {line}: invalid face index {value:?}")]
    InvalidFaceIndex { line: usize, value: String },

    #[error("{location} is reported by the {present} query but not by the {missing} query")]
    LocationMismatch {
        location: FontLocation,
        present: MetadataQuery,
        missing: MetadataQuery,
    },

    #[error(
        "element numbers don't match for {location}: family lengths {families:?}, style lengths {styles:?}"
    )]
    InconsistentFace {
        location: FontLocation,
        families: Vec<usize>,
        styles: Vec<usize>,
    },

    #[error(
        "cannot select a style language for {location} with preferred languages {preferred:?} and styles in {available:?}"
    )]
    AmbiguousStyleLanguage {
        location: FontLocation,
        preferred: Vec<String>,
        available: Vec<String>,
    },

    #[error("{location} has unpaired family/style names and no PostScript name to fall back on")]
    MissingPostscriptFallback { location: FontLocation },
}
