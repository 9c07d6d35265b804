/// Error taxonomy for the intensity index pipeline.
///
/// Every failure names what went wrong precisely: which record and field
/// for malformed input, which category for an undefined normalization,
/// which file for I/O and parse problems.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Category;

pub type Result<T> = std::result::Result<T, FwiiError>;

#[derive(Debug, Error)]
pub enum FwiiError {
    /// A raw warning record is missing a required field or carries an
    /// out-of-range value. Rejected records are counted, never dropped silently.
    #[error("malformed record #{index}: field '{field}' {reason}")]
    MalformedRecord {
        index: usize,
        field: &'static str,
        reason: String,
    },

    /// Normalization against a zero baseline score.
    #[error("{category} index is undefined: {reason}")]
    DivisionUndefined { category: Category, reason: String },

    /// Settings failed validation at load time.
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize baseline: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("invalid warning JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Refusal to overwrite an established baseline without an explicit replace.
    #[error("a baseline already exists at {path}; pass an explicit replace to recompute it")]
    BaselineExists { path: PathBuf },

    #[error("baseline must be established from year {expected}, not {found}")]
    BaselineYearMismatch { expected: i32, found: i32 },

    #[error("replacement baseline version {new} must be greater than current version {current}")]
    BaselineVersionNotIncreasing { current: u32, new: u32 },

    /// Nothing to revert: no replaced baseline and none established.
    #[error("no baseline to revert at {path}")]
    NoPreviousBaseline { path: PathBuf },

    /// Normalization requested before any baseline was established.
    /// Normalization is undefined for every category until one exists.
    #[error("baseline not established; run an explicit baseline calculation first")]
    BaselineNotEstablished,

    /// One or more per-area reconstruction jobs never reported back.
    #[error("reconstruction incomplete: {completed} of {expected} areas finished")]
    ReconstructionIncomplete { completed: usize, expected: usize },
}

impl FwiiError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FwiiError::Io {
            path: path.into(),
            source,
        }
    }
}
