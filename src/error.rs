use thiserror::Error;

/// Why a single file could not be turned into tracks.
///
/// Every variant names the file it belongs to, so a batch can report failures
/// next to the successes without further bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{file}: unsupported file format: {format:?}")]
    UnsupportedFormat { file: String, format: String },

    #[error("{file}: invalid file type, content does not match the file extension")]
    InvalidFileType { file: String },

    #[error("{file}: malformed track file: {reason}")]
    MalformedTrack { file: String, reason: String },

    #[error("{file}: failed to decode: {reason}")]
    Decode { file: String, reason: String },
}

impl ExtractError {
    pub fn file(&self) -> &str {
        match self {
            ExtractError::UnsupportedFormat { file, .. }
            | ExtractError::InvalidFileType { file }
            | ExtractError::MalformedTrack { file, .. }
            | ExtractError::Decode { file, .. } => file,
        }
    }

    pub(crate) fn malformed(file: &str, reason: impl Into<String>) -> Self {
        ExtractError::MalformedTrack {
            file: file.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(file: &str, reason: impl ToString) -> Self {
        ExtractError::Decode {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
