//! Error types for Trialign.

use thiserror::Error;

/// Result type alias for Trialign operations.
pub type Result<T> = std::result::Result<T, TrialignError>;

/// Error types for the alignment pipeline.
///
/// All variants are fatal for the session in which they occur: the pipeline
/// performs no retries and emits no partial output.
#[derive(Error, Debug)]
pub enum TrialignError {
    /// Unrecognized per-unit quality code.
    #[error("Unrecognized unit quality code: {code:?}")]
    Decode { code: String },

    /// Ephys sync sequence shares no starting code with the behavior sequence.
    #[error("No shared sync-code anchor between ephys and behavior sequences")]
    SyncAnchorNotFound,

    /// Sync sequences fail exact comparison and no fallback renumbering exists.
    #[error("Sync code mismatch and no fallback trial renumbering available")]
    BitcodeMismatch,

    /// A unit is present in one pipeline stage and absent in another.
    #[error("Unit {unit_id} missing from a pipeline stage")]
    UnknownUnit { unit_id: i64 },

    /// Data length mismatch between arrays.
    #[error("Data length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Empty data error.
    #[error("Empty data provided for {context}")]
    EmptyData { context: String },

    /// Invalid input data.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

impl TrialignError {
    /// Create a quality decode error.
    pub fn decode(code: impl Into<String>) -> Self {
        Self::Decode { code: code.into() }
    }

    /// Create an unknown unit error.
    pub fn unknown_unit(unit_id: i64) -> Self {
        Self::UnknownUnit { unit_id }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Create an empty data error.
    pub fn empty_data(context: impl Into<String>) -> Self {
        Self::EmptyData {
            context: context.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}
