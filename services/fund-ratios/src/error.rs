//! Error types for the fund ratio service

use common::SchemeCode;
use thiserror::Error;

/// Fund ratio service errors
///
/// Only [`FundError::MetadataUnavailable`] crosses the service boundary; the
/// series and timeout variants are produced on the background computation
/// path and absorbed there.
#[derive(Debug, Error)]
pub enum FundError {
    /// Raw fund metadata could not be fetched
    #[error("Metadata unavailable for scheme {scheme_code}: {reason}")]
    MetadataUnavailable {
        scheme_code: SchemeCode,
        reason: String,
    },

    /// Historical series could not be fetched or decoded
    #[error("Series unavailable for {instrument}: {reason}")]
    SeriesUnavailable { instrument: String, reason: String },

    /// Historical series came back without any samples
    #[error("Empty series for {instrument}")]
    EmptySeries { instrument: String },

    /// Collaborator call exceeded its deadline
    #[error("Timeout: {operation} after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    /// Transport level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Environment or file configuration was invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for FundError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FundError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl FundError {
    /// Wrap any collaborator failure as a metadata failure for `scheme_code`
    #[must_use]
    pub fn into_metadata(self, scheme_code: SchemeCode) -> Self {
        match self {
            err @ Self::MetadataUnavailable { .. } => err,
            other => Self::MetadataUnavailable {
                scheme_code,
                reason: other.to_string(),
            },
        }
    }

    /// Wrap any collaborator failure as a series failure for `instrument`
    #[must_use]
    pub fn into_series(self, instrument: &str) -> Self {
        match self {
            err @ (Self::SeriesUnavailable { .. } | Self::EmptySeries { .. } | Self::Timeout { .. }) => {
                err
            }
            other => Self::SeriesUnavailable {
                instrument: instrument.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result alias used across the crate
pub type FundResult<T> = Result<T, FundError>;
