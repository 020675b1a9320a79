//! Viral Core - Shared video record structures, channel statistics and validation

pub mod channel;
pub mod input;
pub mod normalizer;
pub mod record;

pub use channel::{ChannelDirectory, ChannelStats};
pub use input::{parse_batch, parse_channels, InputBatch};
pub use normalizer::{NormalizedBatch, Normalizer, RejectedRecord};
pub use record::{RawCount, RawVideoRecord, VideoRecord};

/// Result type for Viral Core operations
pub type Result<T> = std::result::Result<T, ViralCoreError>;

/// Error types for Viral Core operations
#[derive(thiserror::Error, Debug)]
pub enum ViralCoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Per-record validation failure. A record failing validation is excluded
/// from scoring; the rest of the batch is unaffected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is negative: {value}")]
    NegativeCount { field: &'static str, value: i64 },

    #[error("field `{field}` is not a whole number: {value}")]
    InvalidCount { field: &'static str, value: String },

    #[error("video has zero views")]
    ZeroViews,

    #[error("invalid publish timestamp `{0}`")]
    InvalidTimestamp(String),

    #[error("published at {published_at} which is after fetch time {fetched_at}")]
    PublishedInFuture {
        published_at: String,
        fetched_at: String,
    },
}
