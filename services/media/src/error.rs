//! Media storage errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    /// Content type does not match the media kind being uploaded
    #[error("unsupported content type {content_type} for {kind}")]
    UnsupportedType { kind: String, content_type: String },

    /// Upload exceeds the configured size limit
    #[error("file of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    /// Upload carried no bytes
    #[error("empty upload")]
    Empty,

    /// Storage backend rejected the upload
    #[error("upload failed: {0}")]
    Upload(String),

    /// Storage backend rejected the delete
    #[error("delete failed: {0}")]
    Delete(String),

    /// Missing or invalid configuration
    #[error("media configuration error: {0}")]
    Configuration(String),
}
