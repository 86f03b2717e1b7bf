//! Media storage for uploaded photos, videos and journal attachments
//!
//! Uploaded bytes are written to an S3-compatible bucket fronted by a CDN.
//! The CDN serves originals at `{public_base_url}/{key}` and derived
//! thumbnails under `{public_base_url}/thumbnails/`.

pub mod config;
pub mod error;
pub mod models;
pub mod s3_store;
pub mod thumbnail;

pub use config::MediaConfig;
pub use error::MediaError;
pub use models::{MediaKind, MediaStore, StoredMedia};
pub use s3_store::S3MediaStore;
