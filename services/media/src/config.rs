//! Media storage configuration

use std::env;

use crate::error::MediaError;

/// Media storage configuration
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Bucket receiving uploads
    pub bucket_name: String,
    /// Public CDN origin serving the bucket, without trailing slash
    pub public_base_url: String,
    /// Custom S3 endpoint for S3-compatible stores (MinIO, R2, ...)
    pub endpoint_url: Option<String>,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: usize,
    /// Attempts per upload before giving up
    pub upload_attempts: u32,
}

impl MediaConfig {
    /// Create a new MediaConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MEDIA_BUCKET_NAME`: Upload bucket (default: "media-bucket")
    /// - `MEDIA_PUBLIC_BASE_URL`: CDN origin (required)
    /// - `MEDIA_ENDPOINT_URL`: Optional S3 endpoint override
    /// - `MEDIA_MAX_UPLOAD_BYTES`: Upload size limit (default: 104857600)
    /// - `MEDIA_UPLOAD_ATTEMPTS`: Upload attempts (default: 3)
    pub fn from_env() -> Result<Self, MediaError> {
        let bucket_name =
            env::var("MEDIA_BUCKET_NAME").unwrap_or_else(|_| "media-bucket".to_string());

        let public_base_url = env::var("MEDIA_PUBLIC_BASE_URL").map_err(|_| {
            MediaError::Configuration("MEDIA_PUBLIC_BASE_URL environment variable not set".into())
        })?;
        let public_base_url = public_base_url.trim_end_matches('/').to_string();

        let endpoint_url = env::var("MEDIA_ENDPOINT_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let max_upload_bytes = env::var("MEDIA_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100 * 1024 * 1024);

        let upload_attempts = env::var("MEDIA_UPLOAD_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(3);

        Ok(Self {
            bucket_name,
            public_base_url,
            endpoint_url,
            max_upload_bytes,
            upload_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            for key in [
                "MEDIA_BUCKET_NAME",
                "MEDIA_PUBLIC_BASE_URL",
                "MEDIA_ENDPOINT_URL",
                "MEDIA_MAX_UPLOAD_BYTES",
                "MEDIA_UPLOAD_ATTEMPTS",
            ] {
                env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_public_base_url_is_required() {
        clear_env();
        assert!(matches!(
            MediaConfig::from_env(),
            Err(MediaError::Configuration(_))
        ));
    }

    #[test]
    #[serial]
    fn test_defaults_and_normalization() {
        clear_env();
        unsafe {
            env::set_var("MEDIA_PUBLIC_BASE_URL", "https://cdn.example.com/");
            env::set_var("MEDIA_ENDPOINT_URL", "  ");
            env::set_var("MEDIA_UPLOAD_ATTEMPTS", "0");
        }

        let config = MediaConfig::from_env().unwrap();
        assert_eq!(config.bucket_name, "media-bucket");
        assert_eq!(config.public_base_url, "https://cdn.example.com");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.max_upload_bytes, 104_857_600);
        assert_eq!(config.upload_attempts, 3);

        clear_env();
    }
}
