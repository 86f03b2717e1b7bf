//! Multipart upload forms

use std::collections::HashMap;

use axum::extract::Multipart;
use media::{MediaError, MediaKind};
use tracing::error;

use crate::{
    error::{ApiError, ApiResult},
    models::parse_tags,
};

/// The `file` part of an upload
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A parsed multipart form: one file part plus text fields
#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Read every part; the part named `file` is kept as bytes
    pub async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "file" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed text field; blank counts as absent
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn required_text(&self, name: &str) -> ApiResult<String> {
        self.text(name)
            .ok_or_else(|| ApiError::BadRequest(format!("{} is required", capitalize(name))))
    }

    /// Boolean field accepting `true`/`false`; absent yields `default`
    pub fn flag(&self, name: &str, default: bool) -> ApiResult<bool> {
        match self.text(name) {
            None => Ok(default),
            Some(value) => value
                .to_ascii_lowercase()
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("{} must be true or false", name))),
        }
    }

    /// Non-negative number field
    pub fn number(&self, name: &str) -> ApiResult<Option<f64>> {
        match self.text(name) {
            None => Ok(None),
            Some(value) => match value.parse::<f64>() {
                Ok(n) if n.is_finite() && n >= 0.0 => Ok(Some(n)),
                _ => Err(ApiError::BadRequest(format!(
                    "{} must be a non-negative number",
                    name
                ))),
            },
        }
    }

    /// Comma-separated `tags` field
    pub fn tags(&self) -> Vec<String> {
        self.fields
            .get("tags")
            .map(|raw| parse_tags(raw))
            .unwrap_or_default()
    }

    /// Take the file part, checking it fits `kind`
    pub fn take_file(&mut self, kind: MediaKind) -> ApiResult<UploadedFile> {
        let file = self
            .file
            .take()
            .ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;

        if file.bytes.is_empty() {
            return Err(ApiError::BadRequest("File is empty".to_string()));
        }
        if !kind.accepts(&file.content_type) {
            return Err(media_error(MediaError::UnsupportedType {
                kind: kind.to_string(),
                content_type: file.content_type,
            }));
        }

        Ok(file)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Map a storage failure to a response; rejected input is the client's fault
pub fn media_error(err: MediaError) -> ApiError {
    match err {
        MediaError::UnsupportedType { .. } | MediaError::TooLarge { .. } | MediaError::Empty => {
            ApiError::BadRequest(err.to_string())
        }
        other => {
            error!("Media storage failed: {}", other);
            ApiError::InternalServerError
        }
    }
}
