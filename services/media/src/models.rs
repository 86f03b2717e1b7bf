use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::error::MediaError;

/// What an uploaded file is used for; decides its key prefix and accepted types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    Attachment,
}

impl MediaKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photos",
            MediaKind::Video => "videos",
            MediaKind::Attachment => "attachments",
        }
    }

    /// Whether a declared MIME type is acceptable for this kind
    pub fn accepts(&self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        match self {
            MediaKind::Photo => content_type.starts_with("image/"),
            MediaKind::Video => content_type.starts_with("video/"),
            MediaKind::Attachment => {
                content_type.starts_with("image/")
                    || content_type.starts_with("video/")
                    || content_type.starts_with("audio/")
                    || content_type == "application/pdf"
            }
        }
    }

    /// Key prefix shared by every upload of this kind made by `owner`
    pub fn owner_prefix(&self, owner: Uuid) -> String {
        format!("{}/{}/", self.prefix(), owner)
    }

    /// Object key for a new upload: `{prefix}/{owner}/{uuid}.{ext}`
    pub fn object_key(&self, owner: Uuid, file_name: &str, content_type: &str) -> String {
        let id = Uuid::new_v4();
        let prefix = self.owner_prefix(owner);
        match extension(file_name, content_type) {
            Some(ext) => format!("{}{}.{}", prefix, id, ext),
            None => format!("{}{}", prefix, id),
        }
    }

    /// Whether `key` names an upload of this kind made by `owner`
    pub fn is_owned_by(&self, key: &str, owner: Uuid) -> bool {
        key.strip_prefix(&self.owner_prefix(owner))
            .is_some_and(|name| !name.is_empty() && !name.contains('/'))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Attachment => "attachment",
        })
    }
}

fn extension(file_name: &str, content_type: &str) -> Option<String> {
    let from_name = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name.or_else(|| {
        let subtype = content_type.split('/').nth(1)?.split(';').next()?.trim();
        match subtype {
            "jpeg" => Some("jpg".to_string()),
            "quicktime" => Some("mov".to_string()),
            s if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Some(s.to_ascii_lowercase())
            }
            _ => None,
        }
    })
}

/// Location of a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub key: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub size: usize,
}

/// Storage backend for uploaded media
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `bytes` uploaded by `owner` and return where the CDN serves them
    async fn upload(
        &self,
        kind: MediaKind,
        owner: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredMedia, MediaError>;

    /// Remove a stored object
    async fn delete(&self, key: &str) -> Result<(), MediaError>;

    /// Map a public URL produced by this store back to its object key
    fn key_from_url(&self, url: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_types() {
        assert!(MediaKind::Photo.accepts("image/png"));
        assert!(MediaKind::Photo.accepts(" Image/JPEG"));
        assert!(!MediaKind::Photo.accepts("video/mp4"));
        assert!(MediaKind::Video.accepts("video/mp4"));
        assert!(!MediaKind::Video.accepts("application/octet-stream"));
        assert!(MediaKind::Attachment.accepts("application/pdf"));
        assert!(!MediaKind::Attachment.accepts("text/html"));
    }

    #[test]
    fn test_object_key_uses_prefix_owner_and_extension() {
        let owner = Uuid::new_v4();

        let key = MediaKind::Photo.object_key(owner, "Holiday.JPG", "image/jpeg");
        assert!(key.starts_with(&format!("photos/{}/", owner)));
        assert!(key.ends_with(".jpg"));

        let key = MediaKind::Video.object_key(owner, "clip", "video/quicktime");
        assert!(key.starts_with(&format!("videos/{}/", owner)));
        assert!(key.ends_with(".mov"));

        let key = MediaKind::Attachment.object_key(owner, "weird.<script>", "application/x-foo+bar");
        let name = key.strip_prefix(&format!("attachments/{}/", owner)).unwrap();
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_ownership_follows_kind_and_owner() {
        let owner = Uuid::new_v4();
        let key = MediaKind::Attachment.object_key(owner, "notes.pdf", "application/pdf");

        assert!(MediaKind::Attachment.is_owned_by(&key, owner));
        assert!(!MediaKind::Attachment.is_owned_by(&key, Uuid::new_v4()));
        assert!(!MediaKind::Photo.is_owned_by(&key, owner));

        let escaped = format!("attachments/{}/../../photos/x.jpg", owner);
        assert!(!MediaKind::Attachment.is_owned_by(&escaped, owner));
        assert!(!MediaKind::Attachment.is_owned_by(&format!("attachments/{}/", owner), owner));
    }
}
