//! Thumbnail locations derived by the CDN
//!
//! Photos get a resized copy at the same key, videos a poster frame with the
//! extension replaced by `.jpg`. Both live under the `thumbnails/` prefix.

use crate::models::MediaKind;

const THUMBNAIL_PREFIX: &str = "thumbnails";

/// Key of the thumbnail for an object, if that kind has one
pub fn thumbnail_key(kind: MediaKind, key: &str) -> Option<String> {
    match kind {
        MediaKind::Photo => Some(format!("{}/{}", THUMBNAIL_PREFIX, key)),
        MediaKind::Video => Some(format!("{}/{}", THUMBNAIL_PREFIX, poster_key(key))),
        MediaKind::Attachment => None,
    }
}

/// Replace the file extension with `.jpg`
fn poster_key(video_key: &str) -> String {
    let (dir, file) = match video_key.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, video_key),
    };

    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    match dir {
        Some(dir) => format!("{}/{}.jpg", dir, stem),
        None => format!("{}.jpg", stem),
    }
}
