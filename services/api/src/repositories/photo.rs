//! Photo repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Counter, adjust_counter, like_pattern};
use crate::models::{ListQuery, NewPhoto, PhotoRow, UpdatePhotoRequest, non_blank};

const SELECT_PHOTO: &str = r#"
    SELECT p.id, p.title, p.description, p.url, p.thumbnail_url, p.uploader_id,
           u.name AS uploader_name, u.avatar AS uploader_avatar,
           p.album, p.location, p.tags, p.is_public, p.created_at
    FROM photos p
    JOIN users u ON u.id = p.uploader_id
"#;

// $1 owner, $2 search pattern, $3 album, $4 tag, $5 include private
const LIST_FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR p.uploader_id = $1)
      AND (p.is_public OR ($1::uuid IS NOT NULL AND $5::boolean))
      AND ($2::text IS NULL
           OR p.title ILIKE $2
           OR p.description ILIKE $2
           OR array_to_string(p.tags, ' ') ILIKE $2)
      AND ($3::text IS NULL OR LOWER(p.album) = LOWER($3))
      AND ($4::text IS NULL OR EXISTS (SELECT 1 FROM unnest(p.tags) t WHERE LOWER(t) = LOWER($4)))
"#;

/// Photo repository for database operations
#[derive(Clone)]
pub struct PhotoRepository {
    pool: PgPool,
}

impl PhotoRepository {
    /// Create a new photo repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get photos matching the listing filters, newest first, with the total count.
    ///
    /// An owner-scoped listing includes private items only when `include_private` is set.
    pub async fn list(
        &self,
        query: &ListQuery,
        include_private: bool,
    ) -> Result<(Vec<PhotoRow>, i64)> {
        let pagination = query.pagination();
        let pattern = query.search_term().map(like_pattern);
        let album = non_blank(query.album.as_deref());
        let tag = non_blank(query.tag.as_deref());

        let sql = format!(
            "{} {} ORDER BY p.created_at DESC LIMIT $6 OFFSET $7",
            SELECT_PHOTO, LIST_FILTER
        );
        let rows = sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(query.user_id)
            .bind(pattern.as_deref())
            .bind(album)
            .bind(tag)
            .bind(include_private)
            .bind(i64::from(pagination.limit))
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM photos p {}", LIST_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(query.user_id)
            .bind(pattern.as_deref())
            .bind(album)
            .bind(tag)
            .bind(include_private)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Get a photo by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<PhotoRow>> {
        let sql = format!("{} WHERE p.id = $1", SELECT_PHOTO);
        let row = sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Insert a photo and count it for its uploader
    pub async fn create(&self, photo: &NewPhoto) -> Result<PhotoRow> {
        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO photos (title, description, url, thumbnail_url, uploader_id, album, location, tags, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&photo.title)
        .bind(photo.description.as_deref())
        .bind(&photo.url)
        .bind(photo.thumbnail_url.as_deref())
        .bind(photo.uploader_id)
        .bind(photo.album.as_deref())
        .bind(photo.location.as_deref())
        .bind(&photo.tags)
        .bind(photo.is_public)
        .fetch_one(&mut *tx)
        .await?;

        adjust_counter(&mut *tx, Counter::Photos, photo.uploader_id, true).await?;

        let sql = format!("{} WHERE p.id = $1", SELECT_PHOTO);
        let row = sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Apply a partial update; absent fields are kept
    pub async fn update(&self, id: Uuid, update: &UpdatePhotoRequest) -> Result<Option<PhotoRow>> {
        let result = sqlx::query(
            r#"
            UPDATE photos
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                album = COALESCE($4, album),
                location = COALESCE($5, location),
                tags = COALESCE($6, tags),
                is_public = COALESCE($7, is_public),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.title.as_deref())
        .bind(update.description.as_deref())
        .bind(update.album.as_deref())
        .bind(update.location.as_deref())
        .bind(&update.tags)
        .bind(update.is_public)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Delete a photo and uncount it for its uploader
    pub async fn delete(&self, id: Uuid, uploader_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        adjust_counter(&mut *tx, Counter::Photos, uploader_id, false).await?;
        tx.commit().await?;
        Ok(true)
    }
}
