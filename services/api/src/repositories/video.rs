//! Video repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Counter, adjust_counter, like_pattern};
use crate::models::{ListQuery, NewVideo, UpdateVideoRequest, VideoRow, non_blank};

const SELECT_VIDEO: &str = r#"
    SELECT v.id, v.title, v.description, v.video_url, v.thumbnail_url, v.uploader_id,
           u.name AS uploader_name, u.avatar AS uploader_avatar,
           v.category, v.tags, v.is_public, v.duration, v.size, v.created_at
    FROM videos v
    JOIN users u ON u.id = v.uploader_id
"#;

// $1 owner, $2 search pattern, $3 category, $4 tag, $5 include private
const LIST_FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR v.uploader_id = $1)
      AND (v.is_public OR ($1::uuid IS NOT NULL AND $5::boolean))
      AND ($2::text IS NULL
           OR v.title ILIKE $2
           OR v.description ILIKE $2
           OR array_to_string(v.tags, ' ') ILIKE $2)
      AND ($3::text IS NULL OR LOWER(v.category) = LOWER($3))
      AND ($4::text IS NULL OR EXISTS (SELECT 1 FROM unnest(v.tags) t WHERE LOWER(t) = LOWER($4)))
"#;

/// Video repository for database operations
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    /// Create a new video repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get videos matching the listing filters, newest first, with the total count.
    ///
    /// An owner-scoped listing includes private items only when `include_private` is set.
    pub async fn list(
        &self,
        query: &ListQuery,
        include_private: bool,
    ) -> Result<(Vec<VideoRow>, i64)> {
        let pagination = query.pagination();
        let pattern = query.search_term().map(like_pattern);
        let category = non_blank(query.category.as_deref());
        let tag = non_blank(query.tag.as_deref());

        let sql = format!(
            "{} {} ORDER BY v.created_at DESC LIMIT $6 OFFSET $7",
            SELECT_VIDEO, LIST_FILTER
        );
        let rows = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(query.user_id)
            .bind(pattern.as_deref())
            .bind(category)
            .bind(tag)
            .bind(include_private)
            .bind(i64::from(pagination.limit))
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM videos v {}", LIST_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(query.user_id)
            .bind(pattern.as_deref())
            .bind(category)
            .bind(tag)
            .bind(include_private)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Get a video by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<VideoRow>> {
        let sql = format!("{} WHERE v.id = $1", SELECT_VIDEO);
        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Insert a video and count it for its uploader
    pub async fn create(&self, video: &NewVideo) -> Result<VideoRow> {
        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO videos (title, description, video_url, thumbnail_url, uploader_id, category, tags, is_public, duration, size)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&video.title)
        .bind(video.description.as_deref())
        .bind(&video.video_url)
        .bind(video.thumbnail_url.as_deref())
        .bind(video.uploader_id)
        .bind(video.category.as_deref())
        .bind(&video.tags)
        .bind(video.is_public)
        .bind(video.duration)
        .bind(video.size)
        .fetch_one(&mut *tx)
        .await?;

        adjust_counter(&mut *tx, Counter::Videos, video.uploader_id, true).await?;

        let sql = format!("{} WHERE v.id = $1", SELECT_VIDEO);
        let row = sqlx::query_as::<_, VideoRow>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Apply a partial update; absent fields are kept
    pub async fn update(&self, id: Uuid, update: &UpdateVideoRequest) -> Result<Option<VideoRow>> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                tags = COALESCE($5, tags),
                is_public = COALESCE($6, is_public),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.title.as_deref())
        .bind(update.description.as_deref())
        .bind(update.category.as_deref())
        .bind(&update.tags)
        .bind(update.is_public)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Delete a video and uncount it for its uploader
    pub async fn delete(&self, id: Uuid, uploader_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        adjust_counter(&mut *tx, Counter::Videos, uploader_id, false).await?;
        tx.commit().await?;
        Ok(true)
    }
}
