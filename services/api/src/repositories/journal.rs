//! Journal repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Counter, adjust_counter, like_pattern};
use crate::models::{CreateJournalRequest, JournalRow, ListQuery, UpdateJournalRequest, non_blank};

const SELECT_JOURNAL: &str = r#"
    SELECT j.id, j.title, j.content, j.author_id,
           u.name AS author_name, u.avatar AS author_avatar,
           j.mood, j.location, j.tags, j.attachments, j.is_public, j.created_at
    FROM journals j
    JOIN users u ON u.id = j.author_id
"#;

// $1 owner, $2 search pattern, $3 mood, $4 tag, $5 include private
const LIST_FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR j.author_id = $1)
      AND (j.is_public OR ($1::uuid IS NOT NULL AND $5::boolean))
      AND ($2::text IS NULL
           OR j.title ILIKE $2
           OR j.content ILIKE $2
           OR array_to_string(j.tags, ' ') ILIKE $2)
      AND ($3::text IS NULL OR LOWER(j.mood) = LOWER($3))
      AND ($4::text IS NULL OR EXISTS (SELECT 1 FROM unnest(j.tags) t WHERE LOWER(t) = LOWER($4)))
"#;

/// Journal repository for database operations
#[derive(Clone)]
pub struct JournalRepository {
    pool: PgPool,
}

impl JournalRepository {
    /// Create a new journal repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get journals matching the listing filters, newest first, with the total count.
    ///
    /// An owner-scoped listing includes private items only when `include_private` is set.
    pub async fn list(
        &self,
        query: &ListQuery,
        include_private: bool,
    ) -> Result<(Vec<JournalRow>, i64)> {
        let pagination = query.pagination();
        let pattern = query.search_term().map(like_pattern);
        let mood = non_blank(query.mood.as_deref());
        let tag = non_blank(query.tag.as_deref());

        let sql = format!(
            "{} {} ORDER BY j.created_at DESC LIMIT $6 OFFSET $7",
            SELECT_JOURNAL, LIST_FILTER
        );
        let rows = sqlx::query_as::<_, JournalRow>(&sql)
            .bind(query.user_id)
            .bind(pattern.as_deref())
            .bind(mood)
            .bind(tag)
            .bind(include_private)
            .bind(i64::from(pagination.limit))
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM journals j {}", LIST_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(query.user_id)
            .bind(pattern.as_deref())
            .bind(mood)
            .bind(tag)
            .bind(include_private)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Get a journal by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<JournalRow>> {
        let sql = format!("{} WHERE j.id = $1", SELECT_JOURNAL);
        let row = sqlx::query_as::<_, JournalRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Insert a journal and count it for its author
    pub async fn create(&self, author_id: Uuid, journal: &CreateJournalRequest) -> Result<JournalRow> {
        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO journals (title, content, author_id, mood, location, tags, attachments, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(journal.title.trim())
        .bind(&journal.content)
        .bind(author_id)
        .bind(journal.mood.as_deref())
        .bind(journal.location.as_deref())
        .bind(&journal.tags)
        .bind(&journal.attachments)
        .bind(journal.is_public)
        .fetch_one(&mut *tx)
        .await?;

        adjust_counter(&mut *tx, Counter::Journals, author_id, true).await?;

        let sql = format!("{} WHERE j.id = $1", SELECT_JOURNAL);
        let row = sqlx::query_as::<_, JournalRow>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Apply a partial update; absent fields are kept
    pub async fn update(
        &self,
        id: Uuid,
        update: &UpdateJournalRequest,
    ) -> Result<Option<JournalRow>> {
        let result = sqlx::query(
            r#"
            UPDATE journals
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                mood = COALESCE($4, mood),
                location = COALESCE($5, location),
                tags = COALESCE($6, tags),
                attachments = COALESCE($7, attachments),
                is_public = COALESCE($8, is_public),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.title.as_deref())
        .bind(update.content.as_deref())
        .bind(update.mood.as_deref())
        .bind(update.location.as_deref())
        .bind(&update.tags)
        .bind(&update.attachments)
        .bind(update.is_public)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Delete a journal and uncount it for its author
    pub async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM journals WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        adjust_counter(&mut *tx, Counter::Journals, author_id, false).await?;
        tx.commit().await?;
        Ok(true)
    }
}
