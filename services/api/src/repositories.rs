//! Repositories for database operations

use anyhow::Result;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{UpdateProfileRequest, UserProfile};

pub mod journal;
pub mod photo;
pub mod video;

pub use journal::JournalRepository;
pub use photo::PhotoRepository;
pub use video::VideoRepository;

/// Per-user content counter kept on the `users` row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Photos,
    Videos,
    Journals,
}

impl Counter {
    fn column(&self) -> &'static str {
        match self {
            Counter::Photos => "photos_count",
            Counter::Videos => "videos_count",
            Counter::Journals => "journals_count",
        }
    }
}

/// Move a user's counter by one, never below zero
pub(crate) async fn adjust_counter(
    conn: &mut PgConnection,
    counter: Counter,
    user_id: Uuid,
    increment: bool,
) -> Result<()> {
    let column = counter.column();
    let sql = if increment {
        format!(
            "UPDATE users SET {column} = {column} + 1, updated_at = NOW() WHERE id = $1"
        )
    } else {
        format!(
            "UPDATE users SET {column} = GREATEST({column} - 1, 0), updated_at = NOW() WHERE id = $1"
        )
    };

    sqlx::query(&sql).bind(user_id).execute(conn).await?;
    Ok(())
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` escaped
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// User repository for profile reads and updates
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by user ID
    pub async fn find_profile(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, name, avatar, bio, photos_count, videos_count, journals_count, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Apply a partial profile update; absent fields are kept
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                avatar = COALESCE($4, avatar),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, avatar, bio, photos_count, videos_count, journals_count, created_at
            "#,
        )
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.bio.as_deref())
        .bind(update.avatar.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("sunset"), "%sunset%");
        assert_eq!(like_pattern("100%_real\\"), "%100\\%\\_real\\\\%");
    }

    #[test]
    fn test_counter_columns() {
        assert_eq!(Counter::Photos.column(), "photos_count");
        assert_eq!(Counter::Videos.column(), "videos_count");
        assert_eq!(Counter::Journals.column(), "journals_count");
    }
}
