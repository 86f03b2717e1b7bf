//! Public profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Public view of a user, with content counters
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub photos_count: i32,
    pub videos_count: i32,
    pub journals_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Request to update the caller's own profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl UpdateProfileRequest {
    /// Trim the name and check its length
    pub fn validate(mut self) -> Result<Self, String> {
        if let Some(name) = self.name.take() {
            let name = name.trim().to_string();
            let len = name.chars().count();
            if !(2..=50).contains(&len) {
                return Err("Name must be between 2 and 50 characters long".to_string());
            }
            self.name = Some(name);
        }
        if self.bio.as_ref().is_some_and(|bio| bio.chars().count() > 500) {
            return Err("Bio must be at most 500 characters long".to_string());
        }
        Ok(self)
    }
}
