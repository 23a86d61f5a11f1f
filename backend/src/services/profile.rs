//! Profile service
//!
//! Profiles mirror the external identity provider's user ids; a row is
//! created lazily the first time a user touches their profile.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::Profile;

/// Profile service
#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

impl ProfileService {
    /// Create a new ProfileService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, name, created_at FROM profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Profile::from))
    }

    async fn create(&self, user_id: Uuid, name: Option<&str>) -> AppResult<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "INSERT INTO profiles (id, name) VALUES ($1, $2) RETURNING id, name, created_at",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Fetch the user's profile, creating the default row on first access.
    pub async fn get_or_create(&self, user_id: Uuid) -> AppResult<Profile> {
        match self.find(user_id).await? {
            Some(profile) => Ok(profile),
            None => self.create(user_id, None).await,
        }
    }

    /// Update the profile name, creating the row first when absent.
    pub async fn update_name(&self, user_id: Uuid, name: &str) -> AppResult<Profile> {
        if self.find(user_id).await?.is_none() {
            return self.create(user_id, Some(name)).await;
        }

        let row = sqlx::query_as::<_, ProfileRow>(
            "UPDATE profiles SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }
}
