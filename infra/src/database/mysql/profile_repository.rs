//! MySQL implementation of the ProfileRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use cv_core::domain::entities::UserProfile;
use cv_core::errors::DomainError;
use cv_core::repositories::ProfileRepository;

const PROFILE_COLUMNS: &str =
    "identity_key, name, contact_number, is_contact_verified, created_at, updated_at";

/// MySQL implementation of ProfileRepository
pub struct MySqlProfileRepository {
    pool: MySqlPool,
}

impl MySqlProfileRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_profile(row: &sqlx::mysql::MySqlRow) -> Result<UserProfile, DomainError> {
        Ok(UserProfile {
            identity_key: row.try_get("identity_key").map_err(column_error)?,
            name: row.try_get("name").map_err(column_error)?,
            contact_number: row.try_get("contact_number").map_err(column_error)?,
            is_contact_verified: row.try_get("is_contact_verified").map_err(column_error)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(column_error)?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(column_error)?,
        })
    }

    async fn fetch_one_by_key(&self, identity_key: &str) -> Result<UserProfile, DomainError> {
        self.find(identity_key)
            .await?
            .ok_or_else(|| DomainError::not_found("user profile"))
    }
}

fn column_error(e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to read profile column: {}", e),
    }
}

fn query_error(action: &str, e: sqlx::Error) -> DomainError {
    let is_duplicate = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if is_duplicate {
        return DomainError::Conflict {
            message: "Contact number is already registered to another account".to_string(),
        };
    }
    DomainError::Internal {
        message: format!("Failed to {}: {}", action, e),
    }
}

#[async_trait]
impl ProfileRepository for MySqlProfileRepository {
    async fn find(&self, identity_key: &str) -> Result<Option<UserProfile>, DomainError> {
        let query = format!("SELECT {} FROM user_profiles WHERE identity_key = ?", PROFILE_COLUMNS);
        let row = sqlx::query(&query)
            .bind(identity_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find profile", e))?;
        row.as_ref().map(Self::row_to_profile).transpose()
    }

    async fn find_by_contact(&self, contact_number: &str) -> Result<Option<UserProfile>, DomainError> {
        let query = format!("SELECT {} FROM user_profiles WHERE contact_number = ?", PROFILE_COLUMNS);
        let row = sqlx::query(&query)
            .bind(contact_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find profile by contact", e))?;
        row.as_ref().map(Self::row_to_profile).transpose()
    }

    async fn upsert(&self, identity_key: &str, name: Option<String>) -> Result<UserProfile, DomainError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO user_profiles (identity_key, name, is_contact_verified, created_at, updated_at)
            VALUES (?, ?, FALSE, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = COALESCE(VALUES(name), name),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(identity_key)
        .bind(&name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| query_error("upsert profile", e))?;

        self.fetch_one_by_key(identity_key).await
    }

    async fn update_contact(
        &self,
        identity_key: &str,
        contact_number: &str,
        verified: bool,
    ) -> Result<UserProfile, DomainError> {
        sqlx::query(
            r#"
            UPDATE user_profiles
            SET contact_number = ?, is_contact_verified = ?, updated_at = ?
            WHERE identity_key = ?
            "#,
        )
        .bind(contact_number)
        .bind(verified)
        .bind(Utc::now())
        .bind(identity_key)
        .execute(&self.pool)
        .await
        .map_err(|e| query_error("update contact number", e))?;

        // MySQL reports zero affected rows for unchanged values, so existence is checked by reading back
        self.fetch_one_by_key(identity_key).await
    }

    async fn mark_contact_verified(&self, identity_key: &str) -> Result<UserProfile, DomainError> {
        sqlx::query(
            "UPDATE user_profiles SET is_contact_verified = TRUE, updated_at = ? WHERE identity_key = ?",
        )
        .bind(Utc::now())
        .bind(identity_key)
        .execute(&self.pool)
        .await
        .map_err(|e| query_error("mark contact verified", e))?;

        self.fetch_one_by_key(identity_key).await
    }

    async fn list_with_contact(&self) -> Result<Vec<UserProfile>, DomainError> {
        let query = format!(
            "SELECT {} FROM user_profiles WHERE contact_number IS NOT NULL AND TRIM(contact_number) <> '' ORDER BY identity_key",
            PROFILE_COLUMNS
        );
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("list profiles", e))?;
        rows.iter().map(Self::row_to_profile).collect()
    }
}
