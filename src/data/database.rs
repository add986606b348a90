//! SQLite database operations
//!
//! All database access goes through this module.

use std::path::Path;

use chrono::Utc;
use sqlx::{Pool, Sqlite, SqlitePool};

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to the SQLite database and run migrations.
    ///
    /// # Arguments
    /// * `path` - Path to the database file (created if missing)
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    /// Get a profile by user id.
    pub async fn get_profile(&self, id: &str) -> Result<Option<UserProfile>, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>("SELECT * FROM profiles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    /// List all profiles, most recently updated first.
    pub async fn list_profiles(&self) -> Result<Vec<UserProfile>, AppError> {
        let profiles =
            sqlx::query_as::<_, UserProfile>("SELECT * FROM profiles ORDER BY updated_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(profiles)
    }

    /// Insert a profile at registration time.
    ///
    /// `linkedin_connected` starts as NULL ("never attempted").
    ///
    /// # Errors
    /// `AppError::Persistence` if a profile with this id already exists.
    pub async fn insert_profile(&self, new: &NewUserProfile) -> Result<UserProfile, AppError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO profiles (
                id, username, email, display_name,
                linkedin_connected, linkedin_profile_id, unipile_id,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, NULL, NULL, NULL, ?, ?)
            "#,
        )
        .bind(&new.id)
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.display_name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        if let Err(sqlx::Error::Database(db_err)) = &result {
            if db_err.is_unique_violation() {
                return Err(AppError::Persistence(format!(
                    "profile {} already exists",
                    new.id
                )));
            }
        }
        result?;

        Ok(UserProfile {
            id: new.id.clone(),
            username: new.username.clone(),
            email: new.email.clone(),
            display_name: new.display_name.clone(),
            linkedin_connected: None,
            linkedin_profile_id: None,
            unipile_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a self-service patch to a profile.
    ///
    /// Only provided fields are written; `updated_at` is bumped.
    pub async fn patch_profile(
        &self,
        id: &str,
        patch: &UserProfilePatch,
    ) -> Result<UserProfile, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                username = COALESCE(?, username),
                email = COALESCE(?, email),
                display_name = COALESCE(?, display_name),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&patch.username)
        .bind(&patch.email)
        .bind(&patch.display_name)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        self.get_profile(id).await?.ok_or(AppError::NotFound)
    }

    // =========================================================================
    // LinkedIn connection fields (webhook writes)
    // =========================================================================

    /// Record a completed hosted auth: set `linkedin_connected = true`
    /// and store the provider account id.
    ///
    /// Idempotent by construction: redelivered events reapply the same
    /// deterministic overwrite.
    ///
    /// # Errors
    /// `AppError::Persistence` unless exactly one row was updated.
    pub async fn mark_linkedin_connected(
        &self,
        user_id: &str,
        unipile_account_id: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                linkedin_connected = 1,
                unipile_id = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(unipile_account_id)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        match result.rows_affected() {
            1 => Ok(()),
            n => Err(AppError::Persistence(format!(
                "linkedin connection update matched {n} rows for user {user_id}"
            ))),
        }
    }

    /// Persist the durable public identifier resolved by the webhook
    /// enrichment step.
    ///
    /// # Errors
    /// `AppError::Persistence` unless exactly one row was updated.
    pub async fn set_linkedin_profile_id(
        &self,
        user_id: &str,
        public_identifier: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                linkedin_profile_id = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(public_identifier)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        match result.rows_affected() {
            1 => Ok(()),
            n => Err(AppError::Persistence(format!(
                "linkedin profile id update matched {n} rows for user {user_id}"
            ))),
        }
    }
}
