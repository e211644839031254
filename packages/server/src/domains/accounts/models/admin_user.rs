use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::AdminUserId;

/// Site account. Only `is_staff` accounts may sign in to the admin area.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
}

impl AdminUser {
    pub async fn find_by_id(id: AdminUserId, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, Self>("SELECT * FROM admin_users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, Self>("SELECT * FROM admin_users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn username_exists(username: &str, pool: &PgPool) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM admin_users WHERE lower(username) = lower($1))",
        )
        .bind(username)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(input: NewAdminUser, pool: &PgPool) -> Result<Self> {
        let user = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO admin_users (id, username, email, password_hash, is_staff)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(AdminUserId::new())
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.is_staff)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    /// Grant staff access and replace the password
    pub async fn promote_to_staff(
        id: AdminUserId,
        password_hash: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let user = sqlx::query_as::<_, Self>(
            r#"
            UPDATE admin_users SET
                is_staff = true,
                password_hash = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    pub async fn record_login(id: AdminUserId, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE admin_users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn find_staff(pool: &PgPool) -> Result<Vec<Self>> {
        let users = sqlx::query_as::<_, Self>(
            "SELECT * FROM admin_users WHERE is_staff = true ORDER BY username",
        )
        .fetch_all(pool)
        .await?;
        Ok(users)
    }
}
