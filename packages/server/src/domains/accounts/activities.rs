//! Account actions: registration, credential checks and staff bootstrap

use anyhow::Result;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use super::data::NewRegistration;
use super::models::{AdminUser, NewAdminUser};
use super::password::{hash_password_blocking, verify_password_blocking};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("A user with that username already exists.")]
    UsernameTaken,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Create a non-staff account from a validated registration
pub async fn register(input: NewRegistration, pool: &PgPool) -> Result<AdminUser, AccountError> {
    if AdminUser::username_exists(&input.username, pool).await? {
        return Err(AccountError::UsernameTaken);
    }

    let password_hash = hash_password_blocking(&input.password).await?;
    let user = AdminUser::create(
        NewAdminUser {
            username: input.username,
            email: input.email,
            password_hash,
            is_staff: false,
        },
        pool,
    )
    .await?;

    info!(user_id = %user.id, username = %user.username, "Account registered");

    Ok(user)
}

/// Look up an account by credentials, recording the login on success
pub async fn authenticate(username: &str, password: &str, pool: &PgPool) -> Result<Option<AdminUser>> {
    let Some(user) = AdminUser::find_by_username(username, pool).await? else {
        warn!(username = %username, "Login attempt for unknown user");
        return Ok(None);
    };

    if !verify_password_blocking(password, &user.password_hash).await? {
        warn!(username = %username, "Login attempt with wrong password");
        return Ok(None);
    }

    AdminUser::record_login(user.id, pool).await?;
    Ok(Some(user))
}

/// Create a staff account, or promote and reset an existing one
pub async fn ensure_staff_user(
    username: &str,
    password: &str,
    email: Option<&str>,
    pool: &PgPool,
) -> Result<AdminUser> {
    if let Some(existing) = AdminUser::find_by_username(username, pool).await? {
        if existing.is_staff && verify_password_blocking(password, &existing.password_hash).await? {
            return Ok(existing);
        }
        let password_hash = hash_password_blocking(password).await?;
        let user = AdminUser::promote_to_staff(existing.id, &password_hash, pool).await?;
        info!(username = %username, "Existing account granted staff access");
        return Ok(user);
    }

    let password_hash = hash_password_blocking(password).await?;
    let user = AdminUser::create(
        NewAdminUser {
            username: username.to_string(),
            email: email.unwrap_or_default().to_string(),
            password_hash,
            is_staff: true,
        },
        pool,
    )
    .await?;

    info!(username = %username, "Staff account created");

    Ok(user)
}
