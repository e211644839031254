use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::ParticipantId;

/// Participant model - a registered parent or guardian
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub children_ages: String,
    pub registered_at: DateTime<Utc>,
}

/// Input for registering a participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParticipant {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub children_ages: String,
}

impl Participant {
    pub async fn find_by_id(id: ParticipantId, pool: &PgPool) -> Result<Option<Self>> {
        let participant = sqlx::query_as::<_, Self>("SELECT * FROM participants WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(participant)
    }

    /// Email lookup is case-insensitive
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let participant = sqlx::query_as::<_, Self>(
            "SELECT * FROM participants WHERE lower(email) = lower($1) ORDER BY registered_at LIMIT 1",
        )
        .bind(email.trim())
        .fetch_optional(pool)
        .await?;
        Ok(participant)
    }

    /// All participants, most recently registered first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let participants = sqlx::query_as::<_, Self>(
            "SELECT * FROM participants ORDER BY registered_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(participants)
    }

    pub async fn create(input: CreateParticipant, pool: &PgPool) -> Result<Self> {
        let participant = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO participants (id, name, email, phone, children_ages)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(ParticipantId::new())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.children_ages)
        .fetch_one(pool)
        .await?;
        Ok(participant)
    }

    /// Find a participant by email, creating one from `defaults` when missing.
    ///
    /// Returns the participant and whether it was created.
    pub async fn find_or_create_by_email(
        defaults: CreateParticipant,
        pool: &PgPool,
    ) -> Result<(Self, bool)> {
        if let Some(existing) = Self::find_by_email(&defaults.email, pool).await? {
            return Ok((existing, false));
        }
        let created = Self::create(defaults, pool).await?;
        Ok((created, true))
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM participants")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
