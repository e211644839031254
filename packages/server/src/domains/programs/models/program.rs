use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::ProgramId;

/// Program model - a scheduled community program
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Program {
    pub id: ProgramId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a program
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProgram {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
}

impl Program {
    pub async fn find_by_id(id: ProgramId, pool: &PgPool) -> Result<Option<Self>> {
        let program = sqlx::query_as::<_, Self>("SELECT * FROM programs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(program)
    }

    /// All programs, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let programs =
            sqlx::query_as::<_, Self>("SELECT * FROM programs ORDER BY created_at DESC, id DESC")
                .fetch_all(pool)
                .await?;
        Ok(programs)
    }

    /// Most recently created programs (home page)
    pub async fn find_latest(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let programs = sqlx::query_as::<_, Self>(
            "SELECT * FROM programs ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(programs)
    }

    pub async fn create(input: CreateProgram, pool: &PgPool) -> Result<Self> {
        let program = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO programs (id, title, description, date, time, location)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(ProgramId::new())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.date)
        .bind(input.time)
        .bind(&input.location)
        .fetch_one(pool)
        .await?;
        Ok(program)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM programs")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
