use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::DocumentId;

/// Document model - a written guide or reference page
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDocument {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl Document {
    pub async fn find_by_id(id: DocumentId, pool: &PgPool) -> Result<Option<Self>> {
        let document = sqlx::query_as::<_, Self>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(document)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let documents =
            sqlx::query_as::<_, Self>("SELECT * FROM documents ORDER BY created_at DESC, id DESC")
                .fetch_all(pool)
                .await?;
        Ok(documents)
    }

    pub async fn create(input: CreateDocument, created_by: &str, pool: &PgPool) -> Result<Self> {
        let document = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO documents (id, title, content, category, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(DocumentId::new())
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.category)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(document)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
