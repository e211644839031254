use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CertificationId, CourseId};

/// Certification model - a credential, optionally earned through a course
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Certification {
    pub id: CertificationId,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub validity_period: String,
    pub associated_course_id: Option<CourseId>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Certification joined with its course title
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CertificationWithCourse {
    #[sqlx(flatten)]
    pub certification: Certification,
    pub course_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCertification {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub validity_period: String,
    pub associated_course_id: Option<CourseId>,
}

impl Certification {
    pub async fn find_by_id(id: CertificationId, pool: &PgPool) -> Result<Option<CertificationWithCourse>> {
        let certification = sqlx::query_as::<_, CertificationWithCourse>(
            r#"
            SELECT c.*, co.title AS course_title
            FROM certifications c
            LEFT JOIN courses co ON co.id = c.associated_course_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(certification)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<CertificationWithCourse>> {
        let certifications = sqlx::query_as::<_, CertificationWithCourse>(
            r#"
            SELECT c.*, co.title AS course_title
            FROM certifications c
            LEFT JOIN courses co ON co.id = c.associated_course_id
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;
        Ok(certifications)
    }

    pub async fn create(input: CreateCertification, created_by: &str, pool: &PgPool) -> Result<Self> {
        let certification = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO certifications (
                id, title, description, requirements, validity_period,
                associated_course_id, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(CertificationId::new())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.requirements)
        .bind(&input.validity_period)
        .bind(input.associated_course_id)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(certification)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM certifications")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
