use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::CourseId;

/// Difficulty level of a course
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub const ALL: [CourseLevel; 3] = [
        CourseLevel::Beginner,
        CourseLevel::Intermediate,
        CourseLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CourseLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Beginner" => Ok(CourseLevel::Beginner),
            "Intermediate" => Ok(CourseLevel::Intermediate),
            "Advanced" => Ok(CourseLevel::Advanced),
            _ => Err(anyhow::anyhow!("Invalid course level: {}", s)),
        }
    }
}

/// Course model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub content: String,
    pub duration: String,
    pub level: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub content: String,
    pub duration: String,
    pub level: CourseLevel,
}

impl Course {
    pub async fn find_by_id(id: CourseId, pool: &PgPool) -> Result<Option<Self>> {
        let course = sqlx::query_as::<_, Self>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(course)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let courses =
            sqlx::query_as::<_, Self>("SELECT * FROM courses ORDER BY created_at DESC, id DESC")
                .fetch_all(pool)
                .await?;
        Ok(courses)
    }

    pub async fn create(input: CreateCourse, created_by: &str, pool: &PgPool) -> Result<Self> {
        let course = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO courses (id, title, description, content, duration, level, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(CourseId::new())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.content)
        .bind(&input.duration)
        .bind(input.level.as_str())
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(course)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_round_trips_through_strings() {
        for level in CourseLevel::ALL {
            assert_eq!(level.as_str().parse::<CourseLevel>().unwrap(), level);
        }
        assert!("Expert".parse::<CourseLevel>().is_err());
        assert_eq!(CourseLevel::default(), CourseLevel::Beginner);
    }
}
