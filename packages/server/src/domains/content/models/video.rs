use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::VideoId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum VideoCategory {
    #[default]
    General,
    Education,
    Training,
}

impl VideoCategory {
    pub const ALL: [VideoCategory; 3] = [
        VideoCategory::General,
        VideoCategory::Education,
        VideoCategory::Training,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCategory::General => "General",
            VideoCategory::Education => "Education",
            VideoCategory::Training => "Training",
        }
    }
}

impl std::str::FromStr for VideoCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "General" => Ok(VideoCategory::General),
            "Education" => Ok(VideoCategory::Education),
            "Training" => Ok(VideoCategory::Training),
            _ => Err(anyhow::anyhow!("Invalid video category: {}", s)),
        }
    }
}

/// Video model - an externally hosted video linked from the site
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub category: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVideo {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub category: VideoCategory,
}

impl Video {
    pub async fn find_by_id(id: VideoId, pool: &PgPool) -> Result<Option<Self>> {
        let video = sqlx::query_as::<_, Self>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(video)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let videos =
            sqlx::query_as::<_, Self>("SELECT * FROM videos ORDER BY created_at DESC, id DESC")
                .fetch_all(pool)
                .await?;
        Ok(videos)
    }

    pub async fn create(input: CreateVideo, created_by: &str, pool: &PgPool) -> Result<Self> {
        let video = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO videos (
                id, title, description, video_url, thumbnail_url, duration, category, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(VideoId::new())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.video_url)
        .bind(&input.thumbnail_url)
        .bind(&input.duration)
        .bind(input.category.as_str())
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(video)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
