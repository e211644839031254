use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{ParticipantId, VaultItemId};
use crate::kernel::StoredFile;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VaultItem {
    pub id: VaultItemId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub participant_id: Option<ParticipantId>,
    #[sqlx(flatten)]
    pub file: StoredFile,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VaultItemWithParticipant {
    #[sqlx(flatten)]
    pub item: VaultItem,
    pub participant_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateVaultItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub participant_id: Option<ParticipantId>,
    pub file: StoredFile,
}

const SELECT_WITH_PARTICIPANT: &str = r#"
    SELECT v.*, p.name AS participant_name
    FROM vault_items v
    LEFT JOIN participants p ON p.id = v.participant_id
"#;

impl VaultItem {
    pub async fn find_by_id(
        id: VaultItemId,
        pool: &PgPool,
    ) -> Result<Option<VaultItemWithParticipant>> {
        let item = sqlx::query_as::<_, VaultItemWithParticipant>(&format!(
            "{SELECT_WITH_PARTICIPANT} WHERE v.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(item)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<VaultItemWithParticipant>> {
        let items = sqlx::query_as::<_, VaultItemWithParticipant>(&format!(
            "{SELECT_WITH_PARTICIPANT} ORDER BY v.uploaded_at DESC, v.id DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    pub async fn create(input: CreateVaultItem, uploaded_by: &str, pool: &PgPool) -> Result<Self> {
        let item = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO vault_items (
                id, title, description, category, participant_id,
                storage_key, original_name, content_type, size_bytes, sha256, uploaded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(VaultItemId::new())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.participant_id)
        .bind(&input.file.storage_key)
        .bind(&input.file.original_name)
        .bind(&input.file.content_type)
        .bind(input.file.size_bytes)
        .bind(&input.file.sha256)
        .bind(uploaded_by)
        .fetch_one(pool)
        .await?;
        Ok(item)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vault_items")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
