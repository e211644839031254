use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{MemberDocumentId, ParticipantId};
use crate::kernel::StoredFile;

/// A file a participant submitted for membership pre-qualification
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberDocument {
    pub id: MemberDocumentId,
    pub participant_id: ParticipantId,
    pub document_type: String,
    pub description: String,
    #[sqlx(flatten)]
    pub file: StoredFile,
    pub uploaded_at: DateTime<Utc>,
}

/// Member document joined with the uploading participant, for admin pages
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberDocumentWithParticipant {
    #[sqlx(flatten)]
    pub document: MemberDocument,
    pub participant_name: String,
    pub participant_email: String,
}

#[derive(Debug, Clone)]
pub struct CreateMemberDocument {
    pub participant_id: ParticipantId,
    pub document_type: String,
    pub description: String,
    pub file: StoredFile,
}

const SELECT_WITH_PARTICIPANT: &str = r#"
    SELECT d.*, p.name AS participant_name, p.email AS participant_email
    FROM member_documents d
    JOIN participants p ON p.id = d.participant_id
"#;

impl MemberDocument {
    pub async fn find_by_id(
        id: MemberDocumentId,
        pool: &PgPool,
    ) -> Result<Option<MemberDocumentWithParticipant>> {
        let document = sqlx::query_as::<_, MemberDocumentWithParticipant>(&format!(
            "{SELECT_WITH_PARTICIPANT} WHERE d.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(document)
    }

    /// All documents, most recently uploaded first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<MemberDocumentWithParticipant>> {
        let documents = sqlx::query_as::<_, MemberDocumentWithParticipant>(&format!(
            "{SELECT_WITH_PARTICIPANT} ORDER BY d.uploaded_at DESC, d.id DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(documents)
    }

    pub async fn find_by_participant(
        participant_id: ParticipantId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let documents = sqlx::query_as::<_, Self>(
            "SELECT * FROM member_documents WHERE participant_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(participant_id)
        .fetch_all(pool)
        .await?;
        Ok(documents)
    }

    pub async fn create(input: CreateMemberDocument, pool: &PgPool) -> Result<Self> {
        let document = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO member_documents (
                id, participant_id, document_type, description,
                storage_key, original_name, content_type, size_bytes, sha256
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(MemberDocumentId::new())
        .bind(input.participant_id)
        .bind(&input.document_type)
        .bind(&input.description)
        .bind(&input.file.storage_key)
        .bind(&input.file.original_name)
        .bind(&input.file.content_type)
        .bind(input.file.size_bytes)
        .bind(&input.file.sha256)
        .fetch_one(pool)
        .await?;
        Ok(document)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM member_documents")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
