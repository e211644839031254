use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use super::data::ValidMemberUpload;
use super::models::{CreateMemberDocument, MemberDocument};
use crate::domains::participants::Participant;
use crate::kernel::{FileStore, StorageError, Upload};

#[derive(Error, Debug)]
pub enum MembershipError {
    #[error("{0}")]
    File(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub document: MemberDocument,
    pub participant: Participant,
    pub participant_created: bool,
}

/// Store a member document, registering the participant by email on first upload
pub async fn upload_member_document(
    input: ValidMemberUpload,
    upload: &Upload,
    files: &FileStore,
    pool: &PgPool,
) -> Result<UploadOutcome, MembershipError> {
    // Reject bad files before anything is written.
    files.check(upload)?;

    let (participant, participant_created) =
        Participant::find_or_create_by_email(input.participant, pool).await?;

    let stored = files.save("member-documents", upload).await?;
    let storage_key = stored.storage_key.clone();

    let created = MemberDocument::create(
        CreateMemberDocument {
            participant_id: participant.id,
            document_type: input.document_type.as_str().to_string(),
            description: input.description,
            file: stored,
        },
        pool,
    )
    .await;
    let document = match created {
        Ok(document) => document,
        Err(e) => {
            files.discard(&storage_key).await;
            return Err(e.into());
        }
    };

    info!(
        document_id = %document.id,
        participant_id = %participant.id,
        participant_created,
        document_type = %document.document_type,
        "Member document uploaded"
    );

    Ok(UploadOutcome {
        document,
        participant,
        participant_created,
    })
}
