//! Member document uploads and get-or-create of participants by email.

mod common;

use common::{create_participant, read_only_pool, stored_files, unique, TestHarness};
use community_core::common::FormData;
use community_core::domains::membership::{
    upload_member_document, MemberDocument, MemberUploadForm, MembershipError,
};
use community_core::domains::participants::Participant;
use community_core::kernel::{StorageError, Upload};
use test_context::test_context;

fn upload_form(email: &str, name: &str) -> FormData {
    FormData::from_pairs(vec![
        ("participant_email".to_string(), email.to_string()),
        ("participant_name".to_string(), name.to_string()),
        ("document_type".to_string(), "proof_of_income".to_string()),
        ("description".to_string(), "2024 pay stubs".to_string()),
    ])
}

fn pdf(name: &str) -> Upload {
    Upload {
        file_name: name.to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: b"%PDF-1.4 pay stub".to_vec(),
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn first_upload_registers_participant_and_second_reuses_it(ctx: &TestHarness) {
    let email = format!("{}@example.org", unique("parent"));
    let fields = upload_form(&email, "Jordan Lee");
    let input = MemberUploadForm { fields: &fields }.validate().unwrap();

    let first = upload_member_document(input, &pdf("stub.pdf"), &ctx.state.files, &ctx.db_pool)
        .await
        .unwrap();
    assert!(first.participant_created);
    assert_eq!(first.participant.name, "Jordan Lee");
    assert!(first.document.file.storage_key.starts_with("member-documents/"));

    // Same address in a different case finds the same participant.
    let fields = upload_form(&email.to_uppercase(), "Someone Else");
    let input = MemberUploadForm { fields: &fields }.validate().unwrap();
    let second = upload_member_document(input, &pdf("stub2.pdf"), &ctx.state.files, &ctx.db_pool)
        .await
        .unwrap();
    assert!(!second.participant_created);
    assert_eq!(second.participant.id, first.participant.id);
    assert_eq!(second.participant.name, "Jordan Lee");

    let documents = MemberDocument::find_by_participant(first.participant.id, &ctx.db_pool)
        .await
        .unwrap();
    assert_eq!(documents.len(), 2);

    let stored = ctx.state.files.read(&first.document.file.storage_key).await.unwrap();
    assert_eq!(stored, b"%PDF-1.4 pay stub");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejected_file_creates_nothing(ctx: &TestHarness) {
    let email = format!("{}@example.org", unique("parent"));
    let fields = upload_form(&email, "Casey");
    let input = MemberUploadForm { fields: &fields }.validate().unwrap();

    let err = upload_member_document(input, &pdf("installer.exe"), &ctx.state.files, &ctx.db_pool)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MembershipError::File(StorageError::ExtensionNotAllowed(ref ext)) if ext == "exe"
    ));

    let participant = Participant::find_by_email(&email, &ctx.db_pool).await.unwrap();
    assert!(participant.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failed_insert_removes_stored_file(ctx: &TestHarness) {
    let participant = create_participant(&ctx.db_pool, "Robin Ames").await.unwrap();
    let read_only = read_only_pool(&ctx.db_pool).await.unwrap();

    let fields = upload_form(&participant.email, "Robin Ames");
    let input = MemberUploadForm { fields: &fields }.validate().unwrap();
    let result = upload_member_document(input, &pdf("stub.pdf"), &ctx.state.files, &read_only).await;

    assert!(matches!(result, Err(MembershipError::Internal(_))));
    assert!(stored_files(&ctx.state.files, "member-documents").is_empty());
    let documents = MemberDocument::find_by_participant(participant.id, &ctx.db_pool)
        .await
        .unwrap();
    assert!(documents.is_empty());
}
