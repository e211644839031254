//! Vendor submissions and their one-time review.

mod common;

use common::{create_pending_vendor, read_only_pool, stored_files, unique, TestHarness};
use community_core::common::{FormData, VendorId};
use community_core::domains::vendors::{
    review_vendor, submit_vendor, ReviewDecision, VendorError, VendorForm, VendorStatus,
    VendorSubmission,
};
use community_core::kernel::Upload;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn approval_records_reviewer(ctx: &TestHarness) {
    let vendor = create_pending_vendor(&ctx.db_pool).await.unwrap();
    assert_eq!(vendor.status(), VendorStatus::PendingReview);
    assert!(vendor.price_list().is_none());

    let approved = review_vendor(vendor.id, ReviewDecision::Approve, "reviewer", &ctx.db_pool)
        .await
        .unwrap();

    assert!(approved.is_approved());
    assert_eq!(approved.reviewed_by.as_deref(), Some("reviewer"));
    assert!(approved.reviewed_at.is_some());
    assert_eq!(approved.rejection_reason, "");

    let listed = VendorSubmission::find_approved(&ctx.db_pool).await.unwrap();
    assert!(listed.iter().any(|v| v.id == vendor.id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejection_keeps_reason_and_is_final(ctx: &TestHarness) {
    let vendor = create_pending_vendor(&ctx.db_pool).await.unwrap();

    let rejected = review_vendor(
        vendor.id,
        ReviewDecision::Reject {
            reason: "Outside our service area".to_string(),
        },
        "reviewer",
        &ctx.db_pool,
    )
    .await
    .unwrap();
    assert_eq!(rejected.status(), VendorStatus::Rejected);
    assert_eq!(rejected.rejection_reason, "Outside our service area");

    let err = review_vendor(vendor.id, ReviewDecision::Approve, "someone-else", &ctx.db_pool)
        .await
        .unwrap_err();
    assert!(matches!(err, VendorError::AlreadyReviewed(ref status) if status == "rejected"));

    let reloaded = VendorSubmission::find_by_id(vendor.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status(), VendorStatus::Rejected);
    assert_eq!(reloaded.reviewed_by.as_deref(), Some("reviewer"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reviewing_unknown_vendor_is_not_found(ctx: &TestHarness) {
    let err = review_vendor(VendorId::new(), ReviewDecision::Approve, "reviewer", &ctx.db_pool)
        .await
        .unwrap_err();
    assert!(matches!(err, VendorError::NotFound));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn status_filter_limits_listing(ctx: &TestHarness) {
    let pending = create_pending_vendor(&ctx.db_pool).await.unwrap();
    let approved = create_pending_vendor(&ctx.db_pool).await.unwrap();
    review_vendor(approved.id, ReviewDecision::Approve, "reviewer", &ctx.db_pool)
        .await
        .unwrap();

    let only_pending = VendorSubmission::find_all(Some(VendorStatus::PendingReview), &ctx.db_pool)
        .await
        .unwrap();
    assert!(only_pending.iter().any(|v| v.id == pending.id));
    assert!(only_pending.iter().all(|v| v.status() == VendorStatus::PendingReview));

    let all = VendorSubmission::find_all(None, &ctx.db_pool).await.unwrap();
    assert!(all.iter().any(|v| v.id == pending.id));
    assert!(all.iter().any(|v| v.id == approved.id));
}

fn vendor_fields(business: &str) -> FormData {
    FormData::from_pairs(vec![
        ("business_name".to_string(), business.to_string()),
        ("contact_name".to_string(), "Sam Ortiz".to_string()),
        ("email".to_string(), "sam@example.org".to_string()),
        ("phone".to_string(), "555-0133".to_string()),
        ("services_description".to_string(), "Winter coats".to_string()),
    ])
}

fn price_list() -> Upload {
    Upload {
        file_name: "prices.csv".to_string(),
        content_type: Some("text/csv".to_string()),
        bytes: b"item,price\ncoat,40.00\n".to_vec(),
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn submission_stores_price_list(ctx: &TestHarness) {
    let fields = vendor_fields(&unique("Coat Co"));
    let input = VendorForm { fields: &fields }.validate().unwrap();

    let vendor = submit_vendor(input, Some(&price_list()), &ctx.state.files, &ctx.db_pool)
        .await
        .unwrap();

    assert_eq!(vendor.status(), VendorStatus::PendingReview);
    let file = vendor.price_list().unwrap();
    assert_eq!(file.original_name, "prices.csv");
    assert_eq!(stored_files(&ctx.state.files, "price-lists").len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn failed_submission_removes_price_list(ctx: &TestHarness) {
    let read_only = read_only_pool(&ctx.db_pool).await.unwrap();
    let fields = vendor_fields(&unique("Coat Co"));
    let input = VendorForm { fields: &fields }.validate().unwrap();

    let result = submit_vendor(input, Some(&price_list()), &ctx.state.files, &read_only).await;

    assert!(matches!(result, Err(VendorError::Internal(_))));
    assert!(stored_files(&ctx.state.files, "price-lists").is_empty());
}
