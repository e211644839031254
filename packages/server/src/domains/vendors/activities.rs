use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use super::data::ValidVendor;
use super::models::{CreateVendorSubmission, VendorStatus, VendorSubmission};
use crate::common::VendorId;
use crate::kernel::{FileStore, StorageError, Upload};

#[derive(Error, Debug)]
pub enum VendorError {
    #[error("Vendor submission not found.")]
    NotFound,

    #[error("This submission has already been reviewed ({0}).")]
    AlreadyReviewed(String),

    #[error("{0}")]
    File(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject { reason: String },
}

/// Record a new submission; the price list is optional.
pub async fn submit_vendor(
    input: ValidVendor,
    price_list: Option<&Upload>,
    files: &FileStore,
    pool: &PgPool,
) -> Result<VendorSubmission, VendorError> {
    let price_list = match price_list.filter(|u| !u.is_blank()) {
        Some(upload) => Some(files.save("price-lists", upload).await?),
        None => None,
    };

    let storage_key = price_list.as_ref().map(|f| f.storage_key.clone());

    let created = VendorSubmission::create(
        CreateVendorSubmission {
            business_name: input.business_name,
            contact_name: input.contact_name,
            email: input.email,
            phone: input.phone,
            website: input.website,
            services_description: input.services_description,
            price_list,
        },
        pool,
    )
    .await;
    let vendor = match created {
        Ok(vendor) => vendor,
        Err(e) => {
            if let Some(key) = storage_key {
                files.discard(&key).await;
            }
            return Err(e.into());
        }
    };

    info!(vendor_id = %vendor.id, business = %vendor.business_name, "Vendor submission received");

    Ok(vendor)
}

/// Approve or reject a submission that is still pending review
pub async fn review_vendor(
    id: VendorId,
    decision: ReviewDecision,
    reviewer: &str,
    pool: &PgPool,
) -> Result<VendorSubmission, VendorError> {
    let (status, reason) = match &decision {
        ReviewDecision::Approve => (VendorStatus::Approved, ""),
        ReviewDecision::Reject { reason } => (VendorStatus::Rejected, reason.as_str()),
    };

    match VendorSubmission::record_review(id, status, reviewer, reason, pool).await? {
        Some(vendor) => {
            info!(vendor_id = %id, status = %status, reviewer = %reviewer, "Vendor reviewed");
            Ok(vendor)
        }
        None => match VendorSubmission::find_by_id(id, pool).await? {
            Some(existing) => Err(VendorError::AlreadyReviewed(
                existing.status().label().to_lowercase(),
            )),
            None => Err(VendorError::NotFound),
        },
    }
}
