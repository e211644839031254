use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use crate::common::VendorId;
use crate::kernel::StoredFile;

/// Review state of a vendor submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    PendingReview,
    Approved,
    Rejected,
}

impl VendorStatus {
    pub const ALL: [VendorStatus; 3] = [
        VendorStatus::PendingReview,
        VendorStatus::Approved,
        VendorStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VendorStatus::PendingReview => "pending_review",
            VendorStatus::Approved => "approved",
            VendorStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VendorStatus::PendingReview => "Pending Review",
            VendorStatus::Approved => "Approved",
            VendorStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending_review" => Ok(VendorStatus::PendingReview),
            "approved" => Ok(VendorStatus::Approved),
            "rejected" => Ok(VendorStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid vendor status: {}", s)),
        }
    }
}

/// VendorSubmission model - a business applying to provide services
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VendorSubmission {
    pub id: VendorId,
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub services_description: String,

    // Optional price list upload
    pub price_list_key: Option<String>,
    pub price_list_name: Option<String>,
    pub price_list_content_type: Option<String>,
    pub price_list_size_bytes: Option<i64>,
    pub price_list_sha256: Option<String>,

    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateVendorSubmission {
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub services_description: String,
    pub price_list: Option<StoredFile>,
}

impl VendorSubmission {
    /// Parsed status; unknown values read as pending review.
    pub fn status(&self) -> VendorStatus {
        self.status.parse().unwrap_or(VendorStatus::PendingReview)
    }

    pub fn is_approved(&self) -> bool {
        self.status() == VendorStatus::Approved
    }

    pub fn price_list(&self) -> Option<StoredFile> {
        Some(StoredFile {
            storage_key: self.price_list_key.clone()?,
            original_name: self.price_list_name.clone().unwrap_or_default(),
            content_type: self
                .price_list_content_type
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            size_bytes: self.price_list_size_bytes.unwrap_or_default(),
            sha256: self.price_list_sha256.clone().unwrap_or_default(),
        })
    }

    pub async fn find_by_id(id: VendorId, pool: &PgPool) -> Result<Option<Self>> {
        let vendor =
            sqlx::query_as::<_, Self>("SELECT * FROM vendor_submissions WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(vendor)
    }

    /// Submissions newest first, optionally restricted to one status
    pub async fn find_all(status: Option<VendorStatus>, pool: &PgPool) -> Result<Vec<Self>> {
        let vendors = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM vendor_submissions
            WHERE $1::text IS NULL OR status = $1
            ORDER BY submitted_at DESC, id DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?;
        Ok(vendors)
    }

    /// Approved vendors by business name, for the distribution form
    pub async fn find_approved(pool: &PgPool) -> Result<Vec<Self>> {
        let vendors = sqlx::query_as::<_, Self>(
            "SELECT * FROM vendor_submissions WHERE status = 'approved' ORDER BY business_name",
        )
        .fetch_all(pool)
        .await?;
        Ok(vendors)
    }

    pub async fn create(input: CreateVendorSubmission, pool: &PgPool) -> Result<Self> {
        let price_list = input.price_list.as_ref();
        let vendor = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO vendor_submissions (
                id, business_name, contact_name, email, phone, website,
                services_description, price_list_key, price_list_name,
                price_list_content_type, price_list_size_bytes, price_list_sha256
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(VendorId::new())
        .bind(&input.business_name)
        .bind(&input.contact_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.website)
        .bind(&input.services_description)
        .bind(price_list.map(|f| f.storage_key.as_str()))
        .bind(price_list.map(|f| f.original_name.as_str()))
        .bind(price_list.map(|f| f.content_type.as_str()))
        .bind(price_list.map(|f| f.size_bytes))
        .bind(price_list.map(|f| f.sha256.as_str()))
        .fetch_one(pool)
        .await?;
        Ok(vendor)
    }

    /// Move a pending submission to `approved` or `rejected`.
    ///
    /// Returns `None` when the submission is not pending review.
    pub async fn record_review(
        id: VendorId,
        status: VendorStatus,
        reviewer: &str,
        rejection_reason: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let vendor = sqlx::query_as::<_, Self>(
            r#"
            UPDATE vendor_submissions
            SET status = $2, reviewed_by = $3, reviewed_at = NOW(), rejection_reason = $4
            WHERE id = $1 AND status = 'pending_review'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(reviewer)
        .bind(rejection_reason)
        .fetch_optional(pool)
        .await?;
        Ok(vendor)
    }

    pub async fn count_by_status(status: VendorStatus, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM vendor_submissions WHERE status = $1",
        )
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
