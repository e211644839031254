//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly. Names carry a random suffix
//! because all tests share one database.

#![allow(dead_code)]

use anyhow::Result;
use chrono::Utc;
use community_core::domains::accounts::{ensure_staff_user, hash_password, AdminUser, NewAdminUser};
use community_core::domains::funds::{CreateDonation, Donation};
use community_core::domains::participants::{CreateParticipant, Participant};
use community_core::domains::vendors::{
    review_vendor, CreateVendorSubmission, ReviewDecision, VendorSubmission,
};
use rust_decimal::Decimal;
use community_core::kernel::FileStore;
use sqlx::PgPool;
use std::path::PathBuf;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct horse battery";

pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

/// Parse a money literal like "125.50"
pub fn dollars(amount: &str) -> Decimal {
    amount.parse().expect("valid decimal")
}

/// Create a staff account with [`TEST_PASSWORD`]
pub async fn create_staff_user(pool: &PgPool) -> Result<AdminUser> {
    ensure_staff_user(&unique("staff"), TEST_PASSWORD, None, pool).await
}

/// Create a regular (non-staff) account with [`TEST_PASSWORD`]
pub async fn create_regular_user(pool: &PgPool) -> Result<AdminUser> {
    AdminUser::create(
        NewAdminUser {
            username: unique("member"),
            email: String::new(),
            password_hash: hash_password(TEST_PASSWORD),
            is_staff: false,
        },
        pool,
    )
    .await
}

pub async fn create_participant(pool: &PgPool, name: &str) -> Result<Participant> {
    Participant::create(
        CreateParticipant {
            name: name.to_string(),
            email: format!("{}@example.org", unique("participant")),
            phone: "555-0100".to_string(),
            children_ages: String::new(),
        },
        pool,
    )
    .await
}

pub async fn create_donation(pool: &PgPool, amount: &str) -> Result<Donation> {
    Donation::create(
        CreateDonation {
            donor_name: unique("Donor"),
            donor_email: String::new(),
            amount: dollars(amount),
            method: "check".to_string(),
            reference: String::new(),
            note: String::new(),
            received_on: Utc::now().date_naive(),
        },
        "fixtures",
        pool,
    )
    .await
}

/// A vendor submission still pending review
pub async fn create_pending_vendor(pool: &PgPool) -> Result<VendorSubmission> {
    VendorSubmission::create(
        CreateVendorSubmission {
            business_name: unique("Vendor"),
            contact_name: "Pat Vendor".to_string(),
            email: "vendor@example.org".to_string(),
            phone: "555-0101".to_string(),
            website: String::new(),
            services_description: "School supplies".to_string(),
            price_list: None,
        },
        pool,
    )
    .await
}

pub async fn create_approved_vendor(pool: &PgPool) -> Result<VendorSubmission> {
    let vendor = create_pending_vendor(pool).await?;
    Ok(review_vendor(vendor.id, ReviewDecision::Approve, "fixtures", pool).await?)
}

/// A second pool on the test database whose sessions reject writes.
///
/// Reads succeed, so code paths fail exactly at their first INSERT.
pub async fn read_only_pool(pool: &PgPool) -> Result<PgPool> {
    let options = (*pool.connect_options())
        .clone()
        .options([("default_transaction_read_only", "on")]);
    Ok(PgPool::connect_with(options).await?)
}

/// Files currently stored under `bucket`
pub fn stored_files(files: &FileStore, bucket: &str) -> Vec<PathBuf> {
    match std::fs::read_dir(files.root().join(bucket)) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    }
}
