//! Vendors domain - service providers applying to receive fund distributions

pub mod activities;
pub mod data;
pub mod models;

pub use activities::{review_vendor, submit_vendor, ReviewDecision, VendorError};
pub use data::{RejectForm, ValidVendor, VendorForm};
pub use models::{CreateVendorSubmission, VendorStatus, VendorSubmission};
