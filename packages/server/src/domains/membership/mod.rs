//! Membership domain - pre-qualification documents uploaded by families

pub mod activities;
pub mod data;
pub mod models;

pub use activities::{upload_member_document, MembershipError, UploadOutcome};
pub use data::{DocumentType, MemberUploadForm, ValidMemberUpload};
pub use models::{CreateMemberDocument, MemberDocument, MemberDocumentWithParticipant};
