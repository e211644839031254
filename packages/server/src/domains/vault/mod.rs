//! Data vault - certificates and records staff keep on file

pub mod data;
pub mod models;

pub use data::{ValidVaultItem, VaultCategory, VaultItemForm};
pub use models::{CreateVaultItem, VaultItem, VaultItemWithParticipant};
