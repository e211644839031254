//! Funds domain - donations received and their distribution to approved vendors
//!
//! The core rule: the non-cancelled distributions of a donation never add up
//! to more than the donation itself. `FundDistribution::allocate` enforces it
//! under a row lock on the donation; [`accounting`] holds the pure checks.

pub mod accounting;
pub mod data;
pub mod models;

pub use accounting::{check_allocation, DistributionStatus, DonationBalance, FundsError};
pub use data::{DistributionForm, DonationForm, DonationMethod};
pub use models::{
    CreateDonation, DistributionWithParties, Donation, DonationWithBalance, FundDistribution,
    FundTotals, NewDistribution,
};
