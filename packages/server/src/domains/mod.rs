// Business domains
pub mod accounts;
pub mod content;
pub mod funds;
pub mod membership;
pub mod participants;
pub mod programs;
pub mod vault;
pub mod vendors;
