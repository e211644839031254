pub mod vendor_submission;

pub use vendor_submission::*;
