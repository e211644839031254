// Infrastructure shared by the domains: file storage for uploads.

pub mod storage;

pub use storage::*;
