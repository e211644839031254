//! Accounts domain - site users and the staff flag that gates the admin area

pub mod activities;
pub mod data;
pub mod models;
pub mod password;

pub use activities::{authenticate, ensure_staff_user, register, AccountError};
pub use data::{LoginForm, RegistrationForm};
pub use models::{AdminUser, NewAdminUser};
pub use password::{hash_password, hash_password_blocking, verify_password, verify_password_blocking};
