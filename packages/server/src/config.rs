use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SITE_NAME: &str = "Community Hub";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub session_ttl_hours: i64,
    pub secure_cookies: bool,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub paypal_business_id: Option<String>,
    pub site_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./uploads".to_string())
                .into(),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "10485760".to_string())
                .parse()
                .context("MAX_UPLOAD_BYTES must be a valid number")?,
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .context("SESSION_TTL_HOURS must be a valid number")?,
            secure_cookies: env::var("SECURE_COOKIES")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            admin_username: env::var("ADMIN_USERNAME").ok().filter(|v| !v.is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
            paypal_business_id: env::var("PAYPAL_BUSINESS_ID").ok().filter(|v| !v.is_empty()),
            site_name: env::var("SITE_NAME").unwrap_or_else(|_| DEFAULT_SITE_NAME.to_string()),
        })
    }

    /// Configuration for tests and tooling that never touch the environment
    pub fn for_database(database_url: impl Into<String>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            database_url: database_url.into(),
            port: 0,
            upload_dir: upload_dir.into(),
            max_upload_bytes: 10 * 1024 * 1024,
            session_ttl_hours: 24,
            secure_cookies: false,
            admin_username: None,
            admin_password: None,
            paypal_business_id: None,
            site_name: DEFAULT_SITE_NAME.to_string(),
        }
    }
}
