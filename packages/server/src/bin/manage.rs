//! Operator CLI: schema migrations and staff accounts
//!
//! Every command prints a single JSON object so scripts can parse the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use community_core::config::Config;
use community_core::domains::accounts::{ensure_staff_user, AdminUser};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "manage")]
#[command(about = "Community Hub management commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Create a staff account, or promote an existing one and reset its password
    CreateAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },

    /// List staff usernames
    ListAdmins,
}

#[derive(Serialize)]
struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    admins: Option<Vec<AdminInfo>>,
}

#[derive(Serialize)]
struct AdminInfo {
    username: String,
    email: String,
    last_login_at: Option<String>,
}

fn output(resp: &Response) -> Result<()> {
    println!("{}", serde_json::to_string(resp)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate => cmd_migrate().await,
        Commands::CreateAdmin {
            username,
            password,
            email,
        } => cmd_create_admin(&username, &password, email.as_deref()).await,
        Commands::ListAdmins => cmd_list_admins().await,
    }
}

async fn get_pool() -> Result<PgPool> {
    let config = Config::from_env()?;
    PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn cmd_migrate() -> Result<()> {
    let pool = get_pool().await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    output(&Response {
        success: true,
        message: Some("Migrations complete".to_string()),
        admins: None,
    })
}

async fn cmd_create_admin(username: &str, password: &str, email: Option<&str>) -> Result<()> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return output(&Response {
            success: false,
            message: Some("Username and password are required".to_string()),
            admins: None,
        });
    }

    let pool = get_pool().await?;
    let user = ensure_staff_user(username, password, email, &pool).await?;

    output(&Response {
        success: true,
        message: Some(format!("Staff account '{}' is ready", user.username)),
        admins: None,
    })
}

async fn cmd_list_admins() -> Result<()> {
    let pool = get_pool().await?;
    let admins = AdminUser::find_staff(&pool)
        .await?
        .into_iter()
        .map(|u| AdminInfo {
            username: u.username,
            email: u.email,
            last_login_at: u.last_login_at.map(|t| t.to_rfc3339()),
        })
        .collect();

    output(&Response {
        success: true,
        message: None,
        admins: Some(admins),
    })
}
