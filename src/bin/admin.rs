//! CLI administration tool for link-shortener.
//!
//! Provides commands for managing accounts, permissions and tokens, and for
//! checking the database, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (password is prompted)
//! cargo run --bin admin -- user create --name "Alice" --email alice@example.com
//!
//! # Activate an account without the activation token
//! cargo run --bin admin -- user activate --email alice@example.com
//!
//! # Grant a permission code
//! cargo run --bin admin -- permission grant --email alice@example.com --code shortenings:write
//!
//! # Issue a bearer token
//! cargo run --bin admin -- token issue --email alice@example.com --ttl-hours 72
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use link_shortener::application::services::{Registration, UserService};
use link_shortener::domain::clock::SystemClock;
use link_shortener::domain::entities::TokenScope;
use link_shortener::infrastructure::persistence::{
    PgPermissionRepository, PgTokenRepository, PgUserRepository,
};
use link_shortener::infrastructure::{ArgonCredentialVerifier, LogNotifier};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage permission grants
    Permission {
        #[command(subcommand)]
        action: PermissionAction,
    },

    /// Manage tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a new account (not activated)
    Create {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },

    /// Activate an account directly
    Activate {
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum PermissionAction {
    /// Grant a permission code to a user
    Grant {
        #[arg(short, long)]
        email: String,

        /// Permission code, e.g. `shortenings:write`
        #[arg(short, long)]
        code: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a token for a user
    Issue {
        #[arg(short, long)]
        email: String,

        /// `authentication` or `activation`
        #[arg(short, long, default_value = "authentication")]
        scope: String,

        /// Lifetime in hours (defaults to the scope's default)
        #[arg(long)]
        ttl_hours: Option<i64>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, user_service(&pool)).await?,
        Commands::Permission { action } => {
            handle_permission_action(action, user_service(&pool)).await?
        }
        Commands::Token { action } => handle_token_action(action, user_service(&pool)).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn user_service(pool: &PgPool) -> UserService {
    let shared = Arc::new(pool.clone());

    UserService::new(
        Arc::new(PgUserRepository::new(shared.clone())),
        Arc::new(PgTokenRepository::new(shared.clone())),
        Arc::new(PgPermissionRepository::new(shared)),
        Arc::new(ArgonCredentialVerifier),
        Arc::new(LogNotifier),
        Arc::new(SystemClock),
    )
}

async fn handle_user_action(action: UserAction, service: UserService) -> Result<()> {
    match action {
        UserAction::Create { name, email } => {
            println!("{}", "Create user".bright_blue().bold());
            println!();

            let name = match name {
                Some(n) => n,
                None => Input::new().with_prompt("Name").interact_text()?,
            };
            let email = match email {
                Some(e) => e,
                None => Input::new().with_prompt("E-mail").interact_text()?,
            };
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?;

            let user = service
                .register(Registration {
                    name,
                    email,
                    password,
                })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

            println!();
            println!("{}", "User created".green().bold());
            println!("  ID:    {}", user.id.to_string().bright_black());
            println!("  Email: {}", user.email.cyan());
            println!(
                "  {}",
                "The account is not activated yet; run `admin user activate`.".yellow()
            );
        }
        UserAction::Activate { email } => {
            let user = service
                .activate_by_email(&email)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to activate user: {}", e))?;

            println!("{} {}", "Activated".green().bold(), user.email.cyan());
        }
    }

    Ok(())
}

async fn handle_permission_action(action: PermissionAction, service: UserService) -> Result<()> {
    match action {
        PermissionAction::Grant { email, code } => {
            if code.is_empty() {
                anyhow::bail!("At least one --code is required");
            }

            service
                .grant_permissions(&email, code.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to grant permissions: {}", e))?;

            println!(
                "{} {} to {}",
                "Granted".green().bold(),
                code.join(", ").bright_white(),
                email.cyan()
            );
        }
    }

    Ok(())
}

/// Issues a token and prints its plaintext once.
///
/// Only the SHA-256 hash is stored; the plaintext cannot be recovered later.
async fn handle_token_action(action: TokenAction, service: UserService) -> Result<()> {
    match action {
        TokenAction::Issue {
            email,
            scope,
            ttl_hours,
            yes,
        } => {
            let scope = TokenScope::parse(&scope)
                .with_context(|| format!("Unknown scope '{}'", scope))?;
            let ttl = match ttl_hours {
                Some(h) if h > 0 => chrono::Duration::hours(h),
                Some(h) => anyhow::bail!("--ttl-hours must be positive, got {}", h),
                None => scope.default_ttl(),
            };

            let user = service
                .find_by_email(&email)
                .await
                .map_err(|e| anyhow::anyhow!("Lookup failed: {}", e))?;

            println!("{}", "Issue token".bright_blue().bold());
            println!("  User:  {}", user.email.cyan());
            println!("  Scope: {}", scope.as_str().bright_white());
            println!("  TTL:   {}h", ttl.num_hours());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Issue this token?")
                    .default(true)
                    .interact()?;

                if !confirmed {
                    println!("{}", "Cancelled".red());
                    return Ok(());
                }
            }

            let token = service
                .issue_token(user.id, scope, ttl)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))?;

            println!("  Token:  {}", token.plaintext.bright_yellow().bold());
            println!("  Expiry: {}", token.expiry.to_rfc3339().bright_black());
            println!();
            println!(
                "{}",
                "IMPORTANT: Save this token now! You won't be able to see it again."
                    .red()
                    .bold()
            );
            if scope == TokenScope::Authentication {
                println!();
                println!(
                    "  {}: Bearer {}",
                    "Authorization".bright_cyan(),
                    token.plaintext.bright_yellow()
                );
            }
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let shortenings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortenings")
                .fetch_one(pool)
                .await?;
            let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL:  {}", version.bright_white());
            println!(
                "  Shortenings: {}",
                shortenings.to_string().bright_green().bold()
            );
            println!("  Users:       {}", users.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
