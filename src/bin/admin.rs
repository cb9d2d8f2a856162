//! CLI administration tool for shortlink.
//!
//! Inspects and manages short links directly in PostgreSQL, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Create a short link
//! cargo run --bin admin -- url create https://example.com/some/long/path
//!
//! # Show a short link and its latest visits
//! cargo run --bin admin -- url show aB3xY9k
//! ```
//!
//! # Environment Variables
//!
//! Same database settings as the server (`DATABASE_URL` or `DB_*`), plus
//! `BASE_URL`, `SHORT_ID_LENGTH` and `SHORT_ID_MAX_ATTEMPTS` for `url create`.

use shortlink::application::services::{UrlService, VisitService};
use shortlink::config::{self, Config, StorageBackend};
use shortlink::infrastructure::persistence::{PgUrlRepository, PgVisitRepository};
use shortlink::server::connect_pool;
use shortlink::utils::short_id::RandomShortIdGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
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
    /// Manage short links
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UrlAction {
    /// Shorten a URL
    Create {
        /// The URL to shorten (http or https)
        url: String,

        /// Owner to attribute the link to
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show a short link and its most recent visits
    Show {
        short_id: String,

        /// Number of visits to list
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
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

    let config = config::load_from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("admin requires STORAGE_BACKEND=postgres");
    }

    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Url { action } => handle_url_action(action, &config, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;
    Ok(())
}

/// Dispatches short link commands through the same services the server uses.
async fn handle_url_action(action: UrlAction, config: &Config, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let url_repository = Arc::new(PgUrlRepository::new(pool.clone()));

    let url_service = UrlService::new(
        url_repository.clone(),
        Arc::new(RandomShortIdGenerator::new(config.short_id_length)),
        config.short_id_max_attempts,
        config.base_url.as_str(),
    );

    match action {
        UrlAction::Create { url, user } => {
            let record = url_service
                .create(&url, user)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create short link: {}", e))?;

            println!("{}", "Short link created".green().bold());
            println!();
            println!(
                "  Short URL: {}",
                url_service.short_url(&record.short_id).bright_yellow().bold()
            );
            println!("  Target:    {}", record.original_url.cyan());
            println!();
        }
        UrlAction::Show { short_id, limit } => {
            let visit_service =
                VisitService::new(url_repository, Arc::new(PgVisitRepository::new(pool)));

            let page = visit_service
                .list_visits(&short_id, 0, limit.clamp(1, 100))
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))
                .with_context(|| format!("Cannot show '{short_id}'"))?;

            let record = &page.record;
            println!("{}", "Short link".bright_blue().bold());
            println!();
            println!(
                "  Short URL: {}",
                url_service.short_url(&record.short_id).bright_yellow()
            );
            println!("  Target:    {}", record.original_url.cyan());
            println!(
                "  Created:   {}",
                record.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
            );
            if let Some(owner) = &record.user_id {
                println!("  Owner:     {}", owner.cyan());
            }
            println!(
                "  Visits:    {} ({} recorded)",
                record.visit_count.to_string().bright_green().bold(),
                page.total
            );
            if let Some(last) = record.last_accessed_at {
                println!(
                    "  Last seen: {}",
                    last.format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
                );
            }
            println!();

            if page.items.is_empty() {
                println!("{}", "  No visits recorded".yellow());
                println!();
                return Ok(());
            }

            println!(
                "  {:<20} {:<40} {:<30}",
                "Visited".bright_white().bold(),
                "IP".bright_white().bold(),
                "Referrer".bright_white().bold()
            );
            println!("  {}", "-".repeat(90).bright_black());

            for visit in &page.items {
                println!(
                    "  {:<20} {:<40} {:<30}",
                    visit
                        .visited_at
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                        .bright_black(),
                    visit.ip_address.as_deref().unwrap_or("-"),
                    visit.referrer.as_deref().unwrap_or("-")
                );
            }
            println!();
        }
    }

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of short links
/// - Sum of visit counters
/// - Number of stored visit rows
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await?;

    let visit_total: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(visit_count), 0)::BIGINT FROM urls")
            .fetch_one(pool)
            .await?;

    let visit_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:          {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Visits:         {}",
        visit_total.to_string().bright_green().bold()
    );
    println!(
        "  Visit rows:     {}",
        visit_rows.to_string().bright_green().bold()
    );
    println!();

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

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
