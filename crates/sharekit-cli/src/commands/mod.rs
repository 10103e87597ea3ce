//! CLI command definitions and dispatch.

pub mod migrate;
pub mod repair;
pub mod scan;
pub mod share_with;
pub mod shares;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use crate::output::OutputFormat;
use sharekit_core::config::AppConfig;
use sharekit_core::error::AppError;
use sharekit_database::DatabasePool;
use sharekit_database::repositories::{ContactRepository, DirectoryRepository, ShareRepository};
use sharekit_service::ShareTargetResolver;

/// ShareKit: share recipient search and share table maintenance
#[derive(Debug, Parser)]
#[command(name = "sharekit", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded next to the configuration file
    #[arg(short, long, env = "SHAREKIT_ENV")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Share table repairs
    Repair(repair::RepairArgs),
    /// Trigger file rescans for users or group members
    Scan(scan::ScanArgs),
    /// Search for share recipients
    ShareWith(share_with::ShareWithArgs),
    /// Search the address book for email recipients
    ShareWithEmail(share_with::ShareWithEmailArgs),
    /// Inspect share rows
    Shares(shares::SharesArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config).await,
            Commands::Repair(args) => repair::execute(args, config, self.format).await,
            Commands::Scan(args) => scan::execute(args, config, self.format).await,
            Commands::ShareWith(args) => share_with::execute(args, config, self.format).await,
            Commands::ShareWithEmail(args) => {
                share_with::execute_email(args, config, self.format).await
            }
            Commands::Shares(args) => shares::execute(args, config, self.format).await,
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Helper: build a recipient resolver backed by PostgreSQL
pub fn create_resolver(config: &AppConfig, pool: &PgPool) -> ShareTargetResolver {
    ShareTargetResolver::new(
        Arc::new(DirectoryRepository::new(pool.clone())),
        Arc::new(ContactRepository::new(pool.clone())),
        Arc::new(ShareRepository::new(pool.clone())),
        config.sharing.clone(),
    )
}
