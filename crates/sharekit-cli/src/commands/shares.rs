//! Share row inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use sharekit_core::config::AppConfig;
use sharekit_core::error::AppError;
use sharekit_core::types::ShareId;
use sharekit_database::repositories::ShareRepository;
use sharekit_database::traits::ShareLedger;
use sharekit_entity::share::ShareRow;

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct SharesArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: SharesCommand,
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum SharesCommand {
    /// List share rows in id order
    List {
        /// Only rows with an id greater than this one
        #[arg(long)]
        after: Option<i64>,
        /// Maximum number of rows
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
}

/// Share display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ShareListRow {
    /// Share ID
    id: i64,
    /// Parent share ID
    parent: String,
    /// Recipient type
    #[tabled(rename = "type")]
    recipient_type: String,
    /// Recipient ID
    recipient: String,
    /// Item
    item: String,
    /// Permissions
    permissions: String,
    /// Created at
    created_at: String,
}

impl From<ShareRow> for ShareListRow {
    fn from(row: ShareRow) -> Self {
        Self {
            id: row.id.get(),
            parent: row.parent_id.map(|p| p.to_string()).unwrap_or_default(),
            recipient_type: row.recipient_type.to_string(),
            recipient: row.recipient_id,
            item: format!("{}:{}", row.item_type, row.item_source),
            permissions: row.permissions.to_string(),
            created_at: row.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Execute share commands
pub async fn execute(
    args: &SharesArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let shares = ShareRepository::new(pool);

    match &args.command {
        SharesCommand::List { after, limit } => {
            let rows = shares
                .scan_ordered_by_id(after.map(ShareId), *limit)
                .await?;
            let rows: Vec<ShareListRow> = rows.into_iter().map(ShareListRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
