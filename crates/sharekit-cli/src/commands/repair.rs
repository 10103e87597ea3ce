//! Share table repair commands.

use std::sync::Arc;

use clap::{Args, Subcommand};

use crate::output::{self, ConsoleProgress, OutputFormat};
use sharekit_core::config::AppConfig;
use sharekit_core::error::AppError;
use sharekit_database::repositories::ShareRepository;
use sharekit_service::ShareIntegrityRepair;

/// Arguments for repair commands
#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Repair subcommand
    #[command(subcommand)]
    pub command: RepairCommand,
}

/// Repair subcommands
#[derive(Debug, Subcommand)]
pub enum RepairCommand {
    /// Remove duplicate sub-shares, keeping the earliest of each
    SubShares {
        /// Rows read per chunk (defaults to `repair.chunk_size`)
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Execute repair commands
pub async fn execute(
    args: &RepairArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        RepairCommand::SubShares { chunk_size, yes } => {
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("This will DELETE duplicate sub-share rows. Continue?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let pool = super::create_db_pool(config).await?;
            let repair = ShareIntegrityRepair::new(
                Arc::new(ShareRepository::new(pool)),
                chunk_size.unwrap_or(config.repair.chunk_size),
            );
            let progress = ConsoleProgress {
                quiet: format == OutputFormat::Json,
            };

            let report = match repair.run(&progress).await {
                Ok(report) => report,
                Err(aborted) => {
                    output::print_warning(&format!(
                        "{} duplicate sub-share(s) were removed before the failure; run the repair again",
                        aborted.removed
                    ));
                    return Err(aborted.into());
                }
            };

            match format {
                OutputFormat::Json => output::print_json(&report),
                OutputFormat::Table => {
                    output::print_success("Sub-share repair complete.");
                    output::print_kv("Run", &report.run_id.to_string());
                    output::print_kv("Scanned", &report.scanned.to_string());
                    output::print_kv("Removed", &report.removed.to_string());
                    output::print_kv("Chunks", &report.chunks.to_string());
                }
            }
        }
    }

    Ok(())
}
