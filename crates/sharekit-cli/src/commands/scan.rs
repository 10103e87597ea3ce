//! Per-user rescan commands.

use std::sync::Arc;

use clap::Args;

use crate::output::{self, ConsoleProgress, OutputFormat};
use sharekit_core::config::AppConfig;
use sharekit_core::error::AppError;
use sharekit_database::repositories::{DirectoryRepository, ScanQueueRepository};
use sharekit_service::{MemberScanService, ScanSummary};

/// Arguments for the scan command
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Scan every member of these groups (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Users to scan
    pub users: Vec<String>,
}

/// Execute the scan command
pub async fn execute(
    args: &ScanArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if args.groups.is_empty() && args.users.is_empty() {
        return Err(AppError::validation(
            "Either specify a user id or use --groups",
        ));
    }

    let pool = super::create_db_pool(config).await?;
    let queue = Arc::new(ScanQueueRepository::new(pool.clone()));
    let service = MemberScanService::new(
        Arc::new(DirectoryRepository::new(pool)),
        queue.clone(),
        config.scan.page_size,
    );
    let progress = ConsoleProgress {
        quiet: format == OutputFormat::Json,
    };

    let mut summary = ScanSummary::default();
    if !args.groups.is_empty() {
        let groups = service.scan_groups(&args.groups, &progress).await?;
        summary.users_scanned += groups.users_scanned;
        summary.missing.extend(groups.missing);
    }
    if !args.users.is_empty() {
        let users = service.scan_users(&args.users, &progress).await?;
        summary.users_scanned += users.users_scanned;
        summary.missing.extend(users.missing);
    }

    match format {
        OutputFormat::Json => output::print_json(&summary),
        OutputFormat::Table => {
            output::print_success(&format!(
                "Queued rescans for {} user(s)",
                summary.users_scanned
            ));
            if !summary.missing.is_empty() {
                output::print_warning(&format!("Not found: {}", summary.missing.join(", ")));
            }
            output::print_kv("Pending requests", &queue.pending().await?.to_string());
        }
    }

    Ok(())
}
