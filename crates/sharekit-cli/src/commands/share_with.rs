//! Share recipient search commands.

use std::collections::HashSet;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use sharekit_core::config::AppConfig;
use sharekit_core::error::AppError;
use sharekit_entity::candidate::{Candidate, EmailCandidate};
use sharekit_service::{ResolveRequest, SharePolicy, SharedRecipients};

/// Arguments for the share-with command
#[derive(Debug, Args)]
pub struct ShareWithArgs {
    /// Partial name, id, or federated address
    pub query: String,

    /// User performing the search
    #[arg(long = "as", value_name = "USER")]
    pub requester: String,

    /// Kind of item being shared
    #[arg(long, default_value = "file")]
    pub item_type: String,

    /// Item being shared; its current recipients are excluded
    #[arg(long)]
    pub item: Option<String>,

    /// Number of candidates to return
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Users the item is already shared with
    #[arg(long = "shared-user", value_name = "USER")]
    pub shared_users: Vec<String>,

    /// Groups the item is already shared with
    #[arg(long = "shared-group", value_name = "GROUP")]
    pub shared_groups: Vec<String>,
}

/// Arguments for the share-with-email command
#[derive(Debug, Args)]
pub struct ShareWithEmailArgs {
    /// Partial contact name or email address
    pub query: String,
}

/// Candidate display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CandidateRow {
    /// Label
    label: String,
    /// Recipient type
    #[tabled(rename = "type")]
    recipient_type: String,
    /// Recipient ID
    id: String,
}

impl From<Candidate> for CandidateRow {
    fn from(candidate: Candidate) -> Self {
        Self {
            label: candidate.label,
            recipient_type: candidate.recipient_type.to_string(),
            id: candidate.recipient_id,
        }
    }
}

/// Email display row for table output
#[derive(Debug, Serialize, Tabled)]
struct EmailRow {
    /// Email address
    email: String,
    /// Contact name
    name: String,
}

impl From<EmailCandidate> for EmailRow {
    fn from(candidate: EmailCandidate) -> Self {
        Self {
            email: candidate.email,
            name: candidate.display_name,
        }
    }
}

/// Execute the share-with command
pub async fn execute(
    args: &ShareWithArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let resolver = super::create_resolver(config, &pool);

    let mut request = ResolveRequest::new(args.requester.as_str(), args.query.as_str())
        .item_type(args.item_type.as_str())
        .policy(SharePolicy::from_config(&config.sharing))
        .already_shared(SharedRecipients {
            users: args.shared_users.iter().cloned().collect::<HashSet<_>>(),
            groups: args.shared_groups.iter().cloned().collect::<HashSet<_>>(),
        });
    if let Some(limit) = args.limit {
        request = request.limit(limit);
    }

    let candidates = match &args.item {
        Some(item) => resolver.resolve_for_item(&request, item).await?,
        None => resolver.resolve(&request).await?,
    };

    let rows: Vec<CandidateRow> = candidates.into_iter().map(CandidateRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}

/// Execute the share-with-email command
pub async fn execute_email(
    args: &ShareWithEmailArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let resolver = super::create_resolver(config, &pool);

    let emails = resolver
        .resolve_email(&args.query, SharePolicy::from_config(&config.sharing))
        .await?;

    let rows: Vec<EmailRow> = emails.into_iter().map(EmailRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
