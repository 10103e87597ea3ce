//! Per-member rescans of groups or explicit user lists.
//!
//! Group sizes are never queried up front: members are read one fixed-size
//! page at a time and progress is reported against the number of members
//! known so far.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use sharekit_core::result::AppResult;
use sharekit_core::traits::{ProgressSink, UserScanner};
use sharekit_database::traits::DirectorySource;

use crate::paging::collect_from;

/// Outcome of a member scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Users handed to the scanner.
    pub users_scanned: usize,
    /// Groups or users that do not exist.
    pub missing: Vec<String>,
}

/// Visits every member of a group and triggers a rescan for each.
#[derive(Debug, Clone)]
pub struct MemberScanService {
    /// User/group directory.
    directory: Arc<dyn DirectorySource>,
    /// Receives every visited user.
    scanner: Arc<dyn UserScanner>,
    /// Members read per page.
    page_size: usize,
}

impl MemberScanService {
    /// Creates a new member scan service.
    pub fn new(
        directory: Arc<dyn DirectorySource>,
        scanner: Arc<dyn UserScanner>,
        page_size: usize,
    ) -> Self {
        Self {
            directory,
            scanner,
            page_size: page_size.max(1),
        }
    }

    /// Scan every member of each group in turn. Unknown groups are reported
    /// and skipped.
    pub async fn scan_groups(
        &self,
        groups: &[String],
        progress: &dyn ProgressSink,
    ) -> AppResult<ScanSummary> {
        let mut summary = ScanSummary::default();
        for group in groups {
            if !self.directory.group_exists(group).await? {
                progress.report(&format!("Group name {group} doesn't exist"));
                summary.missing.push(group.clone());
                continue;
            }
            info!(group = %group, page_size = self.page_size, "Scanning group members");
            summary.users_scanned += self.scan_group(group, progress).await?;
        }
        Ok(summary)
    }

    async fn scan_group(&self, group: &str, progress: &dyn ProgressSink) -> AppResult<usize> {
        let directory = self.directory.as_ref();
        let mut offset = 0;
        let mut position = 0;

        loop {
            let page = collect_from(
                move |limit, start| directory.group_members(group, "", limit, start),
                offset,
                self.page_size,
            )
            .await?;
            let known = offset + page.items.len();
            debug!(group, offset, members = page.items.len(), "Fetched member page");

            let exhausted = page.exhausted;
            let next_offset = page.next_offset;
            for member in page.into_items() {
                position += 1;
                progress.report(&format!(
                    "Starting scan for user {position} out of {known} ({})",
                    member.user_id
                ));
                self.scanner.scan_user(&member.user_id).await?;
            }

            if exhausted {
                break;
            }
            offset = next_offset;
        }
        Ok(position)
    }

    /// Scan an explicit list of users. Unknown users are reported and
    /// skipped.
    pub async fn scan_users(
        &self,
        users: &[String],
        progress: &dyn ProgressSink,
    ) -> AppResult<ScanSummary> {
        let mut summary = ScanSummary::default();
        let total = users.len();
        for (index, user_id) in users.iter().enumerate() {
            if self.directory.find_user(user_id).await?.is_none() {
                progress.report(&format!("Unknown user {user_id}"));
                summary.missing.push(user_id.clone());
                continue;
            }
            progress.report(&format!(
                "Starting scan for user {} out of {total} ({user_id})",
                index + 1
            ));
            self.scanner.scan_user(user_id).await?;
            summary.users_scanned += 1;
        }
        Ok(summary)
    }
}
