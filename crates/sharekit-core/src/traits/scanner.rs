//! Per-user rescan trigger.

use async_trait::async_trait;

use crate::result::AppResult;

/// Triggers a file rescan for a single user.
///
/// Member scans hand every visited user to this trait; what "scan" means
/// (enqueueing a job, walking a filesystem) is up to the implementation.
#[async_trait]
pub trait UserScanner: Send + Sync + std::fmt::Debug + 'static {
    /// Request a rescan of `user_id`'s files.
    async fn scan_user(&self, user_id: &str) -> AppResult<()>;
}
