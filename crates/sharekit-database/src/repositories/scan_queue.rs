//! Queue of per-user rescan requests.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use sharekit_core::error::{AppError, ErrorKind};
use sharekit_core::result::AppResult;
use sharekit_core::traits::UserScanner;

/// Records a pending rescan for each visited user in `scan_requests`.
///
/// A file scanner picks the rows up; this repository only enqueues.
#[derive(Debug, Clone)]
pub struct ScanQueueRepository {
    pool: PgPool,
}

impl ScanQueueRepository {
    /// Create a new scan queue repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Number of requests not yet picked up.
    pub async fn pending(&self) -> AppResult<u64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM scan_requests WHERE processed_at IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count scan requests", e)
                })?;
        Ok(total.max(0) as u64)
    }
}

#[async_trait]
impl UserScanner for ScanQueueRepository {
    async fn scan_user(&self, user_id: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO scan_requests (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to enqueue scan request", e)
            })?;
        debug!(user_id, "Scan request enqueued");
        Ok(())
    }
}
