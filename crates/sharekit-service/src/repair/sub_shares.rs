//! Duplicate sub-share removal.
//!
//! For any parent share there must be at most one sub-share per
//! `(recipient_type, recipient_id)`. Historical bugs left duplicates behind;
//! this job keeps the earliest row of every such group (ties broken by the
//! smallest id) and deletes the others.
//!
//! Sub-shares are read in keyset chunks ordered by `(parent_id,
//! recipient_type, recipient_id, created_at, id)`. Rows of one group are
//! adjacent in that order and the first of them is the survivor, so the
//! job only has to remember the last survivor it saw, including
//! across chunk boundaries.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use sharekit_core::error::AppError;
use sharekit_core::result::AppResult;
use sharekit_core::traits::ProgressSink;
use sharekit_database::traits::ShareLedger;
use sharekit_entity::share::{ShareRow, SubShareCursor};

/// Outcome of a completed repair run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    /// Identifier of the run, for correlating log lines.
    pub run_id: Uuid,
    /// Sub-share rows examined.
    pub scanned: u64,
    /// Duplicate rows deleted.
    pub removed: u64,
    /// Chunks read from the ledger.
    pub chunks: u64,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

/// A repair run stopped by a ledger failure.
///
/// Rows deleted before the failure stay deleted; running the repair again
/// picks up the remaining duplicates.
#[derive(Debug, Error)]
#[error("Sub-share repair aborted after removing {removed} duplicate(s): {source}")]
pub struct RepairAborted {
    /// Duplicate rows deleted before the failure.
    pub removed: u64,
    /// The ledger error that stopped the run.
    #[source]
    pub source: AppError,
}

impl From<RepairAborted> for AppError {
    fn from(err: RepairAborted) -> Self {
        let kind = err.source.kind;
        AppError::with_source(kind, err.to_string(), err)
    }
}

#[derive(Debug, Default)]
struct Tally {
    scanned: u64,
    removed: u64,
    chunks: u64,
}

/// Collapses duplicate sub-shares in bounded chunks.
///
/// A run must not overlap with another run against the same ledger.
#[derive(Debug, Clone)]
pub struct ShareIntegrityRepair {
    /// Share rows.
    ledger: Arc<dyn ShareLedger>,
    /// Rows read per chunk.
    chunk_size: usize,
}

impl ShareIntegrityRepair {
    /// Creates a new repair job reading `chunk_size` rows at a time.
    pub fn new(ledger: Arc<dyn ShareLedger>, chunk_size: usize) -> Self {
        Self {
            ledger,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Rows read per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Remove every duplicate sub-share, reporting progress once per chunk.
    pub async fn run(&self, progress: &dyn ProgressSink) -> Result<RepairReport, RepairAborted> {
        let run_id = Uuid::now_v7();
        let started_at = Utc::now();
        info!(%run_id, chunk_size = self.chunk_size, "Starting sub-share repair");

        let mut tally = Tally::default();
        if let Err(source) = self.sweep(progress, &mut tally).await {
            error!(%run_id, removed = tally.removed, error = %source, "Sub-share repair aborted");
            progress.report(&format!(
                "Repair aborted after removing {} duplicate(s)",
                tally.removed
            ));
            return Err(RepairAborted {
                removed: tally.removed,
                source,
            });
        }

        let report = RepairReport {
            run_id,
            scanned: tally.scanned,
            removed: tally.removed,
            chunks: tally.chunks,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            %run_id,
            scanned = report.scanned,
            removed = report.removed,
            chunks = report.chunks,
            "Sub-share repair finished"
        );
        Ok(report)
    }

    async fn sweep(&self, progress: &dyn ProgressSink, tally: &mut Tally) -> AppResult<()> {
        let total = self.ledger.count_sub_shares().await?;
        let mut cursor: Option<SubShareCursor> = None;
        let mut survivor: Option<ShareRow> = None;

        loop {
            let chunk = self
                .ledger
                .scan_sub_shares(cursor.as_ref(), self.chunk_size)
                .await?;
            let Some(last) = chunk.last() else {
                break;
            };
            tally.chunks += 1;
            let removed_before = tally.removed;

            for row in &chunk {
                let Some(key) = row.sub_share_key() else {
                    continue;
                };
                tally.scanned += 1;

                let duplicate = survivor
                    .as_ref()
                    .is_some_and(|kept| kept.sub_share_key() == Some(key));
                if !duplicate {
                    survivor = Some(row.clone());
                    continue;
                }
                debug_assert!(
                    survivor.as_ref().is_some_and(|kept| kept.precedes(row)),
                    "sub-shares scanned out of survivor order"
                );
                let parent = key.0;
                if self.ledger.delete(row.id).await? {
                    tally.removed += 1;
                    debug!(share_id = %row.id, parent_id = %parent, "Removed duplicate sub-share");
                }
            }

            debug!(
                chunk = tally.chunks,
                rows = chunk.len(),
                removed = tally.removed - removed_before,
                "Processed sub-share chunk"
            );
            progress.report(&format!(
                "Processed {} of ~{} sub-shares, removed {} duplicate(s)",
                tally.scanned, total, tally.removed
            ));

            if chunk.len() < self.chunk_size {
                break;
            }
            cursor = SubShareCursor::after(last);
        }
        Ok(())
    }
}
