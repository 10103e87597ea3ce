//! Share ledger repository.

use async_trait::async_trait;
use sqlx::PgPool;

use sharekit_core::error::{AppError, ErrorKind};
use sharekit_core::result::AppResult;
use sharekit_core::types::ShareId;
use sharekit_entity::share::{NewShareRow, ShareRow, SubShareCursor};

use crate::traits::ShareLedger;

/// Sort key of the sub-share scan. `recipient_id` is compared bytewise so
/// the keyset comparison and the `ORDER BY` always agree.
const SUB_SHARE_ORDER: &str =
    "parent_id, recipient_type, recipient_id COLLATE \"C\", created_at, id";

/// Repository for the `shares` table.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareLedger for ShareRepository {
    async fn insert(&self, share: &NewShareRow) -> AppResult<ShareRow> {
        sqlx::query_as::<_, ShareRow>(
            "INSERT INTO shares (parent_id, recipient_id, recipient_type, owner_id, initiator_id, \
             item_type, item_source, file_source, file_target, permissions, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, NOW())) RETURNING *",
        )
        .bind(share.parent_id)
        .bind(&share.recipient_id)
        .bind(share.recipient_type)
        .bind(&share.owner_id)
        .bind(&share.initiator_id)
        .bind(&share.item_type)
        .bind(&share.item_source)
        .bind(&share.file_source)
        .bind(&share.file_target)
        .bind(share.permissions)
        .bind(share.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert share", e))
    }

    async fn scan_ordered_by_id(
        &self,
        after: Option<ShareId>,
        limit: usize,
    ) -> AppResult<Vec<ShareRow>> {
        sqlx::query_as::<_, ShareRow>(
            "SELECT * FROM shares WHERE ($1::BIGINT IS NULL OR id > $1) ORDER BY id LIMIT $2",
        )
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to scan shares", e))
    }

    async fn scan_sub_shares(
        &self,
        after: Option<&SubShareCursor>,
        limit: usize,
    ) -> AppResult<Vec<ShareRow>> {
        let result = match after {
            None => {
                sqlx::query_as::<_, ShareRow>(&format!(
                    "SELECT * FROM shares WHERE parent_id IS NOT NULL \
                     ORDER BY {SUB_SHARE_ORDER} LIMIT $1"
                ))
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
            Some(cursor) => {
                sqlx::query_as::<_, ShareRow>(&format!(
                    "SELECT * FROM shares WHERE parent_id IS NOT NULL \
                     AND ({SUB_SHARE_ORDER}) > ($1, $2, $3 COLLATE \"C\", $4, $5) \
                     ORDER BY {SUB_SHARE_ORDER} LIMIT $6"
                ))
                .bind(cursor.parent_id)
                .bind(cursor.recipient_type)
                .bind(&cursor.recipient_id)
                .bind(cursor.created_at)
                .bind(cursor.id)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
        };

        result.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to scan sub-shares", e)
        })
    }

    async fn find_by_item(&self, item_type: &str, item_source: &str) -> AppResult<Vec<ShareRow>> {
        sqlx::query_as::<_, ShareRow>(
            "SELECT * FROM shares WHERE item_type = $1 AND item_source = $2 ORDER BY id",
        )
        .bind(item_type)
        .bind(item_source)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list shares for item", e)
        })
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shares WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete share", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_sub_shares(&self) -> AppResult<u64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shares WHERE parent_id IS NOT NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count sub-shares", e)
                })?;
        Ok(total.max(0) as u64)
    }
}
