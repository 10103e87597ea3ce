//! In-memory share ledger.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use sharekit_core::error::AppError;
use sharekit_core::result::AppResult;
use sharekit_core::types::ShareId;
use sharekit_entity::share::{NewShareRow, ShareRow, SubShareCursor};

use super::poisoned;
use crate::traits::ShareLedger;

/// Share ledger held in ordered maps.
#[derive(Debug, Default)]
pub struct MemoryShareLedger {
    state: RwLock<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    rows: BTreeMap<ShareId, ShareRow>,
    /// Sub-shares keyed by their scan position.
    sub_shares: BTreeMap<SubShareCursor, ShareId>,
    next_id: i64,
    deletes: usize,
    delete_limit: Option<usize>,
    sub_share_scans: usize,
}

impl MemoryShareLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delete after the first `limit` successful ones fail.
    pub fn fail_deletes_after(&self, limit: usize) -> AppResult<()> {
        self.state.write().map_err(poisoned)?.delete_limit = Some(limit);
        Ok(())
    }

    /// Snapshot of all rows in id order.
    pub fn rows(&self) -> AppResult<Vec<ShareRow>> {
        Ok(self.state.read().map_err(poisoned)?.rows.values().cloned().collect())
    }

    /// Number of rows currently stored.
    pub fn len(&self) -> AppResult<usize> {
        Ok(self.state.read().map_err(poisoned)?.rows.len())
    }

    /// Whether the ledger holds no rows.
    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of `scan_sub_shares` calls served so far.
    pub fn sub_share_scans(&self) -> AppResult<usize> {
        Ok(self.state.read().map_err(poisoned)?.sub_share_scans)
    }
}

#[async_trait]
impl ShareLedger for MemoryShareLedger {
    async fn insert(&self, share: &NewShareRow) -> AppResult<ShareRow> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.next_id += 1;
        let row = ShareRow {
            id: ShareId(state.next_id),
            parent_id: share.parent_id,
            recipient_id: share.recipient_id.clone(),
            recipient_type: share.recipient_type,
            owner_id: share.owner_id.clone(),
            initiator_id: share.initiator_id.clone(),
            item_type: share.item_type.clone(),
            item_source: share.item_source.clone(),
            file_source: share.file_source.clone(),
            file_target: share.file_target.clone(),
            permissions: share.permissions,
            created_at: share.created_at.unwrap_or_else(Utc::now),
        };
        if let Some(cursor) = SubShareCursor::after(&row) {
            state.sub_shares.insert(cursor, row.id);
        }
        state.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn scan_ordered_by_id(
        &self,
        after: Option<ShareId>,
        limit: usize,
    ) -> AppResult<Vec<ShareRow>> {
        let state = self.state.read().map_err(poisoned)?;
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        Ok(state
            .rows
            .range((lower, Bound::Unbounded))
            .take(limit)
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn scan_sub_shares(
        &self,
        after: Option<&SubShareCursor>,
        limit: usize,
    ) -> AppResult<Vec<ShareRow>> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.sub_share_scans += 1;
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        let page = state
            .sub_shares
            .range((lower, Bound::Unbounded))
            .take(limit)
            .filter_map(|(_, id)| state.rows.get(id).cloned())
            .collect();
        Ok(page)
    }

    async fn find_by_item(&self, item_type: &str, item_source: &str) -> AppResult<Vec<ShareRow>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .rows
            .values()
            .filter(|row| row.item_type == item_type && row.item_source == item_source)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: ShareId) -> AppResult<bool> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.delete_limit.is_some_and(|limit| state.deletes >= limit) {
            return Err(AppError::database(format!("Failed to delete share {id}")));
        }
        let Some(row) = state.rows.remove(&id) else {
            return Ok(false);
        };
        if let Some(cursor) = SubShareCursor::after(&row) {
            state.sub_shares.remove(&cursor);
        }
        state.deletes += 1;
        Ok(true)
    }

    async fn count_sub_shares(&self) -> AppResult<u64> {
        Ok(self.state.read().map_err(poisoned)?.sub_shares.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use sharekit_entity::share::{RecipientType, SharePermissions};

    fn sub_share(parent: i64, recipient: &str, offset_secs: i64) -> NewShareRow {
        let base = Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid timestamp");
        NewShareRow {
            parent_id: Some(ShareId(parent)),
            recipient_id: recipient.to_string(),
            recipient_type: RecipientType::User,
            owner_id: "admin".to_string(),
            initiator_id: "admin".to_string(),
            item_type: "folder".to_string(),
            item_source: "24".to_string(),
            file_source: "24".to_string(),
            file_target: "/test".to_string(),
            permissions: SharePermissions::ALL,
            created_at: Some(base + Duration::seconds(offset_secs)),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let ledger = MemoryShareLedger::new();
        let a = ledger.insert(&sub_share(1, "alice", 0)).await.unwrap();
        let b = ledger.insert(&sub_share(1, "bob", 0)).await.unwrap();
        assert!(a.id < b.id);
        assert_eq!(ledger.count_sub_shares().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_sub_share_scan_orders_by_key_then_time() {
        let ledger = MemoryShareLedger::new();
        ledger.insert(&sub_share(1, "bob", 0)).await.unwrap();
        ledger.insert(&sub_share(1, "alice", 50)).await.unwrap();
        ledger.insert(&sub_share(1, "alice", 10)).await.unwrap();

        let page = ledger.scan_sub_shares(None, 10).await.unwrap();
        let order: Vec<(&str, i64)> = page
            .iter()
            .map(|r| (r.recipient_id.as_str(), r.id.get()))
            .collect();
        assert_eq!(order, vec![("alice", 3), ("alice", 2), ("bob", 1)]);

        let cursor = SubShareCursor::after(&page[0]).unwrap();
        let rest = ledger.scan_sub_shares(Some(&cursor), 10).await.unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].id, ShareId(2));
    }

    #[tokio::test]
    async fn test_scan_by_id_pages() {
        let ledger = MemoryShareLedger::new();
        for i in 0..5 {
            ledger.insert(&sub_share(1, &format!("u{i}"), 0)).await.unwrap();
        }
        let first = ledger.scan_ordered_by_id(None, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        let next = ledger.scan_ordered_by_id(Some(first[1].id), 10).await.unwrap();
        assert_eq!(next.len(), 3);
        assert_eq!(next[0].id, ShareId(3));
    }

    #[tokio::test]
    async fn test_delete_limit_fails_after_budget() {
        let ledger = MemoryShareLedger::new();
        let a = ledger.insert(&sub_share(1, "a", 0)).await.unwrap();
        let b = ledger.insert(&sub_share(1, "b", 0)).await.unwrap();
        ledger.fail_deletes_after(1).unwrap();
        assert!(ledger.delete(a.id).await.unwrap());
        assert!(ledger.delete(b.id).await.is_err());
        assert_eq!(ledger.count_sub_shares().await.unwrap(), 1);
    }
}
