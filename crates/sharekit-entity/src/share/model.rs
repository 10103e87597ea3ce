//! Share row entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use sharekit_core::types::ShareId;

use super::permission::SharePermissions;
use super::recipient::RecipientType;

/// A persisted sharing relationship.
///
/// Rows with a `parent_id` are sub-shares derived from a root share; for a
/// given parent there must be at most one row per `(recipient_type,
/// recipient_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ShareRow {
    /// Unique share identifier, assigned on insert.
    pub id: ShareId,
    /// The root share this row derives from, if any.
    pub parent_id: Option<ShareId>,
    /// User id, group id, or federated address of the recipient.
    pub recipient_id: String,
    /// Kind of recipient.
    pub recipient_type: RecipientType,
    /// User owning the shared item.
    pub owner_id: String,
    /// User who created the share.
    pub initiator_id: String,
    /// Kind of the shared item (`file`, `folder`).
    pub item_type: String,
    /// Identifier of the shared item.
    pub item_source: String,
    /// Identifier of the underlying file.
    pub file_source: String,
    /// Path of the item as seen by the recipient.
    pub file_target: String,
    /// Granted permissions.
    pub permissions: SharePermissions,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl ShareRow {
    /// Whether this row is a sub-share of another share.
    pub fn is_sub_share(&self) -> bool {
        self.parent_id.is_some()
    }

    /// The uniqueness key of a sub-share, or `None` for root shares.
    pub fn sub_share_key(&self) -> Option<(ShareId, RecipientType, &str)> {
        self.parent_id
            .map(|parent| (parent, self.recipient_type, self.recipient_id.as_str()))
    }

    /// Whether this row should survive over `other` when both share a key.
    ///
    /// The earliest creation time wins; equal times fall back to the
    /// smallest id.
    pub fn precedes(&self, other: &ShareRow) -> bool {
        (self.created_at, self.id) < (other.created_at, other.id)
    }
}

/// Data required to insert a new share row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShareRow {
    /// Parent share, if this is a sub-share.
    pub parent_id: Option<ShareId>,
    /// Recipient identifier.
    pub recipient_id: String,
    /// Recipient kind.
    pub recipient_type: RecipientType,
    /// Owning user.
    pub owner_id: String,
    /// Creating user.
    pub initiator_id: String,
    /// Kind of the shared item.
    pub item_type: String,
    /// Identifier of the shared item.
    pub item_source: String,
    /// Identifier of the underlying file.
    pub file_source: String,
    /// Path of the item for the recipient.
    pub file_target: String,
    /// Granted permissions.
    pub permissions: SharePermissions,
    /// Creation time; the ledger stamps `now` when absent.
    pub created_at: Option<DateTime<Utc>>,
}

/// Keyset position inside the sub-share scan.
///
/// Sub-shares are scanned in `(parent_id, recipient_type, recipient_id,
/// created_at, id)` order, so rows sharing a uniqueness key are adjacent
/// and the first of each run is the survivor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubShareCursor {
    /// Parent share id.
    pub parent_id: ShareId,
    /// Recipient kind.
    pub recipient_type: RecipientType,
    /// Recipient identifier.
    pub recipient_id: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Row id.
    pub id: ShareId,
}

impl SubShareCursor {
    /// Position just after `row`. Returns `None` for root shares.
    pub fn after(row: &ShareRow) -> Option<Self> {
        row.parent_id.map(|parent_id| Self {
            parent_id,
            recipient_type: row.recipient_type,
            recipient_id: row.recipient_id.clone(),
            created_at: row.created_at,
            id: row.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(id: i64, parent: Option<i64>, recipient: &str, secs: i64) -> ShareRow {
        ShareRow {
            id: ShareId(id),
            parent_id: parent.map(ShareId),
            recipient_id: recipient.to_string(),
            recipient_type: RecipientType::User,
            owner_id: "admin".to_string(),
            initiator_id: "admin".to_string(),
            item_type: "folder".to_string(),
            item_source: "24".to_string(),
            file_source: "24".to_string(),
            file_target: "/test".to_string(),
            permissions: SharePermissions::ALL,
            created_at: Utc.timestamp_opt(secs, 0).single().expect("valid timestamp"),
        }
    }

    #[test]
    fn test_root_share_has_no_key() {
        let root = row(1, None, "alice", 0);
        assert!(!root.is_sub_share());
        assert!(root.sub_share_key().is_none());
        assert!(SubShareCursor::after(&root).is_none());
    }

    #[test]
    fn test_precedes_prefers_earliest_then_smallest_id() {
        let early = row(9, Some(1), "alice", 100);
        let late = row(2, Some(1), "alice", 200);
        assert!(early.precedes(&late));
        assert!(!late.precedes(&early));

        let tie_small = row(3, Some(1), "alice", 100);
        let tie_large = row(4, Some(1), "alice", 100);
        assert!(tie_small.precedes(&tie_large));
    }

    #[test]
    fn test_cursor_ordering_groups_keys() {
        let a = SubShareCursor::after(&row(5, Some(1), "alice", 300)).expect("sub-share");
        let b = SubShareCursor::after(&row(4, Some(1), "bob", 100)).expect("sub-share");
        let c = SubShareCursor::after(&row(6, Some(1), "alice", 100)).expect("sub-share");
        let mut cursors = vec![a.clone(), b.clone(), c.clone()];
        cursors.sort();
        assert_eq!(cursors, vec![c, a, b]);
    }
}
