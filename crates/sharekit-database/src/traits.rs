//! Collaborator seams between the ShareKit services and their backends.
//!
//! Every paged method takes `(limit, offset)` and returns at most `limit`
//! items in a stable order. A page shorter than `limit` means the listing
//! is exhausted.

use std::collections::BTreeSet;

use async_trait::async_trait;

use sharekit_core::result::AppResult;
use sharekit_core::types::ShareId;
use sharekit_entity::directory::{Contact, ContactField, DirectoryUser};
use sharekit_entity::share::{NewShareRow, ShareRow, SubShareCursor};

/// Paged access to users, groups, and group memberships.
#[async_trait]
pub trait DirectorySource: Send + Sync + std::fmt::Debug + 'static {
    /// Users whose id or display name contains `query`, ordered by display name.
    async fn search_users(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<DirectoryUser>>;

    /// Group ids containing `query`, ordered by id.
    async fn search_groups(&self, query: &str, limit: usize, offset: usize)
    -> AppResult<Vec<String>>;

    /// Members of `group_id` matching `query`, ordered by display name.
    ///
    /// An unknown group yields an empty page.
    async fn group_members(
        &self,
        group_id: &str,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<DirectoryUser>>;

    /// Ids of the groups `user_id` belongs to.
    async fn user_groups(&self, user_id: &str) -> AppResult<BTreeSet<String>>;

    /// Look up a single user.
    async fn find_user(&self, user_id: &str) -> AppResult<Option<DirectoryUser>>;

    /// Whether a group with this id exists.
    async fn group_exists(&self, group_id: &str) -> AppResult<bool>;
}

/// Address-book search.
#[async_trait]
pub trait ContactSource: Send + Sync + std::fmt::Debug + 'static {
    /// Contacts where any of `fields` contains `query`.
    async fn search(&self, query: &str, fields: &[ContactField]) -> AppResult<Vec<Contact>>;
}

/// Persistent store of share rows.
#[async_trait]
pub trait ShareLedger: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a row and return it with its assigned id.
    async fn insert(&self, share: &NewShareRow) -> AppResult<ShareRow>;

    /// Up to `limit` rows with `id > after`, ascending by id.
    async fn scan_ordered_by_id(
        &self,
        after: Option<ShareId>,
        limit: usize,
    ) -> AppResult<Vec<ShareRow>>;

    /// Up to `limit` sub-shares positioned after `after` in
    /// `(parent_id, recipient_type, recipient_id, created_at, id)` order.
    /// Root shares are never returned.
    async fn scan_sub_shares(
        &self,
        after: Option<&SubShareCursor>,
        limit: usize,
    ) -> AppResult<Vec<ShareRow>>;

    /// All rows sharing the given item.
    async fn find_by_item(&self, item_type: &str, item_source: &str) -> AppResult<Vec<ShareRow>>;

    /// Delete a row. Returns `true` if a row was removed.
    async fn delete(&self, id: ShareId) -> AppResult<bool>;

    /// Number of sub-share rows.
    async fn count_sub_shares(&self) -> AppResult<u64>;
}
