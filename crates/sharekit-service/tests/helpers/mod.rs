//! Shared fixtures for the service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use sharekit_core::config::SharingConfig;
use sharekit_core::types::ShareId;
use sharekit_database::memory::{MemoryDirectory, MemoryShareLedger};
use sharekit_database::traits::ShareLedger;
use sharekit_entity::share::{NewShareRow, RecipientType, ShareRow, SharePermissions};
use sharekit_service::ShareTargetResolver;

/// Fixed point in time all fixture timestamps are relative to.
pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .expect("valid timestamp")
}

/// A share row template for `recipient` created `secs` after [`base_time`].
pub fn share(
    parent: Option<i64>,
    recipient_type: RecipientType,
    recipient: &str,
    secs: i64,
) -> NewShareRow {
    NewShareRow {
        parent_id: parent.map(ShareId),
        recipient_id: recipient.to_string(),
        recipient_type,
        owner_id: "admin".to_string(),
        initiator_id: "admin".to_string(),
        item_type: "folder".to_string(),
        item_source: "24".to_string(),
        file_source: "24".to_string(),
        file_target: "/test".to_string(),
        permissions: SharePermissions::ALL,
        created_at: Some(base_time() + Duration::seconds(secs)),
    }
}

/// Insert a user sub-share of `parent`.
pub async fn insert_sub_share(
    ledger: &MemoryShareLedger,
    parent: i64,
    recipient: &str,
    secs: i64,
) -> ShareRow {
    ledger
        .insert(&share(Some(parent), RecipientType::User, recipient, secs))
        .await
        .expect("insert sub-share")
}

/// Sub-share rows left in the ledger.
pub fn sub_shares(ledger: &MemoryShareLedger) -> Vec<ShareRow> {
    ledger
        .rows()
        .expect("ledger rows")
        .into_iter()
        .filter(ShareRow::is_sub_share)
        .collect()
}

/// A directory with `count` users named `user0001`, `user0002`, ...
pub fn directory_with_users(count: usize) -> Arc<MemoryDirectory> {
    let directory = Arc::new(MemoryDirectory::new());
    for i in 1..=count {
        let uid = format!("user{i:04}");
        directory.add_user(&uid, &uid).expect("add user");
    }
    directory
}

/// A resolver over `directory`, using it as the address book as well.
pub fn resolver(
    directory: Arc<MemoryDirectory>,
    ledger: Arc<MemoryShareLedger>,
    config: SharingConfig,
) -> ShareTargetResolver {
    ShareTargetResolver::new(directory.clone(), directory, ledger, config)
}
