//! Integration tests for duplicate sub-share removal.

mod helpers;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use sharekit_core::traits::RecordingProgress;
use sharekit_core::types::ShareId;
use sharekit_database::memory::MemoryShareLedger;
use sharekit_database::traits::ShareLedger;
use sharekit_entity::share::RecipientType;
use sharekit_service::ShareIntegrityRepair;

use helpers::{insert_sub_share, share, sub_shares};

/// 500 parents with 11 sub-shares each: user0 three times, user1..user4
/// twice. Keys therefore straddle every chunk size that is not a multiple
/// of 11.
async fn large_ledger() -> Arc<MemoryShareLedger> {
    let ledger = Arc::new(MemoryShareLedger::new());
    for parent in 1..=500 {
        for j in 0..11 {
            insert_sub_share(&ledger, parent, &format!("user{}", j % 5), j).await;
        }
    }
    ledger
}

fn assert_unique_keys(ledger: &MemoryShareLedger) {
    let mut keys = BTreeSet::new();
    for row in sub_shares(ledger) {
        let key = (row.parent_id, row.recipient_type, row.recipient_id.clone());
        assert!(keys.insert(key), "duplicate sub-share {} survived", row.id);
    }
}

#[tokio::test]
async fn test_ten_rows_collapse_to_one_per_recipient() {
    let ledger = Arc::new(MemoryShareLedger::new());
    let root = ledger
        .insert(&share(None, RecipientType::User, "user1", 0))
        .await
        .unwrap();
    let parent = root.id.get();
    for (recipient, copies) in [("user1", 3), ("user2", 3), ("user3", 3), ("user4", 1)] {
        for copy in 0..copies {
            insert_sub_share(&ledger, parent, recipient, 10 + copy).await;
        }
    }
    assert_eq!(sub_shares(&ledger).len(), 10);

    let progress = RecordingProgress::new();
    let report = ShareIntegrityRepair::new(ledger.clone(), 1000)
        .run(&progress)
        .await
        .unwrap();

    assert_eq!(report.removed, 6);
    assert_eq!(report.scanned, 10);
    let remaining: Vec<String> = sub_shares(&ledger)
        .into_iter()
        .map(|row| row.recipient_id)
        .collect();
    assert_eq!(remaining, vec!["user1", "user2", "user3", "user4"]);
    // The root share is not a sub-share and is left alone.
    assert_eq!(ledger.len().unwrap(), 5);
    assert_eq!(progress.messages(), vec![
        "Processed 10 of ~10 sub-shares, removed 6 duplicate(s)".to_string()
    ]);
}

#[tokio::test]
async fn test_earliest_row_survives_regardless_of_id() {
    let ledger = Arc::new(MemoryShareLedger::new());
    insert_sub_share(&ledger, 7, "carol", 300).await;
    let earliest = insert_sub_share(&ledger, 7, "carol", 100).await;
    insert_sub_share(&ledger, 7, "carol", 200).await;

    ShareIntegrityRepair::new(ledger.clone(), 1000)
        .run(&RecordingProgress::new())
        .await
        .unwrap();

    let remaining = sub_shares(&ledger);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, earliest.id);
}

#[tokio::test]
async fn test_equal_timestamps_keep_smallest_id() {
    let ledger = Arc::new(MemoryShareLedger::new());
    let first = insert_sub_share(&ledger, 7, "dave", 100).await;
    insert_sub_share(&ledger, 7, "dave", 100).await;
    insert_sub_share(&ledger, 7, "dave", 100).await;

    ShareIntegrityRepair::new(ledger.clone(), 2)
        .run(&RecordingProgress::new())
        .await
        .unwrap();

    let remaining = sub_shares(&ledger);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, first.id);
}

#[tokio::test]
async fn test_recipient_type_is_part_of_the_key() {
    let ledger = Arc::new(MemoryShareLedger::new());
    ledger
        .insert(&share(Some(3), RecipientType::User, "staff", 0))
        .await
        .unwrap();
    ledger
        .insert(&share(Some(3), RecipientType::Group, "staff", 0))
        .await
        .unwrap();
    insert_sub_share(&ledger, 4, "staff", 0).await;

    let report = ShareIntegrityRepair::new(ledger.clone(), 1000)
        .run(&RecordingProgress::new())
        .await
        .unwrap();
    assert_eq!(report.removed, 0);
    assert_eq!(sub_shares(&ledger).len(), 3);
}

#[tokio::test]
async fn test_root_shares_are_never_removed() {
    let ledger = Arc::new(MemoryShareLedger::new());
    for secs in 0..3 {
        ledger
            .insert(&share(None, RecipientType::User, "erin", secs))
            .await
            .unwrap();
    }
    let report = ShareIntegrityRepair::new(ledger.clone(), 1000)
        .run(&RecordingProgress::new())
        .await
        .unwrap();
    assert_eq!(report.scanned, 0);
    assert_eq!(ledger.len().unwrap(), 3);
}

#[tokio::test]
async fn test_5500_rows_with_default_chunk() {
    let ledger = large_ledger().await;
    let progress = RecordingProgress::new();

    let report = ShareIntegrityRepair::new(ledger.clone(), 1000)
        .run(&progress)
        .await
        .unwrap();

    assert_eq!(report.scanned, 5500);
    assert_eq!(report.removed, 3000);
    assert_eq!(report.chunks, 6);
    assert_eq!(progress.messages().len(), 6);
    assert!(progress.contains("Processed 1000 of ~5500"));
    assert!(progress.contains("Processed 5500 of ~5500 sub-shares, removed 3000 duplicate(s)"));
    assert_eq!(sub_shares(&ledger).len(), 2500);
    assert_unique_keys(&ledger);
}

#[tokio::test]
async fn test_groups_split_across_small_chunks() {
    let ledger = large_ledger().await;
    let progress = RecordingProgress::new();

    let report = ShareIntegrityRepair::new(ledger.clone(), 7)
        .run(&progress)
        .await
        .unwrap();

    assert_eq!(report.removed, 3000);
    assert_eq!(report.chunks, 786);
    assert_eq!(progress.messages().len(), 786);
    assert_eq!(ledger.sub_share_scans().unwrap(), 786);
    assert_unique_keys(&ledger);

    // Each parent keeps exactly one row per recipient, the earliest one.
    let mut survivors: BTreeMap<(Option<ShareId>, String), i64> = BTreeMap::new();
    for row in sub_shares(&ledger) {
        let offset = (row.created_at - helpers::base_time()).num_seconds();
        survivors.insert((row.parent_id, row.recipient_id), offset);
    }
    assert_eq!(survivors.len(), 2500);
    assert!(survivors.iter().all(|((_, recipient), offset)| {
        let n: i64 = recipient.trim_start_matches("user").parse().unwrap();
        *offset == n
    }));
}

#[tokio::test]
async fn test_second_run_removes_nothing() {
    let ledger = large_ledger().await;
    let repair = ShareIntegrityRepair::new(ledger.clone(), 333);

    let first = repair.run(&RecordingProgress::new()).await.unwrap();
    let before = ledger.rows().unwrap();
    let second = repair.run(&RecordingProgress::new()).await.unwrap();

    assert_eq!(first.removed, 3000);
    assert_eq!(second.removed, 0);
    assert_eq!(second.scanned, 2500);
    assert_eq!(ledger.rows().unwrap(), before);
}

#[tokio::test]
async fn test_failure_reports_rows_removed_so_far() {
    let ledger = Arc::new(MemoryShareLedger::new());
    for secs in 0..5 {
        insert_sub_share(&ledger, 9, "frank", secs).await;
    }
    ledger.fail_deletes_after(2).unwrap();
    let progress = RecordingProgress::new();

    let aborted = ShareIntegrityRepair::new(ledger.clone(), 1000)
        .run(&progress)
        .await
        .unwrap_err();

    assert_eq!(aborted.removed, 2);
    assert!(aborted.to_string().contains("removing 2 duplicate(s)"));
    assert!(progress.contains("aborted after removing 2 duplicate(s)"));
    assert_eq!(sub_shares(&ledger).len(), 3);
}
