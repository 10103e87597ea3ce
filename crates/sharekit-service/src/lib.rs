//! # sharekit-service
//!
//! Business logic for ShareKit. Each service receives its collaborators
//! (directory, address book, share ledger, scanner) at construction time
//! via `Arc` references and owns no global state.
//!
//! - [`paging`]: bounded page-by-page collection from a directory listing.
//! - [`search`]: share recipient search and relevance ranking.
//! - [`repair`]: removal of duplicate sub-share rows.
//! - [`scan`]: per-member batch operations over groups.

pub mod paging;
pub mod repair;
pub mod scan;
pub mod search;

pub use paging::{Collected, PageWalk, Paged, WalkState};
pub use repair::{RepairAborted, RepairReport, ShareIntegrityRepair};
pub use scan::{MemberScanService, ScanSummary};
pub use search::{
    RelevanceRanker, ResolveRequest, SharePolicy, ShareTargetResolver, SharedRecipients,
};
