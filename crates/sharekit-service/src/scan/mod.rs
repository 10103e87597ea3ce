//! Batch operations over directory members.

pub mod members;

pub use members::{MemberScanService, ScanSummary};
