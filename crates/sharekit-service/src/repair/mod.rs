//! Post-hoc repair of share ledger invariants.

pub mod sub_shares;

pub use sub_shares::{RepairAborted, RepairReport, ShareIntegrityRepair};
