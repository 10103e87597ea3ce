//! In-memory collaborators.
//!
//! These back the service tests and local experiments. They honor the same
//! ordering and paging contracts as the PostgreSQL repositories.

pub mod directory;
pub mod ledger;
pub mod scanner;

pub use directory::{MemoryDirectory, PageCall};
pub use ledger::MemoryShareLedger;
pub use scanner::RecordingScanner;

use sharekit_core::error::AppError;

fn poisoned<T>(_: T) -> AppError {
    AppError::internal("In-memory store lock poisoned")
}
