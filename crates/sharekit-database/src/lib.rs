//! # sharekit-database
//!
//! The collaborator seams consumed by the ShareKit services
//! ([`ShareLedger`], [`DirectorySource`], [`ContactSource`]), their
//! PostgreSQL implementations, and in-memory implementations used by tests
//! and local tooling.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod traits;

pub use connection::DatabasePool;
pub use traits::{ContactSource, DirectorySource, ShareLedger};
