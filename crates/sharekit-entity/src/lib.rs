//! # sharekit-entity
//!
//! Domain entity models for ShareKit. Share rows map to the `shares`
//! table and derive `sqlx::FromRow`; candidates and directory records are
//! transient value objects exchanged with the directory and the caller.

pub mod candidate;
pub mod directory;
pub mod share;

pub use candidate::{Candidate, EmailCandidate};
pub use directory::{Contact, ContactField, DirectoryUser};
pub use share::{ItemType, NewShareRow, RecipientType, ShareRow, SharePermissions, SubShareCursor};
