//! # sharekit-core
//!
//! Core crate for ShareKit. Contains configuration schemas, typed
//! identifiers, result limits, the progress/scan collaborator traits,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other ShareKit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
