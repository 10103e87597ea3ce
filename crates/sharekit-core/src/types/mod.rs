//! Core type definitions used across the ShareKit workspace.

pub mod id;
pub mod limit;

pub use id::ShareId;
pub use limit::{MAX_RESULT_LIMIT, ResultLimit};
