//! Collaborator traits defined in `sharekit-core` and implemented elsewhere.

pub mod progress;
pub mod scanner;

pub use progress::{ProgressSink, RecordingProgress, TracingProgress};
pub use scanner::UserScanner;
