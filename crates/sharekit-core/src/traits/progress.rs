//! Progress reporting for long-running batch operations.

use std::sync::Mutex;

/// Receives human-readable progress messages from batch jobs.
///
/// Reporting is advisory; implementations must not fail the job.
pub trait ProgressSink: Send + Sync {
    /// Report one progress message.
    fn report(&self, message: &str);
}

/// Writes progress messages to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, message: &str) {
        tracing::info!(target: "sharekit::progress", "{message}");
    }
}

/// Keeps every reported message in memory.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the messages reported so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Whether any reported message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_progress() {
        let sink = RecordingProgress::new();
        sink.report("processed 10 of ~20");
        sink.report("processed 20 of ~20");
        assert_eq!(sink.messages().len(), 2);
        assert!(sink.contains("20 of ~20"));
        assert!(!sink.contains("30"));
    }
}
