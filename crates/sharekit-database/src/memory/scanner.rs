//! Scanner that only remembers who it was asked to scan.

use std::sync::Mutex;

use async_trait::async_trait;

use sharekit_core::result::AppResult;
use sharekit_core::traits::UserScanner;

use super::poisoned;

/// Records every scanned user id in order.
#[derive(Debug, Default)]
pub struct RecordingScanner {
    scanned: Mutex<Vec<String>>,
}

impl RecordingScanner {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// User ids scanned so far.
    pub fn scanned(&self) -> Vec<String> {
        self.scanned.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UserScanner for RecordingScanner {
    async fn scan_user(&self, user_id: &str) -> AppResult<()> {
        self.scanned
            .lock()
            .map_err(poisoned)?
            .push(user_id.to_string());
        Ok(())
    }
}
