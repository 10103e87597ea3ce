//! Batch job configuration (share repair and member scans).

use serde::{Deserialize, Serialize};

/// Share integrity repair settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Number of share rows loaded per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// Group member scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of group members fetched per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_page_size() -> usize {
    200
}
