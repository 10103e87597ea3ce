//! Share dialog configuration.

use serde::{Deserialize, Serialize};

/// Settings consulted when searching for share recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Number of candidates returned when the caller does not ask for a limit.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Ceiling on the number of candidates a single search may return. Values
    /// above 500 are treated as 500.
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Only allow sharing with members of the requester's own groups.
    #[serde(default)]
    pub restrict_to_group_members: bool,
    /// Whether partial matches may reveal directory members. When disabled,
    /// only exact matches are offered.
    #[serde(default = "default_true")]
    pub allow_user_enumeration: bool,
    /// Item types whose backend accepts federated (remote) recipients.
    #[serde(default = "default_remote_item_types")]
    pub remote_item_types: Vec<String>,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            restrict_to_group_members: false,
            allow_user_enumeration: true,
            remote_item_types: default_remote_item_types(),
        }
    }
}

fn default_limit() -> usize {
    15
}

fn default_max_limit() -> usize {
    500
}

fn default_true() -> bool {
    true
}

fn default_remote_item_types() -> Vec<String> {
    vec!["file".to_string(), "folder".to_string()]
}
