//! Shareable item kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of resource a share points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A single file.
    File,
    /// A folder and everything below it.
    Folder,
}

impl ItemType {
    /// Return the item type as stored in the `item_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            other => Err(format!("unknown item type: {other:?}")),
        }
    }
}
