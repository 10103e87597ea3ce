//! Share permission bitmask.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission bits granted by a share row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SharePermissions(pub i32);

impl SharePermissions {
    /// Read the shared item.
    pub const READ: Self = Self(1);
    /// Modify the shared item.
    pub const UPDATE: Self = Self(2);
    /// Create children inside a shared folder.
    pub const CREATE: Self = Self(4);
    /// Delete the shared item or its children.
    pub const DELETE: Self = Self(8);
    /// Re-share with others.
    pub const SHARE: Self = Self(16);
    /// Every permission bit.
    pub const ALL: Self = Self(31);

    /// Whether every bit in `other` is set here.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Restrict these permissions to what `parent` grants.
    ///
    /// A re-share can narrow but never widen its parent.
    pub fn narrowed_to(self, parent: Self) -> Self {
        Self(self.0 & parent.0)
    }
}

impl fmt::Display for SharePermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (Self::READ, 'r'),
            (Self::UPDATE, 'u'),
            (Self::CREATE, 'c'),
            (Self::DELETE, 'd'),
            (Self::SHARE, 's'),
        ];
        for (bit, ch) in flags {
            write!(f, "{}", if self.contains(bit) { ch } else { '-' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrowing_never_widens() {
        let parent = SharePermissions(SharePermissions::READ.0 | SharePermissions::SHARE.0);
        let narrowed = SharePermissions::ALL.narrowed_to(parent);
        assert_eq!(narrowed, parent);
        assert!(!narrowed.contains(SharePermissions::DELETE));
    }

    #[test]
    fn test_display() {
        assert_eq!(SharePermissions::ALL.to_string(), "rucds");
        assert_eq!(SharePermissions::READ.to_string(), "r----");
    }
}
