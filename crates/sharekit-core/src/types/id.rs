//! Share row identifiers.
//!
//! Share ids are database-assigned, monotonically increasing integers.
//! Ordering matters: the smallest id wins a duplicate tie-break and
//! ledger scans page by ascending id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a share row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct ShareId(pub i64);

impl ShareId {
    /// Return the raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShareId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<i64> for ShareId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}
