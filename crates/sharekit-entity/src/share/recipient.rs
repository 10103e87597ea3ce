//! Share recipient kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who a share row grants access to.
///
/// The declaration order is also the sort order used by the database enum,
/// and ledger scans rely on both agreeing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "recipient_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    /// A local user.
    User,
    /// A local group.
    Group,
    /// A federated address on another server.
    Remote,
}

impl RecipientType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for RecipientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            "remote" => Ok(Self::Remote),
            other => Err(format!("unknown recipient type: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_matches_declaration() {
        let mut types = vec![RecipientType::Remote, RecipientType::User, RecipientType::Group];
        types.sort();
        assert_eq!(
            types,
            vec![RecipientType::User, RecipientType::Group, RecipientType::Remote]
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("GROUP".parse::<RecipientType>(), Ok(RecipientType::Group));
        assert!("link".parse::<RecipientType>().is_err());
    }
}
