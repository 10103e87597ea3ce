//! Records returned by the user/group directory and the address book.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user entry from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct DirectoryUser {
    /// Login / user id.
    pub user_id: String,
    /// Name shown in search results.
    pub display_name: String,
}

impl DirectoryUser {
    /// Create a directory user.
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Address-book fields a contact search can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContactField {
    /// Full (formatted) name.
    #[serde(rename = "FN")]
    FullName,
    /// Email addresses.
    Email,
    /// Federated cloud ids.
    Cloud,
}

/// An address-book contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    /// Full name, if the card has one.
    pub full_name: Option<String>,
    /// Email addresses.
    #[serde(default)]
    pub emails: Vec<String>,
    /// Federated cloud ids.
    #[serde(default)]
    pub cloud_ids: Vec<String>,
}

impl Contact {
    /// Full name, or an empty string when the card has none.
    pub fn name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("")
    }

    /// Whether any of `fields` contains `query`, ignoring case.
    pub fn matches(&self, query: &str, fields: &[ContactField]) -> bool {
        let query = query.to_lowercase();
        let hit = |value: &str| value.to_lowercase().contains(&query);
        fields.iter().any(|field| match field {
            ContactField::FullName => self.full_name.as_deref().is_some_and(hit),
            ContactField::Email => self.emails.iter().any(|e| hit(e)),
            ContactField::Cloud => self.cloud_ids.iter().any(|c| hit(c)),
        })
    }
}
