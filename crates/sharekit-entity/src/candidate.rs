//! Recipient candidates offered by the share dialog search.

use serde::{Deserialize, Serialize};

use crate::share::RecipientType;

/// A possible share recipient. Built per search and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Text shown to the searcher.
    pub label: String,
    /// Kind of recipient.
    pub recipient_type: RecipientType,
    /// Identifier the share would be created for.
    pub recipient_id: String,
}

impl Candidate {
    /// A local user candidate labelled with the user's display name.
    pub fn user(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            label: display_name.into(),
            recipient_type: RecipientType::User,
            recipient_id: user_id.into(),
        }
    }

    /// A group candidate labelled with the group id.
    pub fn group(group_id: impl Into<String>) -> Self {
        let group_id = group_id.into();
        Self {
            label: group_id.clone(),
            recipient_type: RecipientType::Group,
            recipient_id: group_id,
        }
    }

    /// A federated address candidate.
    pub fn remote(label: impl Into<String>, cloud_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            recipient_type: RecipientType::Remote,
            recipient_id: cloud_id.into(),
        }
    }

    /// Whether the label or the recipient id equals `query`, ignoring case.
    pub fn matches_exactly(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.label.to_lowercase() == query || self.recipient_id.to_lowercase() == query
    }
}

/// An address-book email match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCandidate {
    /// Email address.
    pub email: String,
    /// Contact's full name.
    pub display_name: String,
}
