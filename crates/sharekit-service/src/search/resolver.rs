//! Share target resolution: partial query in, ranked recipients out.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use sharekit_core::config::SharingConfig;
use sharekit_core::result::AppResult;
use sharekit_core::types::ResultLimit;
use sharekit_database::traits::{ContactSource, DirectorySource, ShareLedger};
use sharekit_entity::candidate::{Candidate, EmailCandidate};
use sharekit_entity::directory::{ContactField, DirectoryUser};
use sharekit_entity::share::{ItemType, RecipientType, ShareRow};

use super::ranker::RelevanceRanker;
use crate::paging::PageWalk;

/// Recipients an item is already shared with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedRecipients {
    /// User ids.
    #[serde(default)]
    pub users: HashSet<String>,
    /// Group ids.
    #[serde(default)]
    pub groups: HashSet<String>,
}

impl SharedRecipients {
    /// Collect the user and group recipients of existing share rows.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a ShareRow>) -> Self {
        let mut shared = Self::default();
        shared.extend(rows);
        shared
    }

    /// Add the user and group recipients of `rows`. Remote recipients are
    /// never excluded.
    pub fn extend<'a>(&mut self, rows: impl IntoIterator<Item = &'a ShareRow>) {
        for row in rows {
            match row.recipient_type {
                RecipientType::User => {
                    self.users.insert(row.recipient_id.clone());
                }
                RecipientType::Group => {
                    self.groups.insert(row.recipient_id.clone());
                }
                RecipientType::Remote => {}
            }
        }
    }
}

/// Who the requester may discover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePolicy {
    /// Only offer members of the requester's own groups, and only those groups.
    pub restrict_to_group_members: bool,
    /// Whether partial matches may be offered.
    pub allow_enumeration: bool,
}

impl SharePolicy {
    /// Policy configured for the installation.
    pub fn from_config(config: &SharingConfig) -> Self {
        Self {
            restrict_to_group_members: config.restrict_to_group_members,
            allow_enumeration: config.allow_user_enumeration,
        }
    }
}

impl Default for SharePolicy {
    fn default() -> Self {
        Self {
            restrict_to_group_members: false,
            allow_enumeration: true,
        }
    }
}

/// A recipient search issued from a share dialog.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResolveRequest {
    /// User performing the search.
    #[validate(length(min = 1, max = 255))]
    pub requester: String,
    /// Partial name, id, or federated address.
    #[validate(length(max = 255))]
    pub query: String,
    /// Kind of item being shared (`file`, `folder`).
    pub item_type: Option<String>,
    /// Requested number of candidates.
    pub limit: Option<usize>,
    /// Recipients to leave out.
    #[serde(default)]
    pub already_shared: SharedRecipients,
    /// Discovery policy.
    #[serde(default)]
    pub policy: SharePolicy,
}

impl ResolveRequest {
    /// A request with no item type, default limit, and no exclusions.
    pub fn new(requester: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            requester: requester.into(),
            query: query.into(),
            item_type: None,
            limit: None,
            already_shared: SharedRecipients::default(),
            policy: SharePolicy::default(),
        }
    }

    /// Set the item type.
    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Set the requested limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the recipients to exclude.
    pub fn already_shared(mut self, shared: SharedRecipients) -> Self {
        self.already_shared = shared;
        self
    }

    /// Set the discovery policy.
    pub fn policy(mut self, policy: SharePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Turns partial search strings into ranked, policy-filtered recipients.
///
/// Directory listings are consumed page by page, so no more than the
/// requested number of users or groups is ever held at once.
#[derive(Debug, Clone)]
pub struct ShareTargetResolver {
    /// User/group directory.
    directory: Arc<dyn DirectorySource>,
    /// Address book.
    contacts: Arc<dyn ContactSource>,
    /// Share rows, for existing recipients.
    ledger: Arc<dyn ShareLedger>,
    /// Limits and remote-capable item types.
    config: SharingConfig,
}

impl ShareTargetResolver {
    /// Creates a new resolver.
    pub fn new(
        directory: Arc<dyn DirectorySource>,
        contacts: Arc<dyn ContactSource>,
        ledger: Arc<dyn ShareLedger>,
        config: SharingConfig,
    ) -> Self {
        Self {
            directory,
            contacts,
            ledger,
            config,
        }
    }

    /// Resolve `request` into at most `limit` ranked candidates.
    ///
    /// Malformed requests and unknown item types yield an empty list.
    /// Directory failures are propagated.
    pub async fn resolve(&self, request: &ResolveRequest) -> AppResult<Vec<Candidate>> {
        if let Err(errors) = request.validate() {
            warn!(requester = %request.requester, %errors, "Rejected recipient search");
            return Ok(Vec::new());
        }
        let Some(item_type) = request.item_type.as_deref() else {
            warn!(requester = %request.requester, "Recipient search without item type");
            return Ok(Vec::new());
        };
        let item_type: ItemType = match item_type.parse() {
            Ok(item_type) => item_type,
            Err(_) => {
                warn!(requester = %request.requester, item_type, "Unknown item type");
                return Ok(Vec::new());
            }
        };

        let limit = ResultLimit::resolve(
            request.limit,
            self.config.default_limit,
            self.config.max_limit,
        )
        .get();
        let query = request.query.trim();

        let allowed_groups = if request.policy.restrict_to_group_members {
            Some(self.directory.user_groups(&request.requester).await?)
        } else {
            None
        };

        let mut candidates = self
            .collect_users(request, query, limit, allowed_groups.as_ref())
            .await?;
        candidates.extend(
            self.collect_groups(request, query, limit, allowed_groups.as_ref())
                .await?,
        );
        if self.accepts_remote(item_type) {
            candidates.extend(self.collect_remotes(query).await?);
        }

        if !request.policy.allow_enumeration {
            candidates.retain(|c| c.matches_exactly(query));
            if let Some(user) = self
                .exact_user(request, query, allowed_groups.as_ref())
                .await?
            {
                if !candidates
                    .iter()
                    .any(|c| c.recipient_type == RecipientType::User && c.recipient_id == user.user_id)
                {
                    candidates.push(Candidate::user(user.user_id, user.display_name));
                }
            }
            if let Some(group_id) = self
                .exact_group(request, query, allowed_groups.as_ref())
                .await?
            {
                if !candidates
                    .iter()
                    .any(|c| c.recipient_type == RecipientType::Group && c.recipient_id == group_id)
                {
                    candidates.push(Candidate::group(group_id));
                }
            }
        }

        RelevanceRanker::new(query).rank(&mut candidates);
        candidates.truncate(limit);

        debug!(
            requester = %request.requester,
            query,
            limit,
            found = candidates.len(),
            "Resolved share recipients"
        );
        Ok(candidates)
    }

    /// Like [`resolve`](Self::resolve), excluding everyone the item is
    /// already shared with according to the ledger.
    pub async fn resolve_for_item(
        &self,
        request: &ResolveRequest,
        item_source: &str,
    ) -> AppResult<Vec<Candidate>> {
        let Some(item_type) = request.item_type.as_deref() else {
            return self.resolve(request).await;
        };
        let existing = self.ledger.find_by_item(item_type, item_source).await?;
        let mut request = request.clone();
        request.already_shared.extend(&existing);
        self.resolve(&request).await
    }

    /// Address-book email addresses whose contact name or address contains
    /// `query`. Empty when enumeration is not allowed.
    pub async fn resolve_email(
        &self,
        query: &str,
        policy: SharePolicy,
    ) -> AppResult<Vec<EmailCandidate>> {
        let query = query.trim();
        if !policy.allow_enumeration || query.is_empty() {
            return Ok(Vec::new());
        }
        let contacts = self
            .contacts
            .search(query, &[ContactField::FullName, ContactField::Email])
            .await?;
        Ok(contacts
            .iter()
            .flat_map(|contact| {
                contact.emails.iter().map(|email| EmailCandidate {
                    email: email.clone(),
                    display_name: contact.name().to_string(),
                })
            })
            .collect())
    }

    fn accepts_remote(&self, item_type: ItemType) -> bool {
        self.config
            .remote_item_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(item_type.as_str()))
    }

    /// Users matching `query`, excluding the requester and existing
    /// recipients. With a group restriction only members of the allowed
    /// groups are visited, one group listing after another.
    async fn collect_users(
        &self,
        request: &ResolveRequest,
        query: &str,
        limit: usize,
        allowed_groups: Option<&BTreeSet<String>>,
    ) -> AppResult<Vec<Candidate>> {
        let directory = self.directory.as_ref();
        let mut seen: HashSet<String> = HashSet::new();
        let mut accept = |user: &DirectoryUser| {
            user.user_id != request.requester
                && !request.already_shared.users.contains(&user.user_id)
                && seen.insert(user.user_id.clone())
        };

        let mut users = Vec::new();
        match allowed_groups {
            Some(groups) => {
                for group_id in groups {
                    let wanted = limit - users.len();
                    if wanted == 0 {
                        break;
                    }
                    let walk = PageWalk::new(
                        move |page_limit, offset| {
                            directory.group_members(group_id, query, page_limit, offset)
                        },
                        wanted,
                    );
                    users.extend(walk.run(&mut accept).await?.into_items());
                }
            }
            None => {
                let walk = PageWalk::new(
                    move |page_limit, offset| directory.search_users(query, page_limit, offset),
                    limit,
                );
                users = walk.run(&mut accept).await?.into_items();
            }
        }

        Ok(users
            .into_iter()
            .map(|user| Candidate::user(user.user_id, user.display_name))
            .collect())
    }

    /// Groups matching `query`, restricted to `allowed_groups` when set, minus
    /// existing recipients.
    async fn collect_groups(
        &self,
        request: &ResolveRequest,
        query: &str,
        limit: usize,
        allowed_groups: Option<&BTreeSet<String>>,
    ) -> AppResult<Vec<Candidate>> {
        let directory = self.directory.as_ref();
        let walk = PageWalk::new(
            move |page_limit, offset| directory.search_groups(query, page_limit, offset),
            limit,
        );
        let groups = walk
            .run(|group_id: &String| {
                allowed_groups.is_none_or(|allowed| allowed.contains(group_id))
                    && !request.already_shared.groups.contains(group_id)
            })
            .await?;
        Ok(groups.into_items().into_iter().map(Candidate::group).collect())
    }

    /// The query itself when it looks like a federated address, plus every
    /// cloud id of matching address-book contacts.
    async fn collect_remotes(&self, query: &str) -> AppResult<Vec<Candidate>> {
        let mut remotes: Vec<Candidate> = Vec::new();
        if query.is_empty() {
            return Ok(remotes);
        }

        let contacts = self
            .contacts
            .search(query, &[ContactField::Cloud, ContactField::FullName])
            .await?;
        for contact in &contacts {
            for cloud_id in &contact.cloud_ids {
                if remotes.iter().any(|r| r.recipient_id == *cloud_id) {
                    continue;
                }
                let label = match contact.full_name.as_deref() {
                    Some(name) if !name.is_empty() => format!("{name} ({cloud_id})"),
                    _ => cloud_id.clone(),
                };
                remotes.push(Candidate::remote(label, cloud_id.clone()));
            }
        }

        if query.contains('@')
            && !remotes
                .iter()
                .any(|r| r.recipient_id.eq_ignore_ascii_case(query))
        {
            remotes.insert(0, Candidate::remote(query, query));
        }
        Ok(remotes)
    }

    /// A user whose id equals `query`, when the policy lets the requester
    /// share with them.
    async fn exact_user(
        &self,
        request: &ResolveRequest,
        query: &str,
        allowed_groups: Option<&BTreeSet<String>>,
    ) -> AppResult<Option<DirectoryUser>> {
        if query.is_empty() || query == request.requester {
            return Ok(None);
        }
        let Some(user) = self.directory.find_user(query).await? else {
            return Ok(None);
        };
        if request.already_shared.users.contains(&user.user_id) {
            return Ok(None);
        }
        if let Some(allowed) = allowed_groups {
            let groups = self.directory.user_groups(&user.user_id).await?;
            if groups.is_disjoint(allowed) {
                return Ok(None);
            }
        }
        Ok(Some(user))
    }

    /// A group whose id equals `query`, when the policy lets the requester
    /// share with it.
    async fn exact_group(
        &self,
        request: &ResolveRequest,
        query: &str,
        allowed_groups: Option<&BTreeSet<String>>,
    ) -> AppResult<Option<String>> {
        if query.is_empty() || !self.directory.group_exists(query).await? {
            return Ok(None);
        }
        if allowed_groups.is_some_and(|allowed| !allowed.contains(query)) {
            return Ok(None);
        }
        if request.already_shared.groups.contains(query) {
            return Ok(None);
        }
        Ok(Some(query.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use sharekit_database::memory::{MemoryDirectory, MemoryShareLedger};

    use super::*;

    fn resolver(directory: Arc<MemoryDirectory>) -> ShareTargetResolver {
        ShareTargetResolver::new(
            directory.clone(),
            directory,
            Arc::new(MemoryShareLedger::new()),
            SharingConfig::default(),
        )
    }

    #[test]
    fn test_policy_from_config() {
        let config = SharingConfig {
            restrict_to_group_members: true,
            allow_user_enumeration: false,
            ..SharingConfig::default()
        };
        let policy = SharePolicy::from_config(&config);
        assert!(policy.restrict_to_group_members);
        assert!(!policy.allow_enumeration);
        assert!(SharePolicy::default().allow_enumeration);
    }

    #[tokio::test]
    async fn test_missing_item_type_is_empty() {
        let directory = Arc::new(MemoryDirectory::new());
        directory.add_user("bob", "Bob").unwrap();
        let found = resolver(directory.clone())
            .resolve(&ResolveRequest::new("alice", "bob"))
            .await
            .unwrap();
        assert!(found.is_empty());
        assert!(directory.page_calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_item_type_is_empty() {
        let directory = Arc::new(MemoryDirectory::new());
        directory.add_user("bob", "Bob").unwrap();
        let found = resolver(directory)
            .resolve(&ResolveRequest::new("alice", "bob").item_type("calendar"))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_is_empty() {
        let directory = Arc::new(MemoryDirectory::new());
        directory.add_user("bob", "Bob").unwrap();
        let found = resolver(directory)
            .resolve(&ResolveRequest::new("", "bob").item_type("file"))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_requester_is_never_offered() {
        let directory = Arc::new(MemoryDirectory::new());
        directory.add_user("alice", "Alice").unwrap();
        directory.add_user("alicia", "Alicia").unwrap();
        let found = resolver(directory)
            .resolve(&ResolveRequest::new("alice", "ali").item_type("file"))
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.recipient_id.as_str()).collect();
        assert_eq!(ids, vec!["alicia"]);
    }

    #[tokio::test]
    async fn test_remote_address_offered_verbatim() {
        let directory = Arc::new(MemoryDirectory::new());
        let found = resolver(directory)
            .resolve(&ResolveRequest::new("alice", "bob@remote.example").item_type("folder"))
            .await
            .unwrap();
        assert_eq!(
            found,
            vec![Candidate::remote("bob@remote.example", "bob@remote.example")]
        );
    }
}
