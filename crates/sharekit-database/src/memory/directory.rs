//! In-memory user/group directory and address book.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use sharekit_core::error::AppError;
use sharekit_core::result::AppResult;
use sharekit_entity::directory::{Contact, ContactField, DirectoryUser};

use super::poisoned;
use crate::traits::{ContactSource, DirectorySource};

/// One paged request served by [`MemoryDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCall {
    /// `"users"`, `"groups"`, or `"members:<group>"`.
    pub listing: String,
    /// Requested page size.
    pub limit: usize,
    /// Requested offset.
    pub offset: usize,
    /// Number of items returned.
    pub returned: usize,
}

/// Directory and address book held in ordered maps.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    state: RwLock<DirectoryState>,
    calls: Mutex<Vec<PageCall>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: BTreeMap<String, DirectoryUser>,
    groups: BTreeMap<String, BTreeSet<String>>,
    contacts: Vec<Contact>,
    offline: bool,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub fn add_user(&self, user_id: &str, display_name: &str) -> AppResult<()> {
        self.state
            .write()
            .map_err(poisoned)?
            .users
            .insert(user_id.to_string(), DirectoryUser::new(user_id, display_name));
        Ok(())
    }

    /// Create an empty group if it does not exist yet.
    pub fn add_group(&self, group_id: &str) -> AppResult<()> {
        self.state
            .write()
            .map_err(poisoned)?
            .groups
            .entry(group_id.to_string())
            .or_default();
        Ok(())
    }

    /// Add an existing user to a group, creating the group if needed.
    pub fn add_to_group(&self, group_id: &str, user_id: &str) -> AppResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.users.contains_key(user_id) {
            return Err(AppError::not_found(format!("User {user_id} doesn't exist")));
        }
        state
            .groups
            .entry(group_id.to_string())
            .or_default()
            .insert(user_id.to_string());
        Ok(())
    }

    /// Add an address-book contact.
    pub fn add_contact(&self, contact: Contact) -> AppResult<()> {
        self.state.write().map_err(poisoned)?.contacts.push(contact);
        Ok(())
    }

    /// Make every lookup fail, as if the backend were unreachable.
    pub fn set_offline(&self, offline: bool) -> AppResult<()> {
        self.state.write().map_err(poisoned)?.offline = offline;
        Ok(())
    }

    /// Every paged request served so far.
    pub fn page_calls(&self) -> Vec<PageCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Forget the recorded paged requests.
    pub fn clear_page_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn online(&self) -> AppResult<std::sync::RwLockReadGuard<'_, DirectoryState>> {
        let state = self.state.read().map_err(poisoned)?;
        if state.offline {
            return Err(AppError::directory("Directory backend unreachable"));
        }
        Ok(state)
    }

    fn record(&self, listing: String, limit: usize, offset: usize, returned: usize) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(PageCall {
                listing,
                limit,
                offset,
                returned,
            });
        }
    }
}

fn user_matches(user: &DirectoryUser, query: &str) -> bool {
    query.is_empty()
        || user.user_id.to_lowercase().contains(query)
        || user.display_name.to_lowercase().contains(query)
}

/// Sort by display name, then id, and cut out one page.
fn page_of<'a>(
    users: impl Iterator<Item = &'a DirectoryUser>,
    limit: usize,
    offset: usize,
) -> Vec<DirectoryUser> {
    let mut sorted: Vec<&DirectoryUser> = users.collect();
    sorted.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    sorted.into_iter().skip(offset).take(limit).cloned().collect()
}

#[async_trait]
impl DirectorySource for MemoryDirectory {
    async fn search_users(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<DirectoryUser>> {
        let query = query.to_lowercase();
        let page = {
            let state = self.online()?;
            page_of(
                state.users.values().filter(|u| user_matches(u, &query)),
                limit,
                offset,
            )
        };
        self.record("users".to_string(), limit, offset, page.len());
        Ok(page)
    }

    async fn search_groups(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<String>> {
        let query = query.to_lowercase();
        let page: Vec<String> = {
            let state = self.online()?;
            state
                .groups
                .keys()
                .filter(|gid| gid.to_lowercase().contains(&query))
                .skip(offset)
                .take(limit)
                .cloned()
                .collect()
        };
        self.record("groups".to_string(), limit, offset, page.len());
        Ok(page)
    }

    async fn group_members(
        &self,
        group_id: &str,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<DirectoryUser>> {
        let query = query.to_lowercase();
        let page = {
            let state = self.online()?;
            match state.groups.get(group_id) {
                Some(members) => page_of(
                    members
                        .iter()
                        .filter_map(|uid| state.users.get(uid))
                        .filter(|u| user_matches(u, &query)),
                    limit,
                    offset,
                ),
                None => Vec::new(),
            }
        };
        self.record(format!("members:{group_id}"), limit, offset, page.len());
        Ok(page)
    }

    async fn user_groups(&self, user_id: &str) -> AppResult<BTreeSet<String>> {
        let state = self.online()?;
        Ok(state
            .groups
            .iter()
            .filter(|(_, members)| members.contains(user_id))
            .map(|(gid, _)| gid.clone())
            .collect())
    }

    async fn find_user(&self, user_id: &str) -> AppResult<Option<DirectoryUser>> {
        Ok(self.online()?.users.get(user_id).cloned())
    }

    async fn group_exists(&self, group_id: &str) -> AppResult<bool> {
        Ok(self.online()?.groups.contains_key(group_id))
    }
}

#[async_trait]
impl ContactSource for MemoryDirectory {
    async fn search(&self, query: &str, fields: &[ContactField]) -> AppResult<Vec<Contact>> {
        let state = self.online()?;
        Ok(state
            .contacts
            .iter()
            .filter(|c| c.matches(query, fields))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> MemoryDirectory {
        let dir = MemoryDirectory::new();
        dir.add_user("u3", "Charlie").unwrap();
        dir.add_user("u1", "alice").unwrap();
        dir.add_user("u2", "Bob").unwrap();
        dir.add_to_group("staff", "u1").unwrap();
        dir.add_to_group("staff", "u3").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_search_users_sorted_and_paged() {
        let dir = directory();
        let all = dir.search_users("", 10, 0).await.unwrap();
        let names: Vec<&str> = all.iter().map(|u| u.display_name.as_str()).collect();
        assert_eq!(names, vec!["alice", "Bob", "Charlie"]);

        let second = dir.search_users("", 1, 1).await.unwrap();
        assert_eq!(second[0].user_id, "u2");
        assert_eq!(dir.page_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_group_members_and_memberships() {
        let dir = directory();
        let members = dir.group_members("staff", "char", 10, 0).await.unwrap();
        assert_eq!(members, vec![DirectoryUser::new("u3", "Charlie")]);
        assert!(dir.group_members("nope", "", 10, 0).await.unwrap().is_empty());
        assert!(dir.user_groups("u1").await.unwrap().contains("staff"));
        assert!(dir.group_exists("staff").await.unwrap());
        assert!(!dir.group_exists("haystack").await.unwrap());
    }

    #[tokio::test]
    async fn test_offline_directory_fails() {
        let dir = directory();
        dir.set_offline(true).unwrap();
        let err = dir.search_users("a", 5, 0).await.unwrap_err();
        assert_eq!(err.kind, sharekit_core::error::ErrorKind::Directory);
    }
}
