//! Directory repository over the `directory_*` tables.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;

use sharekit_core::error::{AppError, ErrorKind};
use sharekit_core::result::AppResult;
use sharekit_entity::directory::DirectoryUser;

use super::contains_pattern;
use crate::traits::DirectorySource;

/// Repository for users, groups, and memberships.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    /// Create a new directory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectorySource for DirectoryRepository {
    async fn search_users(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<DirectoryUser>> {
        sqlx::query_as::<_, DirectoryUser>(
            "SELECT user_id, display_name FROM directory_users \
             WHERE user_id ILIKE $1 OR display_name ILIKE $1 \
             ORDER BY LOWER(display_name), user_id LIMIT $2 OFFSET $3",
        )
        .bind(contains_pattern(query))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Directory, "Failed to search users", e))
    }

    async fn search_groups(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT group_id FROM directory_groups WHERE group_id ILIKE $1 \
             ORDER BY group_id LIMIT $2 OFFSET $3",
        )
        .bind(contains_pattern(query))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Directory, "Failed to search groups", e))
    }

    async fn group_members(
        &self,
        group_id: &str,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<DirectoryUser>> {
        sqlx::query_as::<_, DirectoryUser>(
            "SELECT u.user_id, u.display_name FROM directory_group_members m \
             JOIN directory_users u ON u.user_id = m.user_id \
             WHERE m.group_id = $1 AND (u.user_id ILIKE $2 OR u.display_name ILIKE $2) \
             ORDER BY LOWER(u.display_name), u.user_id LIMIT $3 OFFSET $4",
        )
        .bind(group_id)
        .bind(contains_pattern(query))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Directory, "Failed to list group members", e)
        })
    }

    async fn user_groups(&self, user_id: &str) -> AppResult<BTreeSet<String>> {
        let groups = sqlx::query_scalar::<_, String>(
            "SELECT group_id FROM directory_group_members WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Directory, "Failed to load user groups", e))?;
        Ok(groups.into_iter().collect())
    }

    async fn find_user(&self, user_id: &str) -> AppResult<Option<DirectoryUser>> {
        sqlx::query_as::<_, DirectoryUser>(
            "SELECT user_id, display_name FROM directory_users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Directory, "Failed to find user", e))
    }

    async fn group_exists(&self, group_id: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM directory_groups WHERE group_id = $1)",
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Directory, "Failed to look up group", e))
    }
}
