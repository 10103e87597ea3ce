//! Address-book repository.

use async_trait::async_trait;
use sqlx::PgPool;

use sharekit_core::error::{AppError, ErrorKind};
use sharekit_core::result::AppResult;
use sharekit_entity::directory::{Contact, ContactField};

use super::contains_pattern;
use crate::traits::ContactSource;

/// Repository for the `contacts` table.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    /// Create a new contact repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactSource for ContactRepository {
    async fn search(&self, query: &str, fields: &[ContactField]) -> AppResult<Vec<Contact>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Contact>(
            "SELECT full_name, emails, cloud_ids FROM contacts \
             WHERE ($2 AND full_name ILIKE $1) \
                OR ($3 AND EXISTS (SELECT 1 FROM UNNEST(emails) AS e WHERE e ILIKE $1)) \
                OR ($4 AND EXISTS (SELECT 1 FROM UNNEST(cloud_ids) AS c WHERE c ILIKE $1)) \
             ORDER BY full_name NULLS LAST, id",
        )
        .bind(contains_pattern(query))
        .bind(fields.contains(&ContactField::FullName))
        .bind(fields.contains(&ContactField::Email))
        .bind(fields.contains(&ContactField::Cloud))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Directory, "Failed to search contacts", e))
    }
}
