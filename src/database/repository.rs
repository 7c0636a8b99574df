use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::idea::{Idea, NewIdea};

/// Errors from the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Record store contract for idea documents. One implementation talks to
/// Postgres; tests swap in an in-memory store behind the same seam.
#[async_trait]
pub trait IdeaRepository: Send + Sync {
    /// All ideas, newest first, optionally truncated to `limit` entries.
    async fn find(&self, limit: Option<i64>) -> Result<Vec<Idea>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Idea>, StoreError>;

    /// Persist a new idea; the stored record comes back with its assigned
    /// id and timestamps.
    async fn insert(&self, idea: NewIdea) -> Result<Idea, StoreError>;

    /// Overwrite the mutable fields of an existing record.
    async fn save(&self, idea: &Idea) -> Result<Idea, StoreError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;

    /// Connectivity probe for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Structural validity check for identifiers. Used as a fast-path
    /// guard before any lookup; a malformed id is reported exactly like an
    /// absent record.
    fn is_valid_id(&self, id: &str) -> bool {
        Uuid::parse_str(id).is_ok()
    }
}

/// Postgres-backed record store for ideas
pub struct PgIdeaRepository {
    pool: PgPool,
}

impl PgIdeaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdeaRepository for PgIdeaRepository {
    async fn find(&self, limit: Option<i64>) -> Result<Vec<Idea>, StoreError> {
        let ideas = match limit {
            Some(n) => {
                sqlx::query_as::<_, Idea>(
                    "SELECT * FROM ideas ORDER BY created_at DESC LIMIT $1",
                )
                .bind(n)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Idea>("SELECT * FROM ideas ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(ideas)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Idea>, StoreError> {
        let idea = sqlx::query_as::<_, Idea>("SELECT * FROM ideas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(idea)
    }

    async fn insert(&self, idea: NewIdea) -> Result<Idea, StoreError> {
        let stored = sqlx::query_as::<_, Idea>(
            "INSERT INTO ideas (title, summary, description, tags, user_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(&idea.title)
        .bind(&idea.summary)
        .bind(&idea.description)
        .bind(&idea.tags)
        .bind(idea.user)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn save(&self, idea: &Idea) -> Result<Idea, StoreError> {
        let stored = sqlx::query_as::<_, Idea>(
            "UPDATE ideas SET title = $2, summary = $3, description = $4, tags = $5, \
             updated_at = now() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(idea.id)
        .bind(&idea.title)
        .bind(&idea.summary)
        .bind(&idea.description)
        .bind(&idea.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM ideas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
