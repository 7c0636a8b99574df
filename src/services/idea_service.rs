use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::idea::{Idea, NewIdea};
use crate::database::repository::{IdeaRepository, StoreError};

#[derive(Debug, Error)]
pub enum IdeaError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Idea not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Tags arrive over the wire either as one comma-delimited string or as an
/// already ordered list. The raw JSON value is resolved into this variant
/// once at the transport boundary; everything past that point works with
/// the resolved form.
#[derive(Debug, Clone, PartialEq)]
pub enum TagsInput {
    Text(String),
    List(Vec<String>),
    None,
}

impl TagsInput {
    /// Resolve a raw body value. Anything that is neither a string nor an
    /// array of strings (including an absent field) counts as no tags.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(raw)) => TagsInput::Text(raw.clone()),
            Some(Value::Array(items)) => TagsInput::List(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => TagsInput::None,
        }
    }

    /// Single normalization rule shared by create and update: list input
    /// passes through verbatim (elements are not trimmed or filtered),
    /// text input splits on commas with each piece trimmed and blank
    /// pieces dropped.
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagsInput::List(tags) => tags,
            TagsInput::Text(raw) => raw
                .split(',')
                .map(|piece| piece.trim().to_string())
                .filter(|piece| !piece.is_empty())
                .collect(),
            TagsInput::None => Vec::new(),
        }
    }
}

/// Incoming fields for create and full update
#[derive(Debug, Clone)]
pub struct IdeaDraft {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: TagsInput,
}

impl IdeaDraft {
    /// Title, summary and description must all be non-blank after
    /// trimming; failing any one fails the whole call before anything is
    /// persisted. The stored values keep whatever whitespace they came
    /// with; only the check trims.
    fn validate(&self) -> Result<(String, String, String), IdeaError> {
        let title = non_blank(&self.title)?;
        let summary = non_blank(&self.summary)?;
        let description = non_blank(&self.description)?;
        Ok((title, summary, description))
    }
}

fn non_blank(field: &Option<String>) -> Result<String, IdeaError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(IdeaError::InvalidInput(
            "Title, summary and description are required".to_string(),
        )),
    }
}

/// Validates inputs, enforces ownership and translates each logical
/// operation into exactly one record store mutation. Holds no state of its
/// own beyond the store handle; concurrent writes to the same record are
/// last-write-wins at store granularity.
#[derive(Clone)]
pub struct IdeaService {
    store: Arc<dyn IdeaRepository>,
}

impl IdeaService {
    pub fn new(store: Arc<dyn IdeaRepository>) -> Self {
        Self { store }
    }

    /// All ideas, newest first. `limit` truncates when present; callers
    /// pass `None` for anything that did not parse as a non-negative
    /// integer.
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<Idea>, IdeaError> {
        Ok(self.store.find(limit).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Idea, IdeaError> {
        let idea_id = self.parse_id(id)?;
        self.store
            .find_by_id(idea_id)
            .await?
            .ok_or(IdeaError::NotFound)
    }

    /// Create an idea owned by the caller. The caller id comes from the
    /// authenticated request context and is recorded on the new document;
    /// it is never accepted from the body.
    pub async fn create(&self, draft: IdeaDraft, caller: Uuid) -> Result<Idea, IdeaError> {
        let (title, summary, description) = draft.validate()?;

        let idea = NewIdea {
            title,
            summary,
            description,
            tags: draft.tags.into_tags(),
            user: caller,
        };
        Ok(self.store.insert(idea).await?)
    }

    /// Full update: title, summary, description and tags are overwritten
    /// together. Existence is checked before ownership, ownership before
    /// field validation.
    pub async fn update(&self, id: &str, draft: IdeaDraft, caller: Uuid) -> Result<Idea, IdeaError> {
        let idea_id = self.parse_id(id)?;
        let mut idea = self
            .store
            .find_by_id(idea_id)
            .await?
            .ok_or(IdeaError::NotFound)?;

        if idea.user != caller {
            return Err(IdeaError::Forbidden(
                "Not authorized to update this idea".to_string(),
            ));
        }

        let (title, summary, description) = draft.validate()?;
        idea.title = title;
        idea.summary = summary;
        idea.description = description;
        idea.tags = draft.tags.into_tags();

        Ok(self.store.save(&idea).await?)
    }

    pub async fn delete(&self, id: &str, caller: Uuid) -> Result<(), IdeaError> {
        let idea_id = self.parse_id(id)?;
        let idea = self
            .store
            .find_by_id(idea_id)
            .await?
            .ok_or(IdeaError::NotFound)?;

        if idea.user != caller {
            return Err(IdeaError::Forbidden(
                "Not authorized to delete this idea".to_string(),
            ));
        }

        self.store.delete_by_id(idea.id).await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), IdeaError> {
        Ok(self.store.ping().await?)
    }

    /// Malformed ids surface as NotFound without touching the store; a
    /// caller cannot tell a bad id from an absent record.
    fn parse_id(&self, id: &str) -> Result<Uuid, IdeaError> {
        if !self.store.is_valid_id(id) {
            return Err(IdeaError::NotFound);
        }
        Uuid::parse_str(id).map_err(|_| IdeaError::NotFound)
    }
}
