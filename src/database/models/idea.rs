use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted idea. `id` and `user` are assigned at creation and never
/// change afterwards; wire names follow the public API (camelCase, owner
/// exposed as `user`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(rename = "user")]
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for an idea that has not been persisted yet; the store assigns
/// id and timestamps on insert.
#[derive(Debug, Clone)]
pub struct NewIdea {
    pub title: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    pub user: Uuid,
}
