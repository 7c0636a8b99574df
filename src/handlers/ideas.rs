use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::idea::Idea;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::idea_service::{IdeaDraft, TagsInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Optional result cap. Anything that does not parse as a
    /// non-negative integer means unbounded, never an error.
    #[serde(rename = "_limit")]
    pub limit: Option<String>,
}

/// Incoming create/update body. Tags stay a raw JSON value here and are
/// resolved to a `TagsInput` at this boundary, so the service never sees
/// dynamic types.
#[derive(Debug, Deserialize)]
pub struct IdeaPayload {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Value>,
}

impl From<IdeaPayload> for IdeaDraft {
    fn from(payload: IdeaPayload) -> Self {
        IdeaDraft {
            tags: TagsInput::from_value(payload.tags.as_ref()),
            title: payload.title,
            summary: payload.summary,
            description: payload.description,
        }
    }
}

/// GET /api/ideas - list ideas, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Idea>>, ApiError> {
    let limit = query
        .limit
        .as_deref()
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|n| *n >= 0);

    let ideas = state.ideas.list(limit).await?;
    Ok(Json(ideas))
}

/// GET /api/ideas/:id - get a single idea
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Idea>, ApiError> {
    let idea = state.ideas.get(&id).await?;
    Ok(Json(idea))
}

/// POST /api/ideas - create a new idea owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<IdeaPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let idea = state.ideas.create(payload.into(), user.id).await?;
    Ok((StatusCode::CREATED, Json(idea)))
}

/// PUT /api/ideas/:id - full update of an owned idea
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<IdeaPayload>,
) -> Result<Json<Idea>, ApiError> {
    let idea = state.ideas.update(&id, payload.into(), user.id).await?;
    Ok(Json(idea))
}

/// DELETE /api/ideas/:id - remove an owned idea
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    state.ideas.delete(&id, user.id).await?;
    Ok(Json(json!({ "message": "Idea was deleted!" })))
}
