use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::config::{AppConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig};
use crate::database::models::idea::{Idea, NewIdea};
use crate::database::repository::{IdeaRepository, StoreError};
use crate::services::idea_service::IdeaService;
use crate::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// In-memory record store mirroring the Postgres repository's observable
/// behavior: insertion assigns id and timestamps, find sorts newest
/// first, save overwrites by id. Counts id lookups so tests can assert
/// the malformed-id fast path never touches the store.
#[derive(Default)]
pub struct MemoryIdeaRepository {
    ideas: Mutex<Vec<Idea>>,
    lookups: AtomicUsize,
}

impl MemoryIdeaRepository {
    /// Snapshot of everything stored, in insertion order
    pub fn records(&self) -> Vec<Idea> {
        self.ideas.lock().unwrap().clone()
    }

    /// Number of by-id lookups the store has served
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdeaRepository for MemoryIdeaRepository {
    async fn find(&self, limit: Option<i64>) -> Result<Vec<Idea>, StoreError> {
        let ideas = self.ideas.lock().unwrap();
        // Newest insertion first, then a stable sort on created_at keeps
        // same-instant records in reverse insertion order
        let mut sorted: Vec<Idea> = ideas.iter().rev().cloned().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(n) = limit {
            sorted.truncate(n.max(0) as usize);
        }
        Ok(sorted)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Idea>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let ideas = self.ideas.lock().unwrap();
        Ok(ideas.iter().find(|idea| idea.id == id).cloned())
    }

    async fn insert(&self, idea: NewIdea) -> Result<Idea, StoreError> {
        let now = Utc::now();
        let stored = Idea {
            id: Uuid::new_v4(),
            title: idea.title,
            summary: idea.summary,
            description: idea.description,
            tags: idea.tags,
            user: idea.user,
            created_at: now,
            updated_at: now,
        };
        self.ideas.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn save(&self, idea: &Idea) -> Result<Idea, StoreError> {
        let mut ideas = self.ideas.lock().unwrap();
        let slot = ideas
            .iter_mut()
            .find(|existing| existing.id == idea.id)
            .ok_or_else(|| StoreError::QueryError(format!("no record with id {}", idea.id)))?;

        let mut stored = idea.clone();
        stored.updated_at = Utc::now();
        *slot = stored.clone();
        Ok(stored)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.ideas.lock().unwrap().retain(|idea| idea.id != id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        server: ServerConfig { port: 0 },
        database: DatabaseConfig {
            url: None,
            max_connections: 5,
            connection_timeout: 5,
        },
        security: SecurityConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_expiry_hours: 1,
        },
    }
}

/// Application state over an in-memory store, plus a handle to that store
/// for direct assertions
pub fn test_state() -> (AppState, Arc<MemoryIdeaRepository>) {
    let store = Arc::new(MemoryIdeaRepository::default());
    let state = AppState {
        ideas: IdeaService::new(store.clone()),
        config: Arc::new(test_config()),
    };
    (state, store)
}

/// Authorization header value for a freshly signed test token
pub fn bearer(user_id: Uuid, name: &str) -> String {
    let claims = Claims::new(user_id, name.to_string(), 1);
    let token = generate_jwt(&claims, TEST_JWT_SECRET).expect("test token");
    format!("Bearer {}", token)
}
