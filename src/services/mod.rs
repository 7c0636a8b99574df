pub mod idea_service;

pub use idea_service::{IdeaDraft, IdeaError, IdeaService, TagsInput};
