//! Persistence boundary for personas and their posts.
//!
//! Generation never depends on a backend; callers hand finished records to
//! a repository. `MemoryStore` is the only implementation shipped here.

pub mod error;
pub mod memory;
pub mod models;

pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use models::{Post, PostMetadata};

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::persona_gen::Persona;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Store a new persona. Returns `false` if its id is already taken.
    async fn create_profile(&self, persona: Persona) -> Result<bool>;

    async fn get_profile(&self, id: Uuid) -> Result<Persona>;

    /// Replace an existing persona, returning the stored record.
    async fn update_profile(&self, persona: Persona) -> Result<Persona>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: Post) -> Result<Post>;

    async fn get_post(&self, id: Uuid) -> Result<Post>;

    /// Posts by one author, oldest first.
    async fn list_posts_by_profile(&self, profile_id: Uuid) -> Result<Vec<Post>>;

    /// Direct replies to a post, oldest first.
    async fn list_replies(&self, post_id: Uuid) -> Result<Vec<Post>>;
}
