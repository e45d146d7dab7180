//! In-memory repository backed by `tokio::sync::RwLock` maps.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{Result, StorageError};
use super::models::Post;
use super::{PostRepository, ProfileRepository};
use crate::core::persona_gen::Persona;

#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<Uuid, Persona>>,
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }

    async fn collect_posts(&self, filter: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| filter(p))
            .cloned()
            .collect();
        posts.sort_by_key(|p| p.created_at);
        posts
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn create_profile(&self, persona: Persona) -> Result<bool> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&persona.id) {
            log::debug!("Profile {} already exists", persona.id);
            return Ok(false);
        }
        log::debug!("Stored profile {} (@{})", persona.id, persona.handle);
        profiles.insert(persona.id, persona);
        Ok(true)
    }

    async fn get_profile(&self, id: Uuid) -> Result<Persona> {
        self.profiles
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::profile_not_found(id))
    }

    async fn update_profile(&self, persona: Persona) -> Result<Persona> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(&persona.id) {
            Some(existing) => {
                *existing = persona.clone();
                Ok(persona)
            }
            None => Err(StorageError::profile_not_found(persona.id)),
        }
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, post: Post) -> Result<Post> {
        if !self.profiles.read().await.contains_key(&post.profile_id) {
            return Err(StorageError::profile_not_found(post.profile_id));
        }
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: Uuid) -> Result<Post> {
        self.posts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::post_not_found(id))
    }

    async fn list_posts_by_profile(&self, profile_id: Uuid) -> Result<Vec<Post>> {
        Ok(self.collect_posts(|p| p.profile_id == profile_id).await)
    }

    async fn list_replies(&self, post_id: Uuid) -> Result<Vec<Post>> {
        Ok(self.collect_posts(|p| p.reply_to_id == Some(post_id)).await)
    }
}
