//! In-memory post store, used by tests and by `STORAGE=memory`.
//! Data is lost on process restart.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges, PostId};

#[derive(Default)]
struct Store {
    last_id: PostId,
    posts: BTreeMap<PostId, Post>,
}

#[derive(Clone, Default)]
pub struct InMemoryPostRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<Post> {
        let mut posts: Vec<Post> = posts.cloned().collect();
        posts.sort_by_key(|p| Reverse((p.created_at, p.id)));
        posts
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let mut store = self.store.write().await;
        store.last_id += 1;
        let post = Post {
            id: store.last_id,
            title: post.title,
            content: post.content,
            published: false,
            created_at: Utc::now(),
        };
        store.posts.insert(post.id, post.clone());

        info!(post_id = post.id, "post created");
        Ok(post)
    }

    async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        let store = self.store.read().await;
        Ok(Self::newest_first(store.posts.values()))
    }

    async fn find_published(&self) -> Result<Vec<Post>, DomainError> {
        let store = self.store.read().await;
        Ok(Self::newest_first(
            store.posts.values().filter(|p| p.published),
        ))
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        let store = self.store.read().await;
        Ok(store.posts.get(&id).cloned())
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, DomainError> {
        let mut store = self.store.write().await;
        let post = store
            .posts
            .get_mut(&id)
            .ok_or_else(|| DomainError::Internal(format!("record {id} to update does not exist")))?;
        changes.apply_to(post);

        info!(post_id = id, published = post.published, "post updated");
        Ok(post.clone())
    }

    async fn delete(&self, id: PostId) -> Result<Post, DomainError> {
        let mut store = self.store.write().await;
        let post = store
            .posts
            .remove(&id)
            .ok_or_else(|| DomainError::Internal(format!("record {id} to delete does not exist")))?;

        info!(post_id = id, "post deleted");
        Ok(post)
    }
}
