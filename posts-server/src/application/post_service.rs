use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges, PostId, PostUpdate};
use tracing::instrument;

/// Existence rules over a [`PostRepository`].
///
/// Every id-targeted call reads the post first and only then mutates. The
/// read and the write are separate store calls: a concurrent delete landing
/// between them surfaces as whatever error the repository reports.
pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
}

impl<R: PostRepository + 'static> Clone for PostService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        self.repo.create(post).await
    }

    pub async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn find_published(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.find_published().await
    }

    pub async fn find_one(&self, id: PostId) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: PostId, update: PostUpdate) -> Result<Post, DomainError> {
        self.find_one(id).await?;
        self.repo.update(id, update.into()).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: PostId) -> Result<Post, DomainError> {
        self.find_one(id).await?;
        self.repo.delete(id).await
    }

    #[instrument(skip(self))]
    pub async fn publish(&self, id: PostId) -> Result<Post, DomainError> {
        self.set_published(id, true).await
    }

    #[instrument(skip(self))]
    pub async fn unpublish(&self, id: PostId) -> Result<Post, DomainError> {
        self.set_published(id, false).await
    }

    async fn set_published(&self, id: PostId, published: bool) -> Result<Post, DomainError> {
        self.find_one(id).await?;
        self.repo
            .update(id, PostChanges::publication(published))
            .await
    }
}
