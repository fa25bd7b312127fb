use crate::domain::error::DomainError;
use crate::domain::post::{NewPost, Post, PostChanges, PostId};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

const CHECK_VIOLATION: &str = "23514";

/// Storage contract behind [`PostService`](crate::application::post_service::PostService).
///
/// Implementations hold no business rules. `update` and `delete` assume the
/// id exists; what they do otherwise is the implementation's own error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    /// All posts, newest first.
    async fn find_all(&self) -> Result<Vec<Post>, DomainError>;
    /// Published posts, newest first.
    async fn find_published(&self) -> Result<Vec<Post>, DomainError>;
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError>;
    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, DomainError>;
    /// Removes the row and returns it as it was before deletion.
    async fn delete(&self, id: PostId) -> Result<Post, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(operation: &'static str, err: sqlx::Error) -> DomainError {
    error!(operation, "database error: {}", err);
    let is_check_violation = err
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == CHECK_VIOLATION);
    if is_check_violation {
        DomainError::Validation(format!("constraint violated during {operation}"))
    } else {
        DomainError::Internal(format!("database error: {}", err))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content)
            VALUES ($1, $2)
            RETURNING id, title, content, published, created_at
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("create", e))?;

        info!(post_id = post.id, "post created");
        Ok(post)
    }

    async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, published, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("find_all", e))
    }

    async fn find_published(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, published, created_at
            FROM posts
            WHERE published = TRUE
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("find_published", e))
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, published, created_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("find_by_id", e))
    }

    async fn update(&self, id: PostId, changes: PostChanges) -> Result<Post, DomainError> {
        // A row deleted since the caller's existence check yields RowNotFound.
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                content = COALESCE($2, content),
                published = COALESCE($3, published)
            WHERE id = $4
            RETURNING id, title, content, published, created_at
            "#,
        )
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.published)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("update", e))?;

        info!(post_id = id, published = post.published, "post updated");
        Ok(post)
    }

    async fn delete(&self, id: PostId) -> Result<Post, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            DELETE FROM posts
            WHERE id = $1
            RETURNING id, title, content, published, created_at
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("delete", e))?;

        info!(post_id = id, "post deleted");
        Ok(post)
    }
}
