use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

mod error;
mod grpc_client;
mod http_client;

pub use error::PostsClientError;
pub use grpc_client::PostsGrpcClient;
pub use http_client::PostsHttpClient;

pub mod posts_proto {
    tonic::include_proto!("posts");
}

pub type PostId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Display)]
#[display("[{id}] {title} (published: {published}, created {created_at})")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

/// Operations exposed by the posts server, independent of transport.
#[async_trait]
pub trait PostsClient: Send {
    async fn create_post(&mut self, title: String, content: String)
    -> Result<Post, PostsClientError>;
    async fn list_posts(&mut self) -> Result<Vec<Post>, PostsClientError>;
    async fn list_published_posts(&mut self) -> Result<Vec<Post>, PostsClientError>;
    async fn get_post(&mut self, id: PostId) -> Result<Post, PostsClientError>;
    async fn update_post(
        &mut self,
        id: PostId,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Post, PostsClientError>;
    async fn delete_post(&mut self, id: PostId) -> Result<Post, PostsClientError>;
    async fn publish_post(&mut self, id: PostId) -> Result<Post, PostsClientError>;
    async fn unpublish_post(&mut self, id: PostId) -> Result<Post, PostsClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_shows_id_title_and_state() {
        let post = Post {
            id: 3,
            title: "Hello".into(),
            content: String::new(),
            published: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        };

        assert_eq!(
            post.to_string(),
            "[3] Hello (published: true, created 2025-01-02 03:04:05 UTC)"
        );
    }

    #[test]
    fn deserializes_server_payload() {
        let post: Post = serde_json::from_str(
            r#"{"id":1,"title":"A","content":"B","published":false,"created_at":"2025-01-02T03:04:05Z"}"#,
        )
        .unwrap();

        assert_eq!(post.id, 1);
        assert!(!post.published);
    }
}
