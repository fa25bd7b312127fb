use crate::error::PostsClientError;
use crate::posts_proto::posts_service_client::PostsServiceClient;
use crate::posts_proto::{
    CreatePostRequest, ListPostsRequest, Post as ProtoPost, PostIdRequest, UpdatePostRequest,
};
use crate::{Post, PostId, PostsClient};
use async_trait::async_trait;
use chrono::DateTime;
use tonic::Request;
use tonic::transport::{Channel, Endpoint};

#[derive(Clone)]
pub struct PostsGrpcClient {
    client: PostsServiceClient<Channel>,
}

impl PostsGrpcClient {
    pub async fn connect(endpoint: &str) -> Result<Self, PostsClientError> {
        let channel = Endpoint::from_shared(endpoint.to_owned())
            .map_err(|e| PostsClientError::InvalidRequest(format!("bad endpoint: {e}")))?
            .connect()
            .await?;
        Ok(Self {
            client: PostsServiceClient::new(channel),
        })
    }
}

impl TryFrom<ProtoPost> for Post {
    type Error = PostsClientError;

    fn try_from(p: ProtoPost) -> Result<Self, Self::Error> {
        let ts = p
            .created_at
            .ok_or_else(|| PostsClientError::InvalidResponse("post without created_at".into()))?;
        let created_at = DateTime::from_timestamp(ts.seconds, ts.nanos.max(0) as u32)
            .ok_or_else(|| PostsClientError::InvalidResponse("created_at out of range".into()))?;

        Ok(Post {
            id: p.id,
            title: p.title,
            content: p.content,
            published: p.published,
            created_at,
        })
    }
}

fn into_posts(posts: Vec<ProtoPost>) -> Result<Vec<Post>, PostsClientError> {
    posts.into_iter().map(Post::try_from).collect()
}

#[async_trait]
impl PostsClient for PostsGrpcClient {
    async fn create_post(
        &mut self,
        title: String,
        content: String,
    ) -> Result<Post, PostsClientError> {
        let resp = self
            .client
            .create_post(Request::new(CreatePostRequest { title, content }))
            .await?;
        resp.into_inner().try_into()
    }

    async fn list_posts(&mut self) -> Result<Vec<Post>, PostsClientError> {
        let resp = self
            .client
            .list_posts(Request::new(ListPostsRequest {}))
            .await?;
        into_posts(resp.into_inner().posts)
    }

    async fn list_published_posts(&mut self) -> Result<Vec<Post>, PostsClientError> {
        let resp = self
            .client
            .list_published_posts(Request::new(ListPostsRequest {}))
            .await?;
        into_posts(resp.into_inner().posts)
    }

    async fn get_post(&mut self, id: PostId) -> Result<Post, PostsClientError> {
        let resp = self.client.get_post(Request::new(PostIdRequest { id })).await?;
        resp.into_inner().try_into()
    }

    async fn update_post(
        &mut self,
        id: PostId,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Post, PostsClientError> {
        let resp = self
            .client
            .update_post(Request::new(UpdatePostRequest { id, title, content }))
            .await?;
        resp.into_inner().try_into()
    }

    async fn delete_post(&mut self, id: PostId) -> Result<Post, PostsClientError> {
        let resp = self
            .client
            .delete_post(Request::new(PostIdRequest { id }))
            .await?;
        resp.into_inner().try_into()
    }

    async fn publish_post(&mut self, id: PostId) -> Result<Post, PostsClientError> {
        let resp = self
            .client
            .publish_post(Request::new(PostIdRequest { id }))
            .await?;
        resp.into_inner().try_into()
    }

    async fn unpublish_post(&mut self, id: PostId) -> Result<Post, PostsClientError> {
        let resp = self
            .client
            .unpublish_post(Request::new(PostIdRequest { id }))
            .await?;
        resp.into_inner().try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::Timestamp;

    #[test]
    fn proto_post_converts_with_timestamp() {
        let post = Post::try_from(ProtoPost {
            id: 5,
            title: "T".into(),
            content: "C".into(),
            published: true,
            created_at: Some(Timestamp {
                seconds: 1_735_787_045,
                nanos: 0,
            }),
        })
        .unwrap();

        assert_eq!(post.id, 5);
        assert!(post.published);
        assert_eq!(post.created_at.timestamp(), 1_735_787_045);
    }

    #[test]
    fn proto_post_without_timestamp_is_rejected() {
        let err = Post::try_from(ProtoPost {
            id: 5,
            title: "T".into(),
            content: String::new(),
            published: false,
            created_at: None,
        })
        .unwrap_err();

        assert!(matches!(err, PostsClientError::InvalidResponse(_)));
    }
}
