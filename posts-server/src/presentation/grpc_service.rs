use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::posts_proto::posts_service_server::PostsService;
use crate::posts_proto::{
    CreatePostRequest as ProtoCreatePostRequest, ListPostsRequest, ListPostsResponse,
    Post as ProtoPost, PostIdRequest, UpdatePostRequest as ProtoUpdatePostRequest,
};
use crate::presentation::dto::{CreatePostRequest, UpdatePostRequest};
use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use tonic::{Request, Response, Status};
use tracing::info;
use validator::Validate;

pub struct PostsGrpcService<R>
where
    R: PostRepository + 'static,
{
    posts: PostService<R>,
}

impl<R> PostsGrpcService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(posts: PostService<R>) -> Self {
        Self { posts }
    }
}

#[tonic::async_trait]
impl<R> PostsService for PostsGrpcService<R>
where
    R: PostRepository + 'static,
{
    async fn create_post(
        &self,
        request: Request<ProtoCreatePostRequest>,
    ) -> Result<Response<ProtoPost>, Status> {
        let req = request.into_inner();
        let payload = CreatePostRequest {
            title: req.title,
            content: req.content,
        };
        payload.validate().map_err(DomainError::from)?;

        let post = self.posts.create(payload.into()).await?;
        info!(post_id = post.id, "post created over grpc");

        Ok(Response::new(post.into()))
    }

    async fn list_posts(
        &self,
        _request: Request<ListPostsRequest>,
    ) -> Result<Response<ListPostsResponse>, Status> {
        let posts = self.posts.find_all().await?;
        Ok(Response::new(posts.into()))
    }

    async fn list_published_posts(
        &self,
        _request: Request<ListPostsRequest>,
    ) -> Result<Response<ListPostsResponse>, Status> {
        let posts = self.posts.find_published().await?;
        Ok(Response::new(posts.into()))
    }

    async fn get_post(
        &self,
        request: Request<PostIdRequest>,
    ) -> Result<Response<ProtoPost>, Status> {
        let post = self.posts.find_one(request.into_inner().id).await?;
        Ok(Response::new(post.into()))
    }

    async fn update_post(
        &self,
        request: Request<ProtoUpdatePostRequest>,
    ) -> Result<Response<ProtoPost>, Status> {
        let req = request.into_inner();
        let post_id = req.id;
        let payload = UpdatePostRequest::from(req);
        payload.validate().map_err(DomainError::from)?;

        let post = self.posts.update(post_id, payload.into()).await?;
        info!(post_id, "post updated over grpc");

        Ok(Response::new(post.into()))
    }

    async fn delete_post(
        &self,
        request: Request<PostIdRequest>,
    ) -> Result<Response<ProtoPost>, Status> {
        let post_id = request.into_inner().id;
        let post = self.posts.remove(post_id).await?;
        info!(post_id, "post deleted over grpc");

        Ok(Response::new(post.into()))
    }

    async fn publish_post(
        &self,
        request: Request<PostIdRequest>,
    ) -> Result<Response<ProtoPost>, Status> {
        let post_id = request.into_inner().id;
        let post = self.posts.publish(post_id).await?;
        info!(post_id, "post published over grpc");

        Ok(Response::new(post.into()))
    }

    async fn unpublish_post(
        &self,
        request: Request<PostIdRequest>,
    ) -> Result<Response<ProtoPost>, Status> {
        let post_id = request.into_inner().id;
        let post = self.posts.unpublish(post_id).await?;
        info!(post_id, "post unpublished over grpc");

        Ok(Response::new(post.into()))
    }
}

fn to_timestamp(at: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: at.timestamp(),
        nanos: at.timestamp_subsec_nanos() as i32,
    }
}

impl From<Post> for ProtoPost {
    fn from(p: Post) -> Self {
        ProtoPost {
            id: p.id,
            title: p.title,
            content: p.content,
            published: p.published,
            created_at: Some(to_timestamp(p.created_at)),
        }
    }
}

impl From<Vec<Post>> for ListPostsResponse {
    fn from(posts: Vec<Post>) -> Self {
        ListPostsResponse {
            posts: posts.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ProtoUpdatePostRequest> for UpdatePostRequest {
    fn from(update: ProtoUpdatePostRequest) -> Self {
        UpdatePostRequest {
            title: update.title,
            content: update.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryPostRepository;
    use std::sync::Arc;
    use tonic::Code;

    fn service() -> PostsGrpcService<InMemoryPostRepository> {
        PostsGrpcService::new(PostService::new(Arc::new(InMemoryPostRepository::new())))
    }

    async fn create(svc: &PostsGrpcService<InMemoryPostRepository>, title: &str) -> ProtoPost {
        svc.create_post(Request::new(ProtoCreatePostRequest {
            title: title.into(),
            content: "body".into(),
        }))
        .await
        .unwrap()
        .into_inner()
    }

    #[tokio::test]
    async fn missing_ids_map_to_not_found() {
        let svc = service();
        let id = || Request::new(PostIdRequest { id: 404 });

        let statuses = [
            svc.get_post(id()).await.unwrap_err(),
            svc.delete_post(id()).await.unwrap_err(),
            svc.publish_post(id()).await.unwrap_err(),
            svc.unpublish_post(id()).await.unwrap_err(),
            svc.update_post(Request::new(ProtoUpdatePostRequest {
                id: 404,
                title: Some("x".into()),
                content: None,
            }))
            .await
            .unwrap_err(),
        ];

        for status in statuses {
            assert_eq!(status.code(), Code::NotFound);
        }
    }

    #[tokio::test]
    async fn empty_title_is_invalid_argument() {
        let status = service()
            .create_post(Request::new(ProtoCreatePostRequest {
                title: String::new(),
                content: String::new(),
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn publish_is_reflected_in_published_listing() {
        let svc = service();
        let draft = create(&svc, "draft").await;
        let live = create(&svc, "live").await;
        assert!(!draft.published);
        assert!(draft.created_at.is_some());

        let published = svc
            .publish_post(Request::new(PostIdRequest { id: live.id }))
            .await
            .unwrap()
            .into_inner();
        assert!(published.published);

        let listed = svc
            .list_published_posts(Request::new(ListPostsRequest {}))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(listed.posts, vec![published]);

        let all = svc
            .list_posts(Request::new(ListPostsRequest {}))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(all.posts.len(), 2);
    }
}
