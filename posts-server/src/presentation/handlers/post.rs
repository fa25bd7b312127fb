use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::PostId;
use crate::presentation::dto::{CreatePostRequest, UpdatePostRequest};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, Scope, web};
use tracing::info;
use validator::Validate;

/// `/posts` routes. `/published` is registered ahead of `/{id}`.
pub fn scope<R: PostRepository + 'static>() -> Scope {
    web::scope("/posts")
        .service(
            web::resource("")
                .route(web::get().to(list_posts::<R>))
                .route(web::post().to(create_post::<R>)),
        )
        .service(web::resource("/published").route(web::get().to(list_published_posts::<R>)))
        .service(
            web::resource("/{id}")
                .route(web::get().to(get_post::<R>))
                .route(web::patch().to(update_post::<R>))
                .route(web::delete().to(delete_post::<R>)),
        )
        .service(web::resource("/{id}/publish").route(web::patch().to(publish_post::<R>)))
        .service(web::resource("/{id}/unpublish").route(web::patch().to(unpublish_post::<R>)))
}

async fn create_post<R: PostRepository + 'static>(
    req: HttpRequest,
    posts: web::Data<PostService<R>>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner();
    payload.validate()?;

    let post = posts.create(payload.into()).await?;

    info!(request_id = %request_id(&req), post_id = post.id, "post created");

    Ok(HttpResponse::Created().json(post))
}

async fn list_posts<R: PostRepository + 'static>(
    posts: web::Data<PostService<R>>,
) -> Result<HttpResponse, DomainError> {
    let posts = posts.find_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

async fn list_published_posts<R: PostRepository + 'static>(
    posts: web::Data<PostService<R>>,
) -> Result<HttpResponse, DomainError> {
    let posts = posts.find_published().await?;
    Ok(HttpResponse::Ok().json(posts))
}

async fn get_post<R: PostRepository + 'static>(
    posts: web::Data<PostService<R>>,
    path: web::Path<PostId>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.find_one(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

async fn update_post<R: PostRepository + 'static>(
    req: HttpRequest,
    posts: web::Data<PostService<R>>,
    path: web::Path<PostId>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let payload = payload.into_inner();
    payload.validate()?;

    let post = posts.update(post_id, payload.into()).await?;

    info!(request_id = %request_id(&req), post_id, "post updated");

    Ok(HttpResponse::Ok().json(post))
}

async fn delete_post<R: PostRepository + 'static>(
    req: HttpRequest,
    posts: web::Data<PostService<R>>,
    path: web::Path<PostId>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts.remove(post_id).await?;

    info!(request_id = %request_id(&req), post_id, "post deleted");

    Ok(HttpResponse::Ok().json(post))
}

async fn publish_post<R: PostRepository + 'static>(
    req: HttpRequest,
    posts: web::Data<PostService<R>>,
    path: web::Path<PostId>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts.publish(post_id).await?;

    info!(request_id = %request_id(&req), post_id, "post published");

    Ok(HttpResponse::Ok().json(post))
}

async fn unpublish_post<R: PostRepository + 'static>(
    req: HttpRequest,
    posts: web::Data<PostService<R>>,
    path: web::Path<PostId>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts.unpublish(post_id).await?;

    info!(request_id = %request_id(&req), post_id, "post unpublished");

    Ok(HttpResponse::Ok().json(post))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryPostRepository;
    use crate::domain::post::Post;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        let service = PostService::new(Arc::new(InMemoryPostRepository::new()));
        test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .service(web::scope("/api").service(scope::<InMemoryPostRepository>())),
        )
        .await
    }

    async fn create(
        app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
        title: &str,
    ) -> Post {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": title, "content": "body" }))
            .to_request();
        let resp = test::call_service(app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        test::read_body_json(resp).await
    }

    #[actix_web::test]
    async fn create_returns_unpublished_post() {
        let app = app().await;

        let post = create(&app, "A").await;

        assert_eq!(post.title, "A");
        assert_eq!(post.content, "body");
        assert!(!post.published);
    }

    #[actix_web::test]
    async fn create_rejects_empty_title() {
        let app = app().await;

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn missing_post_maps_to_not_found_on_every_id_route() {
        let app = app().await;

        let requests = vec![
            test::TestRequest::get().uri("/api/posts/999"),
            test::TestRequest::patch()
                .uri("/api/posts/999")
                .set_json(json!({ "title": "x" })),
            test::TestRequest::delete().uri("/api/posts/999"),
            test::TestRequest::patch().uri("/api/posts/999/publish"),
            test::TestRequest::patch().uri("/api/posts/999/unpublish"),
        ];

        for req in requests {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["details"]["id"], 999);
            assert_eq!(body["details"]["resource"], "post");
        }
    }

    #[actix_web::test]
    async fn publish_flow_and_published_listing() {
        let app = app().await;
        let draft = create(&app, "draft").await;
        let live = create(&app, "live").await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/posts/{}/publish", live.id))
            .to_request();
        let published: Post = test::call_and_read_body_json(&app, req).await;
        assert!(published.published);

        let req = test::TestRequest::get().uri("/api/posts/published").to_request();
        let listed: Vec<Post> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed, vec![published.clone()]);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let all: Vec<Post> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            all.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![live.id, draft.id]
        );

        let req = test::TestRequest::patch()
            .uri(&format!("/api/posts/{}/unpublish", live.id))
            .to_request();
        let unpublished: Post = test::call_and_read_body_json(&app, req).await;
        assert!(!unpublished.published);
    }

    #[actix_web::test]
    async fn update_then_delete_returns_last_known_state() {
        let app = app().await;
        let post = create(&app, "before").await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/posts/{}", post.id))
            .set_json(json!({ "title": "after", "published": true }))
            .to_request();
        let updated: Post = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.title, "after");
        assert_eq!(updated.content, post.content);
        assert!(!updated.published);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request();
        let deleted: Post = test::call_and_read_body_json(&app, req).await;
        assert_eq!(deleted, updated);

        let req = test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
