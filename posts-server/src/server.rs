use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::infrastructure::config::AppConfig;
use crate::posts_proto::posts_service_server::PostsServiceServer;
use crate::presentation::grpc_service::PostsGrpcService;
use crate::presentation::handlers;
use crate::presentation::middleware::RequestTracing;
use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::signal;
use tonic::transport::Server;
use tracing::{info, warn};

pub async fn start_rest_server<R: PostRepository + 'static>(
    config: AppConfig,
    post_service: PostService<R>,
) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);
    let posts = web::Data::new(post_service);

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        let cors = build_cors(&config);

        App::new()
            .wrap(RequestTracing)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(posts.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .service(handlers::post::scope::<R>()),
            )
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

pub async fn start_grpc_server<R: PostRepository + 'static>(
    config: AppConfig,
    post_service: PostService<R>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.grpc_port).parse()?;

    let grpc_service = PostsGrpcService::new(post_service);

    info!(%addr, "gRPC server starting");

    Server::builder()
        .add_service(PostsServiceServer::new(grpc_service))
        .serve_with_shutdown(addr, async {
            if let Err(err) = signal::ctrl_c().await {
                warn!(error = %err, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("gRPC server received shutdown signal");
        })
        .await?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
        .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .max_age(3600);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.cors_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
