mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

pub mod posts_proto {
    tonic::include_proto!("posts");
}

use std::sync::Arc;

use crate::application::post_service::PostService;
use crate::data::memory::InMemoryPostRepository;
use crate::data::post_repository::{PostRepository, PostgresPostRepository};
use infrastructure::config::{AppConfig, StorageBackend};
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use server::{start_grpc_server, start_rest_server};
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;

    match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let pool = create_pool(database_url, config.database_max_connections).await?;
            run_migrations(&pool).await?;
            serve(config, PostgresPostRepository::new(pool)).await
        }
        StorageBackend::Memory => {
            warn!("using in-memory storage; posts are lost on restart");
            serve(config, InMemoryPostRepository::new()).await
        }
    }
}

async fn serve<R: PostRepository + 'static>(config: AppConfig, repo: R) -> anyhow::Result<()> {
    let post_service = PostService::new(Arc::new(repo));

    info!(storage = ?config.storage, "post service ready");

    tokio::try_join!(
        start_rest_server(config.clone(), post_service.clone()),
        start_grpc_server(config, post_service),
    )?;

    Ok(())
}
