mod api_doc;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_doc::ApiDoc;
use config::Config;
use db::ItemStore;
use handlers::{
    create_handler, delete_handler, get_handler, health_handler, list_handler, update_handler,
};
use state::AppState;

fn app(state: AppState) -> Router {
    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::ITEMS, post(create_handler).get(list_handler))
        .route(
            routes::ITEM,
            get(get_handler).patch(update_handler).delete(delete_handler),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    tracing::info!("rust-sqlite-items starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = ItemStore::open(&config.database_path).await?;

    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}
