//! Shared setup for handler tests: a full router over a fresh
//! temp-file SQLite store.

use crate::config::Config;
use crate::db::ItemStore;
use crate::handlers::{
    create_handler, delete_handler, get_handler, health_handler, list_handler, update_handler,
};
use crate::routes;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub app: Router,
    pub store: ItemStore,
    // Keeps the database directory alive for the test's duration
    pub _dir: TempDir,
}

pub async fn setup_test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("items.sqlite");
    let store = ItemStore::open(path.to_str().unwrap()).await.unwrap();

    let state = AppState {
        store: store.clone(),
        config: Arc::new(Config {
            database_path: path.to_string_lossy().into_owned(),
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
        }),
    };

    let app = Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::ITEMS, post(create_handler).get(list_handler))
        .route(
            routes::ITEM,
            get(get_handler).patch(update_handler).delete(delete_handler),
        )
        .with_state(state);

    TestApp {
        app,
        store,
        _dir: dir,
    }
}
