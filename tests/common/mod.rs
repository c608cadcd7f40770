#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use blog_admin::{config::Config, repositories, routes::create_router, AppState};
use sqlx::SqlitePool;
use tokio::net::TcpListener;

/// Fresh in-memory database with the schema applied. A single connection
/// keeps every query on the same database.
pub async fn test_pool() -> SqlitePool {
    repositories::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database")
}

/// Fresh database file shared by `max_connections` connections, for tests
/// that need requests to overlap.
pub async fn file_pool(name: &str, max_connections: u32) -> SqlitePool {
    let path = std::env::temp_dir().join(format!(
        "blog-admin-{name}-{}.sqlite",
        std::process::id()
    ));
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }

    repositories::connect(&format!("sqlite://{}", path.display()), max_connections)
        .await
        .expect("file database")
}

pub fn test_config(frontend_dir: PathBuf) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        frontend_dir,
        db_max_connections: 1,
    }
}

/// Serves the full router on an ephemeral port and returns its origin,
/// e.g. `http://127.0.0.1:41234`.
pub async fn spawn_app_with_frontend(frontend_dir: PathBuf) -> String {
    let pool = test_pool().await;
    let app = create_router(Arc::new(AppState::new(pool, test_config(frontend_dir))));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });

    format!("http://{addr}")
}

pub async fn spawn_app() -> String {
    spawn_app_with_frontend(std::env::temp_dir().join("blog-admin-no-frontend")).await
}
