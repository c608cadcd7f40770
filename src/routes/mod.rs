use std::{path::Path, sync::Arc};

use axum::{
    extract::{OriginalUri, Request},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any_service, MethodRouter},
    Extension, Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    handlers::{
        posts::posts_handler,
        taxonomy::{categories_handler, tags_handler},
    },
    models::response::ErrorResponse,
    AppState,
};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let frontend_dir = app_state.config.frontend_dir.clone();

    let api_route = Router::new()
        .nest("/posts", posts_handler())
        .nest("/categories", categories_handler())
        .nest("/tags", tags_handler())
        .layer(Extension(app_state));

    // Unmatched routes, nested ones included, end up here.
    let fallback: MethodRouter =
        any_service(spa_service(&frontend_dir)).layer(middleware::from_fn(api_prefix_not_found));

    Router::new()
        .nest("/api", api_route)
        .fallback_service(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors())
}

pub fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Static assets from the built frontend; unknown paths get `index.html` so
/// client-side routes resolve.
fn spa_service(frontend_dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(frontend_dir).fallback(ServeFile::new(frontend_dir.join("index.html")))
}

/// Anything under `/api/` that no route claimed is an API miss, never a page.
async fn api_prefix_not_found(req: Request, next: Next) -> Response {
    // Nested routers see the path with their prefix stripped.
    let is_api = req
        .extensions()
        .get::<OriginalUri>()
        .map_or(req.uri().path(), |uri| uri.0.path())
        .starts_with("/api/");

    if is_api {
        return api_not_found().await.into_response();
    }
    next.run(req).await
}

async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "API endpoint not found".to_string(),
        }),
    )
}
