use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use crate::{
    models::posts::{CreatePostDto, UpdatePostDto},
    AppState, Result,
};

pub fn posts_handler() -> Router {
    Router::new()
        .route("/", get(get_posts).post(create_post))
        .route(
            "/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}

async fn get_posts(Extension(app_state): Extension<Arc<AppState>>) -> Result<impl IntoResponse> {
    let posts = app_state.posts_service.get_posts().await?;
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_post(
    Extension(app_state): Extension<Arc<AppState>>,
    post_id: core::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(post_id) = post_id?;

    let post = app_state.posts_service.get_post(post_id).await?;
    Ok((StatusCode::OK, Json(post)))
}

async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    new_post: core::result::Result<Json<CreatePostDto>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(new_post) = new_post?;

    let post = app_state.posts_service.create_post(new_post).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    Extension(app_state): Extension<Arc<AppState>>,
    post_id: core::result::Result<Path<i64>, PathRejection>,
    update_post: core::result::Result<Json<UpdatePostDto>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Path(post_id) = post_id?;
    let Json(update_post) = update_post?;

    let updated_post = app_state
        .posts_service
        .update_post(post_id, update_post)
        .await?;

    Ok((StatusCode::OK, Json(updated_post)))
}

async fn delete_post(
    Extension(app_state): Extension<Arc<AppState>>,
    post_id: core::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(post_id) = post_id?;

    app_state.posts_service.delete_post(post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
