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
    models::{
        response::{DataResponse, MessageResponse},
        taxonomy::{TaxonomyDto, TaxonomyKind},
    },
    AppState, Result,
};

pub fn categories_handler() -> Router {
    taxonomy_handler(TaxonomyKind::Category)
}

pub fn tags_handler() -> Router {
    taxonomy_handler(TaxonomyKind::Tag)
}

fn taxonomy_handler(kind: TaxonomyKind) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(remove))
        .layer(Extension(kind))
}

async fn list(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(kind): Extension<TaxonomyKind>,
) -> Result<impl IntoResponse> {
    let rows = app_state.taxonomy_service(kind).list().await?;
    Ok((StatusCode::OK, Json(DataResponse::new(rows))))
}

async fn get_one(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(kind): Extension<TaxonomyKind>,
    id: core::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;

    let row = app_state.taxonomy_service(kind).get(id).await?;
    Ok((StatusCode::OK, Json(DataResponse::new(row))))
}

async fn create(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(kind): Extension<TaxonomyKind>,
    body: core::result::Result<Json<TaxonomyDto>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = body?;

    let created = app_state.taxonomy_service(kind).create(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            format!("{} created successfully", kind.label()),
            created,
        )),
    ))
}

async fn update(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(kind): Extension<TaxonomyKind>,
    id: core::result::Result<Path<i64>, PathRejection>,
    body: core::result::Result<Json<TaxonomyDto>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let Json(body) = body?;

    let updated = app_state.taxonomy_service(kind).update(id, body).await?;
    Ok((
        StatusCode::OK,
        Json(DataResponse::with_message(
            format!("{} updated successfully", kind.label()),
            updated,
        )),
    ))
}

async fn remove(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(kind): Extension<TaxonomyKind>,
    id: core::result::Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;

    app_state.taxonomy_service(kind).delete(id).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: format!("{} deleted successfully", kind.label()),
        }),
    ))
}
