use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use crate::core::catalog::ArtifactSource;
use crate::core::family::Family;
use crate::core::updater::Updater;

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// `POST /update/{plugin|paper|velocity|map}`
pub fn router<S: ArtifactSource + 'static>(updater: Arc<Updater<S>>) -> Router {
    Router::new()
        .route("/update/{family}", post(update_family::<S>))
        .with_state(updater)
}

async fn update_family<S: ArtifactSource + 'static>(
    State(updater): State<Arc<Updater<S>>>,
    Path(family): Path<Family>,
) -> Response {
    match updater.update(family).await {
        Ok(_) => Json(UpdateResponse { success: true }).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: false,
                message: err.to_string(),
            }),
        )
            .into_response(),
    }
}
