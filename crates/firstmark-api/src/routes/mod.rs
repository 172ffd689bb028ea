//! # Route Modules
//!
//! Each module defines the handlers for one API surface area; this
//! module assembles them into the application router with the shared
//! middleware stack.

pub mod health;
pub mod records;
pub mod register;
pub mod verify;

use axum::extract::Multipart;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{AppError, AppState};

/// Assemble the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/register", post(register::register))
        .route("/v1/verify", post(verify::verify))
        .route("/v1/records/{digest}", get(records::lookup))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Pull the `file` part out of a multipart upload.
pub(crate) async fn read_file_part(mut multipart: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("unreadable multipart field: {e}")))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(AppError::Validation(
        "multipart field \"file\" is required".to_string(),
    ))
}
