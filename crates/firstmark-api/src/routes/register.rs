//! # Registration Endpoint
//!
//! `POST /v1/register` — multipart upload of the content to register.
//! Runs the full upload flow under the service signer and answers `201`
//! with the committed record, or `409` if the content already has one.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use firstmark_ledger::Record;

use crate::routes::read_file_part;
use crate::{AppError, AppState};

pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Record>), AppError> {
    let content = read_file_part(multipart).await?;
    let record = state
        .registrar()
        .register(&content, state.signer())
        .await?;
    info!(digest = %record.digest, "registration served");
    Ok((StatusCode::CREATED, Json(record)))
}
