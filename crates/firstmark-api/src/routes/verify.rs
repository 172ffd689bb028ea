//! # Verification Endpoint
//!
//! `POST /v1/verify` — multipart upload of the content to check.
//! Answers `200` with the registration when the exact bytes are
//! registered, `404` when they are not — whether never registered or
//! altered, which are indistinguishable on purpose.

use axum::extract::{Multipart, State};
use axum::Json;

use firstmark_flow::VerifyOutcome;

use crate::routes::read_file_part;
use crate::{AppError, AppState};

pub async fn verify(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<VerifyOutcome>, AppError> {
    let content = read_file_part(multipart).await?;
    match state.registrar().verify(&content).await? {
        outcome @ VerifyOutcome::Registered(_) => Ok(Json(outcome)),
        VerifyOutcome::NotRegistered => Err(AppError::NotFound(
            "content is not registered".to_string(),
        )),
    }
}
