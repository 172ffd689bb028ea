//! # Record Lookup Endpoint
//!
//! `GET /v1/records/{digest}` — registration lookup by digest hex, for
//! callers that already hold a digest and do not want to re-upload the
//! content to check it.

use axum::extract::{Path, State};
use axum::Json;

use firstmark_core::ContentDigest;
use firstmark_ledger::{Ledger, Registration};

use crate::{AppError, AppState};

pub async fn lookup(
    State(state): State<AppState>,
    Path(digest): Path<String>,
) -> Result<Json<Registration>, AppError> {
    let digest = ContentDigest::from_hex(&digest)
        .map_err(|e| AppError::Validation(format!("bad digest: {e}")))?;
    match state.registrar().ledger().lookup(&digest).await? {
        Some(registration) => Ok(Json(registration)),
        None => Err(AppError::NotFound(format!("no record for digest {digest}"))),
    }
}
