//! # firstmark-api — Axum HTTP Surface
//!
//! The HTTP face of the registry, built on Axum/Tower/Tokio. Route
//! handlers carry no business logic; they decode the request, call the
//! upload or verification flow, and encode the typed outcome.
//!
//! ## Routes
//!
//! - `POST /v1/register` — multipart upload; registers the content
//!   under the service signer. `201` with the committed record, `409`
//!   if the content is already registered.
//! - `POST /v1/verify` — multipart upload; `200` with the registration
//!   if the content is registered, `404` otherwise.
//! - `GET /v1/records/{digest}` — registration lookup by digest hex.
//! - `GET /health` — liveness probe, unauthenticated.
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → CorsLayer
//!
//! ## Crate Policy
//!
//! - Sits at the top of the dependency DAG — depends on the flow crate
//!   and, through it, on every backend seam.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod error;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::router;
pub use state::AppState;
