//! # firstmark-cli — Command-Line Interface
//!
//! A structured clap-based CLI over the registration flows and the HTTP
//! surface.
//!
//! ## Subcommands
//!
//! - `keygen` — Generate a signing keypair and write its seed to a key file
//! - `register` — Register a file's content under a key-file identity
//! - `verify` — Check whether a file's exact content is registered
//! - `serve` — Run the HTTP API server
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to domain crates — no business logic here.

pub mod backend;
pub mod keygen;
pub mod register;
pub mod serve;
pub mod verify;
