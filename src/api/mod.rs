//! HTTP front end.
//!
//! `GET /` serves the upload page, `POST /upload` runs the analysis pipeline
//! on one document, `GET /health` reports Ollama reachability.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::analyzer_router;
pub use server::{serve, start_server, ServerHandle};
pub use types::ApiContext;
