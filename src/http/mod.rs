//! HTTP control API for the recording workflow
//!
//! This module provides the REST surface the page frontend drives:
//! - POST /sessions - Open a session (maintenance check + prompt batch)
//! - POST /sessions/:id/record/start - Begin capture
//! - POST /sessions/:id/record/stop - Transcribe + await confirmation clip
//! - POST /sessions/:id/accept - Persist and advance
//! - POST /sessions/:id/discard - Drop the pending review
//! - GET /sessions/:id/status - Session stats
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
