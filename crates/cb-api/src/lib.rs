//! cb-api: HTTP surface for callbridge
//!
//! JSON dispatch endpoints under `/api/v1`, plus the unprefixed Twilio
//! webhooks (IVR, status callbacks, inbound messages). Built with axum.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::{ApiError, Result};
pub use server::{build_router, start_server, AppState};
