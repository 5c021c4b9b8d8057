//! cb-vapi: outbound AI voice calls through Vapi
//!
//! Assistant management, call placement and status, and parsing of the
//! events Vapi posts back to the webhook.

pub mod client;
pub mod error;
pub mod event;

pub use client::{VapiCallRequest, VapiClient};
pub use error::{Result, VapiError};
pub use event::VapiEvent;
