//! HTTP API handlers

pub mod chat;
pub mod health;
pub mod twilio;
pub mod vapi;
pub mod webhooks;
