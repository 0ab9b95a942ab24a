//! Webhook receiver that authenticates `Upstash-Signature` callbacks.
//!
//! The verification core is [`services::signature`]; everything else is the
//! axum server wired around it.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use services::signature::{ClaimSet, SigningKeys, Verifier, VerifyError, VerifyRequest};
