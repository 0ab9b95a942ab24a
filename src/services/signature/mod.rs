//! `Upstash-Signature` verification.
//!
//! Core-only: no axum, no I/O. The HTTP side lives in
//! `middleware::signature` and only talks to [`Verifier`].
pub mod body;
pub mod claims;
pub mod error;
pub mod factory;
pub mod keys;
mod token;
pub mod verifier;

pub use body::body_hash;
pub use claims::{ClaimSet, EXPECTED_ISSUER};
pub use error::VerifyError;
pub use factory::build_verifier;
pub use keys::SigningKeys;
pub use verifier::{Verifier, VerifyRequest};
