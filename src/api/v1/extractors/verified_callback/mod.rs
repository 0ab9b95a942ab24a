/*!
 * Verified callback extractor
 *
 * Responsibility:
 * - Hand the claims of an authenticated callback (VerifiedCallback) to handlers
 * - axum-specific code lives in core, the contract type in types
 */

mod core;
mod types;

pub use core::VerifiedCallbackExtractor;
pub use types::VerifiedCallback;
