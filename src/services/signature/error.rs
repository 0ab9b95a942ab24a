use thiserror::Error;

/// Errors surfaced by [`Verifier`](super::Verifier).
///
/// Every authentication problem is reported as `InvalidSignature`, regardless of
/// which check rejected the request. Callers (and whoever is probing the endpoint)
/// must not be able to tell a bad MAC from an expired token or a swapped body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("failed to validate signature")]
    InvalidSignature,

    /// The clock tolerance cannot be expressed in whole seconds of `i64`.
    /// Raised before any key is tried.
    #[error("invalid clock tolerance")]
    InvalidTolerance,
}

/// Internal reason a single verification attempt failed.
///
/// Only used for `debug` logging and crate-internal tests; it is always collapsed
/// into [`VerifyError::InvalidSignature`] before leaving the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum Rejection {
    #[error("malformed token")]
    Malformed,
    #[error("non-HMAC algorithm")]
    Algorithm,
    #[error("signature mismatch")]
    Signature,
    #[error("missing or unparseable claims")]
    Claims,
    #[error("unexpected issuer")]
    Issuer,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("token expired")]
    Expired,
    #[error("destination mismatch")]
    Destination,
    #[error("body hash mismatch")]
    BodyHash,
}

impl From<Rejection> for VerifyError {
    fn from(_: Rejection) -> Self {
        VerifyError::InvalidSignature
    }
}

impl From<&jsonwebtoken::errors::Error> for Rejection {
    fn from(e: &jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => Rejection::Signature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => Rejection::Algorithm,
            ErrorKind::InvalidIssuer => Rejection::Issuer,
            ErrorKind::MissingRequiredClaim(_) | ErrorKind::Json(_) => Rejection::Claims,
            _ => Rejection::Malformed,
        }
    }
}
