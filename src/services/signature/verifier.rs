use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::DecodingKey;
use tracing::debug;

use super::body;
use super::claims::ClaimSet;
use super::error::VerifyError;
use super::keys::SigningKeys;
use super::token::TokenValidator;

/// One inbound callback to authenticate.
///
/// - `signature`: the `Upstash-Signature` header value.
/// - `url`: the destination this receiver is reachable at. Empty skips the check.
/// - `body`: the raw request body, exactly as received.
/// - `tolerance`: clock skew allowance for `nbf` / `exp` (whole seconds are used).
#[derive(Debug, Clone, Copy)]
pub struct VerifyRequest<'a> {
    pub signature: &'a str,
    pub url: &'a str,
    pub body: &'a [u8],
    pub tolerance: Duration,
}

impl<'a> VerifyRequest<'a> {
    pub fn new(signature: &'a str, body: &'a [u8]) -> Self {
        Self {
            signature,
            url: "",
            body,
            tolerance: Duration::ZERO,
        }
    }

    pub fn with_url(mut self, url: &'a str) -> Self {
        self.url = url;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Verifies `Upstash-Signature` tokens against a current and a next signing key.
///
/// Stateless apart from the two keys; cheap to clone and safe to share across
/// threads.
#[derive(Clone)]
pub struct Verifier {
    current: DecodingKey,
    next: DecodingKey,
    tokens: TokenValidator,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("Verifier")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl Verifier {
    pub fn new(keys: &SigningKeys) -> Self {
        Self {
            current: DecodingKey::from_secret(keys.current()),
            next: DecodingKey::from_secret(keys.next()),
            tokens: TokenValidator::new(),
        }
    }

    /// Verify a request against the wall clock.
    pub fn verify(&self, request: &VerifyRequest<'_>) -> Result<ClaimSet, VerifyError> {
        self.verify_at(request, Utc::now())
    }

    /// Verify a request as of `now`.
    ///
    /// `now` keeps its sub-second part: a token expiring at `exp` is rejected
    /// from `exp + tolerance + 1ns` on.
    ///
    /// Tries the current key, then (only on `InvalidSignature`) the next key.
    /// Returns the decoded claims of whichever key accepted the token.
    pub fn verify_at(
        &self,
        request: &VerifyRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<ClaimSet, VerifyError> {
        let leeway_seconds = i64::try_from(request.tolerance.as_secs())
            .map_err(|_| VerifyError::InvalidTolerance)?;

        match self.attempt(&self.current, request, leeway_seconds, now) {
            Err(VerifyError::InvalidSignature) => {
                debug!("current signing key rejected the token, retrying with next key");
                self.attempt(&self.next, request, leeway_seconds, now)
            }
            result => result,
        }
    }

    fn attempt(
        &self,
        key: &DecodingKey,
        request: &VerifyRequest<'_>,
        leeway_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<ClaimSet, VerifyError> {
        let claims = self
            .tokens
            .validate(request.signature, key, request.url, leeway_seconds, now)
            .and_then(|claims| body::check(&claims, request.body).map(|()| claims))
            .map_err(|reason| {
                debug!(%reason, "signature attempt rejected");
                VerifyError::from(reason)
            })?;

        Ok(claims)
    }
}
