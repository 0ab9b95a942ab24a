//! Body binding: ties a token to the exact bytes it was issued for.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::claims::ClaimSet;
use super::error::Rejection;

/// base64url(SHA-256(body)) without `=` padding, as the dispatcher encodes it.
pub fn body_hash(body: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(body))
}

/// Compare the `body` claim against the digest of `body`.
///
/// Padding is trimmed from the claim before comparing so both padded and
/// unpadded signers are accepted. An empty body is hashed like any other.
pub(crate) fn check(claims: &ClaimSet, body: &[u8]) -> Result<(), Rejection> {
    let expected = body_hash(body);
    let declared = claims.body.trim_matches('=');

    if bool::from(expected.as_bytes().ct_eq(declared.as_bytes())) {
        Ok(())
    } else {
        Err(Rejection::BodyHash)
    }
}
