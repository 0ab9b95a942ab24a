use serde::{Deserialize, Serialize};

/// Issuer every dispatching-service token must carry.
pub const EXPECTED_ISSUER: &str = "Upstash";

/// Claims carried by an `Upstash-Signature` token.
///
/// Required: `iss`, `exp`, `body`. A token missing any of them fails to decode
/// and is rejected like any other invalid signature.
///
/// `aud` is sent by the dispatcher (usually empty) but has no meaning for the
/// receiver, so it is not modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    pub iss: String,

    // Destination URL the message was published to. Empty when the dispatcher
    // did not bind the token to a URL.
    #[serde(default)]
    pub sub: String,

    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    // base64url(SHA-256(raw body)), trailing padding optional
    pub body: String,
}
