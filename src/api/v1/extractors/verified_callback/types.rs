/*
 * Responsibility
 * - The "authenticated callback" type handlers see
 * - The signature middleware builds it from verified claims and stores it in
 *   request extensions; handlers never touch the token itself
 */
use crate::services::signature::ClaimSet;

#[derive(Debug, Clone)]
pub struct VerifiedCallback {
    // `jti` of the token; the dispatcher's message id
    pub message_id: Option<String>,
    // `sub`, the destination the message was published to (may be empty)
    pub destination: String,
    pub issued_at: Option<i64>,
    pub expires_at: i64,
}

impl From<ClaimSet> for VerifiedCallback {
    fn from(claims: ClaimSet) -> Self {
        Self {
            message_id: claims.jti,
            destination: claims.sub,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}
