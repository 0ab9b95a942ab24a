use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::state::AppState;

use super::VerifiedCallback;

/// Extractor for `VerifiedCallback`.
/// Relies on the signature middleware having inserted it into request extensions;
/// returns 401 when it is missing (route not behind the middleware).
pub struct VerifiedCallbackExtractor(pub VerifiedCallback);

impl FromRequestParts<AppState> for VerifiedCallbackExtractor
where
    AppState: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedCallback>()
            .cloned()
            .map(VerifiedCallbackExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
