//! `Upstash-Signature` verification → `VerifiedCallback` into request extensions.
//!
//! The middleware buffers the raw body (the token is bound to its exact bytes),
//! runs the core verifier and then hands the untouched bytes on to the handler.

use std::error::Error as StdError;
use std::time::Duration;

use axum::{
    Router,
    body::{self, Body},
    extract::{OriginalUri, State},
    http::{Request, Uri},
    middleware::{self, Next},
    response::Response,
};
use http_body_util::LengthLimitError;
use tracing::warn;
use url::Url;

use crate::api::v1::extractors::VerifiedCallback;
use crate::config::Config;
use crate::error::AppError;
use crate::services::signature::VerifyRequest;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "Upstash-Signature";

/// Policy knobs for the HTTP side of callback verification.
#[derive(Debug, Clone)]
pub struct CallbackPolicy {
    // Clock skew allowance handed to the verifier.
    pub tolerance: Duration,
    // If set, the expected destination is this base + the request path/query.
    pub public_base_url: Option<Url>,
    pub max_body_bytes: usize,
}

impl CallbackPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tolerance: config.clock_tolerance,
            public_base_url: config.public_base_url.clone(),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

/// Protect every route of `router` with signature verification.
///
/// Safe to apply to a router that is later nested: the destination is built
/// from the original request URI, not the prefix-stripped one.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, signature_middleware))
}

async fn signature_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?
        .to_owned();

    let policy = &state.callback_policy;
    let (mut parts, raw) = req.into_parts();

    let bytes = body::to_bytes(raw, policy.max_body_bytes)
        .await
        .map_err(|e| {
            warn!(error = %e, "failed to buffer callback body");
            if is_length_limit(&e) {
                AppError::PayloadTooLarge
            } else {
                AppError::BadRequest
            }
        })?;

    let destination = expected_destination(policy.public_base_url.as_ref(), &original_uri);

    let request = VerifyRequest::new(&signature, &bytes)
        .with_url(&destination)
        .with_tolerance(policy.tolerance);

    let claims = state.verifier.verify(&request).map_err(|err| {
        warn!(error = %err, destination = %destination, "callback verification failed");
        AppError::from(err)
    })?;

    parts.extensions.insert(VerifiedCallback::from(claims));

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Absolute URL the dispatcher should have signed for, or empty to skip the check.
///
/// The request path is appended to the base path, so a receiver published under
/// `https://gw.example.com/hooks` maps `/api/v1/callback` to
/// `https://gw.example.com/hooks/api/v1/callback`.
fn expected_destination(public_base_url: Option<&Url>, uri: &Uri) -> String {
    let Some(base) = public_base_url else {
        return String::new();
    };

    let mut url = base.clone();
    let path = format!("{}{}", base.path().trim_end_matches('/'), uri.path());
    url.set_path(&path);
    url.set_query(uri.query());

    url.to_string()
}

// `to_bytes` wraps the body error; only an exceeded limit is the client's size problem.
fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
