/*
 * Responsibility
 * - v1 URL layout
 * - /health is public, /callback sits behind signature verification
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{callback::receive_callback, health::health};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let callbacks = Router::new().route("/callback", post(receive_callback));
    let callbacks = middleware::signature::apply(callbacks, state);

    Router::new().route("/health", get(health)).merge(callbacks)
}
