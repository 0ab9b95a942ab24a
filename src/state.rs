/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - verifier: Arc<Verifier>, callback policy
 * - Cloned per request (inner values are Arc / cheap to clone)
 */
use std::sync::Arc;

use crate::config::Config;
use crate::middleware::signature::CallbackPolicy;
use crate::services::signature::{Verifier, build_verifier};

#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: Arc<Verifier>,
    pub callback_policy: CallbackPolicy,
}

impl AppState {
    pub fn new(verifier: Arc<Verifier>, callback_policy: CallbackPolicy) -> Self {
        Self {
            verifier,
            callback_policy,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(build_verifier(config), CallbackPolicy::from_config(config))
    }
}
