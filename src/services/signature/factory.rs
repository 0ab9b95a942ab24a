/// Factory: build `Verifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::signature::Verifier;

pub fn build_verifier(config: &Config) -> Arc<Verifier> {
    Arc::new(Verifier::new(&config.signing_keys))
}
