pub mod verified_callback;

pub use verified_callback::{VerifiedCallback, VerifiedCallbackExtractor};
