/*
 * Responsibility
 * - middleware public interface (re-export)
 * - pub fn apply(...) per concern
 */
pub mod http;
pub mod signature;
