//! Facade crate re-exporting the certificate path construction and
//! validation engine.
//!
//! The real work lives in [`x509_trust_core`]; this crate exists so that
//! downstream consumers depend on a single, stably-named package instead of
//! reaching into the workspace members directly.

pub use x509_trust_core::*;
pub use x509_trust_crypto as crypto;
pub use x509_trust_types as types;
