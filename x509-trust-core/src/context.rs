// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! The verification context: trust anchors, clock, depth bound, and an
//! optional revocation oracle, gathered into one handle the caller owns
//! and passes to [`crate::validator::verify_path`] by reference.
//!
//! The original API registers backends into a process-wide global at
//! init; this crate makes that an explicit value instead; there is no
//! global to initialize, and a caller can hold as many independently
//! configured contexts as it wants.

use std::sync::Arc;

use bitflags::bitflags;

use x509_trust_crypto::{CryptoOps, OpenSslCryptoOps};

use crate::revoke::RevokeOracle;
use crate::store::MemoryCertStore;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ContextFlags: u32 {
        /// `time_now` was set explicitly rather than left to the wall clock.
        const TIME_EXPLICIT = 1 << 0;
        /// Accept proxy certificates (RFC 3820) in the path.
        const ALLOW_PROXY_CERT = 1 << 1;
        /// Treat `RevokeStatus::Unknown` as acceptable instead of fatal.
        const VERIFY_MISSING_OK = 1 << 2;
    }
}

pub const DEFAULT_MAX_DEPTH: usize = 30;

/// Owns everything `verify_path` needs besides the leaf and the candidate
/// pool, which are passed per call. Attaching anchors, setting the clock,
/// or changing `max_depth` after construction is the caller's
/// responsibility to serialize; nothing here is internally synchronized.
pub struct VerifyContext<C: CryptoOps = OpenSslCryptoOps> {
    pub trust_anchors: MemoryCertStore,
    pub flags: ContextFlags,
    /// Required before calling `verify_path`: this crate has no calendar
    /// arithmetic to fall back on the wall clock with, so every verify
    /// context must set an explicit time.
    pub time_now: Option<asn1::DateTime>,
    pub max_depth: usize,
    pub revoke: Option<Arc<dyn RevokeOracle>>,
    pub crypto: C,
}

impl<C: CryptoOps + Default> Default for VerifyContext<C> {
    fn default() -> Self {
        VerifyContext {
            trust_anchors: MemoryCertStore::new(),
            flags: ContextFlags::empty(),
            time_now: None,
            max_depth: DEFAULT_MAX_DEPTH,
            revoke: None,
            crypto: C::default(),
        }
    }
}

impl VerifyContext<OpenSslCryptoOps> {
    /// `context_init` + `verify_ctx_new`, collapsed into one constructor
    /// since this crate has no process-wide registry for the former to
    /// populate.
    pub fn new() -> Self {
        VerifyContext::default()
    }
}

impl<C: CryptoOps> VerifyContext<C> {
    pub fn attach_anchors(&mut self, anchors: MemoryCertStore) {
        self.trust_anchors.merge(&anchors);
    }

    pub fn attach_revoke(&mut self, oracle: Arc<dyn RevokeOracle>) {
        self.revoke = Some(oracle);
    }

    pub fn set_time(&mut self, time: asn1::DateTime) {
        self.time_now = Some(time);
        self.flags |= ContextFlags::TIME_EXPLICIT;
    }

    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }
}
