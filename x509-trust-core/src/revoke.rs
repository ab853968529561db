// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! The revocation-oracle capability: an external collaborator the
//! validator consults once per edge in the built path.

use crate::cert::Cert;
use crate::error::PathResult;
use crate::store::CertStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeStatus {
    Ok,
    Revoked,
    Unknown,
}

/// One operation: is `subject` (signed by `issuer`) revoked as of `now`?
/// `certs` is every certificate available to the check -- the built path
/// merged with the candidate pool -- so an oracle backed by CRLs or OCSP
/// responses bundled alongside the chain can find them without a second
/// store argument.
pub trait RevokeOracle: Send + Sync {
    fn check(
        &self,
        certs: &dyn CertStore,
        now: &asn1::DateTime,
        subject: &Cert,
        issuer: &Cert,
    ) -> PathResult<RevokeStatus>;
}
