// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! Error kinds surfaced by path construction and validation.
//!
//! These mirror the original C API's error codes one-to-one rather than
//! collapsing them into a handful of generic variants, because callers
//! (particularly test suites and the testable-properties in the design
//! documents this crate is built from) dispatch on the specific kind, not
//! just on success/failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("extension not found")]
    ExtensionNotFound,
    #[error("no issuer certificate found for this certificate")]
    IssuerNotFound,
    #[error("path exceeds the configured maximum depth")]
    PathTooLong,
    #[error("a certificate in the path is not a valid CA for its child")]
    ParentNotCA,
    #[error("path length constraint exceeded")]
    CAPathTooDeep,
    #[error("issuing certificate is missing the keyCertSign key usage bit")]
    KUCertMissing,
    #[error("certificate is not yet valid")]
    CertUsedBeforeTime,
    #[error("certificate has expired")]
    CertUsedAfterTime,
    #[error("name constraints violated")]
    VerifyConstraints,
    #[error("name constraint matching error: {0}")]
    NameConstraintError(&'static str),
    #[error("name constraint subtree specifies both a minimum and a maximum")]
    RangeUnsupported,
    #[error("signing algorithm changed across the path")]
    PathAlgorithmChanged,
    #[error("signature verification failed")]
    BadSignature,
    #[error("certificate has been revoked")]
    Revoked,
    #[error("revocation status could not be determined")]
    RevokeUnknown,
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("certificate could not be decoded: {0}")]
    DecodeError(String),
    #[error("unknown query match flag")]
    UnknownQueryFlag,
}

pub type PathResult<T> = Result<T, PathError>;
