// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! The certificate store capability and its query language.
//!
//! `CertStore` is deliberately a trait, not a type: the path builder and
//! validator only ever need "iterate the certificates matching this
//! query", and backing that with a directory, a PKCS#11 token, or a flat
//! file is entirely an external concern. This crate ships the one backend
//! the core itself requires, an in-memory store, and leaves everything
//! else as a trait any caller can implement.

use std::sync::Arc;

use bitflags::bitflags;

use crate::cert::Cert;
use crate::error::{PathError, PathResult};
use crate::names::names_equal;

bitflags! {
    /// Which `Query` fields must hold for a certificate to match. Any bit
    /// outside this set causes [`matches`] to fail closed rather than
    /// silently ignore it.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct QueryFlags: u32 {
        const MATCH_CERTIFICATE    = 1 << 0;
        const MATCH_SERIAL         = 1 << 1;
        const MATCH_ISSUER_NAME    = 1 << 2;
        const MATCH_SUBJECT_NAME   = 1 << 3;
        const MATCH_SUBJECT_KEY_ID = 1 << 4;
        const FIND_ISSUER_CERT     = 1 << 5;
        const PRIVATE_KEY          = 1 << 6;
        const KU_DIGITAL_SIGNATURE = 1 << 7;
        const KU_NON_REPUDIATION   = 1 << 8;
        const KU_KEY_ENCIPHERMENT  = 1 << 9;
        const KU_DATA_ENCIPHERMENT = 1 << 10;
        const KU_KEY_AGREEMENT     = 1 << 11;
        const KU_KEY_CERT_SIGN     = 1 << 12;
        const KU_CRL_SIGN          = 1 << 13;
        const MATCH_LOCAL_KEY_ID   = 1 << 14;
        const NO_MATCH_PATH        = 1 << 15;
        const MATCH_FRIENDLY_NAME  = 1 << 16;
        const MATCH_FUNCTION       = 1 << 17;
        const MATCH_KEY_HASH_SHA1  = 1 << 18;
        /// Reserved: a negative filter enforced by callers, never by
        /// `matches` itself. Always fails here.
        const ANCHOR               = 1 << 19;
    }
}

type MatchFn = Arc<dyn Fn(&Cert) -> bool + Send + Sync>;

/// A declarative filter evaluated against one certificate at a time. Every
/// bit set in `flags` must hold for [`matches`] to return `true`.
#[derive(Clone, Default)]
pub struct Query {
    pub flags: QueryFlags,
    pub subject_cert: Option<Cert>,
    pub issuer_name: Option<Cert>,
    pub subject_name: Option<Cert>,
    pub subject_key_id: Option<Vec<u8>>,
    pub local_key_id: Option<Vec<u8>>,
    pub friendly_name: Option<String>,
    pub keyhash_sha1: Option<[u8; 20]>,
    pub path: Vec<Cert>,
    pub allow_self_signed: bool,
    pub match_function: Option<MatchFn>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    pub fn with_flag(mut self, flag: QueryFlags) -> Self {
        self.flags |= flag;
        self
    }
}

fn key_usage_flag_matches(ku: &x509_trust_types::extensions::KeyUsage<'_>, flag: QueryFlags) -> bool {
    (!flag.contains(QueryFlags::KU_DIGITAL_SIGNATURE) || ku.digital_signature())
        && (!flag.contains(QueryFlags::KU_NON_REPUDIATION) || ku.non_repudiation())
        && (!flag.contains(QueryFlags::KU_KEY_ENCIPHERMENT) || ku.key_encipherment())
        && (!flag.contains(QueryFlags::KU_DATA_ENCIPHERMENT) || ku.data_encipherment())
        && (!flag.contains(QueryFlags::KU_KEY_AGREEMENT) || ku.key_agreement())
        && (!flag.contains(QueryFlags::KU_KEY_CERT_SIGN) || ku.key_cert_sign())
        && (!flag.contains(QueryFlags::KU_CRL_SIGN) || ku.crl_sign())
}

/// The single pure predicate the query language reduces to.
pub fn matches(query: &Query, cert: &Cert) -> PathResult<bool> {
    if !QueryFlags::all().contains(query.flags) {
        return Err(PathError::UnknownQueryFlag);
    }

    if query.flags.contains(QueryFlags::ANCHOR) {
        return Ok(false);
    }

    let ku_flags = QueryFlags::KU_DIGITAL_SIGNATURE
        | QueryFlags::KU_NON_REPUDIATION
        | QueryFlags::KU_KEY_ENCIPHERMENT
        | QueryFlags::KU_DATA_ENCIPHERMENT
        | QueryFlags::KU_KEY_AGREEMENT
        | QueryFlags::KU_KEY_CERT_SIGN
        | QueryFlags::KU_CRL_SIGN;

    if query.flags.contains(QueryFlags::MATCH_CERTIFICATE) {
        let Some(want) = &query.subject_cert else {
            return Err(PathError::InvalidArgument("MatchCertificate without subject_cert"));
        };
        if cert != want {
            return Ok(false);
        }
    }

    if query.flags.contains(QueryFlags::MATCH_SERIAL) {
        let Some(want) = &query.subject_cert else {
            return Err(PathError::InvalidArgument("MatchSerial without subject_cert"));
        };
        if cert.serial().as_bytes() != want.serial().as_bytes() {
            return Ok(false);
        }
    }

    if query.flags.contains(QueryFlags::MATCH_ISSUER_NAME) {
        let Some(want) = &query.issuer_name else {
            return Err(PathError::InvalidArgument("MatchIssuerName without issuer_name"));
        };
        if !names_equal(&cert.issuer(), &want.issuer()) {
            return Ok(false);
        }
    }

    if query.flags.contains(QueryFlags::MATCH_SUBJECT_NAME) {
        let Some(want) = &query.subject_name else {
            return Err(PathError::InvalidArgument("MatchSubjectName without subject_name"));
        };
        if !names_equal(&cert.subject(), &want.subject()) {
            return Ok(false);
        }
    }

    if query.flags.contains(QueryFlags::MATCH_SUBJECT_KEY_ID) {
        let Some(want) = &query.subject_key_id else {
            return Err(PathError::InvalidArgument("MatchSubjectKeyID without subject_key_id"));
        };
        let exts = cert.extensions()?;
        let ski = exts
            .get_extension(&x509_trust_types::oid::SUBJECT_KEY_IDENTIFIER_OID)
            .and_then(|e| e.value::<&[u8]>().ok());
        if ski != Some(want.as_slice()) {
            return Ok(false);
        }
    }

    if query.flags.contains(QueryFlags::FIND_ISSUER_CERT) {
        let Some(child) = &query.subject_cert else {
            return Err(PathError::InvalidArgument("FindIssuerCert without subject_cert"));
        };
        if !crate::builder::is_parent_cmp(child, cert, query.allow_self_signed)? {
            return Ok(false);
        }
    }

    if query.flags.contains(QueryFlags::PRIVATE_KEY) && !cert.has_private_key() {
        return Ok(false);
    }

    if query.flags.intersects(ku_flags) {
        let exts = cert.extensions()?;
        let ku = exts
            .get_extension(&x509_trust_types::oid::KEY_USAGE_OID)
            .and_then(|e| e.value::<x509_trust_types::extensions::KeyUsage<'_>>().ok());
        match ku {
            None => return Ok(false),
            Some(ku) => {
                if !key_usage_flag_matches(&ku, query.flags) {
                    return Ok(false);
                }
            }
        }
    }

    if query.flags.contains(QueryFlags::MATCH_LOCAL_KEY_ID) {
        let Some(want) = &query.local_key_id else {
            return Err(PathError::InvalidArgument("MatchLocalKeyID without local_key_id"));
        };
        if cert.attribute(&x509_trust_types::oid::PKCS9_LOCAL_KEY_ID_OID).as_deref() != Some(want.as_slice()) {
            return Ok(false);
        }
    }

    if query.flags.contains(QueryFlags::NO_MATCH_PATH) && query.path.iter().any(|c| c == cert) {
        return Ok(false);
    }

    if query.flags.contains(QueryFlags::MATCH_FRIENDLY_NAME) {
        let Some(want) = &query.friendly_name else {
            return Err(PathError::InvalidArgument("MatchFriendlyName without friendly_name"));
        };
        match cert.get_friendly_name() {
            Some(have) if have.eq_ignore_ascii_case(want) => {}
            _ => return Ok(false),
        }
    }

    if query.flags.contains(QueryFlags::MATCH_FUNCTION) {
        let Some(f) = &query.match_function else {
            return Err(PathError::InvalidArgument("MatchFunction without match_function"));
        };
        if !f(cert) {
            return Ok(false);
        }
    }

    if query.flags.contains(QueryFlags::MATCH_KEY_HASH_SHA1) {
        let Some(want) = &query.keyhash_sha1 else {
            return Err(PathError::InvalidArgument("MatchKeyHashSHA1 without keyhash_sha1"));
        };
        if &cert.public_key_sha1()? != want {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::CertSpec;

    fn sample_cert() -> Cert {
        crate::fixtures::build_cert(&CertSpec {
            subject_cn: Some("leaf"),
            issuer_cn: Some("root"),
            ..CertSpec::default()
        })
    }

    #[test]
    fn rejects_flag_bits_outside_the_defined_mask() {
        let cert = sample_cert();
        let query = Query {
            flags: QueryFlags::from_bits_retain(1 << 30),
            ..Query::new()
        };
        let err = matches(&query, &cert).unwrap_err();
        assert!(matches!(err, PathError::UnknownQueryFlag));
    }

    #[test]
    fn anchor_flag_never_matches() {
        let cert = sample_cert();
        let query = Query::new().with_flag(QueryFlags::ANCHOR);
        assert!(!matches(&query, &cert).unwrap());
    }

    #[test]
    fn subject_name_predicate() {
        let cert = sample_cert();

        let matching_query = Query {
            flags: QueryFlags::MATCH_SUBJECT_NAME,
            subject_name: Some(sample_cert()),
            ..Query::new()
        };
        assert!(matches(&matching_query, &cert).unwrap());

        let other = crate::fixtures::build_cert(&CertSpec {
            subject_cn: Some("someone-else"),
            issuer_cn: Some("root"),
            ..CertSpec::default()
        });
        let non_matching_query = Query {
            flags: QueryFlags::MATCH_SUBJECT_NAME,
            subject_name: Some(other),
            ..Query::new()
        };
        assert!(!matches(&non_matching_query, &cert).unwrap());
    }

    #[test]
    fn key_usage_predicate_requires_the_requested_bit() {
        let signer_only = crate::fixtures::build_cert(&CertSpec {
            subject_cn: Some("ca"),
            issuer_cn: Some("root"),
            key_usage_bits: &[5],
            ..CertSpec::default()
        });
        let query = Query::new().with_flag(QueryFlags::KU_DIGITAL_SIGNATURE);
        assert!(!matches(&query, &signer_only).unwrap());

        let query = Query::new().with_flag(QueryFlags::KU_KEY_CERT_SIGN);
        assert!(matches(&query, &signer_only).unwrap());
    }
}

/// `certs_find`/`certs_add`/`certs_merge`: the capability the path builder
/// and validator depend on. `MEMORY` is the only backend this crate
/// provides; `FILE`/`PKCS12`/`PKCS11`/`DIR` backends are external
/// collaborators implementing the same trait.
pub trait CertStore {
    fn iter(&self) -> Box<dyn Iterator<Item = &Cert> + '_>;

    fn add(&mut self, cert: Cert);

    fn find(&self, query: &Query) -> PathResult<Option<Cert>> {
        for cert in self.iter() {
            if matches(query, cert)? {
                return Ok(Some(cert.clone()));
            }
        }
        Ok(None)
    }

    fn find_all(&self, query: &Query) -> PathResult<Vec<Cert>> {
        let mut out = Vec::new();
        for cert in self.iter() {
            if matches(query, cert)? {
                out.push(cert.clone());
            }
        }
        Ok(out)
    }
}

/// `MEMORY:<tag>` backend: an unordered, append-only collection of shares.
#[derive(Default, Clone)]
pub struct MemoryCertStore {
    certs: Vec<Cert>,
}

impl MemoryCertStore {
    pub fn new() -> Self {
        MemoryCertStore::default()
    }

    pub fn merge(&mut self, other: &MemoryCertStore) {
        self.certs.extend(other.certs.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.certs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }
}

impl CertStore for MemoryCertStore {
    fn iter(&self) -> Box<dyn Iterator<Item = &Cert> + '_> {
        Box::new(self.certs.iter())
    }

    fn add(&mut self, cert: Cert) {
        self.certs.push(cert);
    }
}
