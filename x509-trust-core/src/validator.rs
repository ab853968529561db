// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! The path validator: walks a built path from anchor to leaf enforcing
//! validity, Key Usage, Basic Constraints, and Name Constraints, then
//! checks revocation, then checks signatures.

use x509_trust_crypto::CryptoOps;
use x509_trust_types::extensions::{BasicConstraints, KeyUsage, NameConstraints, SubjectAlternativeName};
use x509_trust_types::oid;

use crate::builder::{build_path, is_parent_cmp};
use crate::cert::Cert;
use crate::context::VerifyContext;
use crate::error::{PathError, PathResult};
use crate::name_constraints::NameConstraintsAccumulator;
use crate::revoke::RevokeStatus;
use crate::store::{CertStore, MemoryCertStore};

fn check_validity(cert: &Cert, now: &asn1::DateTime) -> PathResult<()> {
    let decoded = cert.decoded();
    let validity = &decoded.tbs_cert.validity;
    if now < validity.not_before.as_datetime() {
        return Err(PathError::CertUsedBeforeTime);
    }
    if now > validity.not_after.as_datetime() {
        return Err(PathError::CertUsedAfterTime);
    }
    Ok(())
}

/// Enforces that an issuing certificate (one acting as a parent in the
/// path, i.e. every index but the leaf) is actually allowed to sign.
///
/// `intermediates_below` is the number of CA certificates strictly
/// between this one and the leaf -- `path[1..index]`, since `path[0]` is
/// the leaf itself and never a CA.
fn check_issuer_constraints(cert: &Cert, intermediates_below: u64) -> PathResult<()> {
    let exts = cert.extensions()?;

    let ku = exts
        .get_extension(&oid::KEY_USAGE_OID)
        .ok_or(PathError::KUCertMissing)?
        .value::<KeyUsage<'_>>()
        .map_err(|e| PathError::DecodeError(e.to_string()))?;
    if !ku.key_cert_sign() {
        return Err(PathError::KUCertMissing);
    }

    let bc = exts
        .get_extension(&oid::BASIC_CONSTRAINTS_OID)
        .ok_or(PathError::ParentNotCA)?
        .value::<BasicConstraints>()
        .map_err(|e| PathError::DecodeError(e.to_string()))?;
    if !bc.ca {
        return Err(PathError::ParentNotCA);
    }
    if let Some(path_len) = bc.path_length {
        if path_len < intermediates_below {
            return Err(PathError::CAPathTooDeep);
        }
    }
    Ok(())
}

fn sans<'a>(cert: &'a Cert) -> PathResult<Vec<x509_trust_types::name::GeneralName<'a>>> {
    let exts = cert.extensions()?;
    match exts.get_extension(&oid::SUBJECT_ALTERNATIVE_NAME_OID) {
        None => Ok(Vec::new()),
        Some(e) => e
            .value::<SubjectAlternativeName<'a>>()
            .map(|san| san.collect())
            .map_err(|e| PathError::DecodeError(e.to_string())),
    }
}

/// `verify_path`: build the chain, then validate it. Returns the accepted
/// path (leaf-first) on success.
pub fn verify_path<C: CryptoOps>(
    ctx: &VerifyContext<C>,
    leaf: &Cert,
    pool: &dyn CertStore,
) -> PathResult<Vec<Cert>> {
    let now = ctx
        .time_now
        .as_ref()
        .ok_or(PathError::InvalidArgument("verify context has no time set"))?;

    let path = build_path(leaf, pool, &ctx.trust_anchors, ctx.max_depth)?;
    let n = path.len();

    let mut accumulator = NameConstraintsAccumulator::new();
    for i in (0..n).rev() {
        let cert = &path[i];

        check_validity(cert, now)?;

        if i != 0 {
            check_issuer_constraints(cert, (i - 1) as u64)?;
        }

        let exts = cert.extensions()?;

        for ext in exts.iter() {
            if ext.critical && !x509_trust_types::extensions::is_known_extension(&ext.extn_id) {
                return Err(PathError::VerifyConstraints);
            }
        }

        let bc = exts
            .get_extension(&oid::BASIC_CONSTRAINTS_OID)
            .map(|e| e.value::<BasicConstraints>())
            .transpose()
            .map_err(|e| PathError::DecodeError(e.to_string()))?;
        let is_ca = bc.as_ref().map(|bc| bc.ca).unwrap_or(false);

        // An intermediate self-signed bridge certificate (not the anchor
        // itself) is exempt from having to satisfy the accumulated
        // constraints against its own identity.
        let is_self_signed_bridge = i != n - 1 && is_parent_cmp(cert, cert, true).unwrap_or(false);
        if !is_self_signed_bridge {
            accumulator.check(&cert.subject(), sans(cert)?.into_iter())?;
        }

        if let Some(nc_ext) = exts.get_extension(&oid::NAME_CONSTRAINTS_OID) {
            if !is_ca {
                return Err(PathError::VerifyConstraints);
            }
            let nc = nc_ext
                .value::<NameConstraints<'_>>()
                .map_err(|e| PathError::DecodeError(e.to_string()))?;
            accumulator.fold(&nc)?;
        }

        // (Reserved) algorithm-consistency checks across the path are
        // deliberately not implemented; see the design notes.
    }

    if let Some(oracle) = &ctx.revoke {
        let mut working = MemoryCertStore::new();
        for cert in &path {
            working.add(cert.share());
        }
        for cert in pool.iter() {
            working.add(cert.share());
        }
        for i in 0..n.saturating_sub(1) {
            match oracle.check(&working, now, &path[i], &path[i + 1])? {
                RevokeStatus::Ok => {}
                RevokeStatus::Revoked => return Err(PathError::Revoked),
                RevokeStatus::Unknown => {
                    if !ctx.flags.contains(crate::context::ContextFlags::VERIFY_MISSING_OK) {
                        return Err(PathError::RevokeUnknown);
                    }
                }
            }
        }
    }

    for i in (0..n).rev() {
        let signer = &path[std::cmp::min(i + 1, n - 1)];
        let key = ctx
            .crypto
            .public_key(&signer.decoded())
            .map_err(|_| PathError::BadSignature)?;
        ctx.crypto
            .verify_signed_by(&path[i].decoded(), key)
            .map_err(|_| PathError::BadSignature)?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use x509_trust_types::certificate::Certificate;

    use crate::fixtures::{self, CertSpec};

    /// A crypto double that always accepts, so these tests exercise the
    /// chain-building and constraint-enforcement logic without needing a
    /// real signing key.
    #[derive(Default)]
    struct AlwaysValidCryptoOps;

    impl CryptoOps for AlwaysValidCryptoOps {
        type Key = ();

        fn public_key(&self, _cert: &Certificate<'_>) -> Result<Self::Key, x509_trust_crypto::CryptoError> {
            Ok(())
        }

        fn verify_signed_by(&self, _cert: &Certificate<'_>, _key: Self::Key) -> Result<(), x509_trust_crypto::CryptoError> {
            Ok(())
        }
    }

    fn test_ctx(now: &str) -> VerifyContext<AlwaysValidCryptoOps> {
        VerifyContext {
            trust_anchors: MemoryCertStore::new(),
            flags: crate::context::ContextFlags::empty(),
            time_now: Some(fixtures::datetime(now)),
            max_depth: 30,
            revoke: None,
            crypto: AlwaysValidCryptoOps,
        }
    }

    fn root() -> Cert {
        fixtures::build_cert(&CertSpec {
            subject_cn: Some("root"),
            issuer_cn: Some("root"),
            is_ca: true,
            key_usage_bits: &[5],
            ..CertSpec::default()
        })
    }

    #[test]
    fn two_deep_chain_verifies() {
        let mut ctx = test_ctx("250101000000Z");
        ctx.trust_anchors.add(root());
        let pool = MemoryCertStore::new();

        let leaf = fixtures::build_cert(&CertSpec {
            subject_cn: Some("leaf"),
            issuer_cn: Some("root"),
            ..CertSpec::default()
        });

        let path = verify_path(&ctx, &leaf, &pool).unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn expired_leaf_is_rejected() {
        let mut ctx = test_ctx("250101000000Z");
        ctx.trust_anchors.add(root());
        let pool = MemoryCertStore::new();

        let leaf = fixtures::build_cert(&CertSpec {
            subject_cn: Some("leaf"),
            issuer_cn: Some("root"),
            not_before: "230101000000Z",
            not_after: "240101000000Z",
            ..CertSpec::default()
        });

        let err = verify_path(&ctx, &leaf, &pool).unwrap_err();
        assert!(matches!(err, PathError::CertUsedAfterTime));
    }

    #[test]
    fn path_length_constraint_is_enforced() {
        let mut ctx = test_ctx("250101000000Z");
        ctx.trust_anchors.add(fixtures::build_cert(&CertSpec {
            subject_cn: Some("root"),
            issuer_cn: Some("root"),
            is_ca: true,
            key_usage_bits: &[5],
            path_length: Some(0),
            ..CertSpec::default()
        }));
        let mut pool = MemoryCertStore::new();
        pool.add(fixtures::build_cert(&CertSpec {
            subject_cn: Some("intermediate"),
            issuer_cn: Some("root"),
            is_ca: true,
            key_usage_bits: &[5],
            ..CertSpec::default()
        }));

        let leaf = fixtures::build_cert(&CertSpec {
            subject_cn: Some("leaf"),
            issuer_cn: Some("intermediate"),
            ..CertSpec::default()
        });

        let err = verify_path(&ctx, &leaf, &pool).unwrap_err();
        assert!(matches!(err, PathError::CAPathTooDeep));
    }

    #[test]
    fn name_constraints_violation_is_rejected() {
        let mut ctx = test_ctx("250101000000Z");
        ctx.trust_anchors.add(fixtures::build_cert(&CertSpec {
            subject_cn: Some("root"),
            issuer_cn: Some("root"),
            is_ca: true,
            key_usage_bits: &[5],
            extra_extensions: vec![(
                x509_trust_types::oid::NAME_CONSTRAINTS_OID,
                true,
                fixtures::name_constraints_permitted_directory("allowed"),
            )],
            ..CertSpec::default()
        }));
        let pool = MemoryCertStore::new();

        let leaf = fixtures::build_cert(&CertSpec {
            subject_cn: Some("leaf"),
            issuer_cn: Some("root"),
            ..CertSpec::default()
        });

        let err = verify_path(&ctx, &leaf, &pool).unwrap_err();
        assert!(matches!(err, PathError::VerifyConstraints));
    }
}
