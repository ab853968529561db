// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! The parent predicate and the leaf-to-anchor path search built on it.

use x509_trust_types::extensions::AuthorityKeyIdentifier;
use x509_trust_types::oid;

use crate::cert::Cert;
use crate::error::{PathError, PathResult};
use crate::names::names_equal;
use crate::store::{CertStore, Query, QueryFlags};

/// Could `issuer` have signed `subject`? Checks names first, then falls
/// back to Authority/Subject Key Identifier linkage when both certificates
/// carry one.
///
/// `allow_self_signed` widens the match to accept an issuer with no
/// Authority Key Identifier extension when the subject being matched
/// against offers only a Subject Key Identifier -- the case of a subject
/// whose issuer is itself (no AKI needed to close the loop).
pub fn is_parent_cmp(subject: &Cert, issuer: &Cert, allow_self_signed: bool) -> PathResult<bool> {
    if !names_equal(&issuer.subject(), &subject.issuer()) {
        return Ok(false);
    }

    let subject_exts = subject.extensions()?;
    let issuer_exts = issuer.extensions()?;

    let aki = subject_exts
        .get_extension(&oid::AUTHORITY_KEY_IDENTIFIER_OID)
        .and_then(|e| e.value::<AuthorityKeyIdentifier<'_>>().ok());
    let ski = issuer_exts
        .get_extension(&oid::SUBJECT_KEY_IDENTIFIER_OID)
        .and_then(|e| e.value::<&[u8]>().ok());

    match (&aki, ski) {
        (None, None) => Ok(true),
        (None, Some(_)) => Ok(allow_self_signed),
        (Some(aki), ski) => match (aki.key_identifier, ski) {
            (Some(key_id), Some(ski)) => Ok(key_id == ski),
            _ => Ok(false),
        },
    }
}

/// `build_path`: walk from `leaf` to a trust anchor, selecting each parent
/// with [`is_parent_cmp`] via the query language so the search and the
/// predicate never disagree about what counts as a parent.
pub fn build_path(
    leaf: &Cert,
    pool: &dyn CertStore,
    anchors: &dyn CertStore,
    max_depth: usize,
) -> PathResult<Vec<Cert>> {
    let mut path = vec![leaf.share()];
    let mut current = leaf.share();

    loop {
        let anchor_probe = Query {
            flags: QueryFlags::MATCH_CERTIFICATE,
            subject_cert: Some(current.share()),
            ..Query::new()
        };
        if anchors.find(&anchor_probe)?.is_some() {
            return Ok(path);
        }

        let mut query = Query::new();
        if !current.subject().is_empty() {
            query.flags |= QueryFlags::FIND_ISSUER_CERT;
            query.subject_cert = Some(current.share());
        } else {
            let exts = current.extensions()?;
            let key_id = exts
                .get_extension(&oid::AUTHORITY_KEY_IDENTIFIER_OID)
                .and_then(|e| e.value::<AuthorityKeyIdentifier<'_>>().ok())
                .and_then(|aki| aki.key_identifier.map(|k| k.to_vec()));
            let Some(key_id) = key_id else {
                return Err(PathError::IssuerNotFound);
            };
            query.flags |= QueryFlags::MATCH_SUBJECT_KEY_ID;
            query.subject_key_id = Some(key_id);
        }
        query.flags |= QueryFlags::NO_MATCH_PATH | QueryFlags::KU_KEY_CERT_SIGN;
        query.path = path.clone();

        let parent = match pool.find(&query)? {
            Some(c) => c,
            None => match anchors.find(&query)? {
                Some(c) => c,
                None => return Err(PathError::IssuerNotFound),
            },
        };

        path.push(parent.share());
        if path.len() > max_depth {
            return Err(PathError::PathTooLong);
        }
        current = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::CertSpec;
    use crate::store::MemoryCertStore;

    fn root() -> Cert {
        crate::fixtures::build_cert(&CertSpec {
            subject_cn: Some("root"),
            issuer_cn: Some("root"),
            is_ca: true,
            key_usage_bits: &[5],
            ..CertSpec::default()
        })
    }

    fn leaf_issued_by(issuer_cn: &str) -> Cert {
        crate::fixtures::build_cert(&CertSpec {
            subject_cn: Some("leaf"),
            issuer_cn: Some(issuer_cn),
            ..CertSpec::default()
        })
    }

    #[test]
    fn finds_a_self_signed_anchor() {
        let mut anchors = MemoryCertStore::new();
        anchors.add(root());
        let pool = MemoryCertStore::new();

        let path = build_path(&leaf_issued_by("root"), &pool, &anchors, 30).unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn missing_issuer_is_rejected() {
        let anchors = MemoryCertStore::new();
        let pool = MemoryCertStore::new();

        let err = build_path(&leaf_issued_by("ghost"), &pool, &anchors, 30).unwrap_err();
        assert!(matches!(err, PathError::IssuerNotFound));
    }

    #[test]
    fn depth_budget_is_enforced() {
        let mut anchors = MemoryCertStore::new();
        anchors.add(root());
        let pool = MemoryCertStore::new();

        let err = build_path(&leaf_issued_by("root"), &pool, &anchors, 1).unwrap_err();
        assert!(matches!(err, PathError::PathTooLong));
    }

    #[test]
    fn authority_key_id_mismatch_blocks_the_parent_link() {
        let mut anchors = MemoryCertStore::new();
        anchors.add(crate::fixtures::build_cert(&CertSpec {
            subject_cn: Some("root"),
            issuer_cn: Some("root"),
            is_ca: true,
            key_usage_bits: &[5],
            ski: Some(b"root-key"),
            ..CertSpec::default()
        }));
        let pool = MemoryCertStore::new();

        let leaf = crate::fixtures::build_cert(&CertSpec {
            subject_cn: Some("leaf"),
            issuer_cn: Some("root"),
            aki: Some(b"does-not-match"),
            ..CertSpec::default()
        });

        let err = build_path(&leaf, &pool, &anchors, 30).unwrap_err();
        assert!(matches!(err, PathError::IssuerNotFound));
    }
}
