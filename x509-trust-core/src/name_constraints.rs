// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! Name Constraints evaluation (RFC 5280 section 4.2.1.10).
//!
//! Constraint bases are copied out of their originating certificate into
//! an owned form as soon as they're folded into the accumulator, so the
//! accumulator's lifetime doesn't need to track any one certificate in the
//! path -- it just needs to outlive the walk, which a plain owned `Vec`
//! does for free.

use std::collections::HashSet;

use x509_trust_types::extensions::{GeneralSubtree, NameConstraints};
use x509_trust_types::name::{GeneralName, GeneralNameKind, Name};

use crate::error::{PathError, PathResult};

type OwnedRdn = Vec<(String, Vec<u8>)>;
type OwnedName = Vec<OwnedRdn>;

#[derive(Clone, Debug)]
enum OwnedGeneralName {
    OtherName(String, Vec<u8>),
    Rfc822Name(String),
    DNSName(String),
    DirectoryName(OwnedName),
    Unsupported(GeneralNameKind),
}

#[derive(Clone, Debug)]
struct OwnedSubtree {
    base: OwnedGeneralName,
}

fn owned_name(name: &Name<'_>) -> OwnedName {
    name.rdn_sequence
        .clone()
        .map(|rdn| {
            let mut attrs: Vec<(String, Vec<u8>)> = rdn
                .map(|atv| (atv.type_id.to_string(), atv.value.data().to_vec()))
                .collect();
            attrs.sort();
            attrs
        })
        .collect()
}

fn owned_general_name(name: &GeneralName<'_>) -> OwnedGeneralName {
    match name {
        GeneralName::OtherName(o) => OwnedGeneralName::OtherName(o.type_id.to_string(), o.value.data().to_vec()),
        GeneralName::Rfc822Name(s) => OwnedGeneralName::Rfc822Name(s.0.to_string()),
        GeneralName::DNSName(s) => OwnedGeneralName::DNSName(s.0.to_string()),
        GeneralName::DirectoryName(n) => OwnedGeneralName::DirectoryName(owned_name(n)),
        _ => OwnedGeneralName::Unsupported(name.kind()),
    }
}

fn owned_subtree(subtree: &GeneralSubtree<'_>) -> PathResult<OwnedSubtree> {
    if subtree.minimum != 0 && subtree.maximum.is_some() {
        return Err(PathError::RangeUnsupported);
    }
    Ok(OwnedSubtree {
        base: owned_general_name(&subtree.base),
    })
}

#[derive(Clone, Default)]
struct AccumulatorEntry {
    permitted: Vec<OwnedSubtree>,
    excluded: Vec<OwnedSubtree>,
}

/// The ordered list of `NameConstraints` extension values collected while
/// walking a path from its anchor toward its leaf.
#[derive(Clone, Default)]
pub struct NameConstraintsAccumulator {
    entries: Vec<AccumulatorEntry>,
}

impl NameConstraintsAccumulator {
    pub fn new() -> Self {
        NameConstraintsAccumulator::default()
    }

    /// Folds a CA's `NameConstraints` extension value into the
    /// accumulator. Order doesn't matter for evaluation, but the original
    /// API accumulates anchor-first, so this is append-only.
    pub fn fold(&mut self, constraints: &NameConstraints<'_>) -> PathResult<()> {
        let permitted = constraints
            .permitted_subtrees
            .clone()
            .map(|seq| seq.map(|s| owned_subtree(&s)).collect::<PathResult<Vec<_>>>())
            .transpose()?
            .unwrap_or_default();
        let excluded = constraints
            .excluded_subtrees
            .clone()
            .map(|seq| seq.map(|s| owned_subtree(&s)).collect::<PathResult<Vec<_>>>())
            .transpose()?
            .unwrap_or_default();
        self.entries.push(AccumulatorEntry { permitted, excluded });
        Ok(())
    }

    /// Checks a certificate's subject (treated as a synthetic
    /// `directoryName`) and its presented `subjectAltName` entries against
    /// every constraint folded so far.
    pub fn check<'a>(
        &self,
        subject: &Name<'a>,
        sans: impl Iterator<Item = GeneralName<'a>>,
    ) -> PathResult<()> {
        let mut presented: Vec<GeneralName<'a>> = Vec::new();
        if !subject.is_empty() {
            presented.push(GeneralName::DirectoryName(subject.clone()));
        }
        presented.extend(sans);

        for entry in &self.entries {
            check_permitted(&entry.permitted, &presented)?;
            check_excluded(&entry.excluded, &presented)?;
        }
        Ok(())
    }
}

fn check_permitted(permitted: &[OwnedSubtree], presented: &[GeneralName<'_>]) -> PathResult<()> {
    if permitted.is_empty() {
        return Ok(());
    }
    let kinds: HashSet<GeneralNameKind> = permitted.iter().map(|s| general_name_kind(&s.base)).collect();
    for kind in kinds {
        let presented_of_kind: Vec<&GeneralName<'_>> = presented.iter().filter(|p| p.kind() == kind).collect();
        if presented_of_kind.is_empty() {
            // No name of this type is presented; this constraint is inapplicable.
            continue;
        }
        let subtrees_of_kind: Vec<&OwnedSubtree> =
            permitted.iter().filter(|s| general_name_kind(&s.base) == kind).collect();
        let mut matched = false;
        for p in &presented_of_kind {
            for s in &subtrees_of_kind {
                if subtree_matches(&s.base, p)? {
                    matched = true;
                    break;
                }
            }
            if matched {
                break;
            }
        }
        if !matched {
            return Err(PathError::VerifyConstraints);
        }
    }
    Ok(())
}

fn check_excluded(excluded: &[OwnedSubtree], presented: &[GeneralName<'_>]) -> PathResult<()> {
    for p in presented {
        for s in excluded {
            if general_name_kind(&s.base) != p.kind() {
                continue;
            }
            if subtree_matches(&s.base, p)? {
                return Err(PathError::VerifyConstraints);
            }
        }
    }
    Ok(())
}

fn general_name_kind(n: &OwnedGeneralName) -> GeneralNameKind {
    match n {
        OwnedGeneralName::OtherName(..) => GeneralNameKind::OtherName,
        OwnedGeneralName::Rfc822Name(_) => GeneralNameKind::Rfc822Name,
        OwnedGeneralName::DNSName(_) => GeneralNameKind::DNSName,
        OwnedGeneralName::DirectoryName(_) => GeneralNameKind::DirectoryName,
        OwnedGeneralName::Unsupported(kind) => *kind,
    }
}

fn subtree_matches(base: &OwnedGeneralName, presented: &GeneralName<'_>) -> PathResult<bool> {
    match (base, presented) {
        (OwnedGeneralName::Rfc822Name(pattern), GeneralName::Rfc822Name(mailbox)) => {
            Ok(rfc822_matches(pattern, mailbox.0))
        }
        (OwnedGeneralName::DNSName(pattern), GeneralName::DNSName(name)) => {
            Ok(dns_suffix_matches(pattern, name.0))
        }
        (OwnedGeneralName::DirectoryName(pattern), GeneralName::DirectoryName(name)) => {
            Ok(directory_name_prefix_matches(pattern, &owned_name(name)))
        }
        (OwnedGeneralName::OtherName(type_id, value), GeneralName::OtherName(other)) => {
            Ok(*type_id == other.type_id.to_string() && value.as_slice() == other.value.data())
        }
        (OwnedGeneralName::Unsupported(_), _) => Err(PathError::NameConstraintError(
            "uri, iPAddress, and registeredID name constraints are not supported",
        )),
        // A constraint and a presented name of different CHOICE kinds never apply to each
        // other; callers only reach this function after matching kinds.
        _ => Ok(false),
    }
}

fn rfc822_matches(pattern: &str, mailbox: &str) -> bool {
    if pattern.contains('@') {
        return pattern.eq_ignore_ascii_case(mailbox);
    }
    let domain = match mailbox.rsplit_once('@') {
        Some((_, domain)) => domain,
        None => mailbox,
    };
    domain.eq_ignore_ascii_case(pattern)
        || domain.len() > pattern.len()
            && domain[..domain.len() - pattern.len()].ends_with('.')
            && domain[domain.len() - pattern.len()..].eq_ignore_ascii_case(pattern)
}

fn dns_suffix_matches(pattern: &str, presented: &str) -> bool {
    if pattern.len() > presented.len() {
        return false;
    }
    presented[presented.len() - pattern.len()..].eq_ignore_ascii_case(pattern)
}

fn directory_name_prefix_matches(pattern: &OwnedName, presented: &OwnedName) -> bool {
    if pattern.len() > presented.len() {
        return false;
    }
    pattern.iter().zip(presented.iter()).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dns_suffix_requires_no_dot_boundary() {
        // Preserves the reference implementation's permissive behaviour
        // (see the open question in the design notes): "evilexample.com"
        // is accepted as a suffix match against "example.com" even though
        // a stricter implementation would require a leading dot.
        assert!(dns_suffix_matches("example.com", "evilexample.com"));
        assert!(dns_suffix_matches("example.com", "api.example.com"));
        assert!(!dns_suffix_matches("example.com", "example.org"));
    }

    #[test]
    fn rfc822_domain_pattern_matches_subdomains_and_exact() {
        assert!(rfc822_matches("example.com", "user@example.com"));
        assert!(rfc822_matches("example.com", "user@mail.example.com"));
        assert!(!rfc822_matches("example.com", "user@notexample.com"));
    }

    #[test]
    fn rfc822_mailbox_pattern_requires_exact_match() {
        assert!(rfc822_matches("user@example.com", "User@Example.com"));
        assert!(!rfc822_matches("user@example.com", "other@example.com"));
    }

    #[test]
    fn directory_name_prefix() {
        let base = vec![vec![("2.5.4.6".to_string(), b"US".to_vec())]];
        let full = vec![
            vec![("2.5.4.6".to_string(), b"US".to_vec())],
            vec![("2.5.4.10".to_string(), b"Example".to_vec())],
        ];
        assert!(directory_name_prefix_matches(&base, &full));
        assert!(!directory_name_prefix_matches(&full, &base));
    }

    fn directory_name_pattern(cn: &str) -> Vec<u8> {
        use x509_trust_types::common::{AttributeTypeValue, RawTlv};
        use x509_trust_types::oid::COMMON_NAME_OID;

        let value_der = asn1::write_single(&asn1::PrintableString::new(cn).unwrap()).unwrap();
        let value_tlv = asn1::parse_single::<asn1::Tlv<'_>>(&value_der).unwrap();
        let atv = AttributeTypeValue {
            type_id: COMMON_NAME_OID,
            value: RawTlv::new(value_tlv.tag(), value_tlv.data()),
        };
        let rdn_der = asn1::write_single(&asn1::SetOfWriter::new([atv])).unwrap();
        let rdn_tlv = asn1::parse_single::<asn1::Tlv<'_>>(&rdn_der).unwrap();
        asn1::write_single(&asn1::SequenceOfWriter::new([rdn_tlv])).unwrap()
    }

    /// A permitted directoryName subtree must not reject a certificate
    /// whose subject is the empty name (RFC 5280 4.2.1.10 / spec's "match
    /// at least one subtree, or have null subject"): the Heimdal reference
    /// (`subject_null_p` in `match_tree`) exempts this case explicitly.
    #[test]
    fn null_subject_is_exempt_from_directory_name_constraint() {
        let pattern_der = directory_name_pattern("example.com");
        let pattern = asn1::parse_single::<Name<'_>>(&pattern_der).unwrap();
        let subtree = GeneralSubtree {
            base: GeneralName::DirectoryName(pattern),
            minimum: 0,
            maximum: None,
        };
        let subtrees_der = asn1::write_single(&asn1::SequenceOfWriter::new([subtree])).unwrap();
        let subtrees = asn1::parse_single(&subtrees_der).unwrap();
        let nc = NameConstraints {
            permitted_subtrees: Some(subtrees),
            excluded_subtrees: None,
        };

        let mut accumulator = NameConstraintsAccumulator::new();
        accumulator.fold(&nc).unwrap();

        let empty_name_der = [0x30u8, 0x00];
        let empty_name = asn1::parse_single::<Name<'_>>(&empty_name_der).unwrap();
        assert!(accumulator.check(&empty_name, std::iter::empty()).is_ok());
    }
}
