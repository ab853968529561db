// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! X.501 distinguished name comparison.
//!
//! `Name` is a `SEQUENCE OF SET OF AttributeTypeAndValue`; RFC 5280's name
//! matching rules treat the outer sequence positionally and each inner set
//! as an unordered collection of `{type, value}` pairs. Neither `asn1`'s
//! `SequenceOf` nor `SetOf` implements `PartialEq` (they're one-shot
//! parsers, not containers), so comparison collects each level into a
//! `Vec` first.

use x509_trust_types::name::{Name, RelativeDistinguishedName};

fn collect_rdn(rdn: RelativeDistinguishedName<'_>) -> Vec<x509_trust_types::common::AttributeTypeValue<'_>> {
    rdn.collect()
}

fn rdn_eq(a: RelativeDistinguishedName<'_>, b: RelativeDistinguishedName<'_>) -> bool {
    let mut a = collect_rdn(a);
    let mut b = collect_rdn(b);
    if a.len() != b.len() {
        return false;
    }
    // RDN equality is set-equality; sort so element order doesn't matter.
    a.sort_by(|x, y| x.type_id.cmp(&y.type_id).then_with(|| x.value.data().cmp(y.value.data())));
    b.sort_by(|x, y| x.type_id.cmp(&y.type_id).then_with(|| x.value.data().cmp(y.value.data())));
    a == b
}

/// Full X.501 name equality: same number of RDNs, each pairwise equal.
pub fn names_equal(a: &Name<'_>, b: &Name<'_>) -> bool {
    let a_rdns: Vec<_> = a.rdn_sequence.clone().collect();
    let b_rdns: Vec<_> = b.rdn_sequence.clone().collect();
    if a_rdns.len() != b_rdns.len() {
        return false;
    }
    a_rdns
        .into_iter()
        .zip(b_rdns)
        .all(|(x, y)| rdn_eq(x, y))
}

/// Is `prefix` a leading subsequence of `full`'s RDNs? Used by the
/// directoryName name-constraint match, which restricts a certificate's
/// subject to being "under" a constrained base name.
pub fn is_rdn_prefix(prefix: &Name<'_>, full: &Name<'_>) -> bool {
    let prefix_rdns: Vec<_> = prefix.rdn_sequence.clone().collect();
    let full_rdns: Vec<_> = full.rdn_sequence.clone().collect();
    if prefix_rdns.len() > full_rdns.len() {
        return false;
    }
    prefix_rdns
        .into_iter()
        .zip(full_rdns)
        .all(|(x, y)| rdn_eq(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use asn1::Asn1Readable;

    fn cn(value: &'static str) -> Vec<u8> {
        asn1::write_single(&asn1::PrintableString::new(value).unwrap()).unwrap()
    }

    fn name_with_cn(der_value: &[u8]) -> Vec<u8> {
        use x509_trust_types::common::{AttributeTypeValue, RawTlv};
        use x509_trust_types::oid::COMMON_NAME_OID;

        let tlv = asn1::parse_single::<asn1::Tlv<'_>>(der_value).unwrap();
        let atv = AttributeTypeValue {
            type_id: COMMON_NAME_OID,
            value: RawTlv::new(tlv.tag(), tlv.data()),
        };
        let rdn_bytes = asn1::write_single(&asn1::SetOfWriter::new([atv])).unwrap();
        let rdn_tlv = asn1::parse_single::<asn1::Tlv<'_>>(&rdn_bytes).unwrap();
        asn1::write_single(&asn1::SequenceOfWriter::new([rdn_tlv])).unwrap()
    }

    #[test]
    fn identical_names_are_equal() {
        let der = name_with_cn(&cn("example.com"));
        let a = asn1::parse_single::<Name<'_>>(&der).unwrap();
        let b = asn1::parse_single::<Name<'_>>(&der).unwrap();
        assert!(names_equal(&a, &b));
    }

    #[test]
    fn differing_names_are_not_equal() {
        let der_a = name_with_cn(&cn("example.com"));
        let der_b = name_with_cn(&cn("example.org"));
        let a = asn1::parse_single::<Name<'_>>(&der_a).unwrap();
        let b = asn1::parse_single::<Name<'_>>(&der_b).unwrap();
        assert!(!names_equal(&a, &b));
    }
}
