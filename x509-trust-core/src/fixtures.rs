// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! Hand-built DER certificate fixtures shared by the builder, validator,
//! and store test modules. A full certificate has enough required fields
//! that three files each hand-rolling the same `TBSCertificate` shape would
//! drift out of sync with each other, so it lives in one place instead.

#![cfg(test)]

use x509_trust_types::certificate::{TbsCertificate, Validity};
use x509_trust_types::common::{AlgorithmIdentifier, AlgorithmParameters, SubjectPublicKeyInfo, Time};
use x509_trust_types::extensions::RawExtensions;
use x509_trust_types::name::Name;
use x509_trust_types::oid;

use crate::cert::Cert;

pub(crate) fn der_len(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let be = (len as u64).to_be_bytes();
        let start = be.iter().position(|&b| b != 0).unwrap_or(be.len() - 1);
        let sig = &be[start..];
        out.push(0x80 | sig.len() as u8);
        out.extend_from_slice(sig);
    }
}

pub(crate) fn der_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    der_len(content.len(), &mut out);
    out.extend_from_slice(content);
    out
}

pub(crate) fn der_sequence(parts: &[Vec<u8>]) -> Vec<u8> {
    let content: Vec<u8> = parts.concat();
    der_tlv(0x30, &content)
}

/// `NameConstraints` DER carrying a single permitted `directoryName`
/// subtree rooted at the RDN `cn=<cn>`.
pub(crate) fn name_constraints_permitted_directory(cn: &str) -> Vec<u8> {
    use x509_trust_types::extensions::GeneralSubtree;
    use x509_trust_types::name::GeneralName;

    let pattern_der = rdn_name(cn);
    let pattern = asn1::parse_single::<Name<'_>>(&pattern_der).unwrap();
    let subtree = GeneralSubtree {
        base: GeneralName::DirectoryName(pattern),
        minimum: 0,
        maximum: None,
    };
    let subtree_der = asn1::write_single(&subtree).unwrap();
    let permitted = der_tlv(0xa0, &subtree_der);
    der_sequence(&[permitted])
}

/// Minimal-form DER `INTEGER` for a non-negative value.
pub(crate) fn der_integer(n: u64) -> Vec<u8> {
    let be = n.to_be_bytes();
    let mut start = be.iter().position(|&b| b != 0).unwrap_or(be.len() - 1);
    if start == be.len() {
        start = be.len() - 1;
    }
    let mut content = be[start..].to_vec();
    if content[0] & 0x80 != 0 {
        content.insert(0, 0);
    }
    der_tlv(0x02, &content)
}

/// A `Name` with a single `commonName` RDN.
pub(crate) fn rdn_name(cn: &str) -> Vec<u8> {
    use x509_trust_types::common::{AttributeTypeValue, RawTlv};

    let value_der = asn1::write_single(&asn1::PrintableString::new(cn).unwrap()).unwrap();
    let value_tlv = asn1::parse_single::<asn1::Tlv<'_>>(&value_der).unwrap();
    let atv = AttributeTypeValue {
        type_id: oid::COMMON_NAME_OID,
        value: RawTlv::new(value_tlv.tag(), value_tlv.data()),
    };
    let rdn_der = asn1::write_single(&asn1::SetOfWriter::new([atv])).unwrap();
    let rdn_tlv = asn1::parse_single::<asn1::Tlv<'_>>(&rdn_der).unwrap();
    asn1::write_single(&asn1::SequenceOfWriter::new([rdn_tlv])).unwrap()
}

pub(crate) fn empty_name() -> Vec<u8> {
    vec![0x30, 0x00]
}

/// The DER `BIT STRING` for a KeyUsage extension's value, given the RFC
/// 5280 4.2.1.3 bit numbers that should be set.
pub(crate) fn key_usage_value(bits: &[u8]) -> Vec<u8> {
    let mut byte = 0u8;
    for &b in bits {
        byte |= 1 << (7 - b);
    }
    der_tlv(0x03, &[0x00, byte])
}

pub(crate) fn basic_constraints_value(ca: bool, path_length: Option<u64>) -> Vec<u8> {
    let mut parts = Vec::new();
    if ca {
        parts.push(der_tlv(0x01, &[0xff]));
    }
    if let Some(n) = path_length {
        parts.push(der_integer(n));
    }
    der_sequence(&parts)
}

/// `AuthorityKeyIdentifier` carrying only `keyIdentifier`.
pub(crate) fn aki_value(key_id: &[u8]) -> Vec<u8> {
    der_sequence(&[der_tlv(0x80, key_id)])
}

/// `SubjectKeyIdentifier ::= OCTET STRING`.
pub(crate) fn ski_value(key_id: &[u8]) -> Vec<u8> {
    der_tlv(0x04, key_id)
}

/// One extension to attach: `(oid, critical, DER-encoded value)`.
pub(crate) type ExtSpec = (asn1::ObjectIdentifier, bool, Vec<u8>);

pub(crate) struct CertSpec<'x> {
    pub subject_cn: Option<&'x str>,
    pub issuer_cn: Option<&'x str>,
    pub serial: u64,
    pub not_before: &'x str,
    pub not_after: &'x str,
    pub key_usage_bits: &'x [u8],
    pub is_ca: bool,
    pub path_length: Option<u64>,
    pub ski: Option<&'x [u8]>,
    pub aki: Option<&'x [u8]>,
    pub extra_extensions: Vec<ExtSpec>,
}

impl<'x> Default for CertSpec<'x> {
    fn default() -> Self {
        CertSpec {
            subject_cn: Some("leaf"),
            issuer_cn: Some("leaf"),
            serial: 1,
            not_before: "240101000000Z",
            not_after: "300101000000Z",
            key_usage_bits: &[0],
            is_ca: false,
            path_length: None,
            ski: None,
            aki: None,
            extra_extensions: Vec::new(),
        }
    }
}

/// Builds a v3 certificate from `spec`, hand-encoding the DER directly
/// rather than depending on a signing key: the crypto layer is tested
/// separately, so these fixtures only need to decode correctly.
pub(crate) fn build_cert(spec: &CertSpec<'_>) -> Cert {
    let subject_der = match spec.subject_cn {
        Some(cn) => rdn_name(cn),
        None => empty_name(),
    };
    let issuer_der = match spec.issuer_cn {
        Some(cn) => rdn_name(cn),
        None => empty_name(),
    };
    let serial_der = der_integer(spec.serial);
    let nb_der = der_tlv(0x17, spec.not_before.as_bytes());
    let na_der = der_tlv(0x17, spec.not_after.as_bytes());
    let spki_key_der = der_tlv(0x03, &[0x00, 0xab]);

    let subject = asn1::parse_single::<Name<'_>>(&subject_der).unwrap();
    let issuer = asn1::parse_single::<Name<'_>>(&issuer_der).unwrap();
    let serial = asn1::parse_single::<asn1::BigUint<'_>>(&serial_der).unwrap();
    let not_before = asn1::parse_single::<Time>(&nb_der).unwrap();
    let not_after = asn1::parse_single::<Time>(&na_der).unwrap();
    let spki_key = asn1::parse_single::<asn1::BitString<'_>>(&spki_key_der).unwrap();

    let mut exts: Vec<ExtSpec> = vec![(oid::KEY_USAGE_OID, true, key_usage_value(spec.key_usage_bits))];
    if spec.is_ca || spec.path_length.is_some() {
        exts.push((
            oid::BASIC_CONSTRAINTS_OID,
            true,
            basic_constraints_value(spec.is_ca, spec.path_length),
        ));
    }
    if let Some(ski) = spec.ski {
        exts.push((oid::SUBJECT_KEY_IDENTIFIER_OID, false, ski_value(ski)));
    }
    if let Some(aki) = spec.aki {
        exts.push((oid::AUTHORITY_KEY_IDENTIFIER_OID, false, aki_value(aki)));
    }
    exts.extend(spec.extra_extensions.iter().cloned());

    let ext_ders: Vec<Vec<u8>> = exts
        .iter()
        .map(|(oid, critical, value)| {
            let mut parts = vec![asn1::write_single(oid).unwrap()];
            if *critical {
                parts.push(der_tlv(0x01, &[0xff]));
            }
            parts.push(der_tlv(0x04, value));
            der_sequence(&parts)
        })
        .collect();
    let extensions_der = der_sequence(&ext_ders);
    let raw_extensions = Some(asn1::parse_single::<RawExtensions<'_>>(&extensions_der).unwrap());

    let spki = SubjectPublicKeyInfo {
        algorithm: AlgorithmIdentifier {
            oid: asn1::DefinedByMarker::marker(),
            params: AlgorithmParameters::Rsa(Some(())),
        },
        subject_public_key: spki_key,
    };

    let tbs = TbsCertificate {
        version: 2u8,
        serial,
        signature_alg: AlgorithmIdentifier {
            oid: asn1::DefinedByMarker::marker(),
            params: AlgorithmParameters::RsaWithSha256(Some(())),
        },
        issuer,
        validity: Validity { not_before, not_after },
        subject,
        spki,
        issuer_unique_id: None,
        subject_unique_id: None,
        raw_extensions,
    };
    let tbs_der = asn1::write_single(&tbs).unwrap();

    let sig_alg_der = asn1::write_single(&AlgorithmIdentifier {
        oid: asn1::DefinedByMarker::marker(),
        params: AlgorithmParameters::RsaWithSha256(Some(())),
    })
    .unwrap();
    let sig_value_der = der_tlv(0x03, &[0x00, 0xcd, 0xef]);

    let cert_der = der_sequence(&[tbs_der, sig_alg_der, sig_value_der]);
    Cert::from_decoded(&cert_der).unwrap()
}

/// A `DateTime` parsed out of a throwaway `UTCTime`, for use as `time_now`.
pub(crate) fn datetime(s: &str) -> asn1::DateTime {
    let der = der_tlv(0x17, s.as_bytes());
    let time = asn1::parse_single::<Time>(&der).unwrap();
    time.as_datetime().clone()
}
