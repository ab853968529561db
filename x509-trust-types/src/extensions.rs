// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! The `Extensions` container and the handful of RFC 5280 extension
//! bodies the path validator actually interprets. Extensions are decoded
//! lazily: `Extensions::get_extension` hands back the raw `{oid, critical,
//! value}` triple, and callers decode the value into a concrete type only
//! when they need to -- an extension the validator doesn't recognize is
//! never more than an unparsed `Tlv`.

use crate::oid;

/// A single `Extension ::= SEQUENCE { extnID, critical DEFAULT FALSE,
/// extnValue OCTET STRING }`.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct RawExtension<'a> {
    pub extn_id: asn1::ObjectIdentifier,
    #[default(false)]
    pub critical: bool,
    pub extn_value: &'a [u8],
}

impl<'a> RawExtension<'a> {
    /// Decode this extension's value as `T`. Used by callers that already
    /// know which extension they asked for.
    pub fn value<T: asn1::Asn1Readable<'a>>(&self) -> asn1::ParseResult<T> {
        asn1::parse_single(self.extn_value)
    }
}

pub type RawExtensions<'a> = asn1::SequenceOf<'a, RawExtension<'a>>;

/// A decoded `Extensions ::= SEQUENCE SIZE (1..MAX) OF Extension`, indexed
/// by OID for repeated lookups during policy enforcement.
#[derive(Clone)]
pub struct Extensions<'a> {
    raw: Vec<RawExtension<'a>>,
}

impl<'a> Extensions<'a> {
    pub fn from_raw(raw: Option<RawExtensions<'a>>) -> Result<Self, asn1::ParseError> {
        Ok(Extensions {
            raw: raw.map(|seq| seq.collect()).unwrap_or_default(),
        })
    }

    pub fn get_extension(&self, oid: &asn1::ObjectIdentifier) -> Option<&RawExtension<'a>> {
        self.raw.iter().find(|e| &e.extn_id == oid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawExtension<'a>> {
        self.raw.iter()
    }
}

/// `KeyUsage ::= BIT STRING` (RFC 5280 section 4.2.1.3). Bit order follows
/// the extension's own numbering, not byte order, so each accessor reads
/// the named bit directly out of the underlying `asn1::BitString`.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct KeyUsage<'a>(asn1::BitString<'a>);

impl KeyUsage<'_> {
    fn bit(&self, n: u8) -> bool {
        self.0.has_bit_set(n.into())
    }

    pub fn digital_signature(&self) -> bool {
        self.bit(0)
    }
    pub fn non_repudiation(&self) -> bool {
        self.bit(1)
    }
    pub fn key_encipherment(&self) -> bool {
        self.bit(2)
    }
    pub fn data_encipherment(&self) -> bool {
        self.bit(3)
    }
    pub fn key_agreement(&self) -> bool {
        self.bit(4)
    }
    pub fn key_cert_sign(&self) -> bool {
        self.bit(5)
    }
    pub fn crl_sign(&self) -> bool {
        self.bit(6)
    }
}

/// `BasicConstraints ::= SEQUENCE { cA BOOLEAN DEFAULT FALSE, pathLenConstraint INTEGER OPTIONAL }`
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct BasicConstraints {
    #[default(false)]
    pub ca: bool,
    pub path_length: Option<u64>,
}

/// `SubjectAlternativeName ::= GeneralNames`
pub type SubjectAlternativeName<'a> = crate::name::GeneralNames<'a>;

/// `ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId`
pub type ExtendedKeyUsage<'a> = asn1::SequenceOf<'a, asn1::ObjectIdentifier>;

/// `AuthorityKeyIdentifier ::= SEQUENCE { keyIdentifier [0] IMPLICIT OCTET STRING OPTIONAL, ... }`
///
/// Only `keyIdentifier` is modeled: `authorityCertIssuer`/`authorityCertSerialNumber`
/// are a legacy alternate-linkage mechanism this crate never consults (see
/// the parent predicate in the path builder, which falls back to name
/// comparison when no key identifier is present).
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct AuthorityKeyIdentifier<'a> {
    #[implicit(0)]
    pub key_identifier: Option<&'a [u8]>,
    #[implicit(1)]
    pub authority_cert_issuer: Option<asn1::SequenceOf<'a, crate::name::GeneralName<'a>>>,
    #[implicit(2)]
    pub authority_cert_serial_number: Option<asn1::BigUint<'a>>,
}

/// `SubjectKeyIdentifier ::= OCTET STRING`
pub type SubjectKeyIdentifier<'a> = &'a [u8];

/// `GeneralSubtree ::= SEQUENCE { base GeneralName, minimum [0] INTEGER DEFAULT 0, maximum [1] INTEGER OPTIONAL }`
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct GeneralSubtree<'a> {
    pub base: crate::name::GeneralName<'a>,
    #[implicit(0)]
    #[default(0u64)]
    pub minimum: u64,
    #[implicit(1)]
    pub maximum: Option<u64>,
}

pub type GeneralSubtrees<'a> = asn1::SequenceOf<'a, GeneralSubtree<'a>>;

/// `NameConstraints ::= SEQUENCE { permittedSubtrees [0] GeneralSubtrees OPTIONAL, excludedSubtrees [1] GeneralSubtrees OPTIONAL }`
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct NameConstraints<'a> {
    #[implicit(0)]
    pub permitted_subtrees: Option<GeneralSubtrees<'a>>,
    #[implicit(1)]
    pub excluded_subtrees: Option<GeneralSubtrees<'a>>,
}

/// Whether the validator has a tagged-variant decoder for this extension's
/// OID. Used to enforce RFC 5280's "an unrecognized critical extension must
/// cause rejection of the certificate" rule.
pub fn is_known_extension(o: &asn1::ObjectIdentifier) -> bool {
    [
        &oid::SUBJECT_KEY_IDENTIFIER_OID,
        &oid::KEY_USAGE_OID,
        &oid::SUBJECT_ALTERNATIVE_NAME_OID,
        &oid::BASIC_CONSTRAINTS_OID,
        &oid::NAME_CONSTRAINTS_OID,
        &oid::EXTENDED_KEY_USAGE_OID,
        &oid::AUTHORITY_KEY_IDENTIFIER_OID,
        &oid::AUTHORITY_INFORMATION_ACCESS_OID,
        &oid::SUBJECT_DIRECTORY_ATTRIBUTES_OID,
        &oid::POLICY_CONSTRAINTS_OID,
        &oid::CRL_DISTRIBUTION_POINTS_OID,
    ]
    .into_iter()
    .any(|known| known == o)
}
