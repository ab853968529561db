// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! The decoded `Certificate ::= SEQUENCE { tbsCertificate, signatureAlgorithm,
//! signatureValue }` (RFC 5280 section 4.1) and its inner `TBSCertificate`.
//!
//! Decoding happens in two passes so that the exact bytes of the
//! `TBSCertificate` -- the thing the signature actually covers -- survive
//! untouched rather than being reconstructed by re-encoding the parsed
//! struct, which could disagree with the original if this crate's encoder
//! ever drifted from a CA's.

use crate::common::{AlgorithmIdentifier, SubjectPublicKeyInfo, Time};
use crate::extensions::{Extensions, RawExtensions};
use crate::name::Name;

#[derive(asn1::Asn1Read, asn1::Asn1Write)]
struct RawCertificate<'a> {
    tbs_cert: asn1::Tlv<'a>,
    signature_alg: AlgorithmIdentifier<'a>,
    signature_value: asn1::BitString<'a>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct Validity {
    pub not_before: Time,
    pub not_after: Time,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct TbsCertificate<'a> {
    #[explicit(0)]
    #[default(0u8)]
    pub version: u8,
    pub serial: asn1::BigUint<'a>,
    pub signature_alg: AlgorithmIdentifier<'a>,
    pub issuer: Name<'a>,
    pub validity: Validity,
    pub subject: Name<'a>,
    pub spki: SubjectPublicKeyInfo<'a>,
    #[implicit(1)]
    pub issuer_unique_id: Option<asn1::BitString<'a>>,
    #[implicit(2)]
    pub subject_unique_id: Option<asn1::BitString<'a>>,
    #[explicit(3)]
    pub raw_extensions: Option<RawExtensions<'a>>,
}

/// A decoded X.509 certificate. Everything the path validator needs --
/// extension bytes, the signature, and the exact TBS encoding -- is
/// available without re-parsing.
#[derive(Clone)]
pub struct Certificate<'a> {
    pub tbs_cert: TbsCertificate<'a>,
    pub signature_alg: AlgorithmIdentifier<'a>,
    pub signature_value: asn1::BitString<'a>,
    raw_tbs_cert: &'a [u8],
}

impl<'a> Certificate<'a> {
    pub fn from_der(data: &'a [u8]) -> asn1::ParseResult<Self> {
        let raw = asn1::parse_single::<RawCertificate<'a>>(data)?;
        let tbs_cert = asn1::parse_single::<TbsCertificate<'a>>(raw.tbs_cert.full_data())?;
        Ok(Certificate {
            tbs_cert,
            signature_alg: raw.signature_alg,
            signature_value: raw.signature_value,
            raw_tbs_cert: raw.tbs_cert.full_data(),
        })
    }

    /// The DER encoding of the `TBSCertificate`, byte-identical to what the
    /// issuer signed.
    pub fn raw_tbs_cert_bytes(&self) -> &'a [u8] {
        self.raw_tbs_cert
    }

    pub fn issuer(&self) -> &Name<'a> {
        &self.tbs_cert.issuer
    }

    pub fn subject(&self) -> &Name<'a> {
        &self.tbs_cert.subject
    }

    pub fn serial(&self) -> &asn1::BigUint<'a> {
        &self.tbs_cert.serial
    }

    /// `1` if no version extension is present, matching the DER default of
    /// v1 -- an encoding quirk callers must account for rather than an
    /// absent value meaning "unknown".
    pub fn version(&self) -> u8 {
        self.tbs_cert.version + 1
    }

    pub fn extensions(&self) -> Result<Extensions<'a>, asn1::ParseError> {
        // Extensions are only meaningful from v3 onward (RFC 5280 4.1.2.9);
        // a v1/v2 certificate's raw_extensions field is always None because
        // the ASN.1 grammar forbids it from being present.
        Extensions::from_raw(self.tbs_cert.raw_extensions.clone())
    }
}
