// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! Reference-counted certificate values.
//!
//! The original API exposes `cert_share`/`cert_free` and documents a fatal
//! abort if the refcount underflows -- a symptom of a use-after-free bug
//! elsewhere in the caller. `Arc` gives the same sharing semantics with a
//! stronger guarantee: the underflow this guards against is not just
//! checked, it's unrepresentable, since safe Rust has no way to drop a
//! value through a reference that doesn't own a share of it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::Arc;

use openssl::pkey::{PKey, Private};
use x509_trust_types::certificate::Certificate as DecodedCertificate;
use x509_trust_types::extensions::Extensions;
use x509_trust_types::name::Name;
use x509_trust_types::oid;

use crate::error::{PathError, PathResult};

struct CertInner {
    der: Vec<u8>,
    friendly_name: Mutex<Option<String>>,
    attributes: Mutex<HashMap<asn1::ObjectIdentifier, Vec<u8>>>,
    private_key: Option<PKey<Private>>,
}

/// A decoded certificate plus the mutable, identity-independent state the
/// original API hangs off it: a cached friendly name, an attribute bag,
/// and an optional private key handle.
#[derive(Clone)]
pub struct Cert(Arc<CertInner>);

impl Cert {
    /// `cert_from_decoded`: validates that `der` decodes, then takes
    /// ownership of a copy of it. Decoding happens again on every accessor
    /// call rather than being cached, since `asn1` parsing borrows from the
    /// input and this struct needs to be usable without pinning a lifetime
    /// to one particular `Cert`.
    pub fn from_decoded(der: &[u8]) -> PathResult<Self> {
        DecodedCertificate::from_der(der).map_err(|e| PathError::DecodeError(e.to_string()))?;
        Ok(Cert(Arc::new(CertInner {
            der: der.to_vec(),
            friendly_name: Mutex::new(None),
            attributes: Mutex::new(HashMap::new()),
            private_key: None,
        })))
    }

    pub fn with_private_key(der: &[u8], key: PKey<Private>) -> PathResult<Self> {
        DecodedCertificate::from_der(der).map_err(|e| PathError::DecodeError(e.to_string()))?;
        Ok(Cert(Arc::new(CertInner {
            der: der.to_vec(),
            friendly_name: Mutex::new(None),
            attributes: Mutex::new(HashMap::new()),
            private_key: Some(key),
        })))
    }

    pub fn decoded(&self) -> DecodedCertificate<'_> {
        DecodedCertificate::from_der(&self.0.der).expect("validated in from_decoded")
    }

    pub fn der(&self) -> &[u8] {
        &self.0.der
    }

    /// `cert_share`: a new `Cert` sharing the same underlying value.
    pub fn share(&self) -> Cert {
        self.clone()
    }

    pub fn subject(&self) -> Name<'_> {
        self.decoded().tbs_cert.subject.clone()
    }

    pub fn issuer(&self) -> Name<'_> {
        self.decoded().tbs_cert.issuer.clone()
    }

    pub fn serial(&self) -> asn1::BigUint<'_> {
        self.decoded().tbs_cert.serial.clone()
    }

    /// Returns `1` if the version extension is absent, per the DER default.
    pub fn version(&self) -> u8 {
        self.decoded().version()
    }

    pub fn extensions(&self) -> PathResult<Extensions<'_>> {
        self.decoded()
            .extensions()
            .map_err(|e| PathError::DecodeError(e.to_string()))
    }

    pub fn has_private_key(&self) -> bool {
        self.0.private_key.is_some()
    }

    pub fn private_key(&self) -> Option<&PKey<Private>> {
        self.0.private_key.as_ref()
    }

    pub fn set_friendly_name(&self, name: impl Into<String>) {
        *self.0.friendly_name.lock().unwrap() = Some(name.into());
    }

    /// Falls back to decoding the PKCS#9 `friendlyName` attribute (a
    /// `BMPString`) if no name was set explicitly. Codepoints above 0xFF
    /// are replaced with `'X'`; this is a lossy, but deterministic,
    /// projection down to single-byte characters.
    pub fn get_friendly_name(&self) -> Option<String> {
        if let Some(name) = self.0.friendly_name.lock().unwrap().clone() {
            return Some(name);
        }
        let attrs = self.0.attributes.lock().unwrap();
        let raw = attrs.get(&oid::PKCS9_FRIENDLY_NAME_OID)?;
        Some(decode_bmp_string_lossy(raw))
    }

    /// `set_attribute`: first-writer-wins, matching the original API's
    /// refusal to overwrite an attribute that's already present.
    pub fn set_attribute(&self, oid: asn1::ObjectIdentifier, value: Vec<u8>) {
        self.0.attributes.lock().unwrap().entry(oid).or_insert(value);
    }

    pub fn attribute(&self, oid: &asn1::ObjectIdentifier) -> Option<Vec<u8>> {
        self.0.attributes.lock().unwrap().get(oid).cloned()
    }

    /// `cert_check_eku`: does this certificate's Extended Key Usage
    /// extension permit `purpose`? A certificate with no EKU extension at
    /// all is unrestricted and always passes. `allow_any` additionally
    /// accepts the `anyExtendedKeyUsage` wildcard OID.
    pub fn check_eku(&self, purpose: &asn1::ObjectIdentifier, allow_any: bool) -> PathResult<bool> {
        let exts = self.extensions()?;
        let eku = match exts.get_extension(&oid::EXTENDED_KEY_USAGE_OID) {
            None => return Ok(true),
            Some(ext) => ext
                .value::<x509_trust_types::extensions::ExtendedKeyUsage<'_>>()
                .map_err(|e| PathError::DecodeError(e.to_string()))?,
        };
        for purpose_oid in eku {
            if &purpose_oid == purpose {
                return Ok(true);
            }
            if allow_any && purpose_oid == oid::ANY_EXTENDED_KEY_USAGE_OID {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// SHA-1 over the raw subject public key bit-string bytes (the key
    /// material itself, not the enclosing `SubjectPublicKeyInfo`), used by
    /// the `MatchKeyHashSHA1` query predicate.
    pub fn public_key_sha1(&self) -> PathResult<[u8; 20]> {
        let spki = &self.decoded().tbs_cert.spki;
        let key_bytes = spki.subject_public_key.as_bytes();
        let digest = openssl::hash::hash(openssl::hash::MessageDigest::sha1(), key_bytes)
            .map_err(|e| PathError::DecodeError(e.to_string()))?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest);
        Ok(out)
    }
}

impl PartialEq for Cert {
    /// `cmp`: structural equality over signature bits, signature
    /// algorithm, and raw TBS bytes only -- friendly names and attributes
    /// never participate.
    fn eq(&self, other: &Self) -> bool {
        let a = self.decoded();
        let b = other.decoded();
        a.signature_alg == b.signature_alg
            && a.signature_value.as_bytes() == b.signature_value.as_bytes()
            && a.raw_tbs_cert_bytes() == b.raw_tbs_cert_bytes()
    }
}
impl Eq for Cert {}

fn decode_bmp_string_lossy(bytes: &[u8]) -> String {
    bytes
        .chunks_exact(2)
        .map(|pair| {
            let code = u16::from_be_bytes([pair[0], pair[1]]);
            if code > 0xff {
                'X'
            } else {
                code as u8 as char
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmp_string_substitutes_wide_codepoints() {
        // "A" (0x0041), then a codepoint outside Latin-1, then "B" (0x0042).
        let bytes = [0x00, 0x41, 0x20, 0xAC, 0x00, 0x42];
        assert_eq!(decode_bmp_string_lossy(&bytes), "AXB");
    }

    #[test]
    fn bmp_string_keeps_latin1_range() {
        let bytes = [0x00, 0x41, 0x00, 0xE9];
        assert_eq!(decode_bmp_string_lossy(&bytes), "A\u{e9}");
    }
}
