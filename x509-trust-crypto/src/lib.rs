// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

#![forbid(unsafe_code)]

//! Low-level signature verification, kept out of the path validation core
//! behind the [`CryptoOps`] trait so that the validator never has to know
//! which cryptography library backs it.
//!
//! This crate provides the one implementation the rest of the workspace
//! actually uses: OpenSSL, via the `openssl` crate, matching the approach
//! the rest of this code family takes for signature and key operations
//! rather than hand-rolling primitives.

use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Public};
use openssl::rsa::Padding;
use openssl::sign::{RsaPssSaltlen, Verifier};
use thiserror::Error;
use x509_trust_types::certificate::Certificate;
use x509_trust_types::common::AlgorithmParameters;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed subject public key info: {0}")]
    MalformedKey(String),
    #[error("unsupported signature algorithm")]
    UnsupportedAlgorithm,
    #[error("signature verification failed")]
    BadSignature,
}

/// The signature-verification capability the path validator depends on.
/// `Key` is opaque to the validator; it only ever passes one back to
/// [`CryptoOps::verify_signed_by`].
pub trait CryptoOps {
    type Key;

    /// Extract the subject's public key from its `SubjectPublicKeyInfo`.
    fn public_key(&self, cert: &Certificate<'_>) -> Result<Self::Key, CryptoError>;

    /// Verify that `cert`'s signature was produced by `key` over `cert`'s
    /// own raw TBSCertificate bytes.
    fn verify_signed_by(&self, cert: &Certificate<'_>, key: Self::Key) -> Result<(), CryptoError>;
}

/// The default, OpenSSL-backed [`CryptoOps`] implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenSslCryptoOps;

impl CryptoOps for OpenSslCryptoOps {
    type Key = PKey<Public>;

    fn public_key(&self, cert: &Certificate<'_>) -> Result<Self::Key, CryptoError> {
        let spki_der = asn1::write_single(&cert.tbs_cert.spki)
            .map_err(|e| CryptoError::MalformedKey(e.to_string()))?;
        PKey::public_key_from_der(&spki_der)
            .map_err(|e| CryptoError::MalformedKey(e.to_string()))
    }

    fn verify_signed_by(&self, cert: &Certificate<'_>, key: Self::Key) -> Result<(), CryptoError> {
        let (digest, padding) = digest_and_padding(&cert.signature_alg.params)?;
        let tbs = cert.raw_tbs_cert_bytes();
        let sig = cert.signature_value.as_bytes();

        let mut verifier =
            Verifier::new(digest, &key).map_err(|_| CryptoError::UnsupportedAlgorithm)?;
        if let Some(padding) = padding {
            verifier
                .set_rsa_padding(padding)
                .map_err(|_| CryptoError::UnsupportedAlgorithm)?;
            if padding == Padding::PKCS1_PSS {
                verifier
                    .set_rsa_pss_saltlen(RsaPssSaltlen::DIGEST_LENGTH)
                    .map_err(|_| CryptoError::UnsupportedAlgorithm)?;
            }
        }
        verifier
            .update(tbs)
            .map_err(|_| CryptoError::UnsupportedAlgorithm)?;
        match verifier.verify(sig) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CryptoError::BadSignature),
            Err(_) => Err(CryptoError::BadSignature),
        }
    }
}

fn digest_and_padding(
    params: &AlgorithmParameters<'_>,
) -> Result<(MessageDigest, Option<Padding>), CryptoError> {
    use AlgorithmParameters::*;
    Ok(match params {
        RsaWithSha1(_) => (MessageDigest::sha1(), Some(Padding::PKCS1)),
        RsaWithSha224(_) => (MessageDigest::sha224(), Some(Padding::PKCS1)),
        RsaWithSha256(_) => (MessageDigest::sha256(), Some(Padding::PKCS1)),
        RsaWithSha384(_) => (MessageDigest::sha384(), Some(Padding::PKCS1)),
        RsaWithSha512(_) => (MessageDigest::sha512(), Some(Padding::PKCS1)),
        RsaPss(Some(pss)) => (digest_of(&pss.hash_algorithm.params)?, Some(Padding::PKCS1_PSS)),
        EcDsaWithSha224(_) => (MessageDigest::sha224(), None),
        EcDsaWithSha256(_) => (MessageDigest::sha256(), None),
        EcDsaWithSha384(_) => (MessageDigest::sha384(), None),
        EcDsaWithSha512(_) => (MessageDigest::sha512(), None),
        _ => return Err(CryptoError::UnsupportedAlgorithm),
    })
}

fn digest_of(params: &AlgorithmParameters<'_>) -> Result<MessageDigest, CryptoError> {
    use AlgorithmParameters::*;
    Ok(match params {
        Sha1(_) => MessageDigest::sha1(),
        Sha224(_) => MessageDigest::sha224(),
        Sha256(_) => MessageDigest::sha256(),
        Sha384(_) => MessageDigest::sha384(),
        Sha512(_) => MessageDigest::sha512(),
        _ => return Err(CryptoError::UnsupportedAlgorithm),
    })
}
