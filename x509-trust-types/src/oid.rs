// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! Object identifiers used throughout certificate decoding and path
//! validation. Kept in one place so that extension and algorithm matching
//! elsewhere in the crate can refer to a named constant instead of a raw
//! dotted string.

use asn1::ObjectIdentifier;

// Hash algorithms
pub const SHA1_OID: ObjectIdentifier = asn1::oid!(1, 3, 14, 3, 2, 26);
pub const SHA224_OID: ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 101, 3, 4, 2, 4);
pub const SHA256_OID: ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 101, 3, 4, 2, 1);
pub const SHA384_OID: ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 101, 3, 4, 2, 2);
pub const SHA512_OID: ObjectIdentifier = asn1::oid!(2, 16, 840, 1, 101, 3, 4, 2, 3);

// RSA signature algorithms
pub const RSA_WITH_SHA1_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 5);
pub const RSA_WITH_SHA224_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 14);
pub const RSA_WITH_SHA256_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 11);
pub const RSA_WITH_SHA384_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 12);
pub const RSA_WITH_SHA512_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 13);
pub const RSA_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 1);
pub const RSASSA_PSS_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 10);
pub const MGF1_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 1, 8);

// ECDSA signature algorithms
pub const ECDSA_WITH_SHA224_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 10045, 4, 3, 1);
pub const ECDSA_WITH_SHA256_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 10045, 4, 3, 2);
pub const ECDSA_WITH_SHA384_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 10045, 4, 3, 3);
pub const ECDSA_WITH_SHA512_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 10045, 4, 3, 4);
pub const EC_PUBLIC_KEY_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 10045, 2, 1);
pub const EC_SECP256R1: ObjectIdentifier = asn1::oid!(1, 2, 840, 10045, 3, 1, 7);
pub const EC_SECP384R1: ObjectIdentifier = asn1::oid!(1, 3, 132, 0, 34);
pub const EC_SECP521R1: ObjectIdentifier = asn1::oid!(1, 3, 132, 0, 35);

pub const ED25519_OID: ObjectIdentifier = asn1::oid!(1, 3, 101, 112);
pub const ED448_OID: ObjectIdentifier = asn1::oid!(1, 3, 101, 113);

// X.509 extensions (RFC 5280 section 4.2)
pub const SUBJECT_KEY_IDENTIFIER_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 14);
pub const KEY_USAGE_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 15);
pub const SUBJECT_ALTERNATIVE_NAME_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 17);
pub const BASIC_CONSTRAINTS_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 19);
pub const NAME_CONSTRAINTS_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 30);
pub const POLICY_CONSTRAINTS_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 36);
pub const EXTENDED_KEY_USAGE_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 37);
pub const AUTHORITY_KEY_IDENTIFIER_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 35);
pub const SUBJECT_DIRECTORY_ATTRIBUTES_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 9);
pub const AUTHORITY_INFORMATION_ACCESS_OID: ObjectIdentifier =
    asn1::oid!(1, 3, 6, 1, 5, 5, 7, 1, 1);
pub const CRL_DISTRIBUTION_POINTS_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 31);

// Extended key usages (RFC 5280 section 4.2.1.12)
pub const ANY_EXTENDED_KEY_USAGE_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 37, 0);
pub const EKU_SERVER_AUTH_OID: ObjectIdentifier = asn1::oid!(1, 3, 6, 1, 5, 5, 7, 3, 1);
pub const EKU_CLIENT_AUTH_OID: ObjectIdentifier = asn1::oid!(1, 3, 6, 1, 5, 5, 7, 3, 2);
pub const EKU_CODE_SIGNING_OID: ObjectIdentifier = asn1::oid!(1, 3, 6, 1, 5, 5, 7, 3, 3);
pub const EKU_OCSP_SIGNING_OID: ObjectIdentifier = asn1::oid!(1, 3, 6, 1, 5, 5, 7, 3, 9);
pub const EKU_ANY_OID: ObjectIdentifier = asn1::oid!(2, 5, 29, 37, 0);

// PKCS#9 attributes carried in a PKCS#12 bag (friendly name, local key id)
pub const PKCS9_FRIENDLY_NAME_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 9, 20);
pub const PKCS9_LOCAL_KEY_ID_OID: ObjectIdentifier = asn1::oid!(1, 2, 840, 113549, 1, 9, 21);

// Distinguished name attribute types (RFC 4519), used when comparing
// directoryName general names component by component.
pub const COMMON_NAME_OID: ObjectIdentifier = asn1::oid!(2, 5, 4, 3);
pub const COUNTRY_NAME_OID: ObjectIdentifier = asn1::oid!(2, 5, 4, 6);
pub const ORGANIZATION_NAME_OID: ObjectIdentifier = asn1::oid!(2, 5, 4, 10);
pub const ORGANIZATIONAL_UNIT_NAME_OID: ObjectIdentifier = asn1::oid!(2, 5, 4, 11);
