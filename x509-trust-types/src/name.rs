// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the MIT License. See the LICENSE-APACHE and LICENSE-MIT files in
// the root of this repository for complete details.

//! X.501 distinguished names and the `GeneralName` CHOICE used throughout
//! Subject Alternative Name, Authority/Subject Key Identifier linkage, and
//! Name Constraints.

use crate::common::AttributeTypeValue;

/// `RelativeDistinguishedName ::= SET SIZE (1..MAX) OF AttributeTypeAndValue`
pub type RelativeDistinguishedName<'a> =
    asn1::SetOf<'a, AttributeTypeValue<'a>>;

/// `Name ::= CHOICE { rdnSequence RDNSequence }`. RFC 5280 defines only one
/// CHOICE alternative, so this models it directly as the sequence rather
/// than wrapping a single-variant enum.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct Name<'a> {
    pub rdn_sequence: asn1::SequenceOf<'a, RelativeDistinguishedName<'a>>,
}

impl<'a> Name<'a> {
    /// A name with zero RDNs: the encoding RFC 5280 4.1.2.6 permits for a
    /// subordinate CA's subject to be... no, actually for an end-entity
    /// subject when the full identity lives in subjectAltName instead.
    pub fn is_empty(&self) -> bool {
        self.rdn_sequence.clone().count() == 0
    }

    pub fn rdn_len(&self) -> usize {
        self.rdn_sequence.clone().count()
    }
}

/// `OtherName ::= SEQUENCE { type-id OBJECT IDENTIFIER, value [0] EXPLICIT ANY }`
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct OtherName<'a> {
    pub type_id: asn1::ObjectIdentifier,
    #[explicit(0, required)]
    pub value: asn1::Tlv<'a>,
}

/// An IA5String general name whose contents are accepted verbatim: RFC
/// 5280 permits internationalized names to already be A-label encoded, so
/// no additional normalization happens at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnvalidatedIA5String<'a>(pub &'a str);

impl<'a> asn1::SimpleAsn1Readable<'a> for UnvalidatedIA5String<'a> {
    const TAG: asn1::Tag = asn1::IA5String::TAG;
    fn parse_data(data: &'a [u8]) -> asn1::ParseResult<Self> {
        Ok(UnvalidatedIA5String(
            std::str::from_utf8(data)
                .map_err(|_| asn1::ParseError::new(asn1::ParseErrorKind::InvalidValue))?,
        ))
    }
}

impl<'a> asn1::SimpleAsn1Writable for UnvalidatedIA5String<'a> {
    const TAG: asn1::Tag = asn1::IA5String::TAG;
    fn write_data(&self, dest: &mut asn1::WriteBuf) -> asn1::WriteResult {
        dest.push_slice(self.0.as_bytes())
    }
}

/// `GeneralName ::= CHOICE` (RFC 5280 section 4.2.1.6). `x400Address` and
/// `ediPartyName` are omitted: nothing in this crate needs to represent
/// them, and the Name Constraints matcher treats any constraint of a type
/// it can't parse as encountered-but-unsupported (see `NameConstraintError`
/// in the matcher), not as a decode failure.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub enum GeneralName<'a> {
    #[implicit(0)]
    OtherName(OtherName<'a>),
    #[implicit(1)]
    Rfc822Name(UnvalidatedIA5String<'a>),
    #[implicit(2)]
    DNSName(UnvalidatedIA5String<'a>),
    #[implicit(4)]
    DirectoryName(Name<'a>),
    #[implicit(6)]
    UniformResourceIdentifier(UnvalidatedIA5String<'a>),
    #[implicit(7)]
    IPAddress(&'a [u8]),
    #[implicit(8)]
    RegisteredID(asn1::ObjectIdentifier),
}

impl<'a> GeneralName<'a> {
    /// A stable discriminant used to test "same CHOICE alternative" without
    /// comparing the carried value, mirroring RFC 5280 4.2.1.10's rule that
    /// a name constraint only restricts names of its own type.
    pub fn kind(&self) -> GeneralNameKind {
        match self {
            GeneralName::OtherName(_) => GeneralNameKind::OtherName,
            GeneralName::Rfc822Name(_) => GeneralNameKind::Rfc822Name,
            GeneralName::DNSName(_) => GeneralNameKind::DNSName,
            GeneralName::DirectoryName(_) => GeneralNameKind::DirectoryName,
            GeneralName::UniformResourceIdentifier(_) => {
                GeneralNameKind::UniformResourceIdentifier
            }
            GeneralName::IPAddress(_) => GeneralNameKind::IPAddress,
            GeneralName::RegisteredID(_) => GeneralNameKind::RegisteredID,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralNameKind {
    OtherName,
    Rfc822Name,
    DNSName,
    DirectoryName,
    UniformResourceIdentifier,
    IPAddress,
    RegisteredID,
}

/// `GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName`
pub type GeneralNames<'a> = asn1::SequenceOf<'a, GeneralName<'a>>;
