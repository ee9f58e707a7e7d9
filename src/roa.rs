//! Route Origin Authorizations.
//!
//! For details, see RFC 6482. Address ranges in place of prefixes follow
//! the `IPAddressOrRange` choice of RFC 3779.

use std::fmt;
use std::io;
use bcder::{decode, encode};
use bcder::{BitString, Mode, OctetString, Tag};
use bcder::decode::DecodeError;
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use crate::oid;
use crate::cert::Cert;
use crate::error::RoaError;
use crate::prefix::{AddressFamily, EncodedAddr};
use crate::sigobj::{SignedObject, SignerInfo};
use crate::util::der;


//------------ RoaObject -----------------------------------------------------

/// A ROA in the form of a signed object.
///
/// A value is either decoded from its DER encoding or assembled from a
/// configuration by the builder. Until it is signed, it has no signer info.
#[derive(Clone, Debug)]
pub struct RoaObject {
    signed: SignedObject,
    content: RouteOriginAttestation,
}

impl RoaObject {
    /// The only version of the signed object supported.
    pub const VERSION: u8 = 3;

    /// Creates a new, empty object of the supported version.
    pub fn new() -> Self {
        RoaObject {
            signed: SignedObject::new(Self::VERSION),
            content: RouteOriginAttestation::default(),
        }
    }

    /// Returns the version of the signed object.
    pub fn version(&self) -> u8 {
        self.signed.version()
    }

    pub fn set_version(&mut self, version: u8) {
        self.signed.set_version(version)
    }

    /// Returns the attestation, i.e., the content of the object.
    pub fn attestation(&self) -> &RouteOriginAttestation {
        &self.content
    }

    /// Returns a mutable reference to the attestation.
    ///
    /// Changing the attestation invalidates any signature.
    pub fn attestation_mut(&mut self) -> &mut RouteOriginAttestation {
        &mut self.content
    }

    /// Returns the EE certificate if the object carries one.
    pub fn cert(&self) -> Option<&Cert> {
        self.signed.cert()
    }

    pub fn set_cert(&mut self, cert: Cert) {
        self.signed.set_cert(cert)
    }

    /// Returns the signer info if the object has been signed.
    pub fn signer_info(&self) -> Option<&SignerInfo> {
        self.signed.signer_info()
    }

    pub fn set_signer_info(&mut self, signer_info: SignerInfo) {
        self.signed.set_signer_info(signer_info)
    }

    /// Returns whether the object has been signed.
    pub fn is_signed(&self) -> bool {
        self.signed.signer_info().is_some()
    }
}

/// # Decoding and Encoding
///
impl RoaObject {
    /// Decodes an object that spans exactly all of `data`.
    ///
    /// If the outermost value does not end exactly at the end of `data`,
    /// the error reports the offset where it diverged. Errors inside the
    /// value have an offset of zero and carry the position reported by the
    /// decoder in their reason.
    pub fn decode_exact(data: &[u8]) -> Result<Self, RoaError> {
        der::check_exact(data)?;
        Self::decode(Bytes::copy_from_slice(data)).map_err(|err| {
            RoaError::encoding(0, err.to_string())
        })
    }

    /// Decodes an object from the given source.
    pub fn decode<S: decode::IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as decode::Source>::Error>> {
        let (signed, content) = Mode::Der.decode(source, |cons| {
            SignedObject::take_from(cons, &oid::ROUTE_ORIGIN_AUTHZ)
        })?;
        let content = Mode::Der.decode(
            content, RouteOriginAttestation::take_from
        ).map_err(DecodeError::convert)?;
        Ok(RoaObject { signed, content })
    }

    /// Returns a value encoder for a reference to the object.
    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        self.signed.encode_ref(
            &oid::ROUTE_ORIGIN_AUTHZ, self.content.to_der()
        )
    }

    /// Returns the length of the DER encoding.
    pub fn encoded_len(&self) -> usize {
        self.encode_ref().encoded_len(Mode::Der)
    }

    /// Returns the DER encoding of the object.
    pub fn to_der(&self) -> Result<Bytes, RoaError> {
        let mut res = Vec::new();
        res.try_reserve(self.encoded_len()).map_err(|_| {
            RoaError::OutOfMemory
        })?;
        self.write_der(&mut res)?;
        Ok(res.into())
    }

    /// Writes the DER encoding of the object to `target`.
    pub fn write_der<W: io::Write>(
        &self, target: &mut W
    ) -> Result<(), RoaError> {
        self.encode_ref().write_encoded(Mode::Der, target)?;
        Ok(())
    }
}

impl Default for RoaObject {
    fn default() -> Self {
        Self::new()
    }
}


//--- Deserialize and Serialize

#[cfg(feature = "serde")]
impl serde::Serialize for RoaObject {
    fn serialize<S: serde::Serializer>(
        &self, serializer: S
    ) -> Result<S::Ok, S::Error> {
        let bytes = self.to_der().map_err(serde::ser::Error::custom)?;
        let b64 = crate::util::base64::Serde.encode(&bytes);
        serde::Serialize::serialize(&b64, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RoaObject {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D
    ) -> Result<Self, D::Error> {
        use serde::de;

        let string = <String as serde::Deserialize>::deserialize(
            deserializer
        )?;
        let decoded = crate::util::base64::Serde.decode(
            &string
        ).map_err(de::Error::custom)?;
        RoaObject::decode_exact(&decoded).map_err(de::Error::custom)
    }
}


//------------ RouteOriginAttestation ----------------------------------------

/// The content of a ROA.
///
/// ```txt
/// RouteOriginAttestation ::= SEQUENCE {
///    version [0] INTEGER DEFAULT 0,
///    asID  ASID,
///    ipAddrBlocks SEQUENCE (SIZE(1..MAX)) OF ROAIPAddressFamily }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteOriginAttestation {
    as_id: u32,
    families: Vec<RoaIpAddressFamily>,
}

impl RouteOriginAttestation {
    pub fn as_id(&self) -> u32 {
        self.as_id
    }

    pub fn set_as_id(&mut self, as_id: u32) {
        self.as_id = as_id
    }

    /// Returns the address family blocks in order.
    pub fn families(&self) -> &[RoaIpAddressFamily] {
        &self.families
    }

    /// Returns the block for the given family if present.
    pub fn family(
        &self, family: AddressFamily
    ) -> Option<&RoaIpAddressFamily> {
        self.families.iter().find(|block| block.family == family)
    }

    /// Returns a mutable reference to the last block.
    pub fn last_family_mut(&mut self) -> Option<&mut RoaIpAddressFamily> {
        self.families.last_mut()
    }

    /// Appends a new, empty block for `family`.
    ///
    /// Fails if there already is a block for the family.
    pub fn push_family(
        &mut self, family: AddressFamily
    ) -> Result<&mut RoaIpAddressFamily, RoaError> {
        if self.family(family).is_some() {
            return Err(RoaError::InvalidArgument("address family repeated"))
        }
        self.families.try_reserve(1).map_err(|_| RoaError::OutOfMemory)?;
        self.families.push(RoaIpAddressFamily::new(family));
        let len = self.families.len();
        Ok(&mut self.families[len - 1])
    }

    /// Returns an iterator over all entries together with their family.
    pub fn iter(
        &self
    ) -> impl Iterator<Item = (AddressFamily, &AddressEntry)> + '_ {
        self.families.iter().flat_map(|block| {
            block.entries.iter().map(move |entry| (block.family, entry))
        })
    }

    fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            // version [0] EXPLICIT INTEGER DEFAULT 0
            cons.take_opt_constructed_if(Tag::CTX_0, |c| c.skip_u8_if(0))?;
            let as_id = cons.take_u32()?;
            let mut families: Vec<RoaIpAddressFamily> = Vec::new();
            cons.take_sequence(|cons| {
                while let Some(block) = RoaIpAddressFamily::take_opt_from(
                    cons
                )? {
                    if families.iter().any(|b| b.family == block.family) {
                        return Err(cons.content_err(
                            "repeated address family in ROA prefixes"
                        ))
                    }
                    families.push(block);
                }
                Ok(())
            })?;
            Ok(RouteOriginAttestation { as_id, families })
        })
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence((
            // version is DEFAULT
            self.as_id.encode(),
            encode::sequence(
                encode::iter(
                    self.families.iter().map(|block| block.encode_ref())
                )
            )
        ))
    }

    /// Returns the DER encoding of the attestation.
    ///
    /// This is the encapsulated content of the signed object.
    pub fn to_der(&self) -> Bytes {
        self.encode_ref().to_captured(Mode::Der).into_bytes()
    }
}


//------------ RoaIpAddressFamily --------------------------------------------

/// The addresses of one family.
///
/// ```txt
/// ROAIPAddressFamily ::= SEQUENCE {
///    addressFamily OCTET STRING (SIZE (2..3)),
///    addresses SEQUENCE (SIZE (1..MAX)) OF ROAIPAddress }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoaIpAddressFamily {
    family: AddressFamily,
    entries: Vec<AddressEntry>,
}

impl RoaIpAddressFamily {
    pub fn new(family: AddressFamily) -> Self {
        RoaIpAddressFamily { family, entries: Vec::new() }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn entries(&self) -> &[AddressEntry] {
        &self.entries
    }

    /// Appends an entry.
    ///
    /// Fails if an address of the entry belongs to a different family.
    pub fn push(&mut self, entry: AddressEntry) -> Result<(), RoaError> {
        if entry.family() != self.family {
            return Err(RoaError::InvalidArgument("address family mismatch"))
        }
        self.entries.try_reserve(1).map_err(|_| RoaError::OutOfMemory)?;
        self.entries.push(entry);
        Ok(())
    }

    fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let afi = OctetString::take_from(cons)?.into_bytes();
            let family = match AddressFamily::from_afi(afi.as_ref()) {
                Some(family) => family,
                None => {
                    return Err(cons.content_err("invalid address family"))
                }
            };
            let mut entries = Vec::new();
            cons.take_sequence(|cons| {
                while let Some(entry) = AddressEntry::take_opt_from(
                    cons, family
                )? {
                    entries.push(entry)
                }
                Ok(())
            })?;
            Ok(RoaIpAddressFamily { family, entries })
        })
    }

    fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence((
            OctetString::encode_slice(self.family.afi()),
            encode::sequence(
                encode::iter(
                    self.entries.iter().map(|entry| entry.encode_ref())
                )
            )
        ))
    }
}


//------------ AddressEntry --------------------------------------------------

/// A single entry of an address family block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddressEntry {
    /// A prefix with an optional maximum length.
    Prefix(RoaPrefix),

    /// A range of addresses.
    Range(AddressRange),
}

impl AddressEntry {
    pub fn family(&self) -> AddressFamily {
        match *self {
            AddressEntry::Prefix(ref prefix) => prefix.addr.family(),
            AddressEntry::Range(ref range) => range.min.family(),
        }
    }

    /// Takes an optional entry.
    ///
    /// Both kinds of entries are sequences starting with a bit string. A
    /// second bit string makes it a range.
    fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        family: AddressFamily,
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let first = BitString::take_from(cons)?;
            let first = EncodedAddr::from_bit_string(family, &first)
                .map_err(|err| cons.content_err(err))?;
            let second = cons.take_opt_value_if(
                Tag::BIT_STRING, BitString::from_content
            )?;
            if let Some(second) = second {
                let max = EncodedAddr::from_bit_string(family, &second)
                    .map_err(|err| cons.content_err(err))?;
                return Ok(AddressEntry::Range(AddressRange::new(first, max)))
            }
            let max_length = cons.take_opt_u8()?;
            if let Some(max_length) = max_length {
                if
                    max_length > family.addr_bits()
                    || max_length < first.bit_len()
                {
                    return Err(cons.content_err(
                        "max length out of range in ROA prefix"
                    ))
                }
            }
            Ok(AddressEntry::Prefix(RoaPrefix::new(first, max_length)))
        })
    }

    fn encode_ref(&self) -> impl encode::Values + '_ {
        match *self {
            AddressEntry::Prefix(ref prefix) => {
                encode::Choice2::One(prefix.encode_ref())
            }
            AddressEntry::Range(ref range) => {
                encode::Choice2::Two(range.encode_ref())
            }
        }
    }
}

impl From<RoaPrefix> for AddressEntry {
    fn from(prefix: RoaPrefix) -> Self {
        AddressEntry::Prefix(prefix)
    }
}

impl From<AddressRange> for AddressEntry {
    fn from(range: AddressRange) -> Self {
        AddressEntry::Range(range)
    }
}

impl fmt::Display for AddressEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AddressEntry::Prefix(ref prefix) => fmt::Display::fmt(prefix, f),
            AddressEntry::Range(ref range) => fmt::Display::fmt(range, f),
        }
    }
}


//------------ RoaPrefix -----------------------------------------------------

/// A prefix entry.
///
/// ```txt
/// ROAIPAddress ::= SEQUENCE {
///    address       IPAddress,
///    maxLength     INTEGER OPTIONAL }
///
/// IPAddress    ::= BIT STRING
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RoaPrefix {
    addr: EncodedAddr,
    max_length: Option<u8>,
}

impl RoaPrefix {
    pub fn new(addr: EncodedAddr, max_length: Option<u8>) -> Self {
        RoaPrefix { addr, max_length }
    }

    pub fn addr(&self) -> &EncodedAddr {
        &self.addr
    }

    pub fn max_length(&self) -> Option<u8> {
        self.max_length
    }

    fn encode_ref(&self) -> impl encode::Values {
        encode::sequence((
            self.addr.encode(),
            self.max_length.map(|v| v.encode())
        ))
    }
}

impl fmt::Display for RoaPrefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.addr, f)?;
        if let Some(max_len) = self.max_length {
            write!(f, "-{}", max_len)?;
        }
        Ok(())
    }
}


//------------ AddressRange --------------------------------------------------

/// A range entry.
///
/// ```txt
/// IPAddressRange ::= SEQUENCE {
///    min        IPAddress,
///    max        IPAddress }
/// ```
///
/// The minimum has its trailing zero bits dropped, the maximum its trailing
/// one bits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AddressRange {
    min: EncodedAddr,
    max: EncodedAddr,
}

impl AddressRange {
    pub fn new(min: EncodedAddr, max: EncodedAddr) -> Self {
        AddressRange { min, max }
    }

    pub fn min(&self) -> &EncodedAddr {
        &self.min
    }

    pub fn max(&self) -> &EncodedAddr {
        &self.max
    }

    /// Returns whether the minimum is not larger than the maximum.
    pub fn is_ordered(&self) -> bool {
        self.min.addr_octets() <= &self.max.max_octets()[
            ..self.max.family().addr_octets()
        ]
    }

    fn encode_ref(&self) -> impl encode::Values {
        encode::sequence((
            self.min.encode(),
            self.max.encode(),
        ))
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.min.display_min(), self.max.display_max())
    }
}


//============ Tests =========================================================
