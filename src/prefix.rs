//! IP address prefixes and their encoding as bit strings.
//!
//! Addresses appear in ROAs as DER BIT STRINGs that contain only the
//! significant bits of a prefix: the prefix `10.0.0.0/8` is encoded as the
//! single octet `0x0a` with no unused bits while `192.0.2.128/25` becomes
//! the four octets `c0 00 02 80` with seven unused bits. DER demands that
//! all unused bits are zero.
//!
//! The bounds of address ranges are encoded in the same way, except that the
//! number of significant bits is determined from the address itself: a
//! minimum drops all trailing zero bits while a maximum drops all trailing
//! one bits, as described in section 2.1.2 of [RFC 3779].
//!
//! [RFC 3779]: https://tools.ietf.org/html/rfc3779

use std::{fmt, io};
use std::net::{Ipv4Addr, Ipv6Addr};
use bcder::{BitString, Mode, Tag};
use bcder::encode::PrimitiveContent;
use crate::error::RoaError;


//------------ AddressFamily -------------------------------------------------

/// The address family of a block of ROA addresses.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Returns the address family identifier as used in encoded blocks.
    pub fn afi(self) -> [u8; 2] {
        match self {
            AddressFamily::Ipv4 => [0x00, 0x01],
            AddressFamily::Ipv6 => [0x00, 0x02],
        }
    }

    /// Returns the family for an encoded address family identifier.
    pub fn from_afi(afi: &[u8]) -> Option<Self> {
        match afi {
            [0x00, 0x01] => Some(AddressFamily::Ipv4),
            [0x00, 0x02] => Some(AddressFamily::Ipv6),
            _ => None
        }
    }

    /// Returns the family for its name in a configuration file.
    pub fn from_conf(name: &str) -> Option<Self> {
        match name {
            "IPv4" => Some(AddressFamily::Ipv4),
            "IPv6" => Some(AddressFamily::Ipv6),
            _ => None
        }
    }

    /// Returns the number of bits in an address of this family.
    pub fn addr_bits(self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }

    /// Returns the number of octets in an address of this family.
    pub fn addr_octets(self) -> usize {
        usize::from(self.addr_bits() / 8)
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            AddressFamily::Ipv4 => "IPv4",
            AddressFamily::Ipv6 => "IPv6",
        })
    }
}


//------------ EncodedAddr ---------------------------------------------------

/// An address in its canonical bit string form.
///
/// The value keeps the full address octets of its family together with the
/// number of significant bits. All bits beyond those are always zero.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EncodedAddr {
    family: AddressFamily,
    octets: [u8; 16],
    bit_len: u8,
}

impl EncodedAddr {
    /// Creates a prefix, clearing all bits beyond `prefix_len`.
    ///
    /// # Panics
    ///
    /// The function panics if `octets` is longer than sixteen octets or if
    /// `prefix_len` is larger than the address width of `family`.
    pub fn new_prefix(
        family: AddressFamily, octets: &[u8], prefix_len: u8
    ) -> Self {
        assert!(prefix_len <= family.addr_bits());
        let mut res = [0u8; 16];
        res[..octets.len()].copy_from_slice(octets);
        clear_and_count_prefix_bits(
            &mut res[..family.addr_octets()], prefix_len, family.addr_bits()
        );
        EncodedAddr { family, octets: res, bit_len: prefix_len }
    }

    /// Parses a prefix in the textual notation of `family`.
    pub fn from_prefix_str(
        family: AddressFamily, s: &str
    ) -> Result<Self, RoaError> {
        let (octets, len) = parse_prefix(family, s)?;
        Ok(Self::new_prefix(family, &octets, len))
    }

    /// Parses the minimum address of a range.
    ///
    /// The address must be a single address, i.e., it either has no prefix
    /// length or the full length of its family.
    pub fn range_min(
        family: AddressFamily, s: &str
    ) -> Result<Self, RoaError> {
        let mut octets = parse_full_addr(family, s)?;
        let (unused, significant) = trim_min_bound(
            &mut octets[..family.addr_octets()], family.addr_bits()
        );
        Ok(Self::from_counts(family, octets, unused, significant))
    }

    /// Parses the maximum address of a range.
    ///
    /// The address must be a single address, i.e., it either has no prefix
    /// length or the full length of its family.
    pub fn range_max(
        family: AddressFamily, s: &str
    ) -> Result<Self, RoaError> {
        let mut octets = parse_full_addr(family, s)?;
        let (unused, significant) = trim_max_bound(
            &mut octets[..family.addr_octets()], family.addr_bits()
        );
        Ok(Self::from_counts(family, octets, unused, significant))
    }

    fn from_counts(
        family: AddressFamily, octets: [u8; 16], unused: u8,
        significant: usize
    ) -> Self {
        EncodedAddr {
            family, octets,
            // At most 128 bits, so this fits.
            bit_len: (significant * 8) as u8 - unused,
        }
    }

    /// Returns the address family.
    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// Returns the number of significant bits.
    pub fn bit_len(&self) -> u8 {
        self.bit_len
    }

    /// Returns the number of octets needed for the significant bits.
    pub fn significant_octets(&self) -> usize {
        (usize::from(self.bit_len) + 7) / 8
    }

    /// Returns the number of unused bits in the last significant octet.
    pub fn unused_bits(&self) -> u8 {
        (self.significant_octets() * 8) as u8 - self.bit_len
    }

    /// Returns the significant octets.
    pub fn as_slice(&self) -> &[u8] {
        &self.octets[..self.significant_octets()]
    }

    /// Returns the full address octets with all insignificant bits zero.
    pub fn addr_octets(&self) -> &[u8] {
        &self.octets[..self.family.addr_octets()]
    }

    /// Returns the full address octets with all insignificant bits set.
    ///
    /// This is the largest address covered when the value is a prefix or
    /// the upper bound when it is the maximum of a range.
    pub fn max_octets(&self) -> [u8; 16] {
        let mut res = self.octets;
        for bit in usize::from(self.bit_len)..usize::from(
            self.family.addr_bits()
        ) {
            res[bit / 8] |= 0x80 >> (bit % 8);
        }
        res
    }

    /// Converts a decoded bit string.
    ///
    /// Fails if the bit string is longer than an address of `family` or if
    /// any of its unused bits are set.
    pub fn from_bit_string(
        family: AddressFamily, bits: &BitString
    ) -> Result<Self, &'static str> {
        let octets = bits.octet_bytes();
        let unused = bits.unused();
        if octets.len() > family.addr_octets() {
            return Err("address too long for family")
        }
        if unused > 7 || (octets.is_empty() && unused != 0) {
            return Err("invalid number of unused bits")
        }
        if let Some(last) = octets.last() {
            if last & ((1u8 << unused) - 1) != 0 {
                return Err("unused bits in address not zero")
            }
        }
        let mut res = [0u8; 16];
        res[..octets.len()].copy_from_slice(octets.as_ref());
        Ok(Self::from_counts(family, res, unused, octets.len()))
    }

    fn fmt_addr(
        octets: &[u8; 16], family: AddressFamily, f: &mut fmt::Formatter
    ) -> fmt::Result {
        match family {
            AddressFamily::Ipv4 => {
                fmt::Display::fmt(
                    &Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]),
                    f
                )
            }
            AddressFamily::Ipv6 => {
                fmt::Display::fmt(&Ipv6Addr::from(*octets), f)
            }
        }
    }

    /// Returns a displayable value of the address without its length.
    pub fn display_min(&self) -> impl fmt::Display + '_ {
        DisplayAddr(self, false)
    }

    /// Returns a displayable value of the largest covered address.
    pub fn display_max(&self) -> impl fmt::Display + '_ {
        DisplayAddr(self, true)
    }
}

//--- PrimitiveContent

impl PrimitiveContent for EncodedAddr {
    const TAG: Tag = Tag::BIT_STRING;

    fn encoded_len(&self, _: Mode) -> usize {
        self.significant_octets() + 1
    }

    fn write_encoded<W: io::Write>(
        &self,
        _: Mode,
        target: &mut W
    ) -> Result<(), io::Error> {
        // All insignificant bits are zero already.
        target.write_all(&[self.unused_bits()])?;
        target.write_all(self.as_slice())
    }
}

impl fmt::Display for EncodedAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Self::fmt_addr(&self.octets, self.family, f)?;
        write!(f, "/{}", self.bit_len)
    }
}

struct DisplayAddr<'a>(&'a EncodedAddr, bool);

impl<'a> fmt::Display for DisplayAddr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.1 {
            EncodedAddr::fmt_addr(&self.0.max_octets(), self.0.family, f)
        }
        else {
            EncodedAddr::fmt_addr(&self.0.octets, self.0.family, f)
        }
    }
}


//------------ Parsing -------------------------------------------------------

/// Parses a prefix in the notation of the given family.
pub fn parse_prefix(
    family: AddressFamily, s: &str
) -> Result<([u8; 16], u8), RoaError> {
    let mut res = [0u8; 16];
    let len = match family {
        AddressFamily::Ipv4 => {
            let (octets, len) = parse_ipv4_prefix(s)?;
            res[..4].copy_from_slice(&octets);
            len
        }
        AddressFamily::Ipv6 => {
            let (octets, len) = parse_ipv6_prefix(s)?;
            res = octets;
            len
        }
    };
    Ok((res, len))
}

/// Parses a single address of the given family.
fn parse_full_addr(
    family: AddressFamily, s: &str
) -> Result<[u8; 16], RoaError> {
    let (octets, len) = parse_prefix(family, s)?;
    if len != family.addr_bits() {
        return Err(RoaError::InvalidPrefixLength)
    }
    Ok(octets)
}

/// Parses an IPv4 prefix in dotted decimal notation.
///
/// Missing trailing octets are taken as zero, so `10.0/8` is the same as
/// `10.0.0.0/8`. Without a prefix length, the length is 32.
pub fn parse_ipv4_prefix(s: &str) -> Result<([u8; 4], u8), RoaError> {
    let (addr, len) = split_prefix_len(s, 32)?;
    let mut res = [0u8; 4];
    let mut groups = addr.split('.');
    for octet in res.iter_mut() {
        match groups.next() {
            Some(group) => *octet = parse_ipv4_octet(group)?,
            None => break
        }
    }
    if groups.next().is_some() {
        return Err(RoaError::InvalidPrefixBytes)
    }
    Ok((res, len))
}

fn parse_ipv4_octet(s: &str) -> Result<u8, RoaError> {
    if s.is_empty() || s.len() > 3 || !s.bytes().all(|ch| ch.is_ascii_digit())
    {
        return Err(RoaError::InvalidPrefixBytes)
    }
    s.parse().map_err(|_| RoaError::InvalidPrefixBytes)
}

/// Parses an IPv6 prefix in colon-separated hexadecimal notation.
///
/// A single `::` stands for as many zero groups as are needed to fill the
/// address. Without a prefix length, the length is 128.
pub fn parse_ipv6_prefix(s: &str) -> Result<([u8; 16], u8), RoaError> {
    let (addr, len) = split_prefix_len(s, 128)?;
    let mut groups = [0u16; 8];
    match addr.find("::") {
        Some(pos) => {
            let head = parse_ipv6_groups(&addr[..pos])?;
            let tail = parse_ipv6_groups(&addr[pos + 2..])?;
            // The double colon covers at least one group, so there can be
            // at most seven explicit ones.
            if head.len() + tail.len() > 7 {
                return Err(RoaError::InvalidPrefixBytes)
            }
            groups[..head.len()].copy_from_slice(&head);
            groups[8 - tail.len()..].copy_from_slice(&tail);
        }
        None => {
            let all = parse_ipv6_groups(addr)?;
            if all.len() != 8 {
                return Err(RoaError::InvalidPrefixBytes)
            }
            groups.copy_from_slice(&all);
        }
    }
    let mut res = [0u8; 16];
    for (chunk, group) in res.chunks_mut(2).zip(groups.iter()) {
        chunk.copy_from_slice(&group.to_be_bytes())
    }
    Ok((res, len))
}

fn parse_ipv6_groups(s: &str) -> Result<Vec<u16>, RoaError> {
    if s.is_empty() {
        return Ok(Vec::new())
    }
    s.split(':').map(|group| {
        if
            group.is_empty() || group.len() > 4
            || !group.bytes().all(|ch| ch.is_ascii_hexdigit())
        {
            return Err(RoaError::InvalidPrefixBytes)
        }
        u16::from_str_radix(group, 16).map_err(|_| {
            RoaError::InvalidPrefixBytes
        })
    }).collect()
}

/// Splits off the prefix length after a slash.
///
/// Returns the address part and the length which defaults to `max`.
fn split_prefix_len(s: &str, max: u8) -> Result<(&str, u8), RoaError> {
    let (addr, len) = match s.find('/') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => return Ok((s, max))
    };
    if len.is_empty() || len.len() > 3 || !len.bytes().all(|ch| {
        ch.is_ascii_digit()
    }) {
        return Err(RoaError::InvalidPrefixLength)
    }
    match len.parse::<u8>() {
        Ok(len) if len >= 1 && len <= max => Ok((addr, len)),
        _ => Err(RoaError::InvalidPrefixLength)
    }
}

/// Splits off an optional `^N` maximum length suffix.
///
/// Returns the remainder of the string and the maximum length if present.
/// Whether the maximum length fits the prefix is not checked here.
pub fn split_max_length(s: &str) -> Result<(&str, Option<u8>), RoaError> {
    match s.find('^') {
        Some(pos) => {
            let max = &s[pos + 1..];
            if max.is_empty() || !max.bytes().all(|ch| ch.is_ascii_digit()) {
                return Err(RoaError::InvalidPrefixLength)
            }
            let max = max.parse().map_err(|_| {
                RoaError::InvalidPrefixLength
            })?;
            Ok((&s[..pos], Some(max)))
        }
        None => Ok((s, None))
    }
}


//------------ Bit Manipulation ----------------------------------------------

/// Returns whether the bit at position `bit` is set.
///
/// Bits are counted from the most significant bit of the first octet.
fn bit(octets: &[u8], bit: usize) -> bool {
    octets[bit / 8] & (0x80 >> (bit % 8)) != 0
}

fn clear_bit(octets: &mut [u8], bit: usize) {
    octets[bit / 8] &= !(0x80 >> (bit % 8))
}

/// Returns the number of unused bits and significant octets for a length.
fn counts(bit_len: usize) -> (u8, usize) {
    let significant = (bit_len + 7) / 8;
    ((significant * 8 - bit_len) as u8, significant)
}

/// Clears all bits of a prefix beyond its length.
///
/// Every bit from position `prefix_len` up to `bit_width` is set to zero.
/// Returns the number of unused bits and the number of significant octets
/// of the bit string encoding of the prefix.
pub fn clear_and_count_prefix_bits(
    octets: &mut [u8], prefix_len: u8, bit_width: u8
) -> (u8, usize) {
    for pos in usize::from(prefix_len)..usize::from(bit_width) {
        clear_bit(octets, pos)
    }
    counts(usize::from(prefix_len))
}

/// Trims the lower bound of a range to its shortest encoding.
///
/// All trailing zero bits are dropped. Returns the number of unused bits
/// and the number of significant octets.
pub fn trim_min_bound(octets: &[u8], bit_width: u8) -> (u8, usize) {
    let mut len = usize::from(bit_width);
    while len > 0 && !bit(octets, len - 1) {
        len -= 1
    }
    counts(len)
}

/// Trims the upper bound of a range to its shortest encoding.
///
/// All trailing one bits are dropped and cleared so that the unused bits of
/// the encoding are zero. Returns the number of unused bits and the number
/// of significant octets.
pub fn trim_max_bound(octets: &mut [u8], bit_width: u8) -> (u8, usize) {
    let mut len = usize::from(bit_width);
    while len > 0 && bit(octets, len - 1) {
        clear_bit(octets, len - 1);
        len -= 1
    }
    counts(len)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use super::*;

    fn v4(s: &str) -> EncodedAddr {
        EncodedAddr::from_prefix_str(AddressFamily::Ipv4, s).unwrap()
    }

    #[test]
    fn ipv4_prefixes() {
        assert_eq!(
            parse_ipv4_prefix("10.0.0.0/8").unwrap(), ([10, 0, 0, 0], 8)
        );
        assert_eq!(
            parse_ipv4_prefix("192.168.1.0/24").unwrap(),
            ([192, 168, 1, 0], 24)
        );
        assert_eq!(parse_ipv4_prefix("1.2.3.4").unwrap(), ([1, 2, 3, 4], 32));
        assert_eq!(parse_ipv4_prefix("10.0/8").unwrap(), ([10, 0, 0, 0], 8));
        assert_eq!(
            parse_ipv4_prefix("172.16/12").unwrap(), ([172, 16, 0, 0], 12)
        );
    }

    #[test]
    fn bad_ipv4_prefixes() {
        for s in &[
            "10.0.0.0.0/8", "256.0.0.0/8", "10..0/8", "10.0./16", "a.b.c.d",
            "", "/8", "1000.0.0.0/8", " 10.0.0.0/8",
        ] {
            assert!(matches!(
                parse_ipv4_prefix(s), Err(RoaError::InvalidPrefixBytes)
            ), "{}", s);
        }
        for s in &[
            "10.0.0.0/0", "10.0.0.0/33", "10.0.0.0/", "10.0.0.0/8x",
            "10.0.0.0/-1",
        ] {
            assert!(matches!(
                parse_ipv4_prefix(s), Err(RoaError::InvalidPrefixLength)
            ), "{}", s);
        }
    }

    #[test]
    fn ipv6_prefixes() {
        let (octets, len) = parse_ipv6_prefix("2001:db8::/32").unwrap();
        assert_eq!(&octets[..4], &[0x20, 0x01, 0x0d, 0xb8]);
        assert!(octets[4..].iter().all(|x| *x == 0));
        assert_eq!(len, 32);

        let (octets, len) = parse_ipv6_prefix("::1").unwrap();
        assert_eq!(octets[15], 1);
        assert!(octets[..15].iter().all(|x| *x == 0));
        assert_eq!(len, 128);

        let (octets, _) = parse_ipv6_prefix(
            "1:2:3:4:5:6:7:8"
        ).unwrap();
        assert_eq!(octets, [0, 1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0, 8]);

        let (octets, _) = parse_ipv6_prefix("fe80::1:2/64").unwrap();
        assert_eq!(
            octets, [0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2]
        );
        assert_eq!(parse_ipv6_prefix("::/1").unwrap(), ([0; 16], 1));
    }

    #[test]
    fn bad_ipv6_prefixes() {
        for s in &[
            "1:2:3:4:5:6:7:8:9", "1:2:3:4::5:6:7:8", "2001:db8/32",
            "2001::db8::1", "2001:db8:::/48", "12345::/16", "g::/16",
            "2001:db8::1.2.3.4",
        ] {
            assert!(matches!(
                parse_ipv6_prefix(s), Err(RoaError::InvalidPrefixBytes)
            ), "{}", s);
        }
        assert!(matches!(
            parse_ipv6_prefix("2001:db8::/129"),
            Err(RoaError::InvalidPrefixLength)
        ));
    }

    #[test]
    fn max_length() {
        assert_eq!(
            split_max_length("10.0.0.0/8^24").unwrap(), ("10.0.0.0/8", Some(24))
        );
        assert_eq!(
            split_max_length("10.0.0.0/8").unwrap(), ("10.0.0.0/8", None)
        );
        assert!(split_max_length("10.0.0.0/8^").is_err());
        assert!(split_max_length("10.0.0.0/8^x").is_err());
        assert!(split_max_length("10.0.0.0/8^300").is_err());
    }

    #[test]
    fn clear_and_count() {
        let mut octets = [10, 1, 2, 3];
        assert_eq!(clear_and_count_prefix_bits(&mut octets, 8, 32), (0, 1));
        assert_eq!(octets, [10, 0, 0, 0]);

        let mut octets = [192, 168, 1, 255];
        assert_eq!(clear_and_count_prefix_bits(&mut octets, 24, 32), (0, 3));
        assert_eq!(octets, [192, 168, 1, 0]);

        let mut octets = [192, 0, 2, 0xff];
        assert_eq!(clear_and_count_prefix_bits(&mut octets, 25, 32), (7, 4));
        assert_eq!(octets, [192, 0, 2, 0x80]);

        let mut octets = [0xff; 16];
        assert_eq!(clear_and_count_prefix_bits(&mut octets, 33, 128), (7, 5));
        assert_eq!(&octets[..5], &[0xff, 0xff, 0xff, 0xff, 0x80]);
        assert!(octets[5..].iter().all(|x| *x == 0));
    }

    #[test]
    fn encoded_prefixes() {
        let addr = v4("10.0.0.0/8");
        assert_eq!(addr.as_slice(), &[10]);
        assert_eq!(addr.unused_bits(), 0);
        assert_eq!(addr.to_string(), "10.0.0.0/8");

        let addr = v4("192.0.2.255/25");
        assert_eq!(addr.as_slice(), &[192, 0, 2, 0x80]);
        assert_eq!(addr.unused_bits(), 7);
        assert_eq!(addr.display_max().to_string(), "192.0.2.255");

        let addr = EncodedAddr::from_prefix_str(
            AddressFamily::Ipv6, "2001:db8::/32"
        ).unwrap();
        assert_eq!(addr.to_string(), "2001:db8::/32");
        assert_eq!(addr.as_slice(), &[0x20, 0x01, 0x0d, 0xb8]);
    }

    #[test]
    fn range_bounds() {
        let min = EncodedAddr::range_min(
            AddressFamily::Ipv4, "10.0.0.0"
        ).unwrap();
        assert_eq!(min.as_slice(), &[10]);
        assert_eq!(min.unused_bits(), 1);

        let max = EncodedAddr::range_max(
            AddressFamily::Ipv4, "10.0.31.255"
        ).unwrap();
        assert_eq!(max.as_slice(), &[10, 0, 0]);
        assert_eq!(max.unused_bits(), 5);
        assert_eq!(max.bit_len(), 19);
        assert_eq!(max.display_max().to_string(), "10.0.31.255");

        let min = EncodedAddr::range_min(AddressFamily::Ipv4, "0.0.0.0")
            .unwrap();
        assert_eq!(min.bit_len(), 0);
        let max = EncodedAddr::range_max(
            AddressFamily::Ipv4, "255.255.255.255"
        ).unwrap();
        assert_eq!(max.bit_len(), 0);
        assert!(max.as_slice().is_empty());

        let max = EncodedAddr::range_max(
            AddressFamily::Ipv6, "2001:db8::ffff"
        ).unwrap();
        assert_eq!(max.bit_len(), 111);
        assert_eq!(max.as_slice()[13], 0);

        assert!(matches!(
            EncodedAddr::range_min(AddressFamily::Ipv4, "10.0.0.0/8"),
            Err(RoaError::InvalidPrefixLength)
        ));
        assert!(matches!(
            EncodedAddr::range_max(AddressFamily::Ipv6, "2001:db8::/48"),
            Err(RoaError::InvalidPrefixLength)
        ));
    }

    #[test]
    fn bit_string_content() {
        use bcder::encode::Values;

        let addr = v4("192.0.2.0/23");
        assert_eq!(
            addr.encode().to_captured(Mode::Der).as_slice(),
            b"\x03\x04\x01\xc0\x00\x02"
        );
        let addr = EncodedAddr::range_max(
            AddressFamily::Ipv4, "255.255.255.255"
        ).unwrap();
        assert_eq!(
            addr.encode().to_captured(Mode::Der).as_slice(), b"\x03\x01\x00"
        );
    }

    #[test]
    fn bit_string_conversion() {
        let addr = v4("192.0.2.0/23");
        let bits = BitString::new(
            addr.unused_bits(), Bytes::copy_from_slice(addr.as_slice())
        );
        assert_eq!(bits.unused(), 1);
        assert_eq!(
            EncodedAddr::from_bit_string(AddressFamily::Ipv4, &bits).unwrap(),
            addr
        );

        let bad = BitString::new(1, Bytes::from_static(&[192, 0, 3]));
        assert!(
            EncodedAddr::from_bit_string(AddressFamily::Ipv4, &bad).is_err()
        );
        let long = BitString::new(0, Bytes::from_static(&[1, 2, 3, 4, 5]));
        assert!(
            EncodedAddr::from_bit_string(AddressFamily::Ipv4, &long).is_err()
        );
        assert!(
            EncodedAddr::from_bit_string(AddressFamily::Ipv6, &long).is_ok()
        );
    }
}
