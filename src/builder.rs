//! Building ROAs from configuration directives.
//!
//! A [`RoaBuilder`] receives the directives of a configuration file one by
//! one, in order, and fills a [`RoaObject`] with them. Directives that
//! describe address blocks must arrive in a certain order: an `ipfam`
//! directive opens a block which must then receive at least one address
//! before anything else may follow. The builder tracks this through its
//! current [`ForcingInstruction`].
//!
//! The following keys are recognized:
//!
//! | key          | value                                          |
//! |--------------|------------------------------------------------|
//! | `keyversion` | the version of the object, must be `3`         |
//! | `as_id`      | the AS identifier, up to nine decimal digits   |
//! | `ipfam`      | `IPv4` or `IPv6`, starts a new address block   |
//! | `ipaddr`     | a prefix, optionally followed by `^maxlength`  |
//! | `ipaddrmin`  | the start of an address range                  |
//! | `ipaddrmax`  | the end of an address range                    |
//! | `certname`   | path to the DER encoded EE certificate         |
//! | `keyfile`    | path to the private key used for signing       |
//! | `SID`        | accepted and ignored                           |
//! | `signature`  | accepted and ignored                           |
//!
//! The range keys are only available with the `ranges` feature.
//!
//! Once all directives have been given, [`RoaBuilder::finalize`] checks
//! that the configuration was complete and signs the object.

use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info};
use crate::cert::Cert;
use crate::conf::Directives;
use crate::crypto::RoaSigner;
use crate::error::RoaError;
use crate::prefix::{self, AddressFamily, EncodedAddr};
use crate::roa::{AddressEntry, RoaObject, RoaPrefix};
#[cfg(feature = "ranges")] use crate::roa::AddressRange;


/// The maximum number of digits of an AS identifier.
const MAX_AS_ID_DIGITS: usize = 9;


//------------ DirectiveKey --------------------------------------------------

/// The keys understood by the builder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DirectiveKey {
    KeyVersion,
    Sid,
    Signature,
    AsId,
    IpFamily,
    IpAddr,
    #[cfg(feature = "ranges")]
    IpAddrMin,
    #[cfg(feature = "ranges")]
    IpAddrMax,
    CertName,
    KeyFile,
}

impl DirectiveKey {
    const COUNT: usize = 10;

    /// Returns the key for the given string, if it is one.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "keyversion" => Some(DirectiveKey::KeyVersion),
            "SID" => Some(DirectiveKey::Sid),
            "signature" => Some(DirectiveKey::Signature),
            "as_id" => Some(DirectiveKey::AsId),
            "ipfam" => Some(DirectiveKey::IpFamily),
            "ipaddr" => Some(DirectiveKey::IpAddr),
            #[cfg(feature = "ranges")]
            "ipaddrmin" => Some(DirectiveKey::IpAddrMin),
            #[cfg(feature = "ranges")]
            "ipaddrmax" => Some(DirectiveKey::IpAddrMax),
            "certname" => Some(DirectiveKey::CertName),
            "keyfile" => Some(DirectiveKey::KeyFile),
            _ => None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveKey::KeyVersion => "keyversion",
            DirectiveKey::Sid => "SID",
            DirectiveKey::Signature => "signature",
            DirectiveKey::AsId => "as_id",
            DirectiveKey::IpFamily => "ipfam",
            DirectiveKey::IpAddr => "ipaddr",
            #[cfg(feature = "ranges")]
            DirectiveKey::IpAddrMin => "ipaddrmin",
            #[cfg(feature = "ranges")]
            DirectiveKey::IpAddrMax => "ipaddrmax",
            DirectiveKey::CertName => "certname",
            DirectiveKey::KeyFile => "keyfile",
        }
    }

    fn index(self) -> usize {
        match self {
            DirectiveKey::KeyVersion => 0,
            DirectiveKey::Sid => 1,
            DirectiveKey::Signature => 2,
            DirectiveKey::AsId => 3,
            DirectiveKey::IpFamily => 4,
            DirectiveKey::IpAddr => 5,
            #[cfg(feature = "ranges")]
            DirectiveKey::IpAddrMin => 6,
            #[cfg(feature = "ranges")]
            DirectiveKey::IpAddrMax => 7,
            DirectiveKey::CertName => 8,
            DirectiveKey::KeyFile => 9,
        }
    }
}


//------------ ForcingInstruction --------------------------------------------

/// The directive context a builder is in.
///
/// Some states demand a certain directive to follow. These are called
/// forcing. A build can only end in a state that isn’t.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ForcingInstruction {
    /// Nothing is pending.
    None,

    /// An address block was opened and has no entries yet.
    Start(AddressFamily),

    /// An address block has at least one entry and may receive more.
    Continue(AddressFamily),

    /// The minimum of a range was given, the maximum has to follow.
    #[cfg(feature = "ranges")]
    MinPending(AddressFamily),
}

impl ForcingInstruction {
    /// Returns whether the state requires another directive.
    pub fn is_forcing(self) -> bool {
        match self {
            ForcingInstruction::None => false,
            ForcingInstruction::Start(_) => true,
            ForcingInstruction::Continue(_) => false,
            #[cfg(feature = "ranges")]
            ForcingInstruction::MinPending(_) => true,
        }
    }

    /// Returns the family of the block that accepts addresses.
    fn open_family(self) -> Option<AddressFamily> {
        match self {
            ForcingInstruction::Start(family)
            | ForcingInstruction::Continue(family) => Some(family),
            _ => None
        }
    }
}

impl Default for ForcingInstruction {
    fn default() -> Self {
        ForcingInstruction::None
    }
}


//------------ RoaBuilder ----------------------------------------------------

/// The context of a single build.
///
/// A builder owns the object it is building. It is not meant to be reused:
/// [`finalize`][Self::finalize] consumes it.
pub struct RoaBuilder<S> {
    signer: S,
    roa: RoaObject,
    state: ForcingInstruction,
    seen: [bool; DirectiveKey::COUNT],
    ipv4_used: bool,
    ipv6_used: bool,
    key_file: Option<PathBuf>,
    #[cfg(feature = "ranges")]
    pending_min: Option<EncodedAddr>,
}

impl<S: RoaSigner> RoaBuilder<S> {
    /// Creates a new builder signing with `signer`.
    pub fn new(signer: S) -> Self {
        RoaBuilder {
            signer,
            roa: RoaObject::new(),
            state: ForcingInstruction::None,
            seen: [false; DirectiveKey::COUNT],
            ipv4_used: false,
            ipv6_used: false,
            key_file: None,
            #[cfg(feature = "ranges")]
            pending_min: None,
        }
    }

    /// Builds and signs a ROA from the content of a configuration file.
    ///
    /// Errors are reported with the line they happened at.
    pub fn build_from_conf(
        data: &[u8], signer: S
    ) -> Result<RoaObject, RoaError> {
        let mut builder = Self::new(signer);
        for directive in Directives::new(data) {
            let directive = directive?;
            builder.apply(directive.key, directive.value).map_err(|err| {
                err.at_line(directive.line)
            })?;
        }
        builder.finalize()
    }

    /// Returns the current state.
    pub fn state(&self) -> ForcingInstruction {
        self.state
    }

    /// Returns whether a directive with the given key has been applied.
    pub fn has_seen(&self, key: DirectiveKey) -> bool {
        self.seen[key.index()]
    }

    /// Returns a reference to the object built so far.
    pub fn roa(&self) -> &RoaObject {
        &self.roa
    }

    /// Applies a single directive.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), RoaError> {
        let key = match DirectiveKey::from_key(key) {
            Some(key) => key,
            None => {
                debug!("unknown configuration key '{}'", key);
                return Err(RoaError::InvalidArgument("unknown key"))
            }
        };
        debug!("applying {} = {}", key.as_str(), value);
        match key {
            DirectiveKey::KeyVersion => {
                self.check_once(key)?;
                self.set_version(value)?;
            }
            DirectiveKey::Sid => {
                self.check_once(key)?;
            }
            DirectiveKey::Signature => {
                self.check_not_forcing()?;
            }
            DirectiveKey::AsId => {
                self.check_once(key)?;
                self.set_as_id(value)?;
            }
            DirectiveKey::IpFamily => {
                self.check_not_forcing()?;
                self.set_family(value)?;
            }
            DirectiveKey::IpAddr => self.add_prefix(value)?,
            #[cfg(feature = "ranges")]
            DirectiveKey::IpAddrMin => self.add_range_min(value)?,
            #[cfg(feature = "ranges")]
            DirectiveKey::IpAddrMax => self.add_range_max(value)?,
            DirectiveKey::CertName => {
                self.check_once(key)?;
                self.set_cert(Path::new(value))?;
            }
            DirectiveKey::KeyFile => {
                self.check_once(key)?;
                self.key_file = Some(PathBuf::from(value));
            }
        }
        self.seen[key.index()] = true;
        Ok(())
    }

    /// Finishes the build and signs the object.
    pub fn finalize(mut self) -> Result<RoaObject, RoaError> {
        if self.state.is_forcing() {
            return Err(RoaError::InvalidArgument("incomplete address block"))
        }
        for key in &[
            DirectiveKey::KeyVersion, DirectiveKey::AsId,
            DirectiveKey::IpFamily, DirectiveKey::KeyFile,
        ] {
            if !self.has_seen(*key) {
                debug!("missing mandatory key '{}'", key.as_str());
                return Err(RoaError::InvalidArgument("missing mandatory key"))
            }
        }
        let key_file = match self.key_file.take() {
            Some(key_file) => key_file,
            None => {
                return Err(RoaError::InvalidArgument("missing mandatory key"))
            }
        };
        self.signer.sign_roa(&mut self.roa, &key_file).map_err(|err| {
            RoaError::InvalidSignature(err.to_string())
        })?;
        info!(
            "built ROA for AS{} with {} address entries",
            self.roa.attestation().as_id(),
            self.roa.attestation().iter().count()
        );
        Ok(self.roa)
    }

    fn check_not_forcing(&self) -> Result<(), RoaError> {
        if self.state.is_forcing() {
            Err(RoaError::InvalidArgument("address block not complete"))
        }
        else {
            Ok(())
        }
    }

    fn check_once(&self, key: DirectiveKey) -> Result<(), RoaError> {
        self.check_not_forcing()?;
        if self.has_seen(key) {
            Err(RoaError::InvalidArgument("key given more than once"))
        }
        else {
            Ok(())
        }
    }

    fn set_version(&mut self, value: &str) -> Result<(), RoaError> {
        if value.len() != 1 {
            return Err(RoaError::InvalidArgument("version must be one digit"))
        }
        if value.parse::<u8>().ok() != Some(RoaObject::VERSION) {
            return Err(RoaError::InvalidVersion)
        }
        self.roa.set_version(RoaObject::VERSION);
        self.state = ForcingInstruction::None;
        Ok(())
    }

    fn set_as_id(&mut self, value: &str) -> Result<(), RoaError> {
        self.roa.attestation_mut().set_as_id(parse_as_id(value)?);
        self.state = ForcingInstruction::None;
        Ok(())
    }

    fn set_family(&mut self, value: &str) -> Result<(), RoaError> {
        let family = match AddressFamily::from_conf(value) {
            Some(family) => family,
            None => {
                return Err(RoaError::InvalidArgument("invalid address family"))
            }
        };
        // Blocks must be in AFI order, so IPv4 cannot follow IPv6.
        let used = match family {
            AddressFamily::Ipv4 => self.ipv4_used || self.ipv6_used,
            AddressFamily::Ipv6 => self.ipv6_used,
        };
        if used {
            return Err(RoaError::InvalidArgument(
                "address family repeated or out of order"
            ))
        }
        self.roa.attestation_mut().push_family(family)?;
        match family {
            AddressFamily::Ipv4 => self.ipv4_used = true,
            AddressFamily::Ipv6 => self.ipv6_used = true,
        }
        self.state = ForcingInstruction::Start(family);
        Ok(())
    }

    fn add_prefix(&mut self, value: &str) -> Result<(), RoaError> {
        let family = self.open_family()?;
        let (addr, max_length) = prefix::split_max_length(value)?;
        let addr = EncodedAddr::from_prefix_str(family, addr)?;
        // A maximum length of zero means there is none.
        let max_length = max_length.filter(|&len| len != 0);
        if let Some(max_length) = max_length {
            if max_length < addr.bit_len() || max_length > family.addr_bits() {
                return Err(RoaError::InvalidPrefixLength)
            }
        }
        self.push_entry(RoaPrefix::new(addr, max_length).into())?;
        self.state = ForcingInstruction::Continue(family);
        Ok(())
    }

    #[cfg(feature = "ranges")]
    fn add_range_min(&mut self, value: &str) -> Result<(), RoaError> {
        let family = self.open_family()?;
        self.pending_min = Some(EncodedAddr::range_min(family, value)?);
        self.state = ForcingInstruction::MinPending(family);
        Ok(())
    }

    #[cfg(feature = "ranges")]
    fn add_range_max(&mut self, value: &str) -> Result<(), RoaError> {
        let family = match self.state {
            ForcingInstruction::MinPending(family) => family,
            _ => {
                return Err(RoaError::InvalidArgument(
                    "range maximum without minimum"
                ))
            }
        };
        let max = EncodedAddr::range_max(family, value)?;
        let min = match self.pending_min.take() {
            Some(min) => min,
            None => {
                return Err(RoaError::InvalidArgument(
                    "range maximum without minimum"
                ))
            }
        };
        self.push_entry(AddressRange::new(min, max).into())?;
        self.state = ForcingInstruction::Continue(family);
        Ok(())
    }

    fn open_family(&self) -> Result<AddressFamily, RoaError> {
        self.state.open_family().ok_or(
            RoaError::InvalidArgument("address without address family")
        )
    }

    fn push_entry(
        &mut self, entry: AddressEntry
    ) -> Result<(), RoaError> {
        match self.roa.attestation_mut().last_family_mut() {
            Some(block) => block.push(entry),
            None => Err(RoaError::InvalidArgument("no open address block"))
        }
    }

    fn set_cert(&mut self, path: &Path) -> Result<(), RoaError> {
        if self.roa.cert().is_some() {
            return Err(RoaError::InvalidArgument("certificate already set"))
        }
        let data = fs::read(path)?;
        let cert = Cert::decode(&data)?;
        debug!(
            "read EE certificate {} with key {}",
            path.display(), cert.subject_key_identifier()
        );
        self.roa.set_cert(cert);
        self.state = ForcingInstruction::None;
        Ok(())
    }
}


//------------ Helpers -------------------------------------------------------

/// Parses an AS identifier.
///
/// The value must consist of one to nine decimal digits and must not be
/// zero.
pub fn parse_as_id(value: &str) -> Result<u32, RoaError> {
    if
        value.is_empty()
        || value.len() > MAX_AS_ID_DIGITS
        || !value.bytes().all(|ch| ch.is_ascii_digit())
    {
        return Err(RoaError::InvalidAsId)
    }
    match value.parse::<u32>() {
        Ok(0) | Err(_) => Err(RoaError::InvalidAsId),
        Ok(as_id) => Ok(as_id)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use std::cell::Cell;
    use std::convert::Infallible;
    use super::*;

    /// A signer that only remembers the path it was asked to use.
    #[derive(Default)]
    struct NoopSigner {
        called: Cell<bool>,
    }

    impl RoaSigner for NoopSigner {
        type Error = Infallible;

        fn sign_roa(
            &self, _roa: &mut RoaObject, _key_file: &Path
        ) -> Result<(), Self::Error> {
            self.called.set(true);
            Ok(())
        }
    }

    struct FailingSigner;

    impl RoaSigner for FailingSigner {
        type Error = &'static str;

        fn sign_roa(
            &self, _roa: &mut RoaObject, _key_file: &Path
        ) -> Result<(), Self::Error> {
            Err("no key")
        }
    }

    fn build(conf: &str) -> Result<RoaObject, RoaError> {
        RoaBuilder::build_from_conf(conf.as_bytes(), NoopSigner::default())
    }

    fn root(res: Result<RoaObject, RoaError>) -> RoaError {
        match res {
            Ok(_) => panic!("build succeeded"),
            Err(err) => match err {
                RoaError::Config { error, .. } => *error,
                err => err
            }
        }
    }

    const HEADER: &str = "keyversion = 3\nas_id = 64496\n";

    #[test]
    fn complete_build() {
        let signer = NoopSigner::default();
        let roa = RoaBuilder::build_from_conf(
            b"# test\n\
              keyversion = 3\n\
              SID = ignored\n\
              as_id = 64496\n\
              ipfam = IPv4\n\
              ipaddr = 10.0/8^16\n\
              ipaddr = 192.0.2.0/24\n\
              ipfam = IPv6\n\
              ipaddr = 2001:db8::/32\n\
              signature = ignored\n\
              keyfile = key.der\n",
            &signer
        ).unwrap();
        assert!(signer.called.get());
        assert_eq!(roa.version(), 3);
        assert_eq!(roa.attestation().as_id(), 64496);
        let entries: Vec<_> = roa.attestation().iter().map(|(family, entry)| {
            (family, entry.to_string())
        }).collect();
        assert_eq!(
            entries,
            [
                (AddressFamily::Ipv4, String::from("10.0.0.0/8-16")),
                (AddressFamily::Ipv4, String::from("192.0.2.0/24")),
                (AddressFamily::Ipv6, String::from("2001:db8::/32")),
            ]
        );
    }

    #[test]
    fn stored_prefixes_are_canonical() {
        let roa = build(&format!(
            "{}ipfam = IPv4\nipaddr = 10.1.2.3/8\nkeyfile = k\n", HEADER
        )).unwrap();
        match roa.attestation().families()[0].entries()[0] {
            AddressEntry::Prefix(ref prefix) => {
                assert_eq!(prefix.addr().addr_octets(), &[10, 0, 0, 0]);
                assert_eq!(prefix.addr().significant_octets(), 1);
                assert_eq!(prefix.addr().unused_bits(), 0);
            }
            _ => panic!("expected prefix")
        }
    }

    #[test]
    fn address_before_family() {
        let err = root(build(&format!(
            "{}ipaddr = 10.0.0.0/8\nkeyfile = k\n", HEADER
        )));
        assert!(matches!(err, RoaError::InvalidArgument(_)));
    }

    #[test]
    fn two_cert_names() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/ee.cer");
        let mut builder = RoaBuilder::new(NoopSigner::default());
        builder.apply("certname", path).unwrap();
        assert!(builder.roa().cert().is_some());
        assert!(matches!(
            builder.apply("certname", path),
            Err(RoaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn unfinished_block() {
        let err = root(build(&format!(
            "{}keyfile = k\nipfam = IPv4\n", HEADER
        )));
        assert!(matches!(err, RoaError::InvalidArgument(_)));

        let err = root(build(&format!(
            "{}ipfam = IPv4\nkeyfile = k\n", HEADER
        )));
        assert!(matches!(err, RoaError::InvalidArgument(_)));
    }

    #[test]
    fn missing_mandatory_keys() {
        let signer = NoopSigner::default();
        let err = RoaBuilder::build_from_conf(
            format!("{}ipfam = IPv4\nipaddr = 10.0.0.0/8\n", HEADER)
                .as_bytes(),
            &signer
        ).unwrap_err();
        assert!(matches!(err, RoaError::InvalidArgument(_)));
        assert!(!signer.called.get());

        for conf in &[
            "as_id = 1\nipfam = IPv4\nipaddr = 10/8\nkeyfile = k\n",
            "keyversion = 3\nipfam = IPv4\nipaddr = 10/8\nkeyfile = k\n",
            "keyversion = 3\nas_id = 1\nkeyfile = k\n",
        ] {
            assert!(
                matches!(root(build(conf)), RoaError::InvalidArgument(_)),
                "{}", conf
            );
        }
    }

    #[test]
    fn as_ids() {
        assert!(matches!(parse_as_id("0"), Err(RoaError::InvalidAsId)));
        assert!(matches!(
            parse_as_id("1234567890"), Err(RoaError::InvalidAsId)
        ));
        assert!(matches!(parse_as_id("-1"), Err(RoaError::InvalidAsId)));
        assert!(matches!(parse_as_id("+1"), Err(RoaError::InvalidAsId)));
        assert!(matches!(parse_as_id(""), Err(RoaError::InvalidAsId)));
        assert_eq!(parse_as_id("65000").unwrap(), 65000);
        assert_eq!(parse_as_id("999999999").unwrap(), 999_999_999);
    }

    #[test]
    fn versions() {
        let mut builder = RoaBuilder::new(NoopSigner::default());
        assert!(matches!(
            builder.apply("keyversion", "2"), Err(RoaError::InvalidVersion)
        ));
        assert!(matches!(
            builder.apply("keyversion", "13"),
            Err(RoaError::InvalidArgument(_))
        ));
        builder.apply("keyversion", "3").unwrap();
        assert!(matches!(
            builder.apply("keyversion", "3"),
            Err(RoaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn families() {
        let mut builder = RoaBuilder::new(NoopSigner::default());
        assert!(matches!(
            builder.apply("ipfam", "IPv5"), Err(RoaError::InvalidArgument(_))
        ));
        builder.apply("ipfam", "IPv6").unwrap();
        assert_eq!(
            builder.state(), ForcingInstruction::Start(AddressFamily::Ipv6)
        );
        assert!(matches!(
            builder.apply("as_id", "1"), Err(RoaError::InvalidArgument(_))
        ));
        builder.apply("ipaddr", "2001:db8::/32").unwrap();
        assert_eq!(
            builder.state(), ForcingInstruction::Continue(AddressFamily::Ipv6)
        );
        assert!(matches!(
            builder.apply("ipfam", "IPv4"), Err(RoaError::InvalidArgument(_))
        ));
        assert!(matches!(
            builder.apply("ipfam", "IPv6"), Err(RoaError::InvalidArgument(_))
        ));
    }

    #[test]
    fn max_lengths() {
        let mut builder = RoaBuilder::new(NoopSigner::default());
        builder.apply("ipfam", "IPv4").unwrap();
        for value in &["10.0.0.0/8^7", "10.0.0.0/8^33", "10.0.0.0/8^x"] {
            assert!(
                matches!(
                    builder.apply("ipaddr", value),
                    Err(RoaError::InvalidPrefixLength)
                ),
                "{}", value
            );
        }
        builder.apply("ipaddr", "10.0.0.0/8^8").unwrap();
        builder.apply("ipaddr", "10.0.0.0/8^32").unwrap();
        assert!(matches!(
            builder.apply("ipaddr", "10.0.0.256/32"),
            Err(RoaError::InvalidPrefixBytes)
        ));
    }

    #[test]
    fn zero_max_length() {
        let mut builder = RoaBuilder::new(NoopSigner::default());
        builder.apply("ipfam", "IPv4").unwrap();
        builder.apply("ipaddr", "10.0.0.0/8^0").unwrap();
        match builder.roa().attestation().families()[0].entries()[0] {
            AddressEntry::Prefix(ref prefix) => {
                assert_eq!(prefix.max_length(), None)
            }
            _ => panic!("expected prefix")
        }
    }

    #[test]
    fn unknown_key() {
        let err = build("keyversion = 3\nfoo = bar\n").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(err.root(), RoaError::InvalidArgument(_)));
    }

    #[test]
    fn missing_cert_file() {
        let mut builder = RoaBuilder::new(NoopSigner::default());
        assert!(matches!(
            builder.apply("certname", "/nonexistent/ee.cer"),
            Err(RoaError::Io(_))
        ));
    }

    #[test]
    fn signer_failure() {
        let err = RoaBuilder::build_from_conf(
            format!(
                "{}ipfam = IPv4\nipaddr = 10.0.0.0/8\nkeyfile = k\n", HEADER
            ).as_bytes(),
            FailingSigner
        ).unwrap_err();
        match err {
            RoaError::InvalidSignature(msg) => assert_eq!(msg, "no key"),
            err => panic!("unexpected error {}", err)
        }
    }

    #[cfg(feature = "ranges")]
    #[test]
    fn ranges() {
        let roa = build(&format!(
            "{}ipfam = IPv4\n\
             ipaddrmin = 10.0.0.0\n\
             ipaddrmax = 10.0.255.255\n\
             keyfile = k\n",
            HEADER
        )).unwrap();
        match roa.attestation().families()[0].entries()[0] {
            AddressEntry::Range(ref range) => {
                assert_eq!(range.min().bit_len(), 7);
                assert_eq!(range.max().bit_len(), 16);
            }
            _ => panic!("expected range")
        }

        let mut builder = RoaBuilder::new(NoopSigner::default());
        builder.apply("ipfam", "IPv4").unwrap();
        assert!(matches!(
            builder.apply("ipaddrmax", "10.0.0.0"),
            Err(RoaError::InvalidArgument(_))
        ));
        assert!(matches!(
            builder.apply("ipaddrmin", "10.0.0.0/8"),
            Err(RoaError::InvalidPrefixLength)
        ));
        builder.apply("ipaddrmin", "10.0.0.0").unwrap();
        assert_eq!(
            builder.state(),
            ForcingInstruction::MinPending(AddressFamily::Ipv4)
        );
        assert!(matches!(
            builder.apply("ipaddr", "10.0.0.0/8"),
            Err(RoaError::InvalidArgument(_))
        ));
    }

    #[cfg(not(feature = "ranges"))]
    #[test]
    fn ranges_unavailable() {
        let mut builder = RoaBuilder::new(NoopSigner::default());
        builder.apply("ipfam", "IPv4").unwrap();
        assert!(matches!(
            builder.apply("ipaddrmin", "10.0.0.0"),
            Err(RoaError::InvalidArgument(_))
        ));
    }
}
