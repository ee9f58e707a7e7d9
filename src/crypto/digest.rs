//! Digest algorithm and operations.

use bcder::{decode, encode};
use bcder::decode::DecodeError;
use bcder::encode::PrimitiveContent;
use ring::digest;
use crate::oid;

// Re-export the things from ring for actual digest generation.
pub use ring::digest::Digest;


//------------ DigestAlgorithm -----------------------------------------------

/// The digest algorithms used by ROAs.
///
/// [RFC 7935] limits the algorithms used in signed objects to exactly one,
/// SHA-256. Because of that, this type is a zero-sized struct.
///
/// [RFC 7935]: https://tools.ietf.org/html/rfc7935
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct DigestAlgorithm(());

/// # Creating Digest Values
///
impl DigestAlgorithm {
    /// Returns the digest of `data` using this algorithm.
    pub fn digest(self, data: &[u8]) -> Digest {
        digest::digest(&digest::SHA256, data)
    }
}

/// # ASN.1 Values
///
/// Digest algorithms appear in CMS either alone or in sets with the following
/// syntax:
///
/// ```txt
/// DigestAlgorithmIdentifiers ::= SET OF DigestAlgorithmIdentifier
/// DigestAlgorithmIdentifier  ::= AlgorithmIdentifier
/// AlgorithmIdentifier        ::= SEQUENCE {
///      algorithm                 OBJECT IDENTIFIER,
///      parameters                ANY DEFINED BY algorithm OPTIONAL }
/// ```
///
/// A set is limited to exactly one identifier. The _parameters_ field may
/// either be absent or `NULL`.
impl DigestAlgorithm {
    /// Takes and returns a single digest algorithm identifier.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    /// Takes and returns a set of digest algorithm identifiers.
    ///
    /// The set must contain exactly one identifier.
    pub fn take_set_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_set(Self::take_from)
    }

    /// Parses the algorithm identifier from the contents of its sequence.
    fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        oid::SHA256.skip_if(cons)?;
        cons.take_opt_null()?;
        Ok(DigestAlgorithm::default())
    }

    /// Provides an encoder for a single algorithm identifier.
    pub fn encode(self) -> impl encode::Values {
        encode::sequence((
            oid::SHA256.encode(),
            ().encode(),
        ))
    }

    /// Provides an encoder for a indentifer as the sole value of a set.
    pub fn encode_set(self) -> impl encode::Values {
        encode::set(
            self.encode()
        )
    }
}


//------------ Sha1 ----------------------------------------------------------

/// Returns the SHA-1 digest of `data`.
///
/// SHA-1 is only used for key identifiers.
pub fn sha1_digest(data: &[u8]) -> Digest {
    digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, data)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bcder::Mode;
    use bcder::encode::Values;
    use super::*;

    #[test]
    fn algorithm_identifier() {
        let alg = DigestAlgorithm::default();
        let der = alg.encode().to_captured(Mode::Der);
        assert_eq!(
            der.as_slice(),
            b"\x30\x0d\x06\x09\x60\x86\x48\x01\x65\x03\x04\x02\x01\x05\x00"
        );
        assert_eq!(
            Mode::Der.decode(der.as_slice(), DigestAlgorithm::take_from)
                .unwrap(),
            alg
        );
        // The parameters may be absent, too.
        assert!(Mode::Der.decode(
            b"\x30\x0b\x06\x09\x60\x86\x48\x01\x65\x03\x04\x02\x01".as_ref(),
            DigestAlgorithm::take_from
        ).is_ok());
    }
}
