//! Types and parameters of keys.

use std::{fmt, io};
use std::convert::TryFrom;
use bcder::{decode, encode};
use bcder::{BitString, Mode, OctetString, Oid, Tag};
use bcder::decode::DecodeError;
use bcder::encode::PrimitiveContent;
use bytes::Bytes;
use ring::signature;
use crate::oid;
use crate::util::hex;
use super::digest::sha1_digest;
use super::signature::{Signature, SignatureAlgorithm};


//------------ PublicKeyFormat -----------------------------------------------

/// The formats of public keys accepted for signing ROAs.
///
/// Resource certificates use RSA keys as defined in section 3 of
/// [RFC 7935]. Keys on the P-256 curve are accepted as well.
///
/// [RFC 7935]: https://tools.ietf.org/html/rfc7935
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PublicKeyFormat {
    /// An RSA public key.
    Rsa,

    /// An ECDSA public key for the P-256 elliptic curve.
    EcdsaP256,
}

/// # ASN.1 Algorithm Identifiers
///
/// ```txt
/// AlgorithmIdentifier ::= SEQUENCE {
///      algorithm          OBJECT IDENTIFIER,
///      parameters         ANY DEFINED BY algorithm OPTIONAL }
/// ```
///
/// For RSA keys, the object identifier needs to be that of `rsaEncryption`
/// and the parameters must be NULL or absent. For ECDSA keys, it is
/// `ecPublicKey` with the curve identifier `secp256r1` as the parameter.
impl PublicKeyFormat {
    /// Takes and returns a algorithm identifier.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let alg = Oid::take_from(cons)?;
        if alg == oid::RSA_ENCRYPTION {
            cons.take_opt_null()?;
            Ok(PublicKeyFormat::Rsa)
        }
        else if alg == oid::EC_PUBLIC_KEY {
            oid::SECP256R1.skip_if(cons)?;
            Ok(PublicKeyFormat::EcdsaP256)
        }
        else {
            Err(cons.content_err("invalid public key algorithm"))
        }
    }

    /// Provides an encoder for the algorihm identifier.
    pub fn encode(self) -> impl encode::Values {
        match self {
            PublicKeyFormat::Rsa => {
                encode::Choice2::One(
                    encode::sequence((
                        oid::RSA_ENCRYPTION.encode(),
                        ().encode(),
                    ))
                )
            }
            PublicKeyFormat::EcdsaP256 => {
                encode::Choice2::Two(
                    encode::sequence((
                        oid::EC_PUBLIC_KEY.encode(),
                        oid::SECP256R1.encode(),
                    ))
                )
            }
        }
    }
}


//------------ PublicKey -----------------------------------------------------

/// A public key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKey {
    algorithm: PublicKeyFormat,
    bits: Bytes,
}

impl PublicKey {
    /// Creates a public key from its format and the key bits.
    pub fn new(algorithm: PublicKeyFormat, bits: Bytes) -> Self {
        PublicKey { algorithm, bits }
    }

    /// Returns the algorithm of this public key.
    pub fn algorithm(&self) -> PublicKeyFormat {
        self.algorithm
    }

    /// Returns the bits of this public key.
    pub fn bits(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a key identifier for this key.
    ///
    /// The identifier will be the SHA1 hash of the key’s bits.
    pub fn key_identifier(&self) -> KeyIdentifier {
        let mut res = [0u8; 20];
        res.copy_from_slice(sha1_digest(self.bits()).as_ref());
        KeyIdentifier(res)
    }

    /// Verifies a signature using this public key.
    pub fn verify(
        &self, message: &[u8], signature: &Signature
    ) -> Result<(), VerificationError> {
        let alg: &'static dyn signature::VerificationAlgorithm = match (
            self.algorithm, signature.algorithm()
        ) {
            (PublicKeyFormat::Rsa, SignatureAlgorithm::RsaSha256) => {
                &signature::RSA_PKCS1_2048_8192_SHA256
            }
            (
                PublicKeyFormat::EcdsaP256,
                SignatureAlgorithm::EcdsaP256Sha256
            ) => {
                &signature::ECDSA_P256_SHA256_ASN1
            }
            _ => return Err(VerificationError)
        };
        signature::UnparsedPublicKey::new(alg, self.bits()).verify(
            message, signature.value().as_ref()
        ).map_err(|_| VerificationError)
    }
}

/// # As `SubjectPublicKeyInfo`
///
/// Public keys are included in X.509 certificates as `SubjectPublicKeyInfo`
/// structures.
impl PublicKey {
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let algorithm = PublicKeyFormat::take_from(cons)?;
            let bits = BitString::take_from(cons)?;
            if bits.unused() != 0 {
                return Err(cons.content_err(
                    "unused bits in public key"
                ))
            }
            Ok(PublicKey { algorithm, bits: bits.octet_bytes() })
        })
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence((
            self.algorithm.encode(),
            BitString::new(0, self.bits.clone()).encode(),
        ))
    }
}


//------------ KeyIdentifier -------------------------------------------------

/// A key identifier.
///
/// This is the SHA-1 hash over the public key’s bits.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct KeyIdentifier([u8; 20]);

impl KeyIdentifier {
    /// Returns an octet slice of the key identifer’s value.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Parses an encoded key identifer from an encoded content.
    ///
    /// ```text
    /// KeyIdentifier ::= OCTET STRING
    /// ```
    ///
    /// The content of the octet string needs to be a SHA-1 hash, so it must
    /// be exactly 20 octets long.
    pub fn from_content<S: decode::Source>(
        content: &mut decode::Content<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let octets = OctetString::from_content(content)?.into_bytes();
        Self::try_from(octets.as_ref()).map_err(|_| {
            content.content_err("invalid key identifier")
        })
    }
}

impl<'a> TryFrom<&'a [u8]> for KeyIdentifier {
    type Error = InvalidKeyIdentifier;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        <[u8; 20]>::try_from(value).map(KeyIdentifier).map_err(|_| {
            InvalidKeyIdentifier
        })
    }
}

impl AsRef<[u8]> for KeyIdentifier {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        hex::write(self.as_slice(), f)
    }
}

impl fmt::Debug for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KeyIdentifier({})", self)
    }
}

impl PrimitiveContent for KeyIdentifier {
    const TAG: Tag = Tag::OCTET_STRING;

    fn encoded_len(&self, _mode: Mode) -> usize {
        20
    }

    fn write_encoded<W: io::Write>(
        &self,
        _mode: Mode,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(&self.0)
    }
}


//------------ InvalidKeyIdentifier ------------------------------------------

/// A key identifier was not exactly 20 octets long.
#[derive(Clone, Copy, Debug)]
pub struct InvalidKeyIdentifier;

impl fmt::Display for InvalidKeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid key identifier")
    }
}


//------------ VerificationError ---------------------------------------------

/// An error happened while verifying a signature.
///
/// No further information is provided. This is on purpose.
#[derive(Clone, Copy, Debug)]
pub struct VerificationError;

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("signature verification failed")
    }
}


//============ Tests =========================================================
