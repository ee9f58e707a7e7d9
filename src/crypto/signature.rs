//! Signature algorithms and operations.

use bcder::{decode, encode};
use bcder::{Oid, Tag};
use bcder::decode::DecodeError;
use bcder::encode::PrimitiveContent;
use bytes::Bytes;
use crate::oid;


//------------ SignatureAlgorithm --------------------------------------------

/// The signature algorithms used when signing ROAs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SignatureAlgorithm {
    /// RSA with PKCS#1 1.5 padding using SHA-256.
    RsaSha256,

    /// ECDSA using the P-256 curve and SHA-256.
    EcdsaP256Sha256,
}

/// # ASN.1 Values
///
/// In signed objects, the signature algorithm appears as an algorithm
/// identifier:
///
/// ```txt
/// SignatureAlgorithmIdentifier ::= AlgorithmIdentifier
/// AlgorithmIdentifier          ::= SEQUENCE {
///      algorithm                   OBJECT IDENTIFIER,
///      parameters                  ANY DEFINED BY algorithm OPTIONAL }
/// ```
///
/// [RFC 7935] demands `rsaEncryption` for constructed objects but both it
/// and `sha256WithRSAEncryption` must be accepted when reading. In both
/// cases the parameters are NULL or absent. For ECDSA, the identifier is
/// `ecdsa-with-SHA256` without parameters.
///
/// [RFC 7935]: https://tools.ietf.org/html/rfc7935
impl SignatureAlgorithm {
    /// Takes a signature algorithm identifier for CMS objects.
    pub fn cms_take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let oid = Oid::take_from(cons)?;
            if
                oid == oid::RSA_ENCRYPTION
                || oid == oid::SHA256_WITH_RSA_ENCRYPTION
            {
                cons.take_opt_primitive_if(Tag::NULL, |_| Ok(()))?;
                Ok(SignatureAlgorithm::RsaSha256)
            }
            else if oid == oid::ECDSA_WITH_SHA256 {
                Ok(SignatureAlgorithm::EcdsaP256Sha256)
            }
            else {
                Err(cons.content_err("invalid signature algorithm"))
            }
        })
    }

    /// Provides an encoder for CMS objects.
    pub fn cms_encode(self) -> impl encode::Values {
        match self {
            SignatureAlgorithm::RsaSha256 => {
                encode::Choice2::One(
                    encode::sequence((
                        oid::RSA_ENCRYPTION.encode(),
                        ().encode(),
                    ))
                )
            }
            SignatureAlgorithm::EcdsaP256Sha256 => {
                encode::Choice2::Two(
                    encode::sequence(
                        oid::ECDSA_WITH_SHA256.encode()
                    )
                )
            }
        }
    }
}


//------------ Signature -----------------------------------------------------

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Signature {
    algorithm: SignatureAlgorithm,
    value: Bytes
}

impl Signature {
    pub fn new(algorithm: SignatureAlgorithm, value: Bytes) -> Self {
        Signature { algorithm, value }
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }
}
