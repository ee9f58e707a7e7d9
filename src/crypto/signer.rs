//! Signing ROAs with keys kept in files.
//!
//! The builder only knows about the [`RoaSigner`] trait. The
//! [`KeyFileSigner`] implements it with private keys read from a PKCS#8
//! file and signs with _ring._

use std::{fmt, fs, io};
use std::path::Path;
use bytes::Bytes;
use log::debug;
use ring::rand;
use ring::signature::{self as ring_sig, KeyPair as _};
use crate::armor;
use crate::oid;
use crate::roa::RoaObject;
use crate::sigobj::{MessageDigest, SignedAttrs, SignerInfo};
use super::digest::DigestAlgorithm;
use super::keys::{PublicKey, PublicKeyFormat};
use super::signature::{Signature, SignatureAlgorithm};


/// The label of armored private keys.
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";


//------------ RoaSigner -----------------------------------------------------

/// A type that can sign a ROA with the key stored at a given path.
pub trait RoaSigner {
    /// An operational error happened in the signer.
    type Error: fmt::Display;

    /// Signs `roa` and installs the resulting signer info.
    ///
    /// Any signer info present before is replaced.
    fn sign_roa(
        &self, roa: &mut RoaObject, key_file: &Path
    ) -> Result<(), Self::Error>;
}

impl<'a, T: RoaSigner> RoaSigner for &'a T {
    type Error = T::Error;

    fn sign_roa(
        &self, roa: &mut RoaObject, key_file: &Path
    ) -> Result<(), Self::Error> {
        (*self).sign_roa(roa, key_file)
    }
}


//------------ KeyFileSigner -------------------------------------------------

/// A signer that reads the private key from a file.
///
/// The file contains either a DER encoded PKCS#8 private key or the same
/// armored with the label `PRIVATE KEY`.
pub struct KeyFileSigner {
    rng: rand::SystemRandom,
}

impl KeyFileSigner {
    pub fn new() -> Self {
        KeyFileSigner { rng: rand::SystemRandom::new() }
    }

    /// Signs `roa` with the given key pair.
    pub fn sign_with_key(
        &self, roa: &mut RoaObject, key: &KeyPair
    ) -> Result<(), SigningError> {
        let content = roa.attestation().to_der();
        let digest = MessageDigest::from(
            DigestAlgorithm::default().digest(content.as_ref())
        );
        let attrs = SignedAttrs::new(&oid::ROUTE_ORIGIN_AUTHZ, &digest);
        let signature = key.sign(&self.rng, attrs.encode_verify().as_ref())?;
        let sid = key.public_key().key_identifier();
        debug!("signed ROA for AS{} with key {}",
            roa.attestation().as_id(), sid
        );
        roa.set_signer_info(SignerInfo::new(sid, attrs, digest, signature));
        Ok(())
    }
}

impl Default for KeyFileSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl RoaSigner for KeyFileSigner {
    type Error = SigningError;

    fn sign_roa(
        &self, roa: &mut RoaObject, key_file: &Path
    ) -> Result<(), Self::Error> {
        debug!("loading signing key from {}", key_file.display());
        let key = KeyPair::from_file(key_file)?;
        self.sign_with_key(roa, &key)
    }
}


//------------ KeyPair -------------------------------------------------------

/// A private key together with its public key.
pub struct KeyPair {
    key: KeyPairKind,
    public_key: PublicKey,
}

enum KeyPairKind {
    Rsa(ring_sig::RsaKeyPair),
    EcdsaP256(ring_sig::EcdsaKeyPair),
}

impl KeyPair {
    /// Creates a key pair from a DER encoded PKCS#8 document.
    ///
    /// RSA keys are tried first, then keys on the P-256 curve.
    pub fn from_pkcs8(der: &[u8]) -> Result<Self, SigningError> {
        if let Ok(key) = ring_sig::RsaKeyPair::from_pkcs8(der) {
            let public_key = PublicKey::new(
                PublicKeyFormat::Rsa,
                Bytes::copy_from_slice(key.public_key().as_ref())
            );
            return Ok(KeyPair { key: KeyPairKind::Rsa(key), public_key })
        }
        match ring_sig::EcdsaKeyPair::from_pkcs8(
            &ring_sig::ECDSA_P256_SHA256_ASN1_SIGNING, der
        ) {
            Ok(key) => {
                let public_key = PublicKey::new(
                    PublicKeyFormat::EcdsaP256,
                    Bytes::copy_from_slice(key.public_key().as_ref())
                );
                Ok(KeyPair { key: KeyPairKind::EcdsaP256(key), public_key })
            }
            Err(err) => Err(SigningError::InvalidKey(err.to_string()))
        }
    }

    /// Creates a key pair from armored PKCS#8 data.
    pub fn from_pem(pem: &[u8]) -> Result<Self, SigningError> {
        let der = armor::decode(pem, PRIVATE_KEY_LABEL).map_err(|err| {
            SigningError::InvalidKey(err.to_string())
        })?;
        Self::from_pkcs8(&der)
    }

    /// Loads a key pair from a file.
    ///
    /// The file is considered armored if it contains a begin line for a
    /// private key.
    pub fn from_file(path: &Path) -> Result<Self, SigningError> {
        let data = fs::read(path)?;
        if is_armored(&data) {
            Self::from_pem(&data)
        }
        else {
            Self::from_pkcs8(&data)
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the algorithm signatures are created with.
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        match self.key {
            KeyPairKind::Rsa(_) => SignatureAlgorithm::RsaSha256,
            KeyPairKind::EcdsaP256(_) => SignatureAlgorithm::EcdsaP256Sha256,
        }
    }

    /// Signs `data`.
    pub fn sign(
        &self, rng: &dyn rand::SecureRandom, data: &[u8]
    ) -> Result<Signature, SigningError> {
        let value = match self.key {
            KeyPairKind::Rsa(ref key) => {
                let mut sig = vec![0; key.public_modulus_len()];
                key.sign(&ring_sig::RSA_PKCS1_SHA256, rng, data, &mut sig)
                    .map_err(|_| SigningError::Sign)?;
                Bytes::from(sig)
            }
            KeyPairKind::EcdsaP256(ref key) => {
                let sig = key.sign(rng, data).map_err(|_| {
                    SigningError::Sign
                })?;
                Bytes::copy_from_slice(sig.as_ref())
            }
        };
        Ok(Signature::new(self.signature_algorithm(), value))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish()
    }
}

fn is_armored(data: &[u8]) -> bool {
    data.iter().enumerate().any(|(pos, ch)| {
        *ch == b'-'
        && armor::find_armor(&data[pos..], "BEGIN", PRIVATE_KEY_LABEL)
            .is_some()
    })
}


//------------ SigningError --------------------------------------------------

/// Signing a ROA failed.
#[derive(Debug)]
pub enum SigningError {
    /// The key file could not be read.
    Io(io::Error),

    /// The key file does not contain a usable private key.
    InvalidKey(String),

    /// The signature could not be created.
    Sign,
}

impl From<io::Error> for SigningError {
    fn from(err: io::Error) -> Self {
        SigningError::Io(err)
    }
}

impl fmt::Display for SigningError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SigningError::Io(ref err) => {
                write!(f, "cannot read key file: {}", err)
            }
            SigningError::InvalidKey(ref msg) => {
                write!(f, "invalid private key: {}", msg)
            }
            SigningError::Sign => f.write_str("signing failed"),
        }
    }
}

impl std::error::Error for SigningError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::cert::Cert;
    use crate::prefix::{AddressFamily, EncodedAddr};
    use crate::roa::RoaPrefix;

    fn roa() -> RoaObject {
        let mut roa = RoaObject::new();
        roa.attestation_mut().set_as_id(64496);
        roa.attestation_mut().push_family(AddressFamily::Ipv4).unwrap().push(
            RoaPrefix::new(
                EncodedAddr::from_prefix_str(
                    AddressFamily::Ipv4, "192.0.2.0/24"
                ).unwrap(),
                None
            ).into()
        ).unwrap();
        roa
    }

    #[test]
    fn der_and_pem_keys_match() {
        let der = KeyPair::from_pkcs8(
            include_bytes!("../../test-data/ee-key.der")
        ).unwrap();
        let pem = KeyPair::from_pem(
            include_bytes!("../../test-data/ee-key.pem")
        ).unwrap();
        assert_eq!(der.public_key(), pem.public_key());
        assert_eq!(der.signature_algorithm(), SignatureAlgorithm::RsaSha256);
    }

    #[test]
    fn key_matches_cert() {
        let key = KeyPair::from_pkcs8(
            include_bytes!("../../test-data/ee-key.der")
        ).unwrap();
        let cert = Cert::decode(include_bytes!("../../test-data/ee.cer"))
            .unwrap();
        assert_eq!(
            key.public_key().key_identifier(),
            cert.subject_key_identifier()
        );
    }

    #[test]
    fn sign_and_verify() {
        let key = KeyPair::from_pkcs8(
            include_bytes!("../../test-data/ee-key.der")
        ).unwrap();
        let mut roa = roa();
        KeyFileSigner::new().sign_with_key(&mut roa, &key).unwrap();

        let info = roa.signer_info().unwrap();
        assert_eq!(info.sid(), key.public_key().key_identifier());
        assert_eq!(
            info.message_digest().as_ref(),
            DigestAlgorithm::default().digest(
                roa.attestation().to_der().as_ref()
            ).as_ref()
        );
        key.public_key().verify(
            info.signed_attrs().encode_verify().as_ref(),
            info.signature()
        ).unwrap();
    }

    #[test]
    fn sign_with_der_key_files() {
        for name in &["ee-key.der", "other-key.der", "ee-key.pem"] {
            let path = Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("test-data").join(name);
            let mut roa = roa();
            KeyFileSigner::new().sign_roa(&mut roa, &path).unwrap();
            assert!(roa.is_signed(), "{}", name);
        }
    }

    #[test]
    fn garbage_key() {
        assert!(matches!(
            KeyPair::from_pkcs8(b"\x30\x03\x02\x01\x00"),
            Err(SigningError::InvalidKey(_))
        ));
        assert!(matches!(
            KeyPair::from_pem(b"no armor here"),
            Err(SigningError::InvalidKey(_))
        ));
    }

    #[test]
    fn missing_key_file() {
        let mut roa = roa();
        let err = KeyFileSigner::new().sign_roa(
            &mut roa, Path::new("/nonexistent/roa-key.der")
        ).unwrap_err();
        assert!(matches!(err, SigningError::Io(_)));
        assert!(!roa.is_signed());
    }
}
