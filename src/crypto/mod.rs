//! Digests, keys, and signatures.
//!

pub use self::digest::{Digest, DigestAlgorithm};
pub use self::keys::{
    KeyIdentifier, PublicKey, PublicKeyFormat, VerificationError
};
pub use self::signer::{KeyFileSigner, KeyPair, RoaSigner, SigningError};
pub use self::signature::{Signature, SignatureAlgorithm};

pub mod digest;
pub mod keys;
pub mod signer;
pub mod signature;
