//! End entity certificates.
//!
//! A ROA may carry the certificate whose key signed it. This crate does not
//! validate certificates. It only keeps the encoded certificate around and
//! looks into it far enough to find the subject public key.

use bcder::decode;
use bcder::{Captured, Mode, Tag};
use bcder::decode::DecodeError;
use bytes::Bytes;
use crate::crypto::{KeyIdentifier, PublicKey};
use crate::error::RoaError;
use crate::util::der;


//------------ Cert ----------------------------------------------------------

/// An encoded X.509 certificate.
#[derive(Clone, Debug)]
pub struct Cert {
    raw: Captured,
    public_key: PublicKey,
}

impl Cert {
    /// Decodes a certificate that spans all of `data`.
    pub fn decode(data: &[u8]) -> Result<Self, RoaError> {
        der::check_exact(data)?;
        Mode::Der.decode(
            Bytes::copy_from_slice(data), Self::take_from
        ).map_err(|err| RoaError::encoding(0, err.to_string()))
    }

    /// Takes an encoded certificate from the beginning of a value.
    ///
    /// ```txt
    /// Certificate  ::=  SEQUENCE  {
    ///      tbsCertificate       TBSCertificate,
    ///      signatureAlgorithm   AlgorithmIdentifier,
    ///      signatureValue       BIT STRING  }
    /// ```
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let raw = cons.capture_one()?;
        let public_key = Mode::Der.decode(
            raw.as_slice(), Self::take_public_key
        ).map_err(DecodeError::convert)?;
        Ok(Cert { raw, public_key })
    }

    fn take_public_key<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<PublicKey, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let key = cons.take_sequence(|cons| {
                // version [0] EXPLICIT Version DEFAULT v1
                cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
                    cons.skip_all()
                })?;
                cons.capture_one()?; // serialNumber
                cons.capture_one()?; // signature
                cons.capture_one()?; // issuer
                cons.capture_one()?; // validity
                cons.capture_one()?; // subject
                let key = PublicKey::take_from(cons)?;
                cons.skip_all()?; // unique identifiers and extensions
                Ok(key)
            })?;
            cons.skip_all()?;
            Ok(key)
        })
    }

    /// Returns the subject public key.
    pub fn subject_public_key_info(&self) -> &PublicKey {
        &self.public_key
    }

    /// Returns the key identifier of the subject public key.
    ///
    /// This is computed from the key as described in method 1 of section
    /// 4.2.1.2 of RFC 5280 rather than taken from the extension.
    pub fn subject_key_identifier(&self) -> KeyIdentifier {
        self.public_key.key_identifier()
    }

    /// Returns the encoded certificate.
    pub fn as_slice(&self) -> &[u8] {
        self.raw.as_slice()
    }

    /// Returns a value encoder for a reference to the certificate.
    pub fn encode_ref(&self) -> &Captured {
        &self.raw
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_ee_cert() {
        let data = include_bytes!("../test-data/ee.cer");
        let cert = Cert::decode(data).unwrap();
        assert_eq!(cert.as_slice(), data.as_ref());
        assert_eq!(
            cert.subject_public_key_info().algorithm(),
            crate::crypto::PublicKeyFormat::Rsa
        );
    }

    #[test]
    fn decode_trailing_data() {
        let mut data = include_bytes!("../test-data/ee.cer").to_vec();
        let len = data.len();
        data.push(0);
        match Cert::decode(&data) {
            Err(RoaError::InvalidEncoding { offset, .. }) => {
                assert_eq!(offset, len)
            }
            res => panic!("unexpected result {:?}", res.map(|_| ()))
        }
    }
}
