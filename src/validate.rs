//! Semantic validation of ROAs.
//!
//! Decoding a ROA only makes sure that it is well-formed. The validators in
//! this module check that its content makes sense and, if it is signed,
//! that the signature fits the content. They do not validate the EE
//! certificate itself.

use log::debug;
use crate::crypto::DigestAlgorithm;
use crate::error::RoaError;
use crate::roa::{AddressEntry, RoaObject};


//------------ RoaValidator --------------------------------------------------

/// A type that can decide whether a ROA is acceptable.
pub trait RoaValidator {
    fn validate(&self, roa: &RoaObject) -> Result<(), RoaError>;
}

impl<'a, T: RoaValidator> RoaValidator for &'a T {
    fn validate(&self, roa: &RoaObject) -> Result<(), RoaError> {
        (*self).validate(roa)
    }
}


//------------ BasicValidator ------------------------------------------------

/// The validator used by default when loading ROAs.
///
/// It checks the content as described in RFC 6482 and, if there is a signer
/// info, the message digest. If the object also carries its EE certificate,
/// the signature is verified with the certificate’s key.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicValidator {
    /// Whether unsigned objects are rejected.
    pub require_signature: bool,
}

impl BasicValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that rejects unsigned objects.
    pub fn strict() -> Self {
        BasicValidator { require_signature: true }
    }

    /// Checks the content of the object.
    fn inspect(&self, roa: &RoaObject) -> Result<(), RoaError> {
        if roa.version() != RoaObject::VERSION {
            return Err(RoaError::Validation(
                format!("unsupported version {}", roa.version())
            ))
        }
        let attestation = roa.attestation();
        if attestation.as_id() == 0 {
            return Err(RoaError::Validation("AS0 is not allowed".into()))
        }
        if attestation.families().is_empty() {
            return Err(RoaError::Validation("no address blocks".into()))
        }
        let mut last_afi = None;
        for block in attestation.families() {
            let afi = block.family().afi();
            if let Some(last) = last_afi {
                if afi <= last {
                    return Err(RoaError::Validation(
                        "address blocks out of order".into()
                    ))
                }
            }
            last_afi = Some(afi);
            if block.entries().is_empty() {
                return Err(RoaError::Validation(
                    format!("empty {} address block", block.family())
                ))
            }
            for entry in block.entries() {
                match *entry {
                    AddressEntry::Prefix(ref prefix) => {
                        if let Some(max) = prefix.max_length() {
                            if
                                max < prefix.addr().bit_len()
                                || max > block.family().addr_bits()
                            {
                                return Err(RoaError::Validation(format!(
                                    "invalid max length in {}", prefix
                                )))
                            }
                        }
                    }
                    AddressEntry::Range(ref range) => {
                        if !range.is_ordered() {
                            return Err(RoaError::Validation(format!(
                                "inverted address range {}", range
                            )))
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Checks the signature of the object if there is one.
    fn verify(&self, roa: &RoaObject) -> Result<(), RoaError> {
        let info = match roa.signer_info() {
            Some(info) => info,
            None => {
                if self.require_signature {
                    return Err(RoaError::Validation(
                        "object is unsigned".into()
                    ))
                }
                return Ok(())
            }
        };
        let digest = DigestAlgorithm::default().digest(
            roa.attestation().to_der().as_ref()
        );
        if digest.as_ref() != info.message_digest().as_ref() {
            return Err(RoaError::Validation(
                "message digest mismatch".into()
            ))
        }
        let cert = match roa.cert() {
            Some(cert) => cert,
            None => {
                debug!("no EE certificate, skipping signature check");
                return Ok(())
            }
        };
        if cert.subject_key_identifier() != info.sid() {
            return Err(RoaError::Validation(
                "subject key identifier mismatch".into()
            ))
        }
        cert.subject_public_key_info().verify(
            info.signed_attrs().encode_verify().as_ref(),
            info.signature()
        ).map_err(|err| RoaError::Validation(err.to_string()))
    }
}

impl RoaValidator for BasicValidator {
    fn validate(&self, roa: &RoaObject) -> Result<(), RoaError> {
        self.inspect(roa)?;
        self.verify(roa)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::cert::Cert;
    use crate::crypto::{KeyFileSigner, KeyPair};
    use crate::prefix::{AddressFamily, EncodedAddr};
    use crate::roa::{AddressRange, RoaPrefix};

    fn prefix(
        family: AddressFamily, s: &str, max: Option<u8>
    ) -> AddressEntry {
        RoaPrefix::new(
            EncodedAddr::from_prefix_str(family, s).unwrap(), max
        ).into()
    }

    fn roa() -> RoaObject {
        let mut roa = RoaObject::new();
        roa.attestation_mut().set_as_id(64496);
        roa.attestation_mut().push_family(AddressFamily::Ipv4).unwrap().push(
            prefix(AddressFamily::Ipv4, "192.0.2.0/24", Some(28))
        ).unwrap();
        roa
    }

    fn key() -> KeyPair {
        KeyPair::from_pkcs8(include_bytes!("../test-data/ee-key.der"))
            .unwrap()
    }

    fn cert() -> Cert {
        Cert::decode(include_bytes!("../test-data/ee.cer")).unwrap()
    }

    fn fails(validator: BasicValidator, roa: &RoaObject) {
        assert!(matches!(
            validator.validate(roa), Err(RoaError::Validation(_))
        ));
    }

    #[test]
    fn content() {
        let validator = BasicValidator::new();
        validator.validate(&roa()).unwrap();

        let mut bad = roa();
        bad.set_version(2);
        fails(validator, &bad);

        let mut bad = roa();
        bad.attestation_mut().set_as_id(0);
        fails(validator, &bad);

        let mut bad = roa();
        bad.attestation_mut().push_family(AddressFamily::Ipv6).unwrap();
        fails(validator, &bad);

        let mut bad = RoaObject::new();
        bad.attestation_mut().set_as_id(1);
        fails(validator, &bad);

        let mut bad = RoaObject::new();
        bad.attestation_mut().set_as_id(1);
        bad.attestation_mut().push_family(AddressFamily::Ipv6).unwrap().push(
            prefix(AddressFamily::Ipv6, "2001:db8::/32", None)
        ).unwrap();
        bad.attestation_mut().push_family(AddressFamily::Ipv4).unwrap().push(
            prefix(AddressFamily::Ipv4, "10.0.0.0/8", None)
        ).unwrap();
        fails(validator, &bad);
    }

    #[test]
    fn inverted_range() {
        let mut bad = roa();
        bad.attestation_mut().last_family_mut().unwrap().push(
            AddressRange::new(
                EncodedAddr::range_min(AddressFamily::Ipv4, "10.0.1.0")
                    .unwrap(),
                EncodedAddr::range_max(AddressFamily::Ipv4, "10.0.0.255")
                    .unwrap(),
            ).into()
        ).unwrap();
        fails(BasicValidator::new(), &bad);
    }

    #[test]
    fn signed() {
        let mut roa = roa();
        roa.set_cert(cert());
        fails(BasicValidator::strict(), &roa);

        KeyFileSigner::new().sign_with_key(&mut roa, &key()).unwrap();
        BasicValidator::strict().validate(&roa).unwrap();

        // Changing the content breaks the digest.
        let mut bad = roa.clone();
        bad.attestation_mut().set_as_id(64497);
        fails(BasicValidator::new(), &bad);
    }

    #[test]
    fn wrong_key() {
        let other = KeyPair::from_pkcs8(
            include_bytes!("../test-data/other-key.der")
        ).unwrap();
        let mut roa = roa();
        roa.set_cert(cert());
        KeyFileSigner::new().sign_with_key(&mut roa, &other).unwrap();
        fails(BasicValidator::new(), &roa);
    }
}
