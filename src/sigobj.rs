//! Signed objects.
//
// See RFC 6488 and RFC 5652.

use bcder::{decode, encode};
use bcder::{Captured, ConstOid, Mode, OctetString, Oid, Tag};
use bcder::decode::DecodeError;
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use crate::oid;
use crate::cert::Cert;
use crate::crypto::{
    Digest, DigestAlgorithm, KeyIdentifier, Signature, SignatureAlgorithm,
};


//------------ SignedObject --------------------------------------------------

/// The CMS wrapper of a signed object.
///
/// The value contains everything of the SignedData structure except for the
/// encapsulated content itself which is handed in and out separately.
///
/// ```txt
/// ContentInfo ::= SEQUENCE {
///     contentType        ContentType,
///     content            [0] EXPLICIT ANY DEFINED BY contentType }
///
/// SignedData ::= SEQUENCE {
///     version            CMSVersion,
///     digestAlgorithms   DigestAlgorithmIdentifiers,
///     encapContentInfo   EncapsulatedContentInfo,
///     certificates       [0] IMPLICIT CertificateSet OPTIONAL,
///     crls               [1] IMPLICIT RevocationInfoChoices OPTIONAL,
///     signerInfos        SignerInfos }
/// ```
///
/// Unlike section 2.1 of RFC 6488, the certificate and the signer info are
/// optional so that objects can be kept around before they are signed.
#[derive(Clone, Debug)]
pub struct SignedObject {
    version: u8,
    cert: Option<Cert>,
    signer_info: Option<SignerInfo>,
}

/// # Data Access
///
impl SignedObject {
    /// Creates a new, unsigned object of the given version.
    pub fn new(version: u8) -> Self {
        SignedObject { version, cert: None, signer_info: None }
    }

    /// Returns the version of the SignedData and SignerInfo structures.
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn set_version(&mut self, version: u8) {
        self.version = version
    }

    /// Returns a reference to the certificate the object is signed with.
    pub fn cert(&self) -> Option<&Cert> {
        self.cert.as_ref()
    }

    pub fn set_cert(&mut self, cert: Cert) {
        self.cert = Some(cert)
    }

    /// Returns the signer info if the object has been signed.
    pub fn signer_info(&self) -> Option<&SignerInfo> {
        self.signer_info.as_ref()
    }

    pub fn set_signer_info(&mut self, signer_info: SignerInfo) {
        self.signer_info = Some(signer_info)
    }
}

/// # Decoding and Encoding
///
impl SignedObject {
    /// Takes a signed object from an encoded constructed value.
    ///
    /// The content type of the encapsulated content must be `content_type`.
    /// Returns the object and the encapsulated content.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        content_type: &ConstOid,
    ) -> Result<(Self, OctetString), DecodeError<S::Error>> {
        cons.take_sequence(|cons| { // ContentInfo
            oid::SIGNED_DATA.skip_if(cons)?; // contentType
            cons.take_constructed_if(Tag::CTX_0, |cons| { // content
                cons.take_sequence(|cons| { // SignedData
                    let version = cons.take_u8()?;
                    let digest_algorithm =
                        DigestAlgorithm::take_set_from(cons)?;
                    let content = cons.take_sequence(|cons| {
                        // encapContentInfo
                        let oid = Oid::take_from(cons)?;
                        if oid.ne(content_type) {
                            return Err(cons.content_err(
                                "invalid content type"
                            ))
                        }
                        cons.take_constructed_if(
                            Tag::CTX_0, OctetString::take_from
                        )
                    })?;
                    let cert = cons.take_opt_constructed_if( // certificates
                        Tag::CTX_0, Cert::take_from
                    )?;
                    // no crls
                    let signer_info = cons.take_set(|cons| { // signerInfos
                        SignerInfo::take_opt_from(
                            cons, digest_algorithm, content_type
                        )
                    })?;
                    if let Some((signer_version, _)) = signer_info.as_ref() {
                        if *signer_version != version {
                            return Err(cons.content_err(
                                "version mismatch between SignedData \
                                 and SignerInfo"
                            ))
                        }
                    }
                    Ok((
                        SignedObject {
                            version,
                            cert,
                            signer_info: signer_info.map(|(_, info)| info),
                        },
                        content
                    ))
                })
            })
        })
    }

    /// Returns a value encoder for the object with the given content.
    pub fn encode_ref<'a>(
        &'a self,
        content_type: &'a ConstOid,
        content: Bytes,
    ) -> impl encode::Values + 'a {
        encode::sequence((
            oid::SIGNED_DATA.encode(), // contentType
            encode::sequence_as(Tag::CTX_0, // content
                encode::sequence((
                    self.version.encode(), // version
                    DigestAlgorithm::default().encode_set(),
                    encode::sequence(( // encapContentInfo
                        content_type.encode_ref(),
                        encode::sequence_as(Tag::CTX_0,
                            OctetString::encode_slice(content)
                        ),
                    )),
                    self.cert.as_ref().map(|cert| {
                        encode::sequence_as(Tag::CTX_0, // certificates
                            cert.encode_ref()
                        )
                    }),
                    // crl -- omitted
                    encode::set( // signerInfos
                        self.signer_info.as_ref().map(|info| {
                            info.encode_ref(self.version)
                        })
                    )
                ))
            )
        ))
    }
}


//------------ SignerInfo ----------------------------------------------------

/// The signer info of a signed object.
///
/// ```txt
/// SignerInfo ::= SEQUENCE {
///     version            CMSVersion,
///     sid                SignerIdentifier,
///     digestAlgorithm    DigestAlgorithmIdentifier,
///     signedAttrs        [0] IMPLICIT SignedAttributes OPTIONAL,
///     signatureAlgorithm SignatureAlgorithmIdentifier,
///     signature          SignatureValue,
///     unsignedAttrs      [1] IMPLICIT UnsignedAttributes OPTIONAL }
/// ```
///
/// The version is that of the surrounding SignedData and is not kept here.
#[derive(Clone, Debug)]
pub struct SignerInfo {
    sid: KeyIdentifier,
    signed_attrs: SignedAttrs,
    message_digest: MessageDigest,
    signature: Signature,
}

impl SignerInfo {
    pub fn new(
        sid: KeyIdentifier,
        signed_attrs: SignedAttrs,
        message_digest: MessageDigest,
        signature: Signature,
    ) -> Self {
        SignerInfo { sid, signed_attrs, message_digest, signature }
    }

    /// Returns the subject key identifier of the signing key.
    pub fn sid(&self) -> KeyIdentifier {
        self.sid
    }

    pub fn signed_attrs(&self) -> &SignedAttrs {
        &self.signed_attrs
    }

    /// Returns the message digest attribute.
    pub fn message_digest(&self) -> &MessageDigest {
        &self.message_digest
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Takes an optional signer info.
    ///
    /// Returns the version of the signer info and the signer info itself.
    fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        digest_algorithm: DigestAlgorithm,
        content_type: &ConstOid,
    ) -> Result<Option<(u8, Self)>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let version = cons.take_u8()?;
            let sid = cons.take_value_if(
                Tag::CTX_0, KeyIdentifier::from_content
            )?;
            let alg = DigestAlgorithm::take_from(cons)?;
            if alg != digest_algorithm {
                return Err(cons.content_err("digest algorithm mismatch"))
            }
            let (signed_attrs, message_digest, attr_type) =
                SignedAttrs::take_from(cons)?;
            if attr_type.ne(content_type) {
                return Err(cons.content_err(
                    "content type in signed attributes differs"
                ))
            }
            let signature = Signature::new(
                SignatureAlgorithm::cms_take_from(cons)?,
                OctetString::take_from(cons)?.into_bytes()
            );
            // no unsignedAttributes
            Ok((version, SignerInfo {
                sid, signed_attrs, message_digest, signature
            }))
        })
    }

    fn encode_ref(&self, version: u8) -> impl encode::Values + '_ {
        encode::sequence((
            version.encode(),
            self.sid.encode_ref_as(Tag::CTX_0),
            DigestAlgorithm::default().encode(), // digestAlgorithm
            self.signed_attrs.encode_ref(), // signedAttrs
            self.signature.algorithm().cms_encode(), // signatureAlgorithm
            OctetString::encode_slice( // signature
                self.signature.value().as_ref()
            ),
            // unsignedAttrs omitted
        ))
    }
}


//------------ SignedAttrs ---------------------------------------------------

/// The raw content of the signed attributes.
///
/// The signature is calculated over the DER encoding of the attributes with
/// the tag for SET OF rather than the \[0\] found in the actual data. The
/// value keeps the captured content of the set only, without tag and
/// length.
#[derive(Clone, Debug)]
pub struct SignedAttrs(Captured);

impl SignedAttrs {
    /// Creates the content type and message digest attributes.
    pub fn new(content_type: &ConstOid, digest: &MessageDigest) -> Self {
        // DER orders SET OF values by their encoding. Both are sequences of
        // fixed size and the content type attribute is the shorter one, so
        // it always comes first.
        let mut res = Captured::builder(Mode::Der);
        res.extend(encode::sequence((
            oid::CONTENT_TYPE.encode(),
            encode::set(
                content_type.encode_ref(),
            )
        )));
        res.extend(encode::sequence((
            oid::MESSAGE_DIGEST.encode(),
            encode::set(
                digest.encode_ref(),
            )
        )));
        SignedAttrs(res.freeze())
    }

    /// Takes the signed attributes from the beginning of a constructed value.
    ///
    /// Returns the raw signed attrs, the message digest, and the content
    /// type object identifier. Attributes other than these two are skipped.
    #[allow(clippy::type_complexity)]
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<(Self, MessageDigest, Oid<Bytes>), DecodeError<S::Error>> {
        let mut message_digest = None;
        let mut content_type = None;
        let raw = cons.take_constructed_if(Tag::CTX_0, |cons| {
            cons.capture(|cons| {
                while let Some(()) = cons.take_opt_sequence(|cons| {
                    let oid = Oid::take_from(cons)?;
                    if oid == oid::CONTENT_TYPE {
                        if content_type.is_some() {
                            return Err(cons.content_err(
                                "duplicate Content Type attribute"
                            ))
                        }
                        content_type = Some(
                            cons.take_set(|cons| Oid::take_from(cons))?
                        );
                        Ok(())
                    }
                    else if oid == oid::MESSAGE_DIGEST {
                        if message_digest.is_some() {
                            return Err(cons.content_err(
                                "duplicate Message Digest attribute"
                            ))
                        }
                        message_digest = Some(
                            cons.take_set(OctetString::take_from)?
                        );
                        Ok(())
                    }
                    else {
                        cons.skip_all()
                    }
                })? { }
                Ok(())
            })
        })?;
        let message_digest = match message_digest {
            Some(some) => MessageDigest::from(some),
            None => {
                return Err(cons.content_err(
                    "missing message digest in signed attributes"
                ))
            }
        };
        let content_type = match content_type {
            Some(some) => some,
            None => {
                return Err(cons.content_err(
                    "missing content type in signed attributes"
                ))
            }
        };
        Ok((SignedAttrs(raw), message_digest, content_type))
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence_as(Tag::CTX_0, &self.0)
    }

    /// Creates the message for signing and verification.
    pub fn encode_verify(&self) -> Bytes {
        encode::set(&self.0).to_captured(Mode::Der).into_bytes()
    }
}

impl AsRef<[u8]> for SignedAttrs {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//------------ MessageDigest -------------------------------------------------

/// The message digest attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessageDigest(Bytes);

impl MessageDigest {
    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        OctetString::encode_slice(self.0.as_ref())
    }
}

impl From<OctetString> for MessageDigest {
    fn from(src: OctetString) -> Self {
        MessageDigest(src.into_bytes())
    }
}

impl From<Digest> for MessageDigest {
    fn from(digest: Digest) -> Self {
        MessageDigest(Bytes::copy_from_slice(digest.as_ref()))
    }
}

impl AsRef<[u8]> for MessageDigest {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signed_attrs_order_and_verify_message() {
        let digest = MessageDigest::from(
            DigestAlgorithm::default().digest(b"attestation")
        );
        let attrs = SignedAttrs::new(&oid::ROUTE_ORIGIN_AUTHZ, &digest);
        // content type attribute: 26 octets of content, message digest
        // attribute: 47 octets.
        assert_eq!(&attrs.as_ref()[..2], b"\x30\x1a");
        assert_eq!(&attrs.as_ref()[28..30], b"\x30\x2f");
        assert_eq!(attrs.as_ref().len(), 28 + 49);

        let msg = attrs.encode_verify();
        assert_eq!(&msg[..2], &[0x31, 77]);
        assert_eq!(&msg[2..], attrs.as_ref());
    }

    #[test]
    fn signed_attrs_round_trip() {
        let digest = MessageDigest::from(
            DigestAlgorithm::default().digest(b"attestation")
        );
        let attrs = SignedAttrs::new(&oid::ROUTE_ORIGIN_AUTHZ, &digest);
        let der = attrs.encode_ref().to_captured(Mode::Der);
        let (decoded, decoded_digest, content_type) = Mode::Der.decode(
            der.as_slice(), SignedAttrs::take_from
        ).unwrap();
        assert_eq!(decoded.as_ref(), attrs.as_ref());
        assert_eq!(decoded_digest, digest);
        assert_eq!(content_type, oid::ROUTE_ORIGIN_AUTHZ);
    }
}
