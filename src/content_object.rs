//! Signed, named data packets.
//!
//! A [`ContentObject`] is created unsigned, then [`sign`][ContentObject::sign] produces a signed
//! copy. The signature covers the encoded Name, SignedInfo, and Content elements, concatenated in
//! that order. Decoding keeps a copy of exactly those bytes as they appeared on the wire, and
//! [`verify`][ContentObject::verify] checks the signature against that copy. Re-encoding isn't
//! guaranteed to reproduce the bytes another encoder signed, so verification never re-encodes
//! unless asked to through [`verify_in_memory`][ContentObject::verify_in_memory].

use educe::Educe;
use fog_crypto::{hash::Hash, identity::UnverifiedSignature};
use serde::{Deserialize, Serialize};

use crate::{
    dtag::DTag,
    encoder::BinaryXmlEncoder,
    error::{Error, Result},
    key::{KeyManager, PublicKey},
    name::Name,
    signature::Signature,
    signed_info::SignedInfo,
    wire_format::{BinaryXmlWireFormat, WireFormat},
};

/// A named, signed packet. Equality compares the logical fields only; the captured signed
/// region is bookkeeping from the last decode.
#[derive(Educe, Clone, Debug, Serialize, Deserialize)]
#[educe(PartialEq)]
pub struct ContentObject {
    name: Name,
    signed_info: SignedInfo,
    #[serde(with = "serde_bytes")]
    content: Vec<u8>,
    signature: Signature,
    #[educe(PartialEq(ignore))]
    #[serde(skip)]
    raw_signed_region: Option<Vec<u8>>,
}

impl ContentObject {
    /// Create a new, unsigned ContentObject. Text content is stored as its UTF-8 bytes.
    pub fn new(name: Name, signed_info: SignedInfo, content: impl Into<Vec<u8>>) -> ContentObject {
        ContentObject {
            name,
            signed_info,
            content: content.into(),
            signature: Signature::new(),
            raw_signed_region: None,
        }
    }

    /// Create a new, unsigned ContentObject, parsing the name from its URI form.
    pub fn from_uri(
        uri: &str,
        signed_info: SignedInfo,
        content: impl Into<Vec<u8>>,
    ) -> Result<ContentObject> {
        Ok(Self::new(uri.parse()?, signed_info, content))
    }

    /// Replace the signature block.
    pub fn with_signature(mut self, signature: Signature) -> ContentObject {
        self.signature = signature;
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn signed_info(&self) -> &SignedInfo {
        &self.signed_info
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The bytes the signature covers, as found on the wire. Only present on decoded objects.
    pub fn raw_signed_region(&self) -> Option<&[u8]> {
        self.raw_signed_region.as_deref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.validate()
    }

    pub fn element_tag() -> DTag {
        DTag::ContentObject
    }

    fn encode_part(f: impl FnOnce(&mut BinaryXmlEncoder) -> Result<()>) -> Result<Vec<u8>> {
        let mut enc = BinaryXmlEncoder::new();
        f(&mut enc)?;
        enc.finish()
    }

    /// Build the signed region from the in-memory fields: the Name, SignedInfo, and Content
    /// elements, each encoded on its own and concatenated.
    pub fn signed_region_from_fields(&self) -> Result<Vec<u8>> {
        let mut region = Self::encode_part(|enc| self.name.encode(enc))?;
        region.extend(Self::encode_part(|enc| self.signed_info.encode(enc))?);
        region.extend(Self::encode_part(|enc| {
            enc.write_element(DTag::Content, &self.content)
        })?);
        Ok(region)
    }

    /// Sign with the active identity, returning the signed object. The signature block is
    /// replaced by fresh bits under the default digest algorithm, with no witness. Any previously
    /// captured signed region is left as it was.
    pub fn sign(mut self, keys: &KeyManager) -> Result<ContentObject> {
        let key = keys.private_key()?;
        let region = self.signed_region_from_fields()?;
        let signature = key.sign(&Hash::new(region.as_slice()));
        let mut bits = Vec::with_capacity(signature.size());
        signature.encode_vec(&mut bits);
        self.signature = std::mem::take(&mut self.signature)
            .clear_algorithm()
            .with_signature_bits(bits);
        tracing::debug!(name = %self.name, "signed content object");
        Ok(self)
    }

    /// Record the signed region from the wire bytes: `start` is the first byte of the Name
    /// element, `end` is one past the last byte of the Content element.
    pub fn capture_signed_region(&mut self, wire: &[u8], start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(Error::BadEncode(format!(
                "Signed region starts at {} but ends at {}",
                start, end
            )));
        }
        if end > wire.len() {
            return Err(Error::LengthTooShort {
                step: "capture signed region",
                actual: wire.len(),
                expected: end,
            });
        }
        self.raw_signed_region = Some(wire[start..end].to_vec());
        Ok(())
    }

    fn verify_region(&self, region: &[u8], key: &PublicKey) -> Result<bool> {
        let bits = self
            .signature
            .signature_bits()
            .ok_or(Error::MissingSignature)?;
        let unverified = match UnverifiedSignature::try_from(bits) {
            Ok(unverified) => unverified,
            Err(err) => {
                tracing::debug!(name = %self.name, error = %err, "malformed signature bits");
                return Ok(false);
            }
        };
        if unverified.signer() != key.identity() {
            tracing::debug!(name = %self.name, "signature made by a different key");
            return Ok(false);
        }
        let verified = unverified.verify(&Hash::new(region)).is_ok();
        tracing::debug!(name = %self.name, verified, "checked signature");
        Ok(verified)
    }

    /// Check the signature against the signed region captured at decode time. Fails if this
    /// object was never decoded or carries no signature bits. A signature that doesn't match
    /// the key, or doesn't parse, yields `Ok(false)`.
    pub fn verify(&self, key: &PublicKey) -> Result<bool> {
        let region = self
            .raw_signed_region
            .as_deref()
            .ok_or(Error::NoSignedRegion)?;
        self.verify_region(region, key)
    }

    /// Verify using the public key held by a key manager.
    pub fn verify_with(&self, keys: &KeyManager) -> Result<bool> {
        self.verify(keys.public_key()?)
    }

    /// Verify using the public key embedded in this object's own KeyLocator. This shows the
    /// packet is self-consistent, not that the key is trusted.
    pub fn verify_with_locator(&self) -> Result<bool> {
        let key = match self.signed_info.locator() {
            Some(locator) => locator.embedded_key()?,
            None => None,
        };
        let key = key.ok_or(Error::NoPublicKey)?;
        self.verify(&key)
    }

    /// Verify against a signed region rebuilt from the in-memory fields. Use this for objects
    /// that were signed locally and never serialized.
    pub fn verify_in_memory(&self, key: &PublicKey) -> Result<bool> {
        let region = self.signed_region_from_fields()?;
        self.verify_region(&region, key)
    }

    /// Encode with the default binary XML wire format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(&BinaryXmlWireFormat::default())
    }

    pub fn encode_with<W: WireFormat + ?Sized>(&self, wire_format: &W) -> Result<Vec<u8>> {
        wire_format.encode_content_object(self)
    }

    /// Decode with the default binary XML wire format.
    pub fn decode(input: &[u8]) -> Result<ContentObject> {
        Self::decode_with(input, &BinaryXmlWireFormat::default())
    }

    pub fn decode_with<W: WireFormat + ?Sized>(
        input: &[u8],
        wire_format: &W,
    ) -> Result<ContentObject> {
        wire_format.decode_content_object(input)
    }
}
