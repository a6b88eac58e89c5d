//! Pluggable ContentObject codecs.
//!
//! A [`WireFormat`] turns a [`ContentObject`] into bytes and back. The only format provided is
//! [`BinaryXmlWireFormat`], the ndnb element encoding. Decoders are responsible for capturing
//! the signed region of the packet as it appeared in the input.

use crate::{
    content_object::ContentObject,
    decoder::BinaryXmlDecoder,
    dtag::DTag,
    encoder::BinaryXmlEncoder,
    error::{Error, Result},
    name::Name,
    signature::Signature,
    signed_info::SignedInfo,
    MAX_PACKET_SIZE,
};

/// A ContentObject codec.
pub trait WireFormat {
    /// Encode a complete ContentObject. Fails if the object is missing required fields.
    fn encode_content_object(&self, object: &ContentObject) -> Result<Vec<u8>>;

    /// Decode a ContentObject, capturing its signed region. The entire input must be consumed.
    fn decode_content_object(&self, input: &[u8]) -> Result<ContentObject>;
}

/// The ndnb binary XML encoding of a ContentObject:
///
/// ```text
/// ContentObject := Signature Name SignedInfo Content
/// ```
///
/// The signed region runs from the first byte of Name through the last byte of Content.
#[derive(Clone, Debug)]
pub struct BinaryXmlWireFormat {
    max_packet_size: usize,
}

impl Default for BinaryXmlWireFormat {
    fn default() -> Self {
        Self {
            max_packet_size: MAX_PACKET_SIZE,
        }
    }
}

impl BinaryXmlWireFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the largest packet this format will encode or decode.
    pub fn with_max_packet_size(mut self, max_packet_size: usize) -> Self {
        self.max_packet_size = max_packet_size;
        self
    }

    pub fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }

    fn check_size(&self, actual: usize) -> Result<()> {
        if actual > self.max_packet_size {
            return Err(Error::LengthTooLong {
                max: self.max_packet_size,
                actual,
            });
        }
        Ok(())
    }
}

impl WireFormat for BinaryXmlWireFormat {
    fn encode_content_object(&self, object: &ContentObject) -> Result<Vec<u8>> {
        if !object.signature().validate() {
            return Err(Error::Invalid("Signature"));
        }
        if !object.signed_info().validate() {
            return Err(Error::Invalid("SignedInfo"));
        }
        let mut enc = BinaryXmlEncoder::new();
        enc.write_start_element(DTag::ContentObject)?;
        object.signature().encode(&mut enc)?;
        object.name().encode(&mut enc)?;
        object.signed_info().encode(&mut enc)?;
        enc.write_element(DTag::Content, object.content())?;
        enc.write_end_element()?;
        let buf = enc.finish()?;
        self.check_size(buf.len())?;
        tracing::trace!(name = %object.name(), len = buf.len(), "encoded content object");
        Ok(buf)
    }

    fn decode_content_object(&self, input: &[u8]) -> Result<ContentObject> {
        self.check_size(input.len())?;
        let mut dec = BinaryXmlDecoder::new(input);
        dec.read_start_element(DTag::ContentObject)?;
        let signature = Signature::decode(&mut dec)?;
        let signed_start = dec.offset();
        let name = Name::decode(&mut dec)?;
        let signed_info = SignedInfo::decode(&mut dec)?;
        let content = dec.read_binary_element(DTag::Content)?.to_vec();
        let signed_end = dec.offset();
        dec.read_end_element()?;
        dec.finish()?;

        let mut object = ContentObject::new(name, signed_info, content).with_signature(signature);
        object.capture_signed_region(input, signed_start, signed_end)?;
        tracing::trace!(
            name = %object.name(),
            signed_start,
            signed_end,
            "decoded content object"
        );
        Ok(object)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        content_type::ContentType,
        key::{KeyLocator, KeyManager, PublisherPublicKeyDigest},
        timestamp::Timestamp,
    };
    use fog_crypto::identity::IdentityKey;

    fn keys() -> KeyManager {
        KeyManager::new(IdentityKey::with_rng(&mut rand::rngs::OsRng))
    }

    fn fixed_info() -> SignedInfo {
        SignedInfo::default()
            .with_publisher(PublisherPublicKeyDigest::new(vec![0xAAu8; 32]))
            .with_timestamp(Timestamp::from_millis(1_000))
            .with_locator(KeyLocator::Certificate(vec![0x01, 0x02]))
    }

    /// Build a ContentObject by hand, element by element.
    fn hand_built(
        signature_bits: &[u8],
        name: &[&[u8]],
        info: &SignedInfo,
        content: &[u8],
    ) -> (Vec<u8>, usize, usize) {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_start_element(DTag::ContentObject).unwrap();
        enc.write_start_element(DTag::Signature).unwrap();
        enc.write_element(DTag::SignatureBits, signature_bits).unwrap();
        enc.write_end_element().unwrap();
        let start = enc.offset();
        enc.write_start_element(DTag::Name).unwrap();
        for component in name {
            enc.write_element(DTag::Component, component).unwrap();
        }
        enc.write_end_element().unwrap();
        info.encode(&mut enc).unwrap();
        enc.write_element(DTag::Content, content).unwrap();
        let end = enc.offset();
        enc.write_end_element().unwrap();
        (enc.finish().unwrap(), start, end)
    }

    #[test]
    fn decode_captures_exact_region() {
        let info = fixed_info();
        let (wire, start, end) = hand_built(&[0x11; 4], &[b"x", b"y"], &info, b"payload");
        let object = ContentObject::decode(&wire).unwrap();

        assert_eq!(object.raw_signed_region().unwrap(), &wire[start..end]);
        assert_eq!(object.name().to_string(), "/x/y");
        assert_eq!(object.content(), b"payload");
        assert_eq!(object.signature().signature_bits().unwrap(), &[0x11; 4]);
        assert_eq!(object.signed_info(), &info);
        assert_eq!(object.signed_info().content_type(), ContentType::Data);
    }

    #[test]
    fn encode_layout() {
        let info = fixed_info();
        let (wire, _, _) = hand_built(&[0x11; 4], &[b"x"], &info, b"hi");
        let object = ContentObject::new("/x".parse().unwrap(), info, "hi")
            .with_signature(Signature::new().with_signature_bits(vec![0x11u8; 4]));
        assert_eq!(object.encode().unwrap(), wire);
        // ContentObject is DTag 64: a continuation byte then the final header byte.
        assert_eq!(&wire[..2], &[0x04, 0x82]);
        assert_eq!(wire.last(), Some(&0x00));
    }

    #[test]
    fn decoded_region_survives_reencoding_differences() {
        // A DigestAlgorithm equal to the default is legal on the wire but never written by our
        // encoder. The region still comes from the input, not from re-encoding.
        let keys = keys();
        let info = SignedInfo::from_identity(&keys).unwrap();
        let object = ContentObject::from_uri("/r", info, "data").unwrap();
        let region = object.signed_region_from_fields().unwrap();
        let signed = object.sign(&keys).unwrap();

        let mut enc = BinaryXmlEncoder::new();
        enc.write_start_element(DTag::Signature).unwrap();
        enc.write_utf8_element(DTag::DigestAlgorithm, crate::signature::DEFAULT_DIGEST_ALGORITHM)
            .unwrap();
        enc.write_element(DTag::SignatureBits, signed.signature().signature_bits().unwrap())
            .unwrap();
        enc.write_end_element().unwrap();
        let signature = enc.finish().unwrap();

        let mut buf = vec![0x04, 0x82];
        buf.extend_from_slice(&signature);
        buf.extend_from_slice(&region);
        buf.push(0x00);

        let decoded = ContentObject::decode(&buf).unwrap();
        assert_eq!(decoded.raw_signed_region().unwrap(), &region[..]);
        assert!(decoded.verify_with(&keys).unwrap());
        assert_ne!(decoded.encode().unwrap(), buf);
    }

    #[test]
    fn missing_signature_bits() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_start_element(DTag::ContentObject).unwrap();
        enc.write_start_element(DTag::Signature).unwrap();
        enc.write_end_element().unwrap();
        enc.write_start_element(DTag::Name).unwrap();
        enc.write_end_element().unwrap();
        fixed_info().encode(&mut enc).unwrap();
        enc.write_element(DTag::Content, b"x").unwrap();
        enc.write_end_element().unwrap();
        let wire = enc.finish().unwrap();
        assert!(matches!(
            ContentObject::decode(&wire),
            Err(Error::MissingElement(DTag::SignatureBits))
        ));
    }

    #[test]
    fn encode_requires_complete_object() {
        let keys = keys();
        let info = SignedInfo::from_identity(&keys).unwrap();
        let unsigned = ContentObject::from_uri("/u", info, "x").unwrap();
        assert!(matches!(unsigned.encode(), Err(Error::Invalid("Signature"))));

        let incomplete = ContentObject::from_uri("/u", SignedInfo::default(), "x")
            .unwrap()
            .with_signature(Signature::new().with_signature_bits(vec![1u8]));
        assert!(matches!(incomplete.encode(), Err(Error::Invalid("SignedInfo"))));
    }

    #[test]
    fn wrong_outer_element() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_start_element(DTag::Name).unwrap();
        enc.write_end_element().unwrap();
        let wire = enc.finish().unwrap();
        assert!(matches!(
            ContentObject::decode(&wire),
            Err(Error::UnexpectedElement {
                expected: DTag::ContentObject,
                ..
            })
        ));
        assert!(ContentObject::decode(&[]).is_err());
    }

    #[test]
    fn trailing_and_truncated_input() {
        let info = fixed_info();
        let (mut wire, _, _) = hand_built(&[0x11; 4], &[b"x"], &info, b"hi");
        assert!(ContentObject::decode(&wire[..wire.len() - 1]).is_err());
        assert!(ContentObject::decode(&wire[..wire.len() / 2]).is_err());
        wire.push(0x00);
        assert!(ContentObject::decode(&wire).is_err());
    }

    #[test]
    fn packet_size_limit() {
        let keys = keys();
        let info = SignedInfo::from_identity(&keys).unwrap();
        let big = ContentObject::from_uri("/big", info, vec![0u8; MAX_PACKET_SIZE])
            .unwrap()
            .sign(&keys)
            .unwrap();
        assert!(matches!(big.encode(), Err(Error::LengthTooLong { .. })));

        let roomy = BinaryXmlWireFormat::new().with_max_packet_size(2 * MAX_PACKET_SIZE);
        let wire = big.encode_with(&roomy).unwrap();
        assert!(matches!(
            ContentObject::decode(&wire),
            Err(Error::LengthTooLong { max: MAX_PACKET_SIZE, .. })
        ));
        let decoded = ContentObject::decode_with(&wire, &roomy).unwrap();
        assert!(decoded.verify_with(&keys).unwrap());
    }
}
