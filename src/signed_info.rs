//! Signed metadata attached to every ContentObject.

use serde::{Deserialize, Serialize};

use crate::{
    content_type::ContentType,
    decoder::BinaryXmlDecoder,
    dtag::DTag,
    encoder::BinaryXmlEncoder,
    error::{Error, Result},
    key::{KeyLocator, KeyManager, PublisherPublicKeyDigest},
    timestamp::Timestamp,
};

/// Who published a packet, when, what kind of payload it carries, how long it stays fresh, and
/// where to find the key that signed it.
///
/// Publisher, timestamp, and locator must all be present before a SignedInfo can be encoded.
/// Freshness and final block ID are always optional. The content type defaults to
/// [`ContentType::Data`], and is left off the wire when it has that value, so a decoded
/// SignedInfo matches the original under those defaulting rules rather than byte-for-byte.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    publisher: Option<PublisherPublicKeyDigest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<Timestamp>,
    #[serde(default, rename = "type")]
    content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locator: Option<KeyLocator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    freshness_seconds: Option<u32>,
    #[serde(default, with = "serde_bytes", skip_serializing_if = "Option::is_none")]
    final_block_id: Option<Vec<u8>>,
}

impl SignedInfo {
    /// SignedInfo for signing as the given identity, right now: publisher is the active key's
    /// digest, timestamp is the current time, type is DATA, and the locator embeds the active
    /// public key.
    pub fn from_identity(keys: &KeyManager) -> Result<SignedInfo> {
        let public_key = keys.public_key()?;
        Ok(SignedInfo {
            publisher: Some(public_key.key_id()),
            timestamp: Some(Timestamp::now()),
            content_type: ContentType::Data,
            locator: Some(KeyLocator::from_public_key(public_key)),
            freshness_seconds: None,
            final_block_id: None,
        })
    }

    pub fn with_publisher(mut self, publisher: PublisherPublicKeyDigest) -> SignedInfo {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> SignedInfo {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> SignedInfo {
        self.content_type = content_type;
        self
    }

    pub fn with_locator(mut self, locator: KeyLocator) -> SignedInfo {
        self.locator = Some(locator);
        self
    }

    pub fn with_freshness_seconds(mut self, seconds: u32) -> SignedInfo {
        self.freshness_seconds = Some(seconds);
        self
    }

    pub fn with_final_block_id(mut self, id: impl Into<Vec<u8>>) -> SignedInfo {
        self.final_block_id = Some(id.into());
        self
    }

    pub fn publisher(&self) -> Option<&PublisherPublicKeyDigest> {
        self.publisher.as_ref()
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn locator(&self) -> Option<&KeyLocator> {
        self.locator.as_ref()
    }

    pub fn freshness_seconds(&self) -> Option<u32> {
        self.freshness_seconds
    }

    pub fn final_block_id(&self) -> Option<&[u8]> {
        self.final_block_id.as_deref()
    }

    /// Publisher, timestamp, and a non-empty locator must all be present before encoding.
    pub fn validate(&self) -> bool {
        self.publisher.as_ref().map_or(false, |p| !p.is_empty())
            && self.timestamp.is_some()
            && self.locator.as_ref().map_or(false, |l| !l.is_empty())
    }

    pub fn element_tag() -> DTag {
        DTag::SignedInfo
    }

    pub fn encode(&self, enc: &mut BinaryXmlEncoder) -> Result<()> {
        if !self.validate() {
            return Err(Error::Invalid("SignedInfo"));
        }
        // Catch a bad timestamp before anything is written.
        let timestamp = match self.timestamp {
            Some(ref t) => Some(t.to_wire_bytes()?),
            None => None,
        };

        enc.write_start_element(DTag::SignedInfo)?;
        if let Some(ref publisher) = self.publisher {
            publisher.encode(enc)?;
        }
        if let Some(ref raw) = timestamp {
            enc.write_element(DTag::Timestamp, raw)?;
        }
        if self.content_type != ContentType::Data {
            enc.write_element(DTag::Type, &self.content_type.to_wire_bytes())?;
        }
        if let Some(seconds) = self.freshness_seconds {
            enc.write_integer_element(DTag::FreshnessSeconds, seconds as u64)?;
        }
        if let Some(ref id) = self.final_block_id {
            enc.write_element(DTag::FinalBlockID, id)?;
        }
        if let Some(ref locator) = self.locator {
            locator.encode(enc)?;
        }
        enc.write_end_element()
    }

    pub fn decode(dec: &mut BinaryXmlDecoder) -> Result<SignedInfo> {
        dec.read_start_element(DTag::SignedInfo)?;

        let publisher = if dec.peek_start_element(DTag::PublisherPublicKeyDigest) {
            tracing::trace!("decoding publisher key digest");
            Some(PublisherPublicKeyDigest::decode(dec)?)
        } else {
            None
        };

        let timestamp = dec.try_read_date_time(DTag::Timestamp)?;
        if let Some(t) = timestamp {
            tracing::trace!(msec = t.millis(), "decoded timestamp");
        }

        let content_type = match dec.try_read_binary_element(DTag::Type)? {
            Some(raw) => ContentType::from_wire_bytes(raw)?,
            None => ContentType::Data,
        };

        let freshness_seconds = match dec.try_read_integer_element(DTag::FreshnessSeconds)? {
            Some(seconds) => Some(u32::try_from(seconds).map_err(|_| {
                Error::BadEncode(format!("FreshnessSeconds {} doesn't fit in a u32", seconds))
            })?),
            None => None,
        };
        if let Some(seconds) = freshness_seconds {
            tracing::trace!(seconds, "decoded freshness");
        }

        let final_block_id = dec
            .try_read_binary_element(DTag::FinalBlockID)?
            .map(<[u8]>::to_vec);

        let locator = if dec.peek_start_element(DTag::KeyLocator) {
            tracing::trace!("decoding key locator");
            Some(KeyLocator::decode(dec)?)
        } else {
            None
        };

        dec.read_end_element()?;
        Ok(SignedInfo {
            publisher,
            timestamp,
            content_type,
            locator,
            freshness_seconds,
            final_block_id,
        })
    }
}
