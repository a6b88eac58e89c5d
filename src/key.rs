//! Signing identities and the key references carried inside packets.
//!
//! [`KeyManager`] holds the active signing identity and is passed explicitly wherever a packet
//! is signed or default metadata is derived. Nothing in this crate keeps a global key.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use fog_crypto::{
    hash::Hash,
    identity::{Identity, IdentityKey},
};
use serde::{Deserialize, Serialize};

use crate::{
    decoder::BinaryXmlDecoder,
    dtag::DTag,
    encoder::BinaryXmlEncoder,
    error::{Error, Result},
    name::Name,
};

const PEM_BEGIN: &str = "-----BEGIN PUBLIC KEY-----";
const PEM_END: &str = "-----END PUBLIC KEY-----";
const PEM_LINE_LEN: usize = 64;

/// A public signing key.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKey(Identity);

impl PublicKey {
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    /// Binary interchange form. This is what gets embedded in a [`KeyLocator`].
    pub fn to_der(&self) -> Vec<u8> {
        let mut der = Vec::new();
        self.0.encode_vec(&mut der);
        der
    }

    pub fn from_der(der: &[u8]) -> Result<PublicKey> {
        Ok(PublicKey(Identity::try_from(der)?))
    }

    /// Textual interchange form: the binary form in base64, wrapped in armor lines.
    pub fn to_pem(&self) -> String {
        let encoded = STANDARD.encode(self.to_der());
        let mut pem = String::with_capacity(encoded.len() + 64);
        pem.push_str(PEM_BEGIN);
        pem.push('\n');
        for line in encoded.as_bytes().chunks(PEM_LINE_LEN) {
            pem.push_str(&String::from_utf8_lossy(line));
            pem.push('\n');
        }
        pem.push_str(PEM_END);
        pem.push('\n');
        pem
    }

    pub fn from_pem(pem: &str) -> Result<PublicKey> {
        let body = pem
            .trim()
            .strip_prefix(PEM_BEGIN)
            .and_then(|s| s.strip_suffix(PEM_END))
            .ok_or_else(|| Error::BadKey(String::from("missing PEM armor lines")))?;
        let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        let der = STANDARD
            .decode(body)
            .map_err(|e| Error::BadKey(format!("bad base64 in PEM body: {}", e)))?;
        PublicKey::from_der(&der)
    }

    /// Digest identifying this key, as carried in a SignedInfo's publisher field.
    pub fn key_id(&self) -> PublisherPublicKeyDigest {
        let hash = Hash::new(self.to_der().as_slice());
        let digest: &[u8] = hash.as_ref();
        PublisherPublicKeyDigest::new(digest)
    }
}

impl From<Identity> for PublicKey {
    fn from(identity: Identity) -> Self {
        PublicKey(identity)
    }
}

/// The active signing identity.
///
/// A key manager may hold a full keypair, only a public key (enough to derive default metadata
/// and to verify), or nothing at all.
#[derive(Clone, Debug, Default)]
pub struct KeyManager {
    private_key: Option<IdentityKey>,
    public_key: Option<PublicKey>,
}

impl KeyManager {
    pub fn new(key: IdentityKey) -> KeyManager {
        let public_key = PublicKey(key.id().clone());
        KeyManager {
            private_key: Some(key),
            public_key: Some(public_key),
        }
    }

    pub fn public_only(key: PublicKey) -> KeyManager {
        KeyManager {
            private_key: None,
            public_key: Some(key),
        }
    }

    pub fn private_key(&self) -> Result<&IdentityKey> {
        self.private_key.as_ref().ok_or(Error::NoPrivateKey)
    }

    pub fn public_key(&self) -> Result<&PublicKey> {
        self.public_key.as_ref().ok_or(Error::NoPublicKey)
    }

    pub fn key_id(&self) -> Result<PublisherPublicKeyDigest> {
        Ok(self.public_key()?.key_id())
    }
}

/// Digest of a publisher's public key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublisherPublicKeyDigest(#[serde(with = "serde_bytes")] Vec<u8>);

impl PublisherPublicKeyDigest {
    pub fn new(digest: impl Into<Vec<u8>>) -> PublisherPublicKeyDigest {
        PublisherPublicKeyDigest(digest.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn encode(&self, enc: &mut BinaryXmlEncoder) -> Result<()> {
        enc.write_element(DTag::PublisherPublicKeyDigest, &self.0)
    }

    pub fn decode(dec: &mut BinaryXmlDecoder) -> Result<PublisherPublicKeyDigest> {
        let raw = dec.read_binary_element(DTag::PublisherPublicKeyDigest)?;
        Ok(PublisherPublicKeyDigest(raw.to_vec()))
    }
}

impl AsRef<[u8]> for PublisherPublicKeyDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reference to a key by name, optionally pinned to a publisher digest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyName {
    pub name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<PublisherPublicKeyDigest>,
}

/// Hint for finding the key that verifies a packet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyLocator {
    /// The public key itself, in binary form.
    Key(#[serde(with = "serde_bytes")] Vec<u8>),
    /// A certificate for the key.
    Certificate(#[serde(with = "serde_bytes")] Vec<u8>),
    /// Where the key can be fetched from.
    KeyName(KeyName),
}

impl KeyLocator {
    /// Locator embedding the given public key.
    pub fn from_public_key(key: &PublicKey) -> KeyLocator {
        KeyLocator::Key(key.to_der())
    }

    /// True if the locator carries no key bytes, no certificate bytes, or an empty key name.
    pub fn is_empty(&self) -> bool {
        match self {
            KeyLocator::Key(der) => der.is_empty(),
            KeyLocator::Certificate(cert) => cert.is_empty(),
            KeyLocator::KeyName(key_name) => key_name.name.is_empty(),
        }
    }

    /// Parse the embedded public key. Returns `None` for certificate and name locators.
    pub fn embedded_key(&self) -> Result<Option<PublicKey>> {
        match self {
            KeyLocator::Key(der) => Ok(Some(PublicKey::from_der(der)?)),
            _ => Ok(None),
        }
    }

    pub fn encode(&self, enc: &mut BinaryXmlEncoder) -> Result<()> {
        enc.write_start_element(DTag::KeyLocator)?;
        match self {
            KeyLocator::Key(der) => enc.write_element(DTag::Key, der)?,
            KeyLocator::Certificate(cert) => enc.write_element(DTag::Certificate, cert)?,
            KeyLocator::KeyName(key_name) => {
                enc.write_start_element(DTag::KeyName)?;
                key_name.name.encode(enc)?;
                if let Some(ref publisher) = key_name.publisher {
                    publisher.encode(enc)?;
                }
                enc.write_end_element()?;
            }
        }
        enc.write_end_element()
    }

    pub fn decode(dec: &mut BinaryXmlDecoder) -> Result<KeyLocator> {
        dec.read_start_element(DTag::KeyLocator)?;
        let locator = if let Some(der) = dec.try_read_binary_element(DTag::Key)? {
            KeyLocator::Key(der.to_vec())
        } else if let Some(cert) = dec.try_read_binary_element(DTag::Certificate)? {
            KeyLocator::Certificate(cert.to_vec())
        } else if dec.peek_start_element(DTag::KeyName) {
            dec.read_start_element(DTag::KeyName)?;
            let name = Name::decode(dec)?;
            let publisher = if dec.peek_start_element(DTag::PublisherPublicKeyDigest) {
                Some(PublisherPublicKeyDigest::decode(dec)?)
            } else {
                None
            };
            dec.read_end_element()?;
            KeyLocator::KeyName(KeyName { name, publisher })
        } else {
            return Err(Error::BadEncode(String::from(
                "KeyLocator holds neither a Key, Certificate, nor KeyName",
            )));
        };
        dec.read_end_element()?;
        Ok(locator)
    }
}
