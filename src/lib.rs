//! Signed, named data packets for Named Data Networking.
//!
//! A [`ContentObject`] binds a hierarchical [`Name`] to a payload, with a [`SignedInfo`] block
//! describing who published it and when, and a [`Signature`] proving it. Objects are signed with
//! a [`KeyManager`] holding an ed25519 identity, and travel in the ndnb binary XML encoding
//! through [`BinaryXmlWireFormat`], or any other [`WireFormat`].
//!
//! The signature covers the encoded Name, SignedInfo, and Content elements. Decoding keeps the
//! exact bytes of that region so verification checks what the publisher actually signed, rather
//! than what this crate would produce by re-encoding.
//!
//! ```
//! # use ndn_content::*;
//! # fn main() -> Result<()> {
//! let keys = KeyManager::new(fog_crypto::identity::IdentityKey::with_rng(&mut rand::rngs::OsRng));
//! let info = SignedInfo::from_identity(&keys)?.with_freshness_seconds(60);
//! let object = ContentObject::from_uri("/example/greeting", info, "hello")?.sign(&keys)?;
//!
//! let wire = object.encode()?;
//! let decoded = ContentObject::decode(&wire)?;
//! assert_eq!(decoded, object);
//! assert!(decoded.verify_with(&keys)?);
//! # Ok(())
//! # }
//! ```

mod content_object;
mod content_type;
mod decoder;
mod depth_tracking;
mod dtag;
mod encoder;
mod error;
mod header;
mod key;
mod name;
mod signature;
mod signed_info;
mod timestamp;
mod wire_format;

pub use self::content_object::ContentObject;
pub use self::content_type::ContentType;
pub use self::decoder::BinaryXmlDecoder;
pub use self::dtag::DTag;
pub use self::encoder::BinaryXmlEncoder;
pub use self::error::{Error, Result};
pub use self::header::{Header, HeaderType};
pub use self::key::{KeyLocator, KeyManager, KeyName, PublicKey, PublisherPublicKeyDigest};
pub use self::name::{Component, Name};
pub use self::signature::{Signature, DEFAULT_DIGEST_ALGORITHM};
pub use self::signed_info::SignedInfo;
pub use self::timestamp::Timestamp;
pub use self::wire_format::{BinaryXmlWireFormat, WireFormat};

/// The largest encoded ContentObject accepted by [`BinaryXmlWireFormat`] unless configured
/// otherwise. Matches the traditional ndnb packet limit.
pub const MAX_PACKET_SIZE: usize = 8800;

/// The maximum nesting depth of elements. A ContentObject needs six levels at most; anything far
/// deeper is rejected rather than tracked.
pub const MAX_DEPTH: usize = 32;
