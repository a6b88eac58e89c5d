use std::fmt;

/// Dictionary tags for the ndnb elements used by ContentObject packets. Each element on the wire
/// opens with a DTAG header carrying one of these values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DTag {
    Name,
    Component,
    Certificate,
    Content,
    SignedInfo,
    Key,
    KeyLocator,
    KeyName,
    Signature,
    Timestamp,
    Type,
    Witness,
    SignatureBits,
    DigestAlgorithm,
    FreshnessSeconds,
    FinalBlockID,
    PublisherPublicKeyDigest,
    ContentObject,
}

impl DTag {
    /// Look up a tag from its numeric value. Returns `None` for tags outside of the table.
    pub fn from_u64(n: u64) -> Option<DTag> {
        Some(match n {
            14 => DTag::Name,
            15 => DTag::Component,
            16 => DTag::Certificate,
            19 => DTag::Content,
            20 => DTag::SignedInfo,
            27 => DTag::Key,
            28 => DTag::KeyLocator,
            29 => DTag::KeyName,
            37 => DTag::Signature,
            39 => DTag::Timestamp,
            40 => DTag::Type,
            53 => DTag::Witness,
            54 => DTag::SignatureBits,
            55 => DTag::DigestAlgorithm,
            58 => DTag::FreshnessSeconds,
            59 => DTag::FinalBlockID,
            60 => DTag::PublisherPublicKeyDigest,
            64 => DTag::ContentObject,
            _ => return None,
        })
    }

    /// Numeric value written into the DTAG header.
    pub fn into_u64(self) -> u64 {
        match self {
            DTag::Name => 14,
            DTag::Component => 15,
            DTag::Certificate => 16,
            DTag::Content => 19,
            DTag::SignedInfo => 20,
            DTag::Key => 27,
            DTag::KeyLocator => 28,
            DTag::KeyName => 29,
            DTag::Signature => 37,
            DTag::Timestamp => 39,
            DTag::Type => 40,
            DTag::Witness => 53,
            DTag::SignatureBits => 54,
            DTag::DigestAlgorithm => 55,
            DTag::FreshnessSeconds => 58,
            DTag::FinalBlockID => 59,
            DTag::PublisherPublicKeyDigest => 60,
            DTag::ContentObject => 64,
        }
    }

    pub fn name(&self) -> &'static str {
        use self::DTag::*;
        match self {
            Name => "Name",
            Component => "Component",
            Certificate => "Certificate",
            Content => "Content",
            SignedInfo => "SignedInfo",
            Key => "Key",
            KeyLocator => "KeyLocator",
            KeyName => "KeyName",
            Signature => "Signature",
            Timestamp => "Timestamp",
            Type => "Type",
            Witness => "Witness",
            SignatureBits => "SignatureBits",
            DigestAlgorithm => "DigestAlgorithm",
            FreshnessSeconds => "FreshnessSeconds",
            FinalBlockID => "FinalBlockID",
            PublisherPublicKeyDigest => "PublisherPublicKeyDigest",
            ContentObject => "ContentObject",
        }
    }
}

impl From<DTag> for u64 {
    fn from(tag: DTag) -> u64 {
        tag.into_u64()
    }
}

impl fmt::Display for DTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
