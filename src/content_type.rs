use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifecycle class of a ContentObject's payload. Each class has a reserved 3-byte code used on
/// the wire; `Data` is implied whenever the Type element is absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentType {
    #[default]
    Data,
    Encr,
    Gone,
    Key,
    Link,
    Nack,
}

impl ContentType {
    /// Reserved wire code for this type.
    pub fn code(self) -> u32 {
        match self {
            ContentType::Data => 0x0C04C0,
            ContentType::Encr => 0x10D091,
            ContentType::Gone => 0x18E344,
            ContentType::Key => 0x28463F,
            ContentType::Link => 0x2C834A,
            ContentType::Nack => 0x34008A,
        }
    }

    pub fn from_code(code: u32) -> Option<ContentType> {
        Some(match code {
            0x0C04C0 => ContentType::Data,
            0x10D091 => ContentType::Encr,
            0x18E344 => ContentType::Gone,
            0x28463F => ContentType::Key,
            0x2C834A => ContentType::Link,
            0x34008A => ContentType::Nack,
            _ => return None,
        })
    }

    pub fn to_wire_bytes(self) -> [u8; 3] {
        let mut raw = [0u8; 3];
        BigEndian::write_u24(&mut raw, self.code());
        raw
    }

    pub fn from_wire_bytes(bytes: &[u8]) -> Result<ContentType> {
        if bytes.len() != 3 {
            return Err(Error::BadEncode(format!(
                "Content type must be 3 bytes, got {}",
                bytes.len()
            )));
        }
        let code = BigEndian::read_u24(bytes);
        ContentType::from_code(code)
            .ok_or_else(|| Error::BadEncode(format!("Unknown content type 0x{:06X}", code)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContentType::Data => "DATA",
            ContentType::Encr => "ENCR",
            ContentType::Gone => "GONE",
            ContentType::Key => "KEY",
            ContentType::Link => "LINK",
            ContentType::Nack => "NACK",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ALL: [ContentType; 6] = [
        ContentType::Data,
        ContentType::Encr,
        ContentType::Gone,
        ContentType::Key,
        ContentType::Link,
        ContentType::Nack,
    ];

    #[test]
    fn codes_are_bidirectional() {
        for t in ALL.iter() {
            assert_eq!(ContentType::from_code(t.code()), Some(*t));
            assert_eq!(ContentType::from_wire_bytes(&t.to_wire_bytes()).unwrap(), *t);
        }
        assert_eq!(ContentType::from_code(0), None);
    }

    #[test]
    fn default_is_data() {
        assert_eq!(ContentType::default(), ContentType::Data);
        assert_eq!(ContentType::Data.to_wire_bytes(), [0x0C, 0x04, 0xC0]);
    }

    #[test]
    fn bad_wire_bytes() {
        assert!(ContentType::from_wire_bytes(&[0x0C, 0x04]).is_err());
        assert!(ContentType::from_wire_bytes(&[0x00, 0x00, 0x01]).is_err());
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&ContentType::Nack).unwrap(), "\"NACK\"");
        let t: ContentType = serde_json::from_str("\"KEY\"").unwrap();
        assert_eq!(t, ContentType::Key);
        assert_eq!(ContentType::Link.to_string(), "LINK");
    }
}
