use crate::error::{Error, Result};
use byteorder::ReadBytesExt;

/// Byte that closes an open element.
pub const CLOSE: u8 = 0x00;

const TT_BITS: u32 = 3;
const TT_MASK: u8 = 0x07;
const TT_VALUE_BITS: u32 = 4;
const TT_VALUE_MASK: u64 = 0x0F;
const REGULAR_VALUE_BITS: u32 = 7;
const REGULAR_VALUE_MASK: u64 = 0x7F;
const TT_FINAL: u8 = 0x80;

/// Type bits of an ndnb header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderType {
    Ext,
    Tag,
    DTag,
    Attr,
    DAttr,
    Blob,
    UData,
}

impl HeaderType {
    fn from_u8(n: u8) -> Option<HeaderType> {
        Some(match n {
            0 => HeaderType::Ext,
            1 => HeaderType::Tag,
            2 => HeaderType::DTag,
            3 => HeaderType::Attr,
            4 => HeaderType::DAttr,
            5 => HeaderType::Blob,
            6 => HeaderType::UData,
            _ => return None,
        })
    }

    fn into_u8(self) -> u8 {
        match self {
            HeaderType::Ext => 0,
            HeaderType::Tag => 1,
            HeaderType::DTag => 2,
            HeaderType::Attr => 3,
            HeaderType::DAttr => 4,
            HeaderType::Blob => 5,
            HeaderType::UData => 6,
        }
    }
}

/// A type/value header. The value is split across bytes big-endian: every byte but the last holds
/// 7 value bits with the high bit clear, and the last byte has the high bit set and holds the
/// lowest 4 value bits followed by the 3 type bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub kind: HeaderType,
    pub value: u64,
}

impl Header {
    pub fn new(kind: HeaderType, value: u64) -> Header {
        Header { kind, value }
    }

    /// Encoded length of this header in bytes.
    pub fn size(&self) -> usize {
        let mut n = 1;
        let mut v = self.value >> TT_VALUE_BITS;
        while v != 0 {
            n += 1;
            v >>= REGULAR_VALUE_BITS;
        }
        n
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let len = self.size();
        let start = buf.len();
        buf.resize(start + len, 0);
        buf[start + len - 1] = TT_FINAL
            | (((self.value & TT_VALUE_MASK) as u8) << TT_BITS)
            | (self.kind.into_u8() & TT_MASK);
        let mut v = self.value >> TT_VALUE_BITS;
        for i in (0..len - 1).rev() {
            buf[start + i] = (v & REGULAR_VALUE_MASK) as u8;
            v >>= REGULAR_VALUE_BITS;
        }
    }

    /// Read a header off the front of the buffer, advancing it. A leading close byte is not a
    /// header and is rejected.
    pub fn read(buf: &mut &[u8]) -> Result<Header> {
        let mut value: u64 = 0;
        let mut first = true;
        loop {
            let byte = buf.read_u8().map_err(|_| Error::LengthTooShort {
                step: "decode element header",
                actual: 0,
                expected: 1,
            })?;
            if first && byte == CLOSE {
                return Err(Error::BadEncode(String::from(
                    "Found element close where a header was expected",
                )));
            }
            first = false;
            if byte & TT_FINAL != 0 {
                if value >> (64 - TT_VALUE_BITS) != 0 {
                    return Err(Error::BadEncode(String::from("Header value larger than a u64")));
                }
                value = (value << TT_VALUE_BITS) | ((byte >> TT_BITS) as u64 & TT_VALUE_MASK);
                let kind = HeaderType::from_u8(byte & TT_MASK).ok_or_else(|| {
                    Error::BadEncode(format!("Reserved header type {}", byte & TT_MASK))
                })?;
                return Ok(Header { kind, value });
            }
            if value >> (64 - REGULAR_VALUE_BITS) != 0 {
                return Err(Error::BadEncode(String::from("Header value larger than a u64")));
            }
            value = (value << REGULAR_VALUE_BITS) | (byte as u64);
        }
    }
}
