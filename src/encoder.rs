//! Writer half of the ndnb element codec.

use crate::{
    depth_tracking::DepthTracker,
    dtag::DTag,
    error::{Error, Result},
    header::{Header, HeaderType, CLOSE},
    timestamp::Timestamp,
};

/// Builds an ndnb byte stream one element at a time.
///
/// Elements open with [`write_start_element`](Self::write_start_element) and close with
/// [`write_end_element`](Self::write_end_element). Leaf elements carrying a value are written in
/// one call with the typed `write_*_element` functions.
#[derive(Clone, Debug, Default)]
pub struct BinaryXmlEncoder {
    buf: Vec<u8>,
    depth_tracking: DepthTracker,
}

impl BinaryXmlEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    pub fn offset(&self) -> usize {
        self.buf.len()
    }

    pub fn write_start_element(&mut self, tag: DTag) -> Result<()> {
        self.depth_tracking.enter(tag)?;
        Header::new(HeaderType::DTag, tag.into()).write(&mut self.buf);
        Ok(())
    }

    pub fn write_end_element(&mut self) -> Result<()> {
        self.depth_tracking.exit()?;
        self.buf.push(CLOSE);
        Ok(())
    }

    /// Write a complete element holding binary data.
    pub fn write_element(&mut self, tag: DTag, value: &[u8]) -> Result<()> {
        self.write_start_element(tag)?;
        self.write_blob(value);
        self.write_end_element()
    }

    /// Write a complete element holding UTF-8 text.
    pub fn write_utf8_element(&mut self, tag: DTag, value: &str) -> Result<()> {
        self.write_start_element(tag)?;
        self.write_udata(value);
        self.write_end_element()
    }

    /// Write a complete element holding a non-negative integer, which travels as decimal text.
    pub fn write_integer_element(&mut self, tag: DTag, value: u64) -> Result<()> {
        self.write_utf8_element(tag, &value.to_string())
    }

    /// Write a complete element holding a timestamp in its fixed-point binary form.
    pub fn write_date_time(&mut self, tag: DTag, time: Timestamp) -> Result<()> {
        let raw = time.to_wire_bytes()?;
        self.write_element(tag, &raw)
    }

    fn write_blob(&mut self, value: &[u8]) {
        Header::new(HeaderType::Blob, value.len() as u64).write(&mut self.buf);
        self.buf.extend_from_slice(value);
    }

    fn write_udata(&mut self, value: &str) {
        Header::new(HeaderType::UData, value.len() as u64).write(&mut self.buf);
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// Complete the stream. Fails if any element was left open.
    pub fn finish(self) -> Result<Vec<u8>> {
        if let Some(tag) = self.depth_tracking.current() {
            return Err(Error::BadEncode(format!(
                "Element {} was never closed",
                tag
            )));
        }
        Ok(self.buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn binary_element() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_element(DTag::Component, b"abc").unwrap();
        let buf = enc.finish().unwrap();
        // DTag 15: 0x80 | (15 << 3) | 2, blob header len 3, data, close
        assert_eq!(buf, &[0xFA, 0x9D, b'a', b'b', b'c', 0x00]);
    }

    #[test]
    fn empty_binary_element() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_element(DTag::Content, b"").unwrap();
        let buf = enc.finish().unwrap();
        // DTag 19 takes two bytes, then a zero-length blob header
        assert_eq!(buf, &[0x01, 0x9A, 0x85, 0x00]);
    }

    #[test]
    fn integer_element() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_integer_element(DTag::FreshnessSeconds, 42).unwrap();
        let buf = enc.finish().unwrap();
        // DTag 58 = 0b11_1010: continuation 3, final 0x80 | (10 << 3) | 2
        assert_eq!(buf, &[0x03, 0xD2, 0x96, b'4', b'2', 0x00]);
    }

    #[test]
    fn unclosed_fails() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_start_element(DTag::Name).unwrap();
        assert!(enc.finish().is_err());
    }

    #[test]
    fn unmatched_close_fails() {
        let mut enc = BinaryXmlEncoder::new();
        assert!(enc.write_end_element().is_err());
    }

    #[test]
    fn offsets_track_writes() {
        let mut enc = BinaryXmlEncoder::new();
        assert_eq!(enc.offset(), 0);
        enc.write_start_element(DTag::Name).unwrap();
        assert_eq!(enc.offset(), 1);
        enc.write_end_element().unwrap();
        assert_eq!(enc.offset(), 2);
    }
}
