//! Reader half of the ndnb element codec.
//!
//! The decoder walks a borrowed byte slice. Lookahead through
//! [`peek_start_element`](BinaryXmlDecoder::peek_start_element) never consumes input and never
//! changes decoder state, so optional elements can be tested for before they're read. The
//! `try_read_*` functions wrap that pattern, returning `None` when the element isn't next.

use crate::{
    depth_tracking::DepthTracker,
    dtag::DTag,
    error::{Error, Result},
    header::{Header, HeaderType, CLOSE},
    timestamp::Timestamp,
};

#[derive(Clone, Debug)]
pub struct BinaryXmlDecoder<'a> {
    input: &'a [u8],
    offset: usize,
    depth_tracking: DepthTracker,
}

impl<'a> BinaryXmlDecoder<'a> {
    pub fn new(input: &'a [u8]) -> BinaryXmlDecoder<'a> {
        Self {
            input,
            offset: 0,
            depth_tracking: DepthTracker::new(),
        }
    }

    /// Byte offset of the next unread byte, relative to the start of the input.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn remaining(&self) -> &'a [u8] {
        let input = self.input;
        &input[self.offset..]
    }

    fn peek_close(&self) -> bool {
        self.remaining().first() == Some(&CLOSE)
    }

    /// Parse the next header without consuming it. Returns the header and its length in bytes.
    fn peek_header(&self) -> Result<(Header, usize)> {
        let mut data = self.remaining();
        let before = data.len();
        let header = Header::read(&mut data)?;
        Ok((header, before - data.len()))
    }

    fn describe_next(&self) -> String {
        if self.remaining().is_empty() {
            return String::from("end of input");
        }
        if self.peek_close() {
            return String::from("element close");
        }
        match self.peek_header() {
            Ok((Header { kind: HeaderType::DTag, value }, _)) => match DTag::from_u64(value) {
                Some(tag) => tag.to_string(),
                None => format!("unknown DTag {}", value),
            },
            Ok((header, _)) => format!("{:?} header", header.kind),
            Err(_) => String::from("malformed header"),
        }
    }

    /// Check if the next element is `tag`, without consuming anything.
    pub fn peek_start_element(&self, tag: DTag) -> bool {
        match self.peek_header() {
            Ok((header, _)) => header.kind == HeaderType::DTag && header.value == tag.into_u64(),
            Err(_) => false,
        }
    }

    pub fn read_start_element(&mut self, tag: DTag) -> Result<()> {
        if !self.peek_start_element(tag) {
            if self.remaining().is_empty() || self.peek_close() {
                return Err(Error::MissingElement(tag));
            }
            return Err(Error::UnexpectedElement {
                expected: tag,
                actual: self.describe_next(),
            });
        }
        let (_, len) = self.peek_header()?;
        self.depth_tracking.enter(tag)?;
        self.offset += len;
        Ok(())
    }

    pub fn read_end_element(&mut self) -> Result<()> {
        if !self.peek_close() {
            let open = self
                .depth_tracking
                .current()
                .map_or_else(|| String::from("nothing"), |t| t.to_string());
            return Err(Error::BadEncode(format!(
                "Expected close of {}, but found {}",
                open,
                self.describe_next()
            )));
        }
        self.depth_tracking.exit()?;
        self.offset += 1;
        Ok(())
    }

    /// Read the value of an open leaf element. An element closed immediately has an empty value.
    fn read_value(&mut self, kind: HeaderType, step: &'static str) -> Result<&'a [u8]> {
        if self.peek_close() {
            return Ok(&[]);
        }
        let (header, header_len) = self.peek_header()?;
        if header.kind != kind {
            return Err(Error::BadEncode(format!(
                "Expected {:?} value, found {:?} header",
                kind, header.kind
            )));
        }
        let available = self.remaining().len() - header_len;
        let len = usize::try_from(header.value).unwrap_or(usize::MAX);
        if len > available {
            return Err(Error::LengthTooShort {
                step,
                actual: available,
                expected: len,
            });
        }
        let input = self.input;
        let start = self.offset + header_len;
        self.offset = start + len;
        Ok(&input[start..start + len])
    }

    pub fn read_binary_element(&mut self, tag: DTag) -> Result<&'a [u8]> {
        self.read_start_element(tag)?;
        let value = self.read_value(HeaderType::Blob, "read binary element")?;
        self.read_end_element()?;
        Ok(value)
    }

    pub fn read_utf8_element(&mut self, tag: DTag) -> Result<&'a str> {
        self.read_start_element(tag)?;
        let value = self.read_value(HeaderType::UData, "read UTF-8 element")?;
        self.read_end_element()?;
        std::str::from_utf8(value)
            .map_err(|e| Error::BadEncode(format!("Element {} is not valid UTF-8: {}", tag, e)))
    }

    pub fn read_integer_element(&mut self, tag: DTag) -> Result<u64> {
        let text = self.read_utf8_element(tag)?;
        text.parse::<u64>().map_err(|_| {
            Error::BadEncode(format!("Element {} holds non-integer {:?}", tag, text))
        })
    }

    pub fn read_date_time(&mut self, tag: DTag) -> Result<Timestamp> {
        let raw = self.read_binary_element(tag)?;
        Timestamp::from_wire_bytes(raw)
    }

    pub fn try_read_binary_element(&mut self, tag: DTag) -> Result<Option<&'a [u8]>> {
        if self.peek_start_element(tag) {
            Ok(Some(self.read_binary_element(tag)?))
        } else {
            Ok(None)
        }
    }

    pub fn try_read_utf8_element(&mut self, tag: DTag) -> Result<Option<&'a str>> {
        if self.peek_start_element(tag) {
            Ok(Some(self.read_utf8_element(tag)?))
        } else {
            Ok(None)
        }
    }

    pub fn try_read_integer_element(&mut self, tag: DTag) -> Result<Option<u64>> {
        if self.peek_start_element(tag) {
            Ok(Some(self.read_integer_element(tag)?))
        } else {
            Ok(None)
        }
    }

    pub fn try_read_date_time(&mut self, tag: DTag) -> Result<Option<Timestamp>> {
        if self.peek_start_element(tag) {
            Ok(Some(self.read_date_time(tag)?))
        } else {
            Ok(None)
        }
    }

    /// Confirm the input was fully consumed with every element closed.
    pub fn finish(self) -> Result<()> {
        if let Some(tag) = self.depth_tracking.current() {
            return Err(Error::BadEncode(format!("Element {} was never closed", tag)));
        }
        let trailing = self.remaining().len();
        if trailing > 0 {
            return Err(Error::BadEncode(format!(
                "{} trailing bytes after the last element",
                trailing
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::encoder::BinaryXmlEncoder;

    fn sample() -> Vec<u8> {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_start_element(DTag::SignedInfo).unwrap();
        enc.write_element(DTag::PublisherPublicKeyDigest, &[1, 2, 3]).unwrap();
        enc.write_date_time(DTag::Timestamp, Timestamp::from_millis(1500)).unwrap();
        enc.write_integer_element(DTag::FreshnessSeconds, 3600).unwrap();
        enc.write_utf8_element(DTag::DigestAlgorithm, "1.2.3").unwrap();
        enc.write_end_element().unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn read_everything() {
        let buf = sample();
        let mut dec = BinaryXmlDecoder::new(&buf);
        dec.read_start_element(DTag::SignedInfo).unwrap();
        assert_eq!(
            dec.read_binary_element(DTag::PublisherPublicKeyDigest).unwrap(),
            &[1, 2, 3]
        );
        assert_eq!(
            dec.read_date_time(DTag::Timestamp).unwrap(),
            Timestamp::from_millis(1500)
        );
        assert_eq!(dec.read_integer_element(DTag::FreshnessSeconds).unwrap(), 3600);
        assert_eq!(dec.read_utf8_element(DTag::DigestAlgorithm).unwrap(), "1.2.3");
        dec.read_end_element().unwrap();
        dec.finish().unwrap();
    }

    #[test]
    fn peek_does_not_consume() {
        let buf = sample();
        let mut dec = BinaryXmlDecoder::new(&buf);
        assert!(dec.peek_start_element(DTag::SignedInfo));
        assert!(!dec.peek_start_element(DTag::Signature));
        assert_eq!(dec.offset(), 0);
        dec.read_start_element(DTag::SignedInfo).unwrap();
        let offset = dec.offset();
        assert!(!dec.peek_start_element(DTag::Timestamp));
        assert!(dec.peek_start_element(DTag::PublisherPublicKeyDigest));
        assert_eq!(dec.offset(), offset);
    }

    #[test]
    fn try_read_skips_absent() {
        let buf = sample();
        let mut dec = BinaryXmlDecoder::new(&buf);
        dec.read_start_element(DTag::SignedInfo).unwrap();
        assert!(dec.try_read_binary_element(DTag::Witness).unwrap().is_none());
        assert!(dec
            .try_read_binary_element(DTag::PublisherPublicKeyDigest)
            .unwrap()
            .is_some());
        assert!(dec.try_read_integer_element(DTag::FreshnessSeconds).unwrap().is_none());
        assert!(dec.try_read_date_time(DTag::Timestamp).unwrap().is_some());
        assert_eq!(
            dec.try_read_integer_element(DTag::FreshnessSeconds).unwrap(),
            Some(3600)
        );
        assert_eq!(
            dec.try_read_utf8_element(DTag::DigestAlgorithm).unwrap(),
            Some("1.2.3")
        );
    }

    #[test]
    fn missing_and_unexpected() {
        let buf = sample();
        let mut dec = BinaryXmlDecoder::new(&buf);
        match dec.read_start_element(DTag::Signature) {
            Err(Error::UnexpectedElement { expected, actual }) => {
                assert_eq!(expected, DTag::Signature);
                assert_eq!(actual, "SignedInfo");
            }
            other => panic!("Expected an unexpected element error, got {:?}", other),
        }

        let mut dec = BinaryXmlDecoder::new(&[]);
        assert!(matches!(
            dec.read_start_element(DTag::Name),
            Err(Error::MissingElement(DTag::Name))
        ));
    }

    #[test]
    fn empty_value() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_start_element(DTag::Content).unwrap();
        enc.write_end_element().unwrap();
        let buf = enc.finish().unwrap();
        let mut dec = BinaryXmlDecoder::new(&buf);
        assert!(dec.read_binary_element(DTag::Content).unwrap().is_empty());
        dec.finish().unwrap();
    }

    #[test]
    fn truncated_blob() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_element(DTag::Content, b"hello").unwrap();
        let buf = enc.finish().unwrap();
        let mut dec = BinaryXmlDecoder::new(&buf[..buf.len() - 3]);
        assert!(matches!(
            dec.read_binary_element(DTag::Content),
            Err(Error::LengthTooShort { .. })
        ));
    }

    #[test]
    fn trailing_bytes() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_element(DTag::Content, b"x").unwrap();
        let mut buf = enc.finish().unwrap();
        buf.push(0xAA);
        let mut dec = BinaryXmlDecoder::new(&buf);
        dec.read_binary_element(DTag::Content).unwrap();
        assert!(dec.finish().is_err());
    }

    #[test]
    fn bad_integer() {
        let mut enc = BinaryXmlEncoder::new();
        enc.write_utf8_element(DTag::FreshnessSeconds, "soon").unwrap();
        let buf = enc.finish().unwrap();
        let mut dec = BinaryXmlDecoder::new(&buf);
        assert!(dec.read_integer_element(DTag::FreshnessSeconds).is_err());
    }
}
