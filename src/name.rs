//! Hierarchical names.
//!
//! A name is an ordered list of binary components. The textual form is a URI path: each
//! component is percent-escaped and separated by `/`, with an optional `ndn:` scheme in front.

use std::fmt;
use std::str::FromStr;

use serde::{
    de::{Deserialize, Deserializer, Error as DeError},
    ser::{Serialize, Serializer},
};

use crate::{
    decoder::BinaryXmlDecoder,
    dtag::DTag,
    encoder::BinaryXmlEncoder,
    error::{Error, Result},
};

/// A single name component.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Component(Vec<u8>);

impl Component {
    pub fn new(value: impl Into<Vec<u8>>) -> Component {
        Component(value.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_escaped(escaped: &str) -> Result<Component> {
        let value = unescape(escaped)?;
        if !value.is_empty() && value.iter().all(|b| *b == b'.') {
            // "..." and beyond are escapes for all-period components; "." and ".." are
            // relative path segments, which names don't have.
            if value.len() < 3 {
                return Err(Error::BadName(format!(
                    "Component {:?} is a relative path segment",
                    escaped
                )));
            }
            return Ok(Component(value[3..].to_vec()));
        }
        Ok(Component(value))
    }
}

impl AsRef<[u8]> for Component {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.iter().all(|b| *b == b'.') {
            f.write_str("...")?;
        }
        for &b in self.0.iter() {
            if b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.' || b == b'_' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "%{:02X}", b)?;
            }
        }
        Ok(())
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn unescape(escaped: &str) -> Result<Vec<u8>> {
    let raw = escaped.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hi = raw.get(i + 1).copied().and_then(hex_value);
            let lo = raw.get(i + 2).copied().and_then(hex_value);
            match (hi, lo) {
                (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
                _ => {
                    return Err(Error::BadName(format!(
                        "Bad percent escape in {:?}",
                        escaped
                    )))
                }
            }
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Hierarchical identifier of a ContentObject.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    /// The empty name, `/`.
    pub fn new() -> Name {
        Name::default()
    }

    pub fn from_components(components: Vec<Component>) -> Name {
        Name { components }
    }

    /// Return a new name with one more component on the end.
    pub fn append(mut self, component: impl Into<Vec<u8>>) -> Name {
        self.components.push(Component::new(component));
        self
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn encode(&self, enc: &mut BinaryXmlEncoder) -> Result<()> {
        enc.write_start_element(DTag::Name)?;
        for component in self.components.iter() {
            enc.write_element(DTag::Component, component.as_bytes())?;
        }
        enc.write_end_element()
    }

    pub fn decode(dec: &mut BinaryXmlDecoder) -> Result<Name> {
        dec.read_start_element(DTag::Name)?;
        let mut components = Vec::new();
        while let Some(value) = dec.try_read_binary_element(DTag::Component)? {
            components.push(Component::new(value));
        }
        dec.read_end_element()?;
        Ok(Name { components })
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(uri: &str) -> Result<Name> {
        let mut path = uri.trim();
        if path.get(..4).map_or(false, |s| s.eq_ignore_ascii_case("ndn:")) {
            path = &path[4..];
        }
        if let Some(rest) = path.strip_prefix("//") {
            // Skip the authority, which names ignore
            path = match rest.find('/') {
                Some(i) => &rest[i..],
                None => "",
            };
        }
        if !path.is_empty() && !path.starts_with('/') {
            return Err(Error::BadName(format!("{:?} is not an absolute name", uri)));
        }
        let components = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Component::from_escaped)
            .collect::<Result<Vec<_>>>()?;
        Ok(Name { components })
    }
}

impl TryFrom<&str> for Name {
    type Error = Error;
    fn try_from(uri: &str) -> Result<Name> {
        uri.parse()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in self.components.iter() {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Name, D::Error> {
        let uri = String::deserialize(deserializer)?;
        uri.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_simple() {
        let name: Name = "/a/b".parse().unwrap();
        assert_eq!(name.len(), 2);
        assert_eq!(name.get(0).unwrap().as_bytes(), b"a");
        assert_eq!(name.get(1).unwrap().as_bytes(), b"b");
        assert_eq!(name.to_string(), "/a/b");
    }

    #[test]
    fn parse_scheme_and_authority() {
        let expected = Name::new().append("x").append("y");
        assert_eq!("ndn:/x/y".parse::<Name>().unwrap(), expected);
        assert_eq!("NDN:/x/y".parse::<Name>().unwrap(), expected);
        assert_eq!("ndn://host.example/x/y".parse::<Name>().unwrap(), expected);
        assert_eq!("/x//y/".parse::<Name>().unwrap(), expected);
    }

    #[test]
    fn empty_name() {
        let name: Name = "/".parse().unwrap();
        assert!(name.is_empty());
        assert_eq!(name.to_string(), "/");
        assert!("".parse::<Name>().unwrap().is_empty());
        assert!("ndn:".parse::<Name>().unwrap().is_empty());
    }

    #[test]
    fn escapes() {
        let name: Name = "/hello%20world/%00%FF".parse().unwrap();
        assert_eq!(name.get(0).unwrap().as_bytes(), b"hello world");
        assert_eq!(name.get(1).unwrap().as_bytes(), &[0x00, 0xFF]);
        assert_eq!(name.to_string(), "/hello%20world/%00%FF");
        assert!("/bad%2".parse::<Name>().is_err());
        assert!("/bad%zz".parse::<Name>().is_err());
    }

    #[test]
    fn period_components() {
        let name: Name = "/.../....".parse().unwrap();
        assert_eq!(name.get(0).unwrap().as_bytes(), b"");
        assert_eq!(name.get(1).unwrap().as_bytes(), b".");
        assert_eq!(name.to_string(), "/.../....");
        assert!("/a/./b".parse::<Name>().is_err());
        assert!("/a/../b".parse::<Name>().is_err());
    }

    #[test]
    fn relative_rejected() {
        assert!("a/b".parse::<Name>().is_err());
    }

    #[test]
    fn ndnb_roundtrip() {
        let name: Name = "/a/b/%00%01".parse().unwrap();
        let mut enc = BinaryXmlEncoder::new();
        name.encode(&mut enc).unwrap();
        let buf = enc.finish().unwrap();
        // Name DTag, two single-byte components plus one two-byte component, close
        assert_eq!(buf[0], 0xF2);
        assert_eq!(*buf.last().unwrap(), 0x00);
        let mut dec = BinaryXmlDecoder::new(&buf);
        assert_eq!(Name::decode(&mut dec).unwrap(), name);
        dec.finish().unwrap();
    }

    #[test]
    fn serde_as_uri() {
        let name: Name = "/a/b%20c".parse().unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"/a/b%20c\"");
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
        assert!(serde_json::from_str::<Name>("\"/a/./b\"").is_err());
    }
}
