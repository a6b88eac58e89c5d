use std::convert::TryFrom;
use std::fmt;
use std::ops;
use std::time;

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of wire units per second. Timestamps travel as unsigned fixed-point seconds with 12
/// fractional bits.
const UNITS_PER_SEC: i128 = 4096;
const MAX_WIRE_LEN: usize = 8;

/// Wall-clock time with millisecond resolution, counted from the Unix epoch in UTC.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp {
    msec: i64,
}

impl Timestamp {
    pub fn from_millis(msec: i64) -> Timestamp {
        Timestamp { msec }
    }

    /// Milliseconds since the Unix epoch.
    pub fn millis(&self) -> i64 {
        self.msec
    }

    /// Create a Timestamp from the current system time. A clock set before the epoch yields a
    /// negative timestamp, which will refuse to encode.
    pub fn now() -> Timestamp {
        Timestamp::from(time::SystemTime::now())
    }

    /// Encode into the minimal big-endian fixed-point form, at least one byte long.
    pub fn to_wire_bytes(&self) -> Result<Vec<u8>> {
        if self.msec < 0 {
            return Err(Error::BadEncode(format!(
                "Timestamp {} is before the epoch",
                self.msec
            )));
        }
        let units = (self.msec as i128 * UNITS_PER_SEC + 500) / 1000;
        let units = u64::try_from(units)
            .map_err(|_| Error::BadEncode(format!("Timestamp {} is too large", self.msec)))?;
        let mut raw = [0u8; MAX_WIRE_LEN];
        BigEndian::write_u64(&mut raw, units);
        let skip = (units.leading_zeros() / 8).min(MAX_WIRE_LEN as u32 - 1) as usize;
        Ok(raw[skip..].to_vec())
    }

    /// Decode the big-endian fixed-point form, rounding to the nearest millisecond.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Timestamp> {
        if bytes.is_empty() || bytes.len() > MAX_WIRE_LEN {
            return Err(Error::BadEncode(format!(
                "not a recognized Timestamp length ({} bytes)",
                bytes.len()
            )));
        }
        let units = BigEndian::read_uint(bytes, bytes.len()) as i128;
        let msec = (units * 1000 + UNITS_PER_SEC / 2) / UNITS_PER_SEC;
        Ok(Timestamp {
            msec: msec as i64,
        })
    }
}

impl ops::Add<i64> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: i64) -> Self {
        Timestamp {
            msec: self.msec.saturating_add(rhs),
        }
    }
}

impl ops::Sub<i64> for Timestamp {
    type Output = Timestamp;
    fn sub(self, rhs: i64) -> Self {
        Timestamp {
            msec: self.msec.saturating_sub(rhs),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UTC: {} ms", self.msec)
    }
}

impl From<time::SystemTime> for Timestamp {
    fn from(t: time::SystemTime) -> Self {
        match t.duration_since(time::SystemTime::UNIX_EPOCH) {
            Ok(d) => Timestamp::from_millis(d.as_millis() as i64),
            Err(e) => Timestamp::from_millis(-(e.duration().as_millis() as i64)),
        }
    }
}
