use crate::dtag::DTag;
use fog_crypto::CryptoError;
use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    /// Occurs when a SignedInfo or Signature is missing a required field at encode time. Nothing
    /// has been written when this is returned.
    Invalid(&'static str),
    /// A required element was not found where the decoder expected it.
    MissingElement(DTag),
    /// The decoder found a different element than the one it was asked to read.
    UnexpectedElement { expected: DTag, actual: String },
    /// Basic ndnb encoding failure
    BadEncode(String),
    /// Packet ended too early.
    LengthTooShort {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
    /// Packet was greater than maximum allowed size on encode or decode
    LengthTooLong { max: usize, actual: usize },
    /// Decoding hit the element nesting limit.
    ParseLimit(String),
    /// A textual name couldn't be parsed.
    BadName(String),
    /// Signing was requested but no private key is active.
    NoPrivateKey,
    /// A public key was needed but none was supplied.
    NoPublicKey,
    /// Verification was requested on an object that was never decoded, so no signed byte region
    /// was captured.
    NoSignedRegion,
    /// Verification was requested on an object with no signature bits.
    MissingSignature,
    /// Public key material couldn't be parsed.
    BadKey(String),
    /// Failure within the cryptographic submodule.
    CryptoError(CryptoError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Invalid(what) => write!(f, "Cannot encode {}: field values missing", what),
            Error::MissingElement(tag) => write!(f, "Required element {} is missing", tag),
            Error::UnexpectedElement {
                expected,
                ref actual,
            } => write!(f, "Expected element {}, but found {}", expected, actual),
            Error::BadEncode(ref err) => write!(f, "Basic data encoding failure: {}", err),
            Error::LengthTooShort {
                step,
                actual,
                expected,
            } => write!(
                f,
                "Expected data length {}, but got {} on step [{}]",
                expected, actual, step
            ),
            Error::LengthTooLong { max, actual } => write!(
                f,
                "Data too long: was {} bytes, maximum allowed is {}",
                actual, max
            ),
            Error::ParseLimit(ref err) => write!(f, "Hit parsing limit: {}", err),
            Error::BadName(ref err) => write!(f, "Bad name: {}", err),
            Error::NoPrivateKey => f.write_str("No private key is available for signing"),
            Error::NoPublicKey => f.write_str("Cannot verify without a public key"),
            Error::NoSignedRegion => f.write_str(
                "No signed region was captured; only decoded objects can be verified",
            ),
            Error::MissingSignature => f.write_str("Object has no signature bits"),
            Error::BadKey(ref err) => write!(f, "Bad public key: {}", err),
            Error::CryptoError(_) => write!(f, "Cryptographic Error"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::CryptoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl std::convert::From<CryptoError> for Error {
    fn from(e: CryptoError) -> Self {
        Self::CryptoError(e)
    }
}
