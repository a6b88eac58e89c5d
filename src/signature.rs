use serde::{Deserialize, Serialize};

use crate::{
    decoder::BinaryXmlDecoder,
    dtag::DTag,
    encoder::BinaryXmlEncoder,
    error::{Error, Result},
};

/// Digest algorithm assumed when a Signature doesn't name one: the BLAKE2b-256 OID. Packets are
/// signed over a BLAKE2b-256 hash of their signed region.
pub const DEFAULT_DIGEST_ALGORITHM: &str = "1.3.6.1.4.1.1722.12.2.1.8";

/// Cryptographic proof over a ContentObject's name, SignedInfo, and content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    digest_algorithm: Option<String>,
    #[serde(default, with = "serde_bytes", skip_serializing_if = "Option::is_none")]
    witness: Option<Vec<u8>>,
    #[serde(default, with = "serde_bytes", skip_serializing_if = "Option::is_none")]
    signature: Option<Vec<u8>>,
}

impl Signature {
    /// An empty signature. It won't encode until signature bits are set.
    pub fn new() -> Signature {
        Signature::default()
    }

    pub fn with_signature_bits(mut self, bits: impl Into<Vec<u8>>) -> Signature {
        self.signature = Some(bits.into());
        self
    }

    pub fn with_digest_algorithm(mut self, algorithm: impl Into<String>) -> Signature {
        self.digest_algorithm = Some(algorithm.into());
        self
    }

    pub fn with_witness(mut self, witness: impl Into<Vec<u8>>) -> Signature {
        self.witness = Some(witness.into());
        self
    }

    /// Drop the digest algorithm and witness, leaving only the signature bits.
    pub fn clear_algorithm(mut self) -> Signature {
        self.digest_algorithm = None;
        self.witness = None;
        self
    }

    /// The digest algorithm, if one was set explicitly.
    pub fn digest_algorithm(&self) -> Option<&str> {
        self.digest_algorithm.as_deref()
    }

    /// The digest algorithm in effect, falling back to [`DEFAULT_DIGEST_ALGORITHM`].
    pub fn effective_digest_algorithm(&self) -> &str {
        self.digest_algorithm().unwrap_or(DEFAULT_DIGEST_ALGORITHM)
    }

    pub fn witness(&self) -> Option<&[u8]> {
        self.witness.as_deref()
    }

    pub fn signature_bits(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    /// A signature is complete once it has non-empty signature bits.
    pub fn validate(&self) -> bool {
        self.signature.as_ref().map_or(false, |bits| !bits.is_empty())
    }

    pub fn element_tag() -> DTag {
        DTag::Signature
    }

    pub fn encode(&self, enc: &mut BinaryXmlEncoder) -> Result<()> {
        let bits = match self.signature {
            Some(ref bits) if !bits.is_empty() => bits,
            _ => return Err(Error::Invalid("Signature")),
        };
        enc.write_start_element(DTag::Signature)?;
        if let Some(ref algorithm) = self.digest_algorithm {
            if algorithm != DEFAULT_DIGEST_ALGORITHM {
                enc.write_utf8_element(DTag::DigestAlgorithm, algorithm)?;
            }
        }
        if let Some(ref witness) = self.witness {
            enc.write_element(DTag::Witness, witness)?;
        }
        enc.write_element(DTag::SignatureBits, bits)?;
        enc.write_end_element()
    }

    pub fn decode(dec: &mut BinaryXmlDecoder) -> Result<Signature> {
        dec.read_start_element(DTag::Signature)?;
        let digest_algorithm = dec
            .try_read_utf8_element(DTag::DigestAlgorithm)?
            .map(str::to_owned);
        if let Some(ref algorithm) = digest_algorithm {
            tracing::trace!(algorithm = %algorithm, "found digest algorithm");
        }
        let witness = dec
            .try_read_binary_element(DTag::Witness)?
            .map(<[u8]>::to_vec);
        if witness.is_some() {
            tracing::trace!("found witness");
        }
        // Signature bits are mandatory, so no lookahead here: a missing element is an error.
        let signature = dec.read_binary_element(DTag::SignatureBits)?.to_vec();
        dec.read_end_element()?;
        Ok(Signature {
            digest_algorithm,
            witness,
            signature: Some(signature),
        })
    }
}
