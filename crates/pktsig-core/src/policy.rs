//! Signing policy: which hash backs the HMAC, how long keys must be, and what
//! message the MAC covers.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignError};

/// Absolute key-strength floor. A policy may raise it, never lower it.
pub const MIN_KEY_BITS: u32 = 128;

/// Recognized HMAC hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 3] = [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    /// MAC output size in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Label used in reports, e.g. `HMAC-SHA256`.
    #[must_use]
    pub const fn mac_name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "HMAC-SHA256",
            HashAlgorithm::Sha384 => "HMAC-SHA384",
            HashAlgorithm::Sha512 => "HMAC-SHA512",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "");
        let norm = norm.strip_prefix("hmac").unwrap_or(&norm);
        match norm {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(SignError::InvalidPolicy(format!(
                "unknown hash {s:?} (use sha256|sha384|sha512)"
            ))),
        }
    }
}

/// What the MAC is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SigningMode {
    /// `HMAC(key, be32(packet_number))`. The payload digest is computed but
    /// does not enter the MAC. Matches signatures already issued in the field.
    #[default]
    Counter,
    /// `HMAC(key, SHA-256(payload) || be32(packet_number))`.
    PayloadBound,
}

impl SigningMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SigningMode::Counter => "counter",
            SigningMode::PayloadBound => "payload-bound",
        }
    }
}

impl fmt::Display for SigningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningMode {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "counter" => Ok(SigningMode::Counter),
            "payload-bound" | "payload" => Ok(SigningMode::PayloadBound),
            other => Err(SignError::InvalidPolicy(format!(
                "unknown signing mode {other:?} (use counter|payload-bound)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningPolicy {
    pub hash: HashAlgorithm,
    pub min_key_bits: u32,
    pub mode: SigningMode,
}

impl Default for SigningPolicy {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::Sha256,
            min_key_bits: MIN_KEY_BITS,
            mode: SigningMode::Counter,
        }
    }
}

impl SigningPolicy {
    /// # Errors
    /// `InvalidPolicy` if `min_key_bits` is below [`MIN_KEY_BITS`] or not a
    /// whole number of bytes.
    pub fn validate(&self) -> Result<()> {
        if self.min_key_bits < MIN_KEY_BITS {
            return Err(SignError::InvalidPolicy(format!(
                "min_key_bits {} is below the {MIN_KEY_BITS}-bit floor",
                self.min_key_bits
            )));
        }
        if self.min_key_bits % 8 != 0 {
            return Err(SignError::InvalidPolicy(format!(
                "min_key_bits {} is not a multiple of 8",
                self.min_key_bits
            )));
        }
        Ok(())
    }

    /// Policy gate on key length. Not constant-time; only the length is
    /// inspected.
    ///
    /// # Errors
    /// `PolicyViolation` if the key is shorter than `min_key_bits`.
    pub fn check_key(&self, key: &[u8]) -> Result<()> {
        let bits = key.len().saturating_mul(8);
        if bits < self.min_key_bits as usize {
            return Err(SignError::PolicyViolation {
                bits,
                min_bits: self.min_key_bits,
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn min_key_bytes(&self) -> usize {
        (self.min_key_bits / 8) as usize
    }
}
