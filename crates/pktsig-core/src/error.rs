//! Signing errors and their stable numeric codes.
//!
//! The codes are small numbers you can put in logs or use as a CLI exit
//! status to explain *why* a request was refused.

use core::convert::Infallible;
use core::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SignError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// Key material is shorter than the policy floor. Raised before the key
    /// is used for anything.
    #[error("key too weak: {bits} bits supplied, at least {min_bits} required")]
    PolicyViolation { bits: usize, min_bits: u32 },

    /// Packet number cannot be written as a 4-byte unsigned integer.
    #[error("packet number not encodable: {0}")]
    Encoding(String),

    #[error("invalid signing policy: {0}")]
    InvalidPolicy(String),

    #[error("malformed key encoding: {0}")]
    KeyEncoding(String),

    #[error("malformed signature encoding: {0}")]
    SignatureEncoding(String),

    #[error("signature does not authenticate this packet")]
    BadSignature,

    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl From<Infallible> for SignError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

/// Stable numeric error codes.
///
/// Layout:
///   1xxx = key / policy
///   2xxx = encoding
///   3xxx = verification
///   9xxx = generic internal
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 1xxx: policy
    KeyTooWeak = 1001,
    PolicyInvalid = 1002,

    // 2xxx: encoding
    PacketNumberOutOfRange = 2001,
    KeyMalformed = 2002,
    SignatureMalformed = 2003,

    // 3xxx: verification
    SignatureMismatch = 3001,

    // 9xxx: generic
    Internal = 9000,
}

impl ErrorCode {
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::KeyTooWeak => "signing key below minimum strength",
            ErrorCode::PolicyInvalid => "signing policy rejected",
            ErrorCode::PacketNumberOutOfRange => "packet number outside 0..2^32",
            ErrorCode::KeyMalformed => "signing key is not valid base64",
            ErrorCode::SignatureMalformed => "signature is not valid base64",
            ErrorCode::SignatureMismatch => "signature verification failed",
            ErrorCode::Internal => "internal signing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_u16(), self.description())
    }
}

impl From<&SignError> for ErrorCode {
    fn from(e: &SignError) -> Self {
        match e {
            SignError::PolicyViolation { .. } => ErrorCode::KeyTooWeak,
            SignError::InvalidPolicy(_) => ErrorCode::PolicyInvalid,
            SignError::Encoding(_) => ErrorCode::PacketNumberOutOfRange,
            SignError::KeyEncoding(_) => ErrorCode::KeyMalformed,
            SignError::SignatureEncoding(_) => ErrorCode::SignatureMalformed,
            SignError::BadSignature => ErrorCode::SignatureMismatch,
            SignError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl SignError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_violation_maps_to_code() {
        let e = SignError::PolicyViolation {
            bits: 64,
            min_bits: 128,
        };
        assert_eq!(e.code(), ErrorCode::KeyTooWeak);
        assert_eq!(e.code().as_u16(), 1001);
        assert!(e.to_string().starts_with("key too weak"));
    }

    #[test]
    fn encoding_and_verification_codes() {
        assert_eq!(
            SignError::Encoding("4294967296".into()).code(),
            ErrorCode::PacketNumberOutOfRange
        );
        assert_eq!(SignError::BadSignature.code().as_u16(), 3001);
        assert_eq!(
            ErrorCode::SignatureMalformed.to_string(),
            "2003 (signature is not valid base64)"
        );
    }
}
