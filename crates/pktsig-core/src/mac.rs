//! HMAC primitive over the recognized hash functions.
//!
//! No policy is applied here; callers gate key length before reaching this
//! layer.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::error::{Result, SignError};
use crate::policy::HashAlgorithm;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// HMAC over the concatenation of `parts`.
///
/// # Errors
/// Only `Internal`, if the HMAC implementation refuses the key. HMAC accepts
/// keys of any length, so this does not happen in practice.
pub fn compute(hash: HashAlgorithm, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>> {
    match hash {
        HashAlgorithm::Sha256 => hmac_parts::<HmacSha256>(key, parts),
        HashAlgorithm::Sha384 => hmac_parts::<HmacSha384>(key, parts),
        HashAlgorithm::Sha512 => hmac_parts::<HmacSha512>(key, parts),
    }
}

fn hmac_parts<M: Mac + KeyInit>(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>> {
    let mut mac =
        <M as Mac>::new_from_slice(key).map_err(|_| SignError::Internal("hmac key rejected"))?;
    for part in parts {
        Mac::update(&mut mac, part);
    }
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Constant-time tag comparison. Length mismatch returns early; tag lengths
/// are public.
#[must_use]
pub fn tags_equal(expected: &[u8], provided: &[u8]) -> bool {
    if expected.len() != provided.len() {
        return false;
    }
    expected.ct_eq(provided).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_message_equals_joined_message() {
        let key = [7u8; 32];
        let joined = compute(HashAlgorithm::Sha256, &key, &[&b"headerbody"[..]]).unwrap();
        let split = compute(HashAlgorithm::Sha256, &key, &[&b"header"[..], &b"body"[..]]).unwrap();
        assert_eq!(joined, split);
    }

    #[test]
    fn output_lengths_follow_hash() {
        for hash in HashAlgorithm::ALL {
            let tag = compute(hash, &[1u8; 16], &[&[0u8, 0, 0, 1][..]]).unwrap();
            assert_eq!(tag.len(), hash.output_len());
        }
    }

    #[test]
    fn tag_comparison() {
        assert!(tags_equal(&[1, 2, 3], &[1, 2, 3]));
        assert!(!tags_equal(&[1, 2, 3], &[1, 2, 4]));
        assert!(!tags_equal(&[1, 2, 3], &[1, 2]));
    }
}
