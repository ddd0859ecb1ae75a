//! Packet signer.
//!
//! `sign(payload, packet_number, key)`:
//! 1. key length is checked against the policy (before any key use)
//! 2. the packet number is encoded as 4 big-endian bytes
//! 3. HMAC is computed with `key` over the encoded number
//!    (or over `SHA-256(payload) || number` in payload-bound mode)
//!
//! A `Signer` only holds its policy, so it is `Copy` and can be shared across
//! threads freely.

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Result, SignError};
use crate::mac;
use crate::packet::PacketNumber;
use crate::policy::{HashAlgorithm, SigningMode, SigningPolicy};
use crate::signature::{PayloadDigest, Signature};

/// Everything produced while signing one packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedPacket {
    pub packet_number: u32,
    pub algorithm: &'static str,
    pub mode: SigningMode,
    pub payload_digest: PayloadDigest,
    pub signature: Signature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signer {
    policy: SigningPolicy,
}

impl Signer {
    /// # Errors
    /// `InvalidPolicy` if the policy lowers the key floor.
    pub fn new(policy: SigningPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    #[must_use]
    pub fn policy(&self) -> &SigningPolicy {
        &self.policy
    }

    #[must_use]
    pub fn hash(&self) -> HashAlgorithm {
        self.policy.hash
    }

    /// Sign one packet.
    ///
    /// `packet_number` accepts anything convertible to [`PacketNumber`];
    /// out-of-range values fail with `Encoding`, but only after the key has
    /// passed the policy gate.
    ///
    /// # Errors
    /// `PolicyViolation` for a short key, `Encoding` for an unrepresentable
    /// packet number.
    pub fn sign<N>(&self, payload: &[u8], packet_number: N, key: &[u8]) -> Result<Signature>
    where
        N: TryInto<PacketNumber>,
        SignError: From<N::Error>,
    {
        self.sign_packet(payload, packet_number, key)
            .map(|signed| signed.signature)
    }

    /// Like [`Signer::sign`] but also returns the payload digest and the
    /// parameters that produced the signature.
    ///
    /// # Errors
    /// Same as [`Signer::sign`].
    pub fn sign_packet<N>(&self, payload: &[u8], packet_number: N, key: &[u8]) -> Result<SignedPacket>
    where
        N: TryInto<PacketNumber>,
        SignError: From<N::Error>,
    {
        self.policy.check_key(key)?;
        let packet_number: PacketNumber = packet_number.try_into()?;
        let counter = packet_number.to_be_bytes();
        let payload_digest = PayloadDigest::of(payload);

        let tag = match self.policy.mode {
            SigningMode::Counter => {
                // digest is reported, not authenticated
                trace!(packet = %packet_number, digest = %payload_digest, "payload digest (unsigned)");
                mac::compute(self.policy.hash, key, &[&counter[..]])?
            }
            SigningMode::PayloadBound => {
                mac::compute(self.policy.hash, key, &[&payload_digest.as_bytes()[..], &counter[..]])?
            }
        };

        debug!(
            packet = %packet_number,
            algorithm = self.policy.hash.mac_name(),
            mode = %self.policy.mode,
            "packet signed"
        );

        Ok(SignedPacket {
            packet_number: packet_number.get(),
            algorithm: self.policy.hash.mac_name(),
            mode: self.policy.mode,
            payload_digest,
            signature: Signature::from_bytes(tag),
        })
    }

    /// Recompute the signature and compare in constant time.
    ///
    /// # Errors
    /// `BadSignature` on mismatch (including a wrong-length signature);
    /// otherwise the same errors as [`Signer::sign`].
    pub fn verify<N>(
        &self,
        payload: &[u8],
        packet_number: N,
        key: &[u8],
        signature: &Signature,
    ) -> Result<()>
    where
        N: TryInto<PacketNumber>,
        SignError: From<N::Error>,
    {
        let expected = self.sign(payload, packet_number, key)?;
        if mac::tags_equal(expected.as_bytes(), signature.as_bytes()) {
            Ok(())
        } else {
            debug!("signature mismatch");
            Err(SignError::BadSignature)
        }
    }
}

/// Sign under the default policy (HMAC-SHA256, 128-bit key floor, counter
/// mode).
///
/// # Errors
/// See [`Signer::sign`].
pub fn sign<N>(payload: &[u8], packet_number: N, key: &[u8]) -> Result<Signature>
where
    N: TryInto<PacketNumber>,
    SignError: From<N::Error>,
{
    Signer::default().sign(payload, packet_number, key)
}

/// Verify under the default policy.
///
/// # Errors
/// See [`Signer::verify`].
pub fn verify<N>(payload: &[u8], packet_number: N, key: &[u8], signature: &Signature) -> Result<()>
where
    N: TryInto<PacketNumber>,
    SignError: From<N::Error>,
{
    Signer::default().verify(payload, packet_number, key, signature)
}
