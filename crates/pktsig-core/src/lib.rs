#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]

//! Packet signing core.
//!
//! A packet is authenticated by an HMAC over its 4-byte big-endian packet
//! number, keyed by a shared secret that must clear a minimum-strength policy.

pub mod error;
pub mod key;
pub mod mac;
pub mod packet;
pub mod policy;
pub mod signature;
pub mod signer;

pub use error::{ErrorCode, Result, SignError};
pub use key::SigningKey;
pub use packet::PacketNumber;
pub use policy::{HashAlgorithm, SigningMode, SigningPolicy, MIN_KEY_BITS};
pub use signature::{PayloadDigest, Signature};
pub use signer::{sign, verify, SignedPacket, Signer};
