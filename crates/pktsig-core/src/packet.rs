//! Packet number codec.
//!
//! Wire layout is fixed: `[ counter_be (4 bytes) ]`, zero-padded on the left.

use core::fmt;
use core::str::FromStr;

use crate::error::SignError;

pub const PACKET_NUMBER_LEN: usize = 4;

/// A packet sequence number that is known to fit the 4-byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PacketNumber(u32);

impl PacketNumber {
    #[must_use]
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; PACKET_NUMBER_LEN] {
        self.0.to_be_bytes()
    }

    /// Next packet number, or `None` once the counter space is used up.
    #[must_use]
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<u32> for PacketNumber {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

impl From<PacketNumber> for u32 {
    fn from(n: PacketNumber) -> Self {
        n.0
    }
}

impl TryFrom<u64> for PacketNumber {
    type Error = SignError;

    fn try_from(n: u64) -> Result<Self, Self::Error> {
        u32::try_from(n)
            .map(Self)
            .map_err(|_| SignError::Encoding(format!("{n} does not fit in {PACKET_NUMBER_LEN} bytes")))
    }
}

impl TryFrom<i64> for PacketNumber {
    type Error = SignError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        if n < 0 {
            return Err(SignError::Encoding(format!("{n} is negative")));
        }
        Self::try_from(n.unsigned_abs())
    }
}

impl FromStr for PacketNumber {
    type Err = SignError;

    /// Parses a decimal packet number. Anything that is not an integer in
    /// `0..2^32` is unrepresentable and yields `SignError::Encoding`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let n: i128 = s
            .parse()
            .map_err(|_| SignError::Encoding(format!("{s:?} is not an integer")))?;
        if n < 0 {
            return Err(SignError::Encoding(format!("{n} is negative")));
        }
        u32::try_from(n)
            .map(Self)
            .map_err(|_| SignError::Encoding(format!("{n} does not fit in {PACKET_NUMBER_LEN} bytes")))
    }
}

impl fmt::Display for PacketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_encode_big_endian() {
        assert_eq!(PacketNumber::new(0).to_be_bytes(), [0x00, 0x00, 0x00, 0x00]);
        assert_eq!(PacketNumber::new(1).to_be_bytes(), [0x00, 0x00, 0x00, 0x01]);
        assert_eq!(
            PacketNumber::new(0x0102_0304).to_be_bytes(),
            [0x01, 0x02, 0x03, 0x04]
        );
        assert_eq!(
            PacketNumber::try_from(4_294_967_295u64).unwrap().to_be_bytes(),
            [0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            PacketNumber::try_from(4_294_967_296u64),
            Err(SignError::Encoding(_))
        ));
        assert!(matches!(PacketNumber::try_from(-1i64), Err(SignError::Encoding(_))));
        assert!(matches!(
            PacketNumber::try_from(i64::MAX),
            Err(SignError::Encoding(_))
        ));
    }

    #[test]
    fn parses_decimal_text() {
        assert_eq!("42".parse::<PacketNumber>().unwrap().get(), 42);
        assert_eq!(" 7\n".parse::<PacketNumber>().unwrap().get(), 7);
        assert_eq!(
            "4294967295".parse::<PacketNumber>().unwrap(),
            PacketNumber::new(u32::MAX)
        );
        assert!(matches!(
            "4294967296".parse::<PacketNumber>(),
            Err(SignError::Encoding(_))
        ));
        assert!(matches!("-3".parse::<PacketNumber>(), Err(SignError::Encoding(_))));
        assert!(matches!("abc".parse::<PacketNumber>(), Err(SignError::Encoding(_))));
        assert!(matches!(
            "99999999999999999999999999999999999999999".parse::<PacketNumber>(),
            Err(SignError::Encoding(_))
        ));
    }

    #[test]
    fn next_stops_at_max() {
        assert_eq!(PacketNumber::new(5).checked_next(), Some(PacketNumber::new(6)));
        assert_eq!(PacketNumber::new(u32::MAX).checked_next(), None);
    }
}
