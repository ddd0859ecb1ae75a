pub mod policy;
pub mod sign;
pub mod verify;

use anyhow::{bail, Result};

/// Packet data is restricted to 7-bit ASCII on every input path.
pub fn ascii_packet(data: &[u8]) -> Result<&[u8]> {
    if !data.is_ascii() {
        bail!("packet data must be 7-bit ASCII");
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_gate() {
        assert_eq!(ascii_packet(b"plain text 123").unwrap(), b"plain text 123");
        assert!(ascii_packet(b"").is_ok());
        assert!(ascii_packet("caf\u{e9}".as_bytes()).is_err());
        assert!(ascii_packet(&[0x80]).is_err());
    }
}
