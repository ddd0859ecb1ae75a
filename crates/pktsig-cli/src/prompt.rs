//! Interactive signing loop.
//!
//! Each round asks for packet data, a packet number and a base64 key, then
//! prints the base64 signature. A bad answer aborts only the current round.
//! EOF on input ends the loop.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

use pktsig_core::{PacketNumber, SignError, Signer, SigningKey};

use crate::commands::ascii_packet;

pub const PROMPT_DATA: &str = "Enter packet data to sign> ";
pub const PROMPT_NUMBER: &str = "Enter the packet number.> ";
pub const PROMPT_KEY: &str = "Enter the signing key (base64 encoded)> ";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PromptSummary {
    pub signed: usize,
    pub rejected: usize,
}

/// Run the loop until `input` is exhausted.
pub fn run_prompt<R, W, E>(signer: &Signer, mut input: R, out: &mut W, err: &mut E) -> Result<PromptSummary>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut summary = PromptSummary::default();

    loop {
        let Some(data) = ask(&mut input, out, PROMPT_DATA)? else {
            break;
        };
        let Some(number) = ask(&mut input, out, PROMPT_NUMBER)? else {
            break;
        };
        let Some(key) = ask(&mut input, out, PROMPT_KEY)? else {
            break;
        };

        match sign_round(signer, &data, &number, &key) {
            Ok(sig) => {
                writeln!(out, "Packet signature: {sig}")?;
                summary.signed += 1;
            }
            Err(e) => {
                match e.downcast_ref::<SignError>() {
                    Some(se) => warn!(code = %se.code(), "request rejected"),
                    None => warn!("request rejected: {e}"),
                }
                writeln!(err, "error: {e}")?;
                summary.rejected += 1;
            }
        }
    }

    debug!(signed = summary.signed, rejected = summary.rejected, "prompt loop finished");
    Ok(summary)
}

fn sign_round(signer: &Signer, data: &[u8], number: &[u8], key: &[u8]) -> Result<String> {
    let payload = ascii_packet(data)?;
    let key = SigningKey::from_base64(&String::from_utf8_lossy(key))?;
    // key policy is reported ahead of packet number problems
    signer.policy().check_key(key.as_bytes())?;
    let packet_number: PacketNumber = String::from_utf8_lossy(number).parse()?;
    let sig = signer.sign(payload, packet_number, key.as_bytes())?;
    Ok(sig.to_base64())
}

/// Print `prompt`, read one line without its terminator. `None` on EOF.
fn ask<R, W>(input: &mut R, out: &mut W, prompt: &str) -> Result<Option<Vec<u8>>>
where
    R: BufRead,
    W: Write,
{
    out.write_all(prompt.as_bytes())?;
    out.flush()?;

    let mut line = Vec::new();
    if input.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drive(script: &str) -> (PromptSummary, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = run_prompt(
            &Signer::default(),
            Cursor::new(script.as_bytes().to_vec()),
            &mut out,
            &mut err,
        )
        .unwrap();
        (
            summary,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn one_round_prints_signature() {
        let (summary, out, err) = drive("hello\n1\nAAAAAAAAAAAAAAAAAAAAAA==\n");
        assert_eq!(summary, PromptSummary { signed: 1, rejected: 0 });
        assert!(out.starts_with(PROMPT_DATA));
        assert!(out.contains("Packet signature: 984LZT0tcqQQjPWr6RL/3Xd2Ftu7J6cOggTzri0Pb60=\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn crlf_lines_are_accepted() {
        let (summary, out, _) = drive("ping\r\n42\r\nMDEyMzQ1Njc4OWFiY2RlZg==\r\n");
        assert_eq!(summary.signed, 1);
        assert!(out.contains("Packet signature: cUwmLz1FDc56y5IThO8V5sp9iLmVqPpM2z2uYcFZg4g="));
    }

    #[test]
    fn bad_round_does_not_stop_the_loop() {
        let script = concat!(
            "hello\n1\nAAAAAAAAAAAAAAAAAAAA\n",       // 15-byte key
            "hello\n4294967296\nAAAAAAAAAAAAAAAAAAAAAA==\n",
            "hello\n1\nAAAAAAAAAAAAAAAAAAAAAA==\n",
        );
        let (summary, out, err) = drive(script);
        assert_eq!(summary, PromptSummary { signed: 1, rejected: 2 });
        assert!(err.contains("key too weak"));
        assert!(err.contains("packet number not encodable"));
        assert_eq!(out.matches("Packet signature: ").count(), 1);
    }

    #[test]
    fn non_ascii_payload_rejected() {
        let (summary, _, err) = drive("héllo\n1\nAAAAAAAAAAAAAAAAAAAAAA==\n");
        assert_eq!(summary, PromptSummary { signed: 0, rejected: 1 });
        assert!(err.contains("ASCII"));
    }

    #[test]
    fn eof_mid_round_ends_cleanly() {
        let (summary, out, err) = drive("hello\n1\n");
        assert_eq!(summary, PromptSummary::default());
        assert!(out.ends_with(PROMPT_KEY));
        assert!(err.is_empty());
    }
}
