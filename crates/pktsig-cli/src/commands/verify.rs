use anyhow::Result;
use clap::Args;
use std::io::Write;

use pktsig_core::{PacketNumber, SignError, Signature, Signer, SigningKey};

use super::ascii_packet;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[arg(long)]
    pub data: String,
    #[arg(long)]
    pub packet_number: String,
    /// Signing key, standard base64 with padding
    #[arg(long)]
    pub key: String,
    /// Signature to check, standard base64 with padding
    #[arg(long)]
    pub signature: String,
}

/// Run `pktsig verify`. `Ok(false)` means the signature did not match.
pub fn run_verify<W: Write>(signer: &Signer, args: &VerifyArgs, out: &mut W) -> Result<bool> {
    let payload = ascii_packet(args.data.as_bytes())?;
    let key = SigningKey::from_base64(&args.key)?;
    signer.policy().check_key(key.as_bytes())?;
    let packet_number: PacketNumber = args.packet_number.parse()?;
    let signature = Signature::from_base64(&args.signature)?;

    match signer.verify(payload, packet_number, key.as_bytes(), &signature) {
        Ok(()) => {
            writeln!(out, "[OK] signature valid")?;
            Ok(true)
        }
        Err(SignError::BadSignature) => {
            writeln!(out, "[BAD] signature invalid: {}", SignError::BadSignature)?;
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(n: &str, sig: &str) -> VerifyArgs {
        VerifyArgs {
            data: "ping".into(),
            packet_number: n.into(),
            key: "MDEyMzQ1Njc4OWFiY2RlZg==".into(),
            signature: sig.into(),
        }
    }

    #[test]
    fn good_signature() {
        let mut out = Vec::new();
        let ok = run_verify(
            &Signer::default(),
            &args("42", "cUwmLz1FDc56y5IThO8V5sp9iLmVqPpM2z2uYcFZg4g="),
            &mut out,
        )
        .unwrap();
        assert!(ok);
        assert_eq!(String::from_utf8(out).unwrap(), "[OK] signature valid\n");
    }

    #[test]
    fn wrong_packet_number() {
        let mut out = Vec::new();
        let ok = run_verify(
            &Signer::default(),
            &args("43", "cUwmLz1FDc56y5IThO8V5sp9iLmVqPpM2z2uYcFZg4g="),
            &mut out,
        )
        .unwrap();
        assert!(!ok);
        assert!(String::from_utf8(out).unwrap().starts_with("[BAD]"));
    }

    #[test]
    fn malformed_signature_is_an_error() {
        let mut out = Vec::new();
        let err = run_verify(&Signer::default(), &args("42", "%%%"), &mut out).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SignError>(),
            Some(SignError::SignatureEncoding(_))
        ));
    }
}
