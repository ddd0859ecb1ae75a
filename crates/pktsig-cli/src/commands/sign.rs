use anyhow::Result;
use clap::Args;
use std::io::Write;

use pktsig_core::{PacketNumber, Signer, SigningKey};

use super::ascii_packet;

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Packet data (ASCII)
    #[arg(long)]
    pub data: String,
    /// Packet number, 0..=4294967295
    #[arg(long)]
    pub packet_number: String,
    /// Signing key, standard base64 with padding
    #[arg(long)]
    pub key: String,
    /// Print the full signing report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run `pktsig sign`
pub fn run_sign<W: Write>(signer: &Signer, args: &SignArgs, out: &mut W) -> Result<()> {
    let payload = ascii_packet(args.data.as_bytes())?;
    let key = SigningKey::from_base64(&args.key)?;
    signer.policy().check_key(key.as_bytes())?;
    let packet_number: PacketNumber = args.packet_number.parse()?;

    let signed = signer.sign_packet(payload, packet_number, key.as_bytes())?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&signed)?)?;
    } else {
        writeln!(out, "Packet signature: {}", signed.signature)?;
    }
    Ok(())
}
