use anyhow::Result;
use std::io::Write;

use pktsig_core::{Signer, MIN_KEY_BITS};

use crate::config;

/// Run `pktsig policy`: show where the policy came from and what is in force.
pub fn run_policy<W: Write>(signer: &Signer, out: &mut W) -> Result<()> {
    writeln!(out, "--- Config ---")?;
    match config::default_path() {
        Ok(path) => match config::read_config_from(&path) {
            Ok(Some(_)) => writeln!(out, "  config:        {} (loaded)", path.display())?,
            Ok(None) => writeln!(out, "  config:        <none> (built-in defaults)")?,
            Err(e) => writeln!(out, "  config:        ERROR: {e:#}")?,
        },
        Err(e) => writeln!(out, "  config:        ERROR: {e}")?,
    }

    let p = signer.policy();
    writeln!(out, "\n--- Policy ---")?;
    writeln!(out, "  algorithm:     {}", p.hash.mac_name())?;
    writeln!(out, "  output bytes:  {}", p.hash.output_len())?;
    writeln!(
        out,
        "  min key bits:  {} (floor {MIN_KEY_BITS})",
        p.min_key_bits
    )?;
    writeln!(out, "  mode:          {}", p.mode)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pktsig_core::{HashAlgorithm, SigningMode, SigningPolicy};

    #[test]
    fn shows_effective_policy() {
        let signer = Signer::new(SigningPolicy {
            hash: HashAlgorithm::Sha384,
            min_key_bits: 192,
            mode: SigningMode::PayloadBound,
        })
        .unwrap();
        let mut out = Vec::new();
        run_policy(&signer, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("HMAC-SHA384"));
        assert!(text.contains("output bytes:  48"));
        assert!(text.contains("min key bits:  192 (floor 128)"));
        assert!(text.contains("payload-bound"));
    }
}
