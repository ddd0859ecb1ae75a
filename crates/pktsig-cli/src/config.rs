use anyhow::{anyhow, Context, Result};
use pktsig_core::{HashAlgorithm, SigningMode, SigningPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicySection,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct PolicySection {
    pub hash: Option<HashAlgorithm>,
    pub min_key_bits: Option<u32>,
    pub mode: Option<SigningMode>,
}

impl Config {
    /// File values over built-in defaults. Validation is left to
    /// `Signer::new` so flags can still fix a bad file value.
    pub fn policy(&self) -> SigningPolicy {
        let defaults = SigningPolicy::default();
        SigningPolicy {
            hash: self.policy.hash.unwrap_or(defaults.hash),
            min_key_bits: self.policy.min_key_bits.unwrap_or(defaults.min_key_bits),
            mode: self.policy.mode.unwrap_or(defaults.mode),
        }
    }
}

/// Read the config at the default location, if there is one.
pub fn read_config() -> Result<Option<Config>> {
    read_config_from(&default_path()?)
}

pub fn read_config_from(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let txt = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&txt).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(cfg))
}

/// `$PKTSIG_HOME/config.toml`, else `~/.pktsig/config.toml`.
pub fn default_path() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("PKTSIG_HOME") {
        return Ok(PathBuf::from(home).join("config.toml"));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot resolve home dir"))?;
    Ok(home.join(".pktsig").join("config.toml"))
}
