//! Configuration Store - Config Directory Persistence
//!
//! Owns the `~/.pmarket-cli` directory: `config.toml` (private key,
//! RPC URL, contract addresses) and `credentials.toml` (CLOB API
//! credentials). Writes are atomic (tmp file + rename) so an
//! interrupted save never corrupts an existing config.

use std::path::{Path, PathBuf};

use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use super::{CliConfig, Credentials};

const CONFIG_FILE: &str = "config.toml";
const CREDENTIALS_FILE: &str = "credentials.toml";

/// File-backed store for config and credentials.
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Open (creating if needed) the config directory.
    ///
    /// Resolution order: `PMARKET_CONFIG_DIR` env var, then
    /// `$HOME/.pmarket-cli`.
    pub fn open() -> Result<Self> {
        let dir = match std::env::var("PMARKET_CONFIG_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let home = std::env::var("HOME").context("HOME not set")?;
                Path::new(&home).join(".pmarket-cli")
            }
        };

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config dir {}", dir.display()))?;

        Ok(Self { dir })
    }

    /// Path to the config directory (for diagnostics).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load `config.toml`, writing a default template on first run.
    pub fn load_config(&self) -> Result<CliConfig> {
        let path = self.dir.join(CONFIG_FILE);
        if !path.exists() {
            let config = CliConfig::default();
            self.write_atomic(CONFIG_FILE, &config)?;
            info!(path = %path.display(), "Created default config");
            return Ok(config);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Validate and persist a private key; returns the wallet address.
    pub fn save_private_key(&self, private_key: &str) -> Result<String> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .context("Invalid private key format")?;

        let mut config = self.load_config()?;
        config.private_key = private_key.trim().to_string();
        self.write_atomic(CONFIG_FILE, &config)?;

        Ok(signer.address().to_string())
    }

    /// Build the signer from the stored private key.
    ///
    /// # Errors
    /// Fails when no key has been saved yet (fatal for signing
    /// commands).
    pub fn signer(&self, config: &CliConfig) -> Result<PrivateKeySigner> {
        anyhow::ensure!(
            !config.private_key.is_empty(),
            "No private key configured. Run `pmarket-cli init <private-key>` first"
        );
        config
            .private_key
            .parse()
            .context("Invalid private key in config.toml")
    }

    /// Load stored API credentials, if any.
    pub fn load_credentials(&self) -> Result<Option<Credentials>> {
        let path = self.dir.join(CREDENTIALS_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let creds: Credentials =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(creds.is_complete().then_some(creds))
    }

    /// Persist freshly derived API credentials.
    pub fn save_credentials(&self, api_key: &str, api_secret: &str, passphrase: &str) -> Result<()> {
        let creds = Credentials {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            passphrase: passphrase.to_string(),
            derived_at: Utc::now().to_rfc3339(),
        };
        self.write_atomic(CREDENTIALS_FILE, &creds)?;
        info!(path = %self.dir.join(CREDENTIALS_FILE).display(), "API credentials saved");
        Ok(())
    }

    /// Serialize to TOML and write via tmp file + rename.
    fn write_atomic<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let content = toml::to_string_pretty(value).context("Failed to serialize config")?;
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));

        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to rename {}", path.display()))?;

        Ok(())
    }
}
