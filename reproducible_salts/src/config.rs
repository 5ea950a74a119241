//! Configuration for the salted hashing CLI

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::algorithm::HashAlgorithm;
use crate::error::{Result, SaltError};

/// Default environment variable holding the hex secret seed
pub const DEFAULT_SEED_ENV: &str = "REPRO_SALTS_SECRET_SEED";

/// Where the hex-encoded secret seed comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SeedSource {
    /// Environment variable
    Env { var: String },
    /// File containing the hex seed (surrounding whitespace ignored)
    File { path: PathBuf },
    /// Interactive prompt without echo
    Prompt,
}

impl Default for SeedSource {
    fn default() -> Self {
        Self::Env {
            var: DEFAULT_SEED_ENV.to_string(),
        }
    }
}

impl SeedSource {
    /// Reads the hex seed. `Prompt` is resolved by the caller.
    pub fn read_hex(&self) -> Result<Zeroizing<String>> {
        match self {
            Self::Env { var } => std::env::var(var)
                .map(|v| Zeroizing::new(v.trim().to_string()))
                .map_err(|_| SaltError::Config(format!("environment variable {} is not set", var))),
            Self::File { path } => {
                let contents = Zeroizing::new(std::fs::read_to_string(path)?);
                Ok(Zeroizing::new(contents.trim().to_string()))
            }
            Self::Prompt => Err(SaltError::Config(
                "prompt seed source must be read interactively".to_string(),
            )),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` env-filter directive, e.g. `info` or `reproducible_salts=debug`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    pub algorithm: HashAlgorithm,
    /// Count used by bulk commands when none is given
    pub default_count: usize,
    pub seed: SeedSource,
    pub log: LogConfig,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            default_count: 5,
            seed: SeedSource::default(),
            log: LogConfig::default(),
        }
    }
}

impl HashingConfig {
    /// Loads and validates a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_count == 0 {
            return Err(SaltError::Config("default_count must be positive".to_string()));
        }
        if self.log.level.trim().is_empty() {
            return Err(SaltError::Config("log.level must not be empty".to_string()));
        }
        Ok(())
    }
}
