//! Digest algorithm tag for salted hashes

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SaltError;

/// Digest algorithms implemented by the salted-hash computer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256 (32-byte digest)
    #[serde(rename = "SHA-256")]
    Sha256,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        Self::Sha256
    }
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
        }
    }

    pub fn digest_len_bits(&self) -> usize {
        match self {
            Self::Sha256 => 256,
        }
    }

    /// Digest length in bytes
    pub fn digest_len(&self) -> usize {
        self.digest_len_bits() / 8
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Sha256 => "Secure Hash Algorithm 2 (SHA-2) 256-bit digest",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = SaltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sha256" => Ok(Self::Sha256),
            _ => Err(SaltError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}
