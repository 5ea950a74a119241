//! Salted hash value object

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algorithm::HashAlgorithm;
use crate::error::{Result, SaltError};

/// Digest of `cleartext || salt`, paired with the salt and the algorithm.
///
/// Immutable. Inputs are copied on construction and byte accessors hand out
/// copies, so no caller ever holds a reference into the internal buffers.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SaltedHashRecord", into = "SaltedHashRecord")]
pub struct SaltedHash {
    hash: Vec<u8>,
    salt: Vec<u8>,
    algorithm: HashAlgorithm,
}

impl SaltedHash {
    /// Wraps a digest produced by the hashing module; lengths are trusted.
    pub(crate) fn from_parts(hash: &[u8], salt: &[u8], algorithm: HashAlgorithm) -> Self {
        Self {
            hash: hash.to_vec(),
            salt: salt.to_vec(),
            algorithm,
        }
    }

    /// Builds a salted hash with the default algorithm, checking the digest length.
    pub fn new(hash: &[u8], salt: &[u8]) -> Result<Self> {
        Self::with_algorithm(hash, salt, HashAlgorithm::default())
    }

    pub fn with_algorithm(hash: &[u8], salt: &[u8], algorithm: HashAlgorithm) -> Result<Self> {
        if hash.len() != algorithm.digest_len() {
            return Err(SaltError::InvalidLength {
                expected: algorithm.digest_len(),
                got: hash.len(),
            });
        }
        Ok(Self::from_parts(hash, salt, algorithm))
    }

    pub fn from_hex(hash_hex: &str, salt_hex: &str) -> Result<Self> {
        Self::from_hex_with(hash_hex, salt_hex, HashAlgorithm::default())
    }

    pub fn from_hex_with(hash_hex: &str, salt_hex: &str, algorithm: HashAlgorithm) -> Result<Self> {
        let hash = hex::decode(hash_hex)?;
        let salt = hex::decode(salt_hex)?;
        Self::with_algorithm(&hash, &salt, algorithm)
    }

    /// Copy of the digest bytes
    pub fn salted_hash(&self) -> Vec<u8> {
        self.hash.clone()
    }

    pub fn salted_hash_hex(&self) -> String {
        hex::encode(&self.hash)
    }

    /// Copy of the salt bytes
    pub fn salt(&self) -> Vec<u8> {
        self.salt.clone()
    }

    pub fn salt_hex(&self) -> String {
        hex::encode(&self.salt)
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Key under which persistence layers index this hash: `<salt>:<digest>`
    pub fn record_key(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for SaltedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.salt_hex(), self.salted_hash_hex())
    }
}

impl std::fmt::Debug for SaltedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaltedHash")
            .field("salt", &self.salt_hex())
            .field("hash", &self.salted_hash_hex())
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Parses the `<salt>:<digest>` record key form (default algorithm).
impl FromStr for SaltedHash {
    type Err = SaltError;

    fn from_str(s: &str) -> Result<Self> {
        let (salt_hex, hash_hex) = s.split_once(':').ok_or_else(|| {
            SaltError::InvalidArgument(format!("expected <salt>:<digest>, got {:?}", s))
        })?;
        Self::from_hex(hash_hex, salt_hex)
    }
}

/// Wire form: hex fields
#[derive(Serialize, Deserialize)]
struct SaltedHashRecord {
    #[serde(with = "hex")]
    hash: Vec<u8>,
    #[serde(with = "hex")]
    salt: Vec<u8>,
    algorithm: HashAlgorithm,
}

impl TryFrom<SaltedHashRecord> for SaltedHash {
    type Error = SaltError;

    fn try_from(record: SaltedHashRecord) -> Result<Self> {
        Self::with_algorithm(&record.hash, &record.salt, record.algorithm)
    }
}

impl From<SaltedHash> for SaltedHashRecord {
    fn from(value: SaltedHash) -> Self {
        Self {
            hash: value.hash,
            salt: value.salt,
            algorithm: value.algorithm,
        }
    }
}
