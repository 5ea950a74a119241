//! Salted-hash generator bound to one secret seed
//!
//! ```text
//! secret_seed + cleartext -> derive_seed -> SaltSequence -> salt(i)
//!                                         -> SHA-256(cleartext || salt(i))
//! ```
//!
//! The secret seed lives behind a read/write lock. Every operation checks the
//! destroyed flag and reads the seed under one read guard; `destroy()` takes
//! the write guard, so no caller ever sees a half-zeroed seed.

use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::algorithm::HashAlgorithm;
use crate::crypto::{check_count, derive_seed, salted_hash_with, SaltSequence};
use crate::error::Result;
use crate::salted_hash::SaltedHash;
use crate::secret::{Cleartext, Destroy, SecretSeed};

/// Factory of per-cleartext salted-hash sequences
pub struct SaltedHashGenerator {
    seed: RwLock<SecretSeed>,
    algorithm: HashAlgorithm,
}

impl SaltedHashGenerator {
    /// Copies `secret_seed`; the caller's buffer is left untouched.
    pub fn new(secret_seed: &[u8]) -> Self {
        Self::with_algorithm(secret_seed, HashAlgorithm::default())
    }

    pub fn with_algorithm(secret_seed: &[u8], algorithm: HashAlgorithm) -> Self {
        debug!(seed_len = secret_seed.len(), %algorithm, "salted hash generator created");
        Self {
            seed: RwLock::new(SecretSeed::new(secret_seed)),
            algorithm,
        }
    }

    pub fn from_hex(secret_seed_hex: &str) -> Result<Self> {
        let seed = SecretSeed::from_hex(secret_seed_hex)?;
        debug!(seed_len = seed.len(), "salted hash generator created from hex");
        Ok(Self {
            seed: RwLock::new(seed),
            algorithm: HashAlgorithm::default(),
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Starts a new sequence of salted hashes for `cleartext`.
    pub fn new_sequence(&self, cleartext: &[u8]) -> Result<SaltedHashSequence> {
        let salts = self.salts_for(cleartext)?;
        Ok(SaltedHashSequence {
            cleartext: Cleartext::new(cleartext),
            salts,
            algorithm: self.algorithm,
        })
    }

    /// UTF-8 variant of [`Self::new_sequence`]; `None` hashes the empty marker.
    pub fn new_sequence_str(&self, cleartext: Option<&str>) -> Result<SaltedHashSequence> {
        self.new_sequence(cleartext_bytes(cleartext))
    }

    /// Salted hash at 0-based `index` for `cleartext`.
    pub fn nth_hash(&self, cleartext: &[u8], index: u64) -> Result<SaltedHash> {
        let mut salts = self.salts_for(cleartext)?;
        for _ in 0..index {
            salts.next_salt();
        }
        let salt = salts.next_salt();
        Ok(salted_hash_with(self.algorithm, cleartext, &salt))
    }

    pub fn nth_hash_str(&self, cleartext: Option<&str>, index: u64) -> Result<SaltedHash> {
        self.nth_hash(cleartext_bytes(cleartext), index)
    }

    /// The first `count` salted hashes as a set; duplicates collapse.
    pub fn first_n_hashes(&self, cleartext: &[u8], count: usize) -> Result<HashSet<SaltedHash>> {
        check_count(count)?;
        let mut sequence = self.new_sequence(cleartext)?;
        let mut hashes = HashSet::with_capacity(count);
        for _ in 0..count {
            hashes.insert(sequence.try_next()?);
        }
        sequence.destroy();
        Ok(hashes)
    }

    /// Zeroes the secret seed. Irreversible; later calls are no-ops.
    pub fn destroy(&self) {
        let mut seed = self.seed.write();
        let was_destroyed = seed.is_destroyed();
        seed.destroy();
        if !was_destroyed {
            debug!("secret seed destroyed");
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.seed.read().is_destroyed()
    }

    /// State check and seed read happen under the same read guard.
    fn salts_for(&self, cleartext: &[u8]) -> Result<SaltSequence> {
        let seed = self.seed.read();
        let associated_seed = derive_seed(Some(cleartext), seed.expose()?);
        Ok(SaltSequence::new(&associated_seed))
    }

    #[cfg(test)]
    pub(crate) fn raw_seed_bytes(&self) -> Vec<u8> {
        self.seed.read().raw_bytes().to_vec()
    }
}

impl std::fmt::Debug for SaltedHashGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaltedHashGenerator")
            .field("algorithm", &self.algorithm)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// Unbounded salted-hash sequence for one cleartext.
///
/// Holds its own copy of the cleartext; destroying the sequence clears that
/// copy only and leaves the generator's secret seed alone.
#[derive(Debug)]
pub struct SaltedHashSequence {
    cleartext: Cleartext,
    salts: SaltSequence,
    algorithm: HashAlgorithm,
}

impl SaltedHashSequence {
    /// True until the sequence is destroyed
    pub fn has_next(&self) -> bool {
        !self.cleartext.is_destroyed()
    }

    pub fn try_next(&mut self) -> Result<SaltedHash> {
        let cleartext = self.cleartext.expose()?;
        let salt = self.salts.next_salt();
        Ok(salted_hash_with(self.algorithm, cleartext, &salt))
    }

    /// Index of the hash the next call returns
    pub fn index(&self) -> u64 {
        self.salts.produced()
    }
}

impl Iterator for SaltedHashSequence {
    type Item = SaltedHash;

    fn next(&mut self) -> Option<SaltedHash> {
        self.try_next().ok()
    }
}

impl Destroy for SaltedHashSequence {
    fn destroy(&mut self) {
        if !self.cleartext.is_destroyed() {
            trace!(index = self.index(), "salted hash sequence destroyed");
        }
        self.cleartext.destroy();
    }

    fn is_destroyed(&self) -> bool {
        self.cleartext.is_destroyed()
    }
}

fn cleartext_bytes(cleartext: Option<&str>) -> &[u8] {
    cleartext
        .map(str::as_bytes)
        .unwrap_or(crate::crypto::ABSENT_VALUE_MARKER)
}
