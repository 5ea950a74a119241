//! Reproducible salt sequences
//!
//! A sequence is a Hash_DRBG instantiated with the associated seed as its
//! (fixed) entropy input. Every step yields [`SALT_LEN`] bytes. Sequences are
//! forward-only; the only way back to salt 0 is a fresh sequence built from the
//! same associated seed.

use zeroize::Zeroizing;

use super::drbg::HashDrbg;
use super::seed::{derive_seed, AssociatedSeed};
use crate::error::{Result, SaltError};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

pub type Salt = [u8; SALT_LEN];

/// Unbounded, deterministic sequence of salts for one associated seed
pub struct SaltSequence {
    drbg: HashDrbg,
    produced: u64,
}

impl SaltSequence {
    pub fn new(associated_seed: &AssociatedSeed) -> Self {
        Self {
            drbg: HashDrbg::from_seed_material(&[&associated_seed.as_bytes()[..]]),
            produced: 0,
        }
    }

    pub fn next_salt(&mut self) -> Salt {
        let mut salt = [0u8; SALT_LEN];
        self.drbg.fill(&mut salt);
        self.produced += 1;
        salt
    }

    /// Number of salts taken so far, i.e. the index of the next salt
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Same sequence, hex encoded
    pub fn hex(self) -> HexSaltSequence {
        HexSaltSequence { inner: self }
    }
}

impl Iterator for SaltSequence {
    type Item = Salt;

    fn next(&mut self) -> Option<Salt> {
        Some(self.next_salt())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl std::fmt::Debug for SaltSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaltSequence")
            .field("produced", &self.produced)
            .finish_non_exhaustive()
    }
}

/// Hex-encoding adapter over [`SaltSequence`]
#[derive(Debug)]
pub struct HexSaltSequence {
    inner: SaltSequence,
}

impl Iterator for HexSaltSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(hex::encode(self.inner.next_salt()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Fresh salt sequence for `associated_value` under `secret_seed`.
pub fn salt_sequence(associated_value: Option<&[u8]>, secret_seed: &[u8]) -> SaltSequence {
    let seed = derive_seed(associated_value, secret_seed);
    SaltSequence::new(&seed)
}

/// Salt at 0-based `index`: the `index + 1`-th output of a fresh sequence.
pub fn nth_salt(associated_value: Option<&[u8]>, secret_seed: &[u8], index: u64) -> Salt {
    let mut salts = salt_sequence(associated_value, secret_seed);
    for _ in 0..index {
        salts.next_salt();
    }
    salts.next_salt()
}

/// First `count` salts in order. `count` must be positive.
pub fn first_n_salts(
    associated_value: Option<&[u8]>,
    secret_seed: &[u8],
    count: usize,
) -> Result<Vec<Salt>> {
    check_count(count)?;
    Ok(salt_sequence(associated_value, secret_seed)
        .take(count)
        .collect())
}

/// String variant of [`salt_sequence`]: UTF-8 value, hex secret seed.
pub fn salt_sequence_hex(
    associated_value: Option<&str>,
    secret_seed_hex: &str,
) -> Result<HexSaltSequence> {
    let secret_seed = Zeroizing::new(hex::decode(secret_seed_hex)?);
    Ok(salt_sequence_hex_from(associated_value, &secret_seed))
}

pub fn nth_salt_hex(
    associated_value: Option<&str>,
    secret_seed_hex: &str,
    index: u64,
) -> Result<String> {
    let secret_seed = Zeroizing::new(hex::decode(secret_seed_hex)?);
    let salt = nth_salt(associated_value.map(str::as_bytes), &secret_seed, index);
    Ok(hex::encode(salt))
}

pub fn first_n_salts_hex(
    associated_value: Option<&str>,
    secret_seed_hex: &str,
    count: usize,
) -> Result<Vec<String>> {
    let secret_seed = Zeroizing::new(hex::decode(secret_seed_hex)?);
    check_count(count)?;
    Ok(salt_sequence_hex_from(associated_value, &secret_seed)
        .take(count)
        .collect())
}

fn salt_sequence_hex_from(associated_value: Option<&str>, secret_seed: &[u8]) -> HexSaltSequence {
    salt_sequence(associated_value.map(str::as_bytes), secret_seed).hex()
}

pub(crate) fn check_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(SaltError::InvalidArgument(
            "count must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SPAM_VALUE: &[u8] = b"spamandeggs";
    const SPAM: Option<&[u8]> = Some(SPAM_VALUE);
    const ZERO_SECRET: [u8; 64] = [0u8; 64];

    const SPAM_SALTS: [&str; 5] = [
        "62912995ae7588d464c7151545935060",
        "6183284b9cc0478436826f55d1745f47",
        "f89be2dcac5a411798e4aa258405b857",
        "4faa03a214a7e5a14d41e40c60e4bfcd",
        "900eba821876cc40d1b33a1dfe0feba1",
    ];

    #[test]
    fn test_known_answer_sequence() {
        let salts = first_n_salts(SPAM, &ZERO_SECRET, 5).unwrap();
        let encoded: Vec<String> = salts.iter().map(hex::encode).collect();
        assert_eq!(encoded, SPAM_SALTS);
    }

    #[test]
    fn test_nth_salt_matches_sequence_position() {
        for (i, expected) in SPAM_SALTS.iter().enumerate() {
            let salt = nth_salt(SPAM, &ZERO_SECRET, i as u64);
            assert_eq!(hex::encode(salt), *expected);
        }
    }

    #[test]
    fn test_first_n_is_prefix_of_longer_run() {
        let secret = [3u8; 40];
        let short = first_n_salts(Some(b"v".as_slice()), &secret, 3).unwrap();
        let long = first_n_salts(Some(b"v".as_slice()), &secret, 20).unwrap();
        assert_eq!(short.as_slice(), &long[..3]);
    }

    #[test]
    fn test_salts_are_distinct() {
        let salts = first_n_salts(SPAM, &ZERO_SECRET, 5).unwrap();
        let unique: HashSet<_> = salts.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_restart_by_reconstruction() {
        let mut first = salt_sequence(SPAM, &ZERO_SECRET);
        let a: Vec<Salt> = first.by_ref().take(3).collect();
        assert_eq!(first.produced(), 3);

        let b: Vec<Salt> = salt_sequence(SPAM, &ZERO_SECRET).take(3).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_count_rejected() {
        let result = first_n_salts(SPAM, &ZERO_SECRET, 0);
        assert!(matches!(result, Err(SaltError::InvalidArgument(_))));

        let result = first_n_salts_hex(Some("spamandeggs"), "00", 0);
        assert!(matches!(result, Err(SaltError::InvalidArgument(_))));
    }

    #[test]
    fn test_hex_variants() {
        let secret_hex = "00".repeat(64);
        assert_eq!(
            nth_salt_hex(Some("spamandeggs"), &secret_hex, 2).unwrap(),
            SPAM_SALTS[2]
        );
        assert_eq!(
            first_n_salts_hex(Some("spamandeggs"), &secret_hex, 5).unwrap(),
            SPAM_SALTS
        );
        let mut seq = salt_sequence_hex(Some("spamandeggs"), &secret_hex).unwrap();
        assert_eq!(seq.next().as_deref(), Some(SPAM_SALTS[0]));
    }

    #[test]
    fn test_hex_variants_reject_malformed_secret() {
        assert!(matches!(
            nth_salt_hex(Some("x"), "0g", 0),
            Err(SaltError::InvalidEncoding(_))
        ));
        assert!(matches!(
            first_n_salts_hex(Some("x"), "zz", 1),
            Err(SaltError::InvalidEncoding(_))
        ));
        assert!(matches!(
            salt_sequence_hex(None, "123"),
            Err(SaltError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_different_values_different_sequences() {
        let a = nth_salt(Some(b"alpha".as_slice()), &ZERO_SECRET, 0);
        let b = nth_salt(Some(b"beta".as_slice()), &ZERO_SECRET, 0);
        assert_ne!(a, b);
    }
}
