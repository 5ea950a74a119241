//! Associated-seed derivation
//!
//! ```text
//! unsalted_hash   = SHA-512(associated_value)
//! associated_seed = SHA-512(unsalted_hash || secret_seed)
//! ```
//!
//! The secret goes last (secret-suffix), so the construction does not inherit
//! the length-extension weakness of `H(secret || data)`.

use sha2::{Digest, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Result;

/// Length of an associated seed in bytes
pub const ASSOCIATED_SEED_LEN: usize = 64;

/// Bytes hashed in place of an absent associated value.
///
/// `None` and an empty value therefore derive the same seed.
pub const ABSENT_VALUE_MARKER: &[u8] = b"";

/// 64-byte seed for one associated value, zeroized on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AssociatedSeed([u8; ASSOCIATED_SEED_LEN]);

impl AssociatedSeed {
    pub fn as_bytes(&self) -> &[u8; ASSOCIATED_SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for AssociatedSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AssociatedSeed([REDACTED])")
    }
}

/// Derives the associated seed for `associated_value` under `secret_seed`.
pub fn derive_seed(associated_value: Option<&[u8]>, secret_seed: &[u8]) -> AssociatedSeed {
    let value = associated_value.unwrap_or(ABSENT_VALUE_MARKER);
    let unsalted_hash = Sha512::digest(value);

    let mut hasher = Sha512::new();
    hasher.update(unsalted_hash);
    hasher.update(secret_seed);

    let mut seed = [0u8; ASSOCIATED_SEED_LEN];
    seed.copy_from_slice(&hasher.finalize());
    AssociatedSeed(seed)
}

/// String variant: UTF-8 associated value, hex secret seed, hex output.
pub fn derive_seed_hex(associated_value: Option<&str>, secret_seed_hex: &str) -> Result<String> {
    let mut secret_seed = hex::decode(secret_seed_hex)?;
    let seed = derive_seed(associated_value.map(str::as_bytes), &secret_seed);
    secret_seed.zeroize();
    Ok(seed.to_hex())
}
