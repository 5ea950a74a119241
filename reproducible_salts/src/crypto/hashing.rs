//! Salted and unsalted hashing
//!
//! The salt is public but unpredictable, so it plays the role of the secret in
//! a secret-suffix construction:
//!
//! ```text
//! digest = SHA-256(cleartext || salt)
//! ```
//!
//! The concatenation buffer holds cleartext and is zeroed right after hashing.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::seed::ABSENT_VALUE_MARKER;
use super::zeroize_utils::SecureBuffer;
use crate::algorithm::HashAlgorithm;
use crate::error::Result;
use crate::salted_hash::SaltedHash;

/// Salted hash of `cleartext` with the default algorithm.
pub fn salted_hash(cleartext: &[u8], salt: &[u8]) -> SaltedHash {
    salted_hash_with(HashAlgorithm::default(), cleartext, salt)
}

pub fn salted_hash_with(algorithm: HashAlgorithm, cleartext: &[u8], salt: &[u8]) -> SaltedHash {
    let mut buffer = SecureBuffer::concat(&[cleartext, salt]);
    let digest = digest(algorithm, &buffer);
    buffer.clear();

    SaltedHash::from_parts(&digest, salt, algorithm)
}

/// String variant: UTF-8 cleartext (absent maps to the empty marker), hex salt.
pub fn salted_hash_hex(cleartext: Option<&str>, salt_hex: &str) -> Result<SaltedHash> {
    let salt = hex::decode(salt_hex)?;
    let cleartext = cleartext.map(str::as_bytes).unwrap_or(ABSENT_VALUE_MARKER);
    Ok(salted_hash(cleartext, &salt))
}

/// Plain SHA-256 digest, used by persistence layers as an index key.
pub fn unsalted_hash(cleartext: &[u8]) -> [u8; 32] {
    Sha256::digest(cleartext).into()
}

pub fn unsalted_hash_with(algorithm: HashAlgorithm, cleartext: &[u8]) -> Vec<u8> {
    digest(algorithm, cleartext).to_vec()
}

pub fn unsalted_hash_hex(cleartext: Option<&str>) -> String {
    let cleartext = cleartext.map(str::as_bytes).unwrap_or(ABSENT_VALUE_MARKER);
    hex::encode(unsalted_hash(cleartext))
}

fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Zeroizing<Vec<u8>> {
    match algorithm {
        HashAlgorithm::Sha256 => Zeroizing::new(Sha256::digest(data).to_vec()),
    }
}
