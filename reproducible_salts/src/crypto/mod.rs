//! Cryptographic core - seed derivation, Hash_DRBG salt sequences, salted hashing

mod drbg;
mod hashing;
mod salts;
mod seed;
mod zeroize_utils;

pub use drbg::{HashDrbg, MAX_BYTES_PER_REQUEST, MIN_ENTROPY_LEN, SECURITY_STRENGTH_BITS};
pub use hashing::{
    salted_hash, salted_hash_hex, salted_hash_with, unsalted_hash, unsalted_hash_hex,
    unsalted_hash_with,
};
pub use salts::{
    first_n_salts, first_n_salts_hex, nth_salt, nth_salt_hex, salt_sequence, salt_sequence_hex,
    HexSaltSequence, Salt, SaltSequence, SALT_LEN,
};
pub use seed::{derive_seed, derive_seed_hex, AssociatedSeed, ABSENT_VALUE_MARKER, ASSOCIATED_SEED_LEN};
pub use zeroize_utils::{zeroize_buffer, SecureBuffer};

pub(crate) use salts::check_count;
