//! # Reproducible Salts
//!
//! Deterministic yet unpredictable salted hashes of a value, keyed by a secret
//! seed. The same secret seed and value always give the same N-th salt and
//! N-th salted hash; without the secret seed the sequence cannot be predicted.
//!
//! ## Pipeline
//!
//! ```text
//! secret_seed + value --SHA-512(SHA-512(value) || secret)--> associated seed (64 B)
//! associated seed --Hash_DRBG(SHA-256)--> salt(0), salt(1), ... (16 B each)
//! value + salt(i) --SHA-256(value || salt(i))--> salted hash (32 B)
//! ```
//!
//! ## Security model
//! - Secret seed copied in, zeroized on `destroy()` and on drop
//! - Per-sequence cleartext copies zeroized independently
//! - Transient `cleartext || salt` buffers zeroized right after hashing
//! - `destroy()` racing other calls is guarded by a read/write lock

pub mod algorithm;
pub mod config;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod salted_hash;
pub mod secret;
pub mod store;

// Re-exports
pub use algorithm::HashAlgorithm;
pub use config::{HashingConfig, LogConfig, SeedSource};
pub use crypto::{
    derive_seed, derive_seed_hex, first_n_salts, first_n_salts_hex, nth_salt, nth_salt_hex,
    salted_hash, salted_hash_hex, unsalted_hash, unsalted_hash_hex, AssociatedSeed, Salt,
    SaltSequence,
};
pub use error::{Result, SaltError};
pub use generator::{SaltedHashGenerator, SaltedHashSequence};
pub use salted_hash::SaltedHash;
pub use secret::{Cleartext, Destroy, SecretSeed};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Recommended secret seed length in bytes
pub const DEFAULT_SEED_LEN: usize = 64;
