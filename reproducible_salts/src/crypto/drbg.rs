//! Hash_DRBG (NIST SP 800-90A Rev. 1, 10.1.1) over SHA-256
//!
//! Deterministic by construction: the generator is instantiated from caller
//! supplied seed material and is never reseeded, so identical seed material
//! always yields an identical output stream.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, SaltError};

/// Security strength in bits (maximum supported for SHA-256)
pub const SECURITY_STRENGTH_BITS: usize = 256;

/// Minimum entropy input length in bytes
pub const MIN_ENTROPY_LEN: usize = SECURITY_STRENGTH_BITS / 8;

/// seedlen for SHA-256 (440 bits)
pub const SEED_LEN: usize = 55;

/// Maximum number of bytes per request (2^19 bits)
pub const MAX_BYTES_PER_REQUEST: usize = 1 << 16;

const OUT_LEN: usize = 32;

/// SHA-256 Hash_DRBG without prediction resistance or additional input
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HashDrbg {
    v: [u8; SEED_LEN],
    c: [u8; SEED_LEN],
    reseed_counter: u64,
}

impl HashDrbg {
    /// Instantiates the DRBG from `entropy || nonce || personalization`.
    pub fn instantiate(entropy: &[u8], nonce: &[u8], personalization: &[u8]) -> Result<Self> {
        if entropy.len() < MIN_ENTROPY_LEN {
            return Err(SaltError::InvalidArgument(format!(
                "entropy input must be at least {} bytes, got {}",
                MIN_ENTROPY_LEN,
                entropy.len()
            )));
        }
        Ok(Self::from_seed_material(&[entropy, nonce, personalization]))
    }

    /// Caller guarantees the seed material carries enough entropy.
    pub(crate) fn from_seed_material(parts: &[&[u8]]) -> Self {
        let v = hash_df(parts);
        let c = hash_df(&[&[0x00u8][..], &v[..]]);
        Self {
            v,
            c,
            reseed_counter: 1,
        }
    }

    /// Fills `out` with the next bytes of the stream.
    pub fn generate(&mut self, out: &mut [u8]) -> Result<()> {
        if out.len() > MAX_BYTES_PER_REQUEST {
            return Err(SaltError::InvalidArgument(format!(
                "request of {} bytes exceeds the {} byte limit",
                out.len(),
                MAX_BYTES_PER_REQUEST
            )));
        }
        self.fill(out);
        Ok(())
    }

    /// Generate without the request-size check; `out` must be within limits.
    pub(crate) fn fill(&mut self, out: &mut [u8]) {
        let mut data = self.v;
        for chunk in out.chunks_mut(OUT_LEN) {
            let w = Sha256::digest(data);
            chunk.copy_from_slice(&w[..chunk.len()]);
            add_be(&mut data, &[0x01]);
        }
        data.zeroize();

        let h = Sha256::new()
            .chain_update([0x03u8])
            .chain_update(self.v)
            .finalize();
        add_be(&mut self.v, &h);
        add_be(&mut self.v, &self.c);
        add_be(&mut self.v, &self.reseed_counter.to_be_bytes());
        self.reseed_counter += 1;
    }

    /// Number of generate calls since instantiation, plus one
    pub fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }
}

impl std::fmt::Debug for HashDrbg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashDrbg")
            .field("reseed_counter", &self.reseed_counter)
            .finish_non_exhaustive()
    }
}

/// Hash_df derivation function, producing exactly seedlen bits.
fn hash_df(inputs: &[&[u8]]) -> [u8; SEED_LEN] {
    let bits = (SEED_LEN * 8) as u32;
    let mut out = [0u8; SEED_LEN];
    let mut counter: u8 = 1;
    for chunk in out.chunks_mut(OUT_LEN) {
        let mut hasher = Sha256::new();
        hasher.update([counter]);
        hasher.update(bits.to_be_bytes());
        for input in inputs {
            hasher.update(input);
        }
        let digest = hasher.finalize();
        chunk.copy_from_slice(&digest[..chunk.len()]);
        counter += 1;
    }
    out
}

/// `target = (target + addend) mod 2^seedlen`, both big-endian.
fn add_be(target: &mut [u8; SEED_LEN], addend: &[u8]) {
    debug_assert!(addend.len() <= SEED_LEN);
    let offset = SEED_LEN - addend.len();
    let mut carry = 0u16;
    for i in (0..SEED_LEN).rev() {
        let a = if i >= offset { addend[i - offset] as u16 } else { 0 };
        let sum = target[i] as u16 + a + carry;
        target[i] = sum as u8;
        carry = sum >> 8;
    }
}
