//! Sensitive material with an explicit, irreversible destroy
//!
//! Both types zero their backing buffer on `destroy()` and again on drop, so
//! forgetting to call `destroy()` still leaves no copy behind once the owner
//! goes out of scope.

use secrecy::{ExposeSecret, ExposeSecretMut, SecretBox};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::SecureBuffer;
use crate::error::{Result, SaltError};

/// Material that can be cleared once and is unusable afterwards
pub trait Destroy {
    /// Overwrites the material with zeros. Calling it again is a no-op.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

/// Secret seed shared by every salt sequence of one generator
pub struct SecretSeed {
    bytes: SecretBox<[u8]>,
    destroyed: bool,
}

impl SecretSeed {
    /// Copies `bytes`; the caller keeps ownership of its own buffer.
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: SecretBox::new(bytes.to_vec().into_boxed_slice()),
            destroyed: false,
        }
    }

    pub fn from_hex(secret_seed_hex: &str) -> Result<Self> {
        let decoded = Zeroizing::new(hex::decode(secret_seed_hex)?);
        Ok(Self::new(&decoded))
    }

    pub fn expose(&self) -> Result<&[u8]> {
        if self.destroyed {
            return Err(SaltError::SeedCleared);
        }
        Ok(self.bytes.expose_secret())
    }

    pub fn len(&self) -> usize {
        self.bytes.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Backing buffer regardless of state
    #[cfg(test)]
    pub(crate) fn raw_bytes(&self) -> &[u8] {
        self.bytes.expose_secret()
    }
}

impl Destroy for SecretSeed {
    fn destroy(&mut self) {
        self.bytes.expose_secret_mut().zeroize();
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl std::fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSeed")
            .field("bytes", &"[REDACTED]")
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

/// Private copy of a value being hashed by one sequence
#[derive(Debug)]
pub struct Cleartext {
    buffer: SecureBuffer,
}

impl Cleartext {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            buffer: SecureBuffer::from_slice(bytes),
        }
    }

    pub fn expose(&self) -> Result<&[u8]> {
        if self.buffer.is_cleared() {
            return Err(SaltError::CleartextCleared);
        }
        Ok(self.buffer.as_slice())
    }

    #[cfg(test)]
    pub(crate) fn raw_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }
}

impl Destroy for Cleartext {
    fn destroy(&mut self) {
        self.buffer.clear();
    }

    fn is_destroyed(&self) -> bool {
        self.buffer.is_cleared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_copied_in() {
        let mut input = vec![7u8; 32];
        let seed = SecretSeed::new(&input);
        input.fill(0);
        assert_eq!(seed.expose().unwrap(), &[7u8; 32]);
    }

    #[test]
    fn test_seed_destroy_zeroes_and_fails_afterwards() {
        let mut seed = SecretSeed::new(&[0xABu8; 48]);
        seed.destroy();
        assert!(seed.is_destroyed());
        assert!(matches!(seed.expose(), Err(SaltError::SeedCleared)));
        assert_eq!(seed.raw_bytes().len(), 48);
        assert!(seed.raw_bytes().iter().all(|&b| b == 0));

        // second destroy is a no-op
        seed.destroy();
        assert!(seed.is_destroyed());
    }

    #[test]
    fn test_seed_from_hex() {
        let seed = SecretSeed::from_hex("00ff10").unwrap();
        assert_eq!(seed.expose().unwrap(), &[0x00, 0xFF, 0x10]);
        assert!(matches!(
            SecretSeed::from_hex("0xff"),
            Err(SaltError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_seed_debug_is_redacted() {
        let seed = SecretSeed::new(b"topsecret");
        let rendered = format!("{:?}", seed);
        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_cleartext_destroy() {
        let mut cleartext = Cleartext::new(b"spamandeggs");
        assert_eq!(cleartext.expose().unwrap(), b"spamandeggs");

        cleartext.destroy();
        assert!(cleartext.is_destroyed());
        assert!(matches!(cleartext.expose(), Err(SaltError::CleartextCleared)));
        assert!(cleartext.raw_bytes().iter().all(|&b| b == 0));
    }
}
