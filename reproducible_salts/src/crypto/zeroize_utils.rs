//! Zeroizing buffers for cleartext and transient working memory

use zeroize::Zeroize;

/// Overwrites a sensitive buffer with zeros
pub fn zeroize_buffer(buffer: &mut [u8]) {
    buffer.zeroize();
}

/// Heap buffer that is zeroized on drop and can be cleared explicitly.
///
/// Clearing overwrites the bytes in place and keeps the length, so a cleared
/// buffer reads as all zeros until it is dropped.
pub struct SecureBuffer {
    data: Vec<u8>,
    cleared: bool,
}

impl SecureBuffer {
    pub fn from_slice(slice: &[u8]) -> Self {
        Self {
            data: slice.to_vec(),
            cleared: false,
        }
    }

    /// Concatenates `parts` in order into a single zeroizing buffer.
    pub fn concat(parts: &[&[u8]]) -> Self {
        let len = parts.iter().map(|p| p.len()).sum();
        let mut data = Vec::with_capacity(len);
        for part in parts {
            data.extend_from_slice(part);
        }
        Self {
            data,
            cleared: false,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Overwrites the contents with zeros. Irreversible.
    pub fn clear(&mut self) {
        zeroize_buffer(&mut self.data);
        self.cleared = true;
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl std::ops::Deref for SecureBuffer {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl std::fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBuffer")
            .field("len", &self.data.len())
            .field("cleared", &self.cleared)
            .finish()
    }
}
