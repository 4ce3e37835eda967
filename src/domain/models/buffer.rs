use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("buffer capacity of {capacity} bytes exceeded ({attempted} bytes requested)")]
pub struct BufferOverflow {
    pub capacity: usize,
    pub attempted: usize,
}

/// Fixed-capacity byte container handed out by the buffer pool.
///
/// Bytes at or beyond `len` are always zero: writes only ever append, and
/// `zero` wipes everything that was written. The buffer also wipes itself on
/// drop, so a buffer abandoned mid-download leaves nothing readable behind.
pub struct PooledBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl PooledBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn extend_from_slice(&mut self, chunk: &[u8]) -> Result<(), BufferOverflow> {
        let end = self.len + chunk.len();
        if end > self.data.len() {
            return Err(BufferOverflow {
                capacity: self.data.len(),
                attempted: end,
            });
        }
        self.data[self.len..end].copy_from_slice(chunk);
        self.len = end;
        Ok(())
    }

    pub fn zero(&mut self) {
        self.data[..self.len].zeroize();
        self.len = 0;
    }

    /// Checks the whole backing store, not just the written prefix.
    pub fn is_zeroed(&self) -> bool {
        self.data.iter().all(|b| *b == 0)
    }

    #[cfg(test)]
    pub(crate) fn backing_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }
}

impl Zeroize for PooledBuffer {
    fn zeroize(&mut self) {
        self.zero();
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for PooledBuffer {}

impl fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.len)
            .field("capacity", &self.data.len())
            .finish()
    }
}
