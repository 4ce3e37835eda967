use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::domain::models::buffer::PooledBuffer;

/// Bounded pool of fixed-capacity buffers shared by every batch.
///
/// Buffers are zeroed on release and again on acquire, so a tenant never
/// observes bytes left behind by a previous one.
#[derive(Debug)]
pub struct BufferPool {
    buffers: Mutex<Vec<PooledBuffer>>,
    max_size: usize,
    buffer_capacity: usize,
}

impl BufferPool {
    pub fn new(max_size: usize, buffer_capacity: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(max_size)),
            max_size,
            buffer_capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PooledBuffer>> {
        // Pool contents stay valid even if a holder panicked: every buffer in it is zeroed.
        self.buffers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn acquire(&self) -> PooledBuffer {
        let pooled = self.lock().pop();
        match pooled {
            Some(mut buffer) => {
                buffer.zero();
                debug!(capacity = buffer.capacity(), "Reusing pooled buffer");
                buffer
            }
            None => {
                debug!(capacity = self.buffer_capacity, "Allocating new buffer");
                PooledBuffer::with_capacity(self.buffer_capacity)
            }
        }
    }

    pub fn release(&self, mut buffer: PooledBuffer) {
        buffer.zero();

        if buffer.capacity() != self.buffer_capacity {
            debug!(capacity = buffer.capacity(), "Dropping foreign-sized buffer");
            return;
        }

        let mut buffers = self.lock();
        if buffers.len() < self.max_size {
            buffers.push(buffer);
            debug!(available = buffers.len(), "Buffer returned to pool");
        } else {
            debug!("Pool full, dropping buffer");
        }
    }

    /// Zeroes and drops every idle buffer. Returns how many were discarded.
    pub fn cleanup(&self) -> usize {
        let drained: Vec<PooledBuffer> = std::mem::take(&mut *self.lock());
        let count = drained.len();
        for mut buffer in drained {
            buffer.zero();
        }
        info!(discarded = count, "Buffer pool cleaned up");
        count
    }

    pub fn available(&self) -> usize {
        self.lock().len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }
}
