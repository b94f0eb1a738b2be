//! A pool of reusable byte buffers.
//!
//! Joining, line splicing and stream copying all need a scratch buffer. The
//! pool hands one out through [`BufferPool::acquire`]; the returned guard
//! clears the buffer and gives it back when dropped, on every exit path.
//! A miss never blocks: an empty pool just allocates a fresh buffer.

use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

/// The capacity of freshly allocated buffers.
pub const DEFAULT_CAPACITY: usize = 256;

/// The number of idle buffers a pool keeps around.
pub const DEFAULT_RETAINED: usize = 16;

/// A pool of reusable byte buffers.
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    capacity: usize,
    retained: usize,
}

impl BufferPool {
    /// Create an empty pool with the default buffer capacity and retention.
    pub fn new() -> BufferPool {
        BufferPool::with_limits(DEFAULT_CAPACITY, DEFAULT_RETAINED)
    }

    /// Create an empty pool that allocates buffers with the given capacity
    /// and keeps at most `retained` idle buffers.
    pub fn with_limits(capacity: usize, retained: usize) -> BufferPool {
        BufferPool { free: Mutex::new(Vec::new()), capacity, retained }
    }

    /// Acquire an empty buffer.
    ///
    /// The buffer returns to the pool when the guard is dropped.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = match self.free.lock().pop() {
            Some(buf) => buf,
            None => {
                tracing::trace!(capacity = self.capacity, "buffer pool miss");
                Vec::with_capacity(self.capacity)
            }
        };
        PooledBuffer { buf, pool: self }
    }

    /// Returns the number of idle buffers in the pool.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.retained {
            free.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> BufferPool {
        BufferPool::new()
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle())
            .field("capacity", &self.capacity)
            .field("retained", &self.retained)
            .finish()
    }
}

/// A buffer borrowed from a [`BufferPool`].
///
/// This dereferences to `Vec<u8>`.
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
