//! Reusable character buffers for tokenizers.
//!
//! A tokenizer needs a few KiB of buffer per document. The pool keeps
//! returned buffers around so that parsing many small files does not
//! allocate one each time. A disabled pool always allocates.

use parking_lot::Mutex;
use tracing::debug;

/// Initial capacity of a tokenizer buffer, in characters.
pub const DEFAULT_BUFFER_CAPACITY: usize = 2048;

const MAX_RETAINED: usize = 16;

/// A thread-safe free list of character buffers.
pub struct BufferPool {
    free: Mutex<Vec<Vec<char>>>,
    enabled: bool,
}

static GLOBAL: BufferPool = BufferPool::new();

impl BufferPool {
    /// Create an empty pool.
    pub const fn new() -> Self {
        Self {
            free: parking_lot::const_mutex(Vec::new()),
            enabled: true,
        }
    }

    /// A pool that never retains anything.
    pub const fn disabled() -> Self {
        Self {
            free: parking_lot::const_mutex(Vec::new()),
            enabled: false,
        }
    }

    /// The process-wide pool.
    pub fn global() -> &'static BufferPool {
        &GLOBAL
    }

    /// Take an empty buffer with at least `min_capacity` characters of room.
    pub fn take(&self, min_capacity: usize) -> Vec<char> {
        if self.enabled {
            let mut free = self.free.lock();
            if let Some(index) = free.iter().position(|b| b.capacity() >= min_capacity) {
                return free.swap_remove(index);
            }
        }
        Vec::with_capacity(min_capacity)
    }

    /// Return a buffer for reuse.
    pub fn recycle(&self, mut buffer: Vec<char>) {
        if !self.enabled {
            return;
        }
        buffer.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_RETAINED {
            free.push(buffer);
        } else {
            debug!("buffer pool full, dropping {}-char buffer", buffer.capacity());
        }
    }

    /// Number of buffers waiting for reuse.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}
