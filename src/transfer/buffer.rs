//! Transfer buffer
//!
//! The one buffer a session moves file data through. It is allocated when
//! a transfer starts, with fallible allocation so that a device short on
//! memory answers 451 instead of aborting.

use log::{debug, warn};

/// Smallest buffer worth transferring with.
pub const MIN_BUFFER_SIZE: usize = 64;

/// Bytes held between a file read and the matching socket write.
#[derive(Debug)]
pub struct TransferBuffer {
    data: Vec<u8>,
    /// Valid bytes are `data[start..end]`.
    start: usize,
    end: usize,
}

impl TransferBuffer {
    /// Allocates up to `preferred` bytes, capped at `max`. When the
    /// allocation fails the request is halved until it drops below
    /// `MIN_BUFFER_SIZE`.
    pub fn allocate(preferred: usize, max: usize) -> Option<Self> {
        Self::allocate_within(preferred, max, None)
    }

    /// Like `allocate`, but any request larger than `budget` fails the
    /// same way an exhausted allocator would.
    pub fn allocate_within(preferred: usize, max: usize, budget: Option<usize>) -> Option<Self> {
        let mut size = preferred.min(max).max(MIN_BUFFER_SIZE);
        while size >= MIN_BUFFER_SIZE {
            if budget.is_some_and(|budget| size > budget) {
                debug!("{} byte transfer buffer exceeds budget, retrying smaller", size);
                size /= 2;
                continue;
            }
            let mut data = Vec::new();
            match data.try_reserve_exact(size) {
                Ok(()) => {
                    data.resize(size, 0);
                    debug!("Allocated {} byte transfer buffer", size);
                    return Some(Self {
                        data,
                        start: 0,
                        end: 0,
                    });
                }
                Err(e) => {
                    warn!("Cannot allocate {} byte transfer buffer ({}), retrying smaller", size, e);
                    size /= 2;
                }
            }
        }
        warn!("No transfer buffer could be allocated");
        None
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes filled but not yet consumed.
    pub fn pending(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    pub fn is_drained(&self) -> bool {
        self.start == self.end
    }

    /// Clears the buffer and hands out `len` bytes of it to fill,
    /// `len` being capped at the capacity.
    pub fn space(&mut self, len: usize) -> &mut [u8] {
        self.start = 0;
        self.end = 0;
        let len = len.min(self.data.len());
        &mut self.data[..len]
    }

    /// Marks `len` bytes of the last `space` as filled.
    pub fn filled(&mut self, len: usize) {
        self.start = 0;
        self.end = len.min(self.data.len());
    }

    /// Marks `len` pending bytes as consumed.
    pub fn consume(&mut self, len: usize) {
        self.start = (self.start + len).min(self.end);
    }
}
