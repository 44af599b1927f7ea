//! Incremental newline-delimited record extraction.
//!
//! The buffer has a fixed capacity and two cursors:
//!
//! ```text
//! 0          consumed          written          capacity
//! |-- done --|--- pending ------|---- spare -----|
//! ```
//!
//! Bytes are appended at `written`, lines are handed out from `consumed`.
//! Once no complete line remains, [`LineBuffer::compact`] moves the pending
//! tail to the front. If the pending tail already fills the whole buffer, no
//! delimiter can ever arrive within one buffer's worth of bytes and compaction
//! fails with [`LineOverflow`].

use thiserror::Error;

const DELIMITER: u8 = b'\n';

/// A line did not fit in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("line exceeds buffer capacity of {capacity} bytes")]
pub struct LineOverflow {
    pub capacity: usize,
}

/// Fixed-capacity line splitter.
#[derive(Debug)]
pub struct LineBuffer {
    buf: Box<[u8]>,
    consumed: usize,
    written: usize,
}

impl LineBuffer {
    /// Create an empty buffer holding at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            consumed: 0,
            written: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes received but not yet returned as a line.
    pub fn pending(&self) -> usize {
        self.written - self.consumed
    }

    /// Copy as much of `bytes` as fits at the write cursor.
    ///
    /// Returns the number of bytes accepted.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let spare = self.spare_mut();
        let n = bytes.len().min(spare.len());
        spare[..n].copy_from_slice(&bytes[..n]);
        self.written += n;
        n
    }

    /// Unwritten tail of the buffer, for readers that fill it in place.
    ///
    /// Follow with [`LineBuffer::advance`].
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.written..]
    }

    /// Commit `n` bytes written into [`LineBuffer::spare_mut`].
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.capacity() - self.written, "advance past capacity");
        self.written += n;
    }

    /// Next complete line, without its delimiter or a trailing `\r`.
    pub fn next_line(&mut self) -> Option<&[u8]> {
        let start = self.consumed;
        let offset = self.buf[start..self.written]
            .iter()
            .position(|&b| b == DELIMITER)?;

        let end = start + offset;
        self.consumed = end + 1;
        Some(trim_cr(&self.buf[start..end]))
    }

    /// Move pending bytes to the front of the buffer.
    ///
    /// Call once [`LineBuffer::next_line`] has returned `None`.
    pub fn compact(&mut self) -> Result<(), LineOverflow> {
        if self.consumed == 0 {
            if self.written == self.capacity() {
                return Err(LineOverflow {
                    capacity: self.capacity(),
                });
            }
            return Ok(());
        }

        self.buf.copy_within(self.consumed..self.written, 0);
        self.written -= self.consumed;
        self.consumed = 0;
        Ok(())
    }

    /// Hand out the unterminated tail at end of input.
    pub fn take_remainder(&mut self) -> Option<&[u8]> {
        if self.pending() == 0 {
            return None;
        }
        let start = self.consumed;
        self.consumed = self.written;
        Some(trim_cr(&self.buf[start..self.written]))
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    match line.split_last() {
        Some((b'\r', rest)) => rest,
        _ => line,
    }
}
