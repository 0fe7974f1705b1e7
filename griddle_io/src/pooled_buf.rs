use anyhow::{anyhow, Result};
use std::cmp;
use std::mem;


/// A fixed-capacity byte buffer leased from a [`BufferPool`](crate::BufferPool).
///
/// Writes fill `0..w_pos`; reads consume `r_pos..w_pos`. A buffer moves from
/// pool to output on lease and back to the pool on release; it is owned by
/// exactly one holder at a time, never shared.
pub struct PooledBuf {
    bytes: Box<[u8]>,
    w_pos: usize,
    r_pos: usize,
}

impl PooledBuf {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            bytes: vec![0u8; cap].into_boxed_slice(),
            w_pos: 0,
            r_pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes of write capacity left.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.w_pos
    }

    /// Bytes written so far.
    pub fn written(&self) -> usize {
        self.w_pos
    }

    /// Appends as much of `src` as fits. Returns the byte count taken.
    pub fn put_some(&mut self, src: &[u8]) -> usize {
        let n = cmp::min(self.remaining(), src.len());
        self.bytes[self.w_pos..self.w_pos + n].copy_from_slice(&src[..n]);
        self.w_pos += n;
        n
    }

    /// Overwrites 4 already-written bytes at `offset` with `val` in
    /// little-endian order. The write cursor does not move.
    pub fn overwrite_u32(&mut self, offset: usize, val: u32) -> Result<()> {
        let end = offset + mem::size_of::<u32>();
        if end > self.w_pos {
            return Err(anyhow!(
                "Overwrite at {}..{} exceeds the written range 0..{}",
                offset,
                end,
                self.w_pos
            ));
        }
        self.bytes[offset..end].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }

    /// The not-yet-consumed readable span.
    pub fn unread(&self) -> &[u8] {
        &self.bytes[self.r_pos..self.w_pos]
    }

    pub fn advance_read(&mut self, n: usize) {
        self.r_pos = cmp::min(self.r_pos + n, self.w_pos);
    }

    /// Rewinds the read cursor to the start of the written span.
    pub fn rewind_read(&mut self) {
        self.r_pos = 0;
    }

    /// Resets both cursors so the pool can lease the buffer out again.
    pub fn clear(&mut self) {
        self.w_pos = 0;
        self.r_pos = 0;
    }
}
