use anyhow::{anyhow, Result};
use derive_more::Deref;
use std::mem;

#[derive(Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct WriteLen(pub usize);

/// The append-only sink codecs encode into.
///
/// The supported access pattern is deliberately narrow: append at the end,
/// backpatch one previously reserved 4-byte length, and nothing else. There
/// is no seeking and no caller-driven overwrite; the pooled chain
/// implementation depends on writes landing strictly in order.
pub trait WireOutput {
    /// Appends `buf` in full.
    fn write(&mut self, buf: &[u8]) -> Result<WriteLen>;

    /// Appends a single byte.
    fn write_u8(&mut self, b: u8) -> Result<WriteLen>;

    /// Total bytes written since creation.
    fn position(&self) -> usize;

    /// Overwrites the 4 bytes at `position() - len - additional_offset` with
    /// `len` in little-endian order, filling in a length prefix that was
    /// reserved before its span was written. Fails if the target offset does
    /// not lie within already-written bytes.
    fn backpatch_len(&mut self, len: usize, additional_offset: usize) -> Result<()>;

    /// Equals [`Self::position`]; the sink has no notion of unused trailing
    /// allocation.
    fn size(&self) -> usize {
        self.position()
    }
}

/// Contiguous `Vec<u8>`-backed sink, for single-buffer messages and tests.
#[derive(Default, Debug)]
pub struct BasicOutput {
    buf: Vec<u8>,
}

impl BasicOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl WireOutput for BasicOutput {
    fn write(&mut self, buf: &[u8]) -> Result<WriteLen> {
        self.buf.extend_from_slice(buf);
        Ok(WriteLen(buf.len()))
    }

    fn write_u8(&mut self, b: u8) -> Result<WriteLen> {
        self.buf.push(b);
        Ok(WriteLen(1))
    }

    fn position(&self) -> usize {
        self.buf.len()
    }

    fn backpatch_len(&mut self, len: usize, additional_offset: usize) -> Result<()> {
        let target = self
            .buf
            .len()
            .checked_sub(len + additional_offset)
            .ok_or_else(|| {
                anyhow!(
                    "Backpatch of {} + {} bytes reaches behind position {}",
                    len,
                    additional_offset,
                    self.buf.len()
                )
            })?;
        let end = target + mem::size_of::<u32>();
        if end > self.buf.len() {
            return Err(anyhow!(
                "Backpatch at {}..{} exceeds the written range 0..{}",
                target,
                end,
                self.buf.len()
            ));
        }
        let len = u32::try_from(len)?;
        self.buf[target..end].copy_from_slice(&len.to_le_bytes());
        Ok(())
    }
}
