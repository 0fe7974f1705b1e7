use crate::{BufferPool, PooledBuf};
use anyhow::{anyhow, Result};
use griddle_types::serde::{WireOutput, WriteLen};
use std::cmp;
use std::io::{IoSlice, Write};
use std::mem;

mod test;

/// Capacity of chain link 0; link `i` has capacity `FIRST_LINK_LEN << i`.
pub const FIRST_LINK_LEN: usize = 1024;

/// An append-only [`WireOutput`] over a chain of pooled buffers.
///
/// Links are leased lazily, filled strictly in order, and never reused
/// mid-chain, so link `i` always has capacity `FIRST_LINK_LEN << i` and
/// starts at logical offset `FIRST_LINK_LEN * ((1 << i) - 1)`.
/// [`WireOutput::backpatch_len`] relies on this geometry to locate a
/// reserved length prefix without recording per-link offsets.
///
/// One instance carries one in-flight message; it is single-owner and does
/// no internal locking. The pool behind it is the shared, thread-safe piece.
pub struct PooledChainOutput<P: BufferPool> {
    pool: P,
    chain: Vec<PooledBuf>,
    cur_idx: usize,
    position: usize,
}

impl<P: BufferPool> PooledChainOutput<P> {
    /// Creates an empty output. No buffer is leased until the first write.
    pub fn new(pool: P) -> Self {
        Self {
            pool,
            chain: vec![],
            cur_idx: 0,
            position: 0,
        }
    }

    /// Total bytes written; equals [`WireOutput::position`].
    pub fn size(&self) -> usize {
        self.position
    }

    fn ensure_link_at(&mut self, index: usize) {
        while self.chain.len() < index + 1 {
            let cap = FIRST_LINK_LEN << self.chain.len();
            self.chain.push(self.pool.lease(cap));
        }
    }

    fn cur_link(&mut self) -> &mut PooledBuf {
        self.ensure_link_at(self.cur_idx);
        if self.chain[self.cur_idx].remaining() == 0 {
            self.cur_idx += 1;
            self.ensure_link_at(self.cur_idx);
        }
        &mut self.chain[self.cur_idx]
    }

    /// Transfers the whole chain to `channel` with vectored writes, looping
    /// through short writes until exactly [`Self::size`] bytes have gone
    /// out. Blocks until done; there is no partial-drain return.
    pub fn drain_to(&mut self, channel: &mut impl Write) -> Result<WriteLen> {
        for link in self.chain.iter_mut() {
            link.rewind_read();
        }

        let mut drained = 0;
        while drained < self.size() {
            let io_slices = self
                .chain
                .iter()
                .filter(|link| !link.unread().is_empty())
                .map(|link| IoSlice::new(link.unread()))
                .collect::<Vec<_>>();
            let mut n = channel.write_vectored(&io_slices)?;
            if n == 0 {
                return Err(anyhow!(
                    "Channel accepted 0 bytes with {} of {} still unwritten",
                    self.size() - drained,
                    self.size()
                ));
            }

            drained += n;
            for link in self.chain.iter_mut() {
                if n == 0 {
                    break;
                }
                let step = cmp::min(link.unread().len(), n);
                link.advance_read(step);
                n -= step;
            }
        }
        Ok(WriteLen(drained))
    }

    /// Releases every leased buffer back to the pool and empties the chain.
    /// Also runs on drop, so an output abandoned on an error path cannot
    /// leak pooled buffers. Writing after close is a caller error this type
    /// does not guard against.
    pub fn close(&mut self) {
        for link in self.chain.drain(..) {
            self.pool.release(link);
        }
    }
}

impl<P: BufferPool> Drop for PooledChainOutput<P> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<P: BufferPool> WireOutput for PooledChainOutput<P> {
    fn write(&mut self, buf: &[u8]) -> Result<WriteLen> {
        let mut src = buf;
        while src.len() > 0 {
            let taken = self.cur_link().put_some(src);
            src = &src[taken..];
        }
        self.position += buf.len();
        Ok(WriteLen(buf.len()))
    }

    fn write_u8(&mut self, b: u8) -> Result<WriteLen> {
        self.write(&[b])
    }

    fn position(&self) -> usize {
        self.position
    }

    fn backpatch_len(&mut self, len: usize, additional_offset: usize) -> Result<()> {
        let target = self
            .position
            .checked_sub(len + additional_offset)
            .ok_or_else(|| {
                anyhow!(
                    "Backpatch of {} + {} bytes reaches behind position {}",
                    len,
                    additional_offset,
                    self.position
                )
            })?;

        /* Locate the link holding `target` from the nominal geometry. The
        link may not be the current one; it must already exist. */
        let mut index = 0;
        let mut link_start = 0;
        let mut link_cap = FIRST_LINK_LEN;
        while link_start + link_cap <= target {
            link_start += link_cap;
            index += 1;
            link_cap <<= 1;
        }
        let offset_in_link = target - link_start;

        if index >= self.chain.len() {
            return Err(anyhow!(
                "Backpatch target {} falls in link {} but the chain holds {}",
                target,
                index,
                self.chain.len()
            ));
        }
        if offset_in_link + mem::size_of::<u32>() > link_cap {
            return Err(anyhow!(
                "Backpatch at link offset {} straddles the link boundary at {}",
                offset_in_link,
                link_cap
            ));
        }

        let len = u32::try_from(len)?;
        self.chain[index].overwrite_u32(offset_in_link, len)
    }
}
