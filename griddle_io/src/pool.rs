use crate::PooledBuf;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

mod test;

/// The lease/release contract [`PooledChainOutput`](crate::PooledChainOutput)
/// requires from a buffer pool.
///
/// Implementations take `&self` and must be shareable across outputs running
/// on different threads; each output serializes its own lease/release calls,
/// the pool serializes everyone's.
pub trait BufferPool: Send + Sync {
    /// Leases a buffer with capacity >= `size`. Ownership moves to the
    /// caller until [`Self::release`].
    fn lease(&self, size: usize) -> PooledBuf;

    /// Takes a leased buffer back for reuse.
    fn release(&self, buf: PooledBuf);
}

impl<P: BufferPool + ?Sized> BufferPool for Arc<P> {
    fn lease(&self, size: usize) -> PooledBuf {
        (**self).lease(size)
    }
    fn release(&self, buf: PooledBuf) {
        (**self).release(buf)
    }
}

/// Free-list pool keyed by requested capacity.
///
/// Chain outputs request power-of-two sizes (`1024 << link_index`), so each
/// size class keeps its own idle list. A miss allocates; releases park the
/// cleared buffer for the next lease of the same size.
#[derive(Default)]
pub struct PowerOfTwoBufferPool {
    idle: Mutex<HashMap<usize, Vec<PooledBuf>>>,
}

impl PowerOfTwoBufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count of parked buffers across all size classes.
    pub fn idle_count(&self) -> usize {
        let idle = self.idle.lock().unwrap();
        idle.values().map(Vec::len).sum()
    }
}

impl BufferPool for PowerOfTwoBufferPool {
    fn lease(&self, size: usize) -> PooledBuf {
        let reused = {
            let mut idle = self.idle.lock().unwrap();
            idle.get_mut(&size).and_then(Vec::pop)
        };
        match reused {
            Some(buf) => buf,
            None => PooledBuf::with_capacity(size),
        }
    }

    fn release(&self, mut buf: PooledBuf) {
        buf.clear();
        let cap = buf.capacity();
        let mut idle = self.idle.lock().unwrap();
        idle.entry(cap).or_default().push(buf);
    }
}
