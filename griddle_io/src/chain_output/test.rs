#[cfg(test)]
mod test {
    use super::super::*;
    use crate::PowerOfTwoBufferPool;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Pool wrapper observing every lease and release.
    struct CountingPool {
        inner: PowerOfTwoBufferPool,
        leased: AtomicUsize,
        released: AtomicUsize,
    }
    impl CountingPool {
        fn new() -> Self {
            Self {
                inner: PowerOfTwoBufferPool::new(),
                leased: AtomicUsize::new(0),
                released: AtomicUsize::new(0),
            }
        }
        fn leased(&self) -> usize {
            self.leased.load(Ordering::SeqCst)
        }
        fn released(&self) -> usize {
            self.released.load(Ordering::SeqCst)
        }
    }
    impl BufferPool for CountingPool {
        fn lease(&self, size: usize) -> PooledBuf {
            self.leased.fetch_add(1, Ordering::SeqCst);
            self.inner.lease(size)
        }
        fn release(&self, buf: PooledBuf) {
            self.released.fetch_add(1, Ordering::SeqCst);
            self.inner.release(buf)
        }
    }

    /// Channel accepting at most `max_per_call` bytes per write call.
    struct ShortChannel {
        accepted: Vec<u8>,
        max_per_call: usize,
    }
    impl ShortChannel {
        fn new(max_per_call: usize) -> Self {
            Self {
                accepted: vec![],
                max_per_call,
            }
        }
    }
    impl io::Write for ShortChannel {
        fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
            let n = cmp::min(self.max_per_call, buf.len());
            self.accepted.extend_from_slice(&buf[..n]);
            Ok(n)
        }
        fn flush(&mut self) -> Result<(), io::Error> {
            Ok(())
        }
    }

    fn patterned(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn links_are_leased_lazily_in_doubling_sizes() -> Result<()> {
        let pool = Arc::new(CountingPool::new());
        let mut out = PooledChainOutput::new(Arc::clone(&pool));
        assert_eq!(0, pool.leased());

        out.write(&[7u8; 1])?;
        assert_eq!(1, pool.leased());
        out.write(&[7u8; 1023])?;
        assert_eq!(1, pool.leased());

        /* Link 0 is full; the next byte leases link 1 (2048). */
        out.write(&[7u8; 1])?;
        assert_eq!(2, pool.leased());
        out.write(&[7u8; 2047])?;
        assert_eq!(2, pool.leased());
        out.write(&[7u8; 1])?;
        assert_eq!(3, pool.leased());

        assert_eq!(1024 + 2048 + 1, out.size());
        Ok(())
    }

    #[test]
    fn one_write_spanning_several_links() -> Result<()> {
        let pool = Arc::new(CountingPool::new());
        let mut out = PooledChainOutput::new(Arc::clone(&pool));

        let expected = patterned(5000);
        out.write(&expected)?;
        assert_eq!(3, pool.leased());
        assert_eq!(5000, out.size());
        assert_eq!(5000, out.position());

        let mut wire: Vec<u8> = vec![];
        out.drain_to(&mut wire)?;
        assert_eq!(expected, wire);
        Ok(())
    }

    #[test]
    fn position_tracks_boundary_straddling_writes() -> Result<()> {
        let pool = Arc::new(PowerOfTwoBufferPool::new());
        let mut out = PooledChainOutput::new(pool);

        let mut expected: Vec<u8> = vec![];
        for chunk_len in [1000usize, 48, 3000, 1, 0, 77] {
            let chunk = patterned(chunk_len);
            let w_len = out.write(&chunk)?;
            assert_eq!(chunk_len, *w_len);
            expected.extend_from_slice(&chunk);
            assert_eq!(expected.len(), out.size());
        }

        let mut wire: Vec<u8> = vec![];
        out.drain_to(&mut wire)?;
        assert_eq!(expected, wire);
        Ok(())
    }

    #[test]
    fn backpatch_within_first_link() -> Result<()> {
        let pool = Arc::new(PowerOfTwoBufferPool::new());
        let mut out = PooledChainOutput::new(pool);

        out.write(&[0u8; 4])?;
        let body = patterned(100);
        out.write(&body)?;
        out.backpatch_len(out.size(), 0)?;

        let mut wire: Vec<u8> = vec![];
        out.drain_to(&mut wire)?;
        assert_eq!(104u32.to_le_bytes(), wire[0..4]);
        assert_eq!(body, wire[4..]);
        Ok(())
    }

    #[test]
    fn backpatch_reaches_an_earlier_link() -> Result<()> {
        let pool = Arc::new(CountingPool::new());
        let mut out = PooledChainOutput::new(Arc::clone(&pool));

        let preamble = patterned(500);
        out.write(&preamble)?;
        out.write(&[0u8; 4])?;
        let body = patterned(2000);
        out.write(&body)?;

        /* The reserved bytes live in link 0; writes are in link 1 by now. */
        assert_eq!(2, pool.leased());
        out.backpatch_len(4 + body.len(), 0)?;

        let mut wire: Vec<u8> = vec![];
        out.drain_to(&mut wire)?;
        assert_eq!(preamble, wire[..500]);
        assert_eq!(2004u32.to_le_bytes(), wire[500..504]);
        assert_eq!(body, wire[504..]);
        Ok(())
    }

    #[test]
    fn backpatch_skips_trailing_bytes_via_additional_offset() -> Result<()> {
        let pool = Arc::new(PowerOfTwoBufferPool::new());
        let mut out = PooledChainOutput::new(pool);

        out.write(&[0u8; 4])?;
        out.write(&patterned(64))?;
        out.write(&[0xff, 0xff])?;
        out.backpatch_len(68, 2)?;

        let mut wire: Vec<u8> = vec![];
        out.drain_to(&mut wire)?;
        assert_eq!(68u32.to_le_bytes(), wire[0..4]);
        assert_eq!([0xff, 0xff], wire[68..70]);
        Ok(())
    }

    #[test]
    fn backpatch_rejects_a_target_behind_the_chain_start() -> Result<()> {
        let pool = Arc::new(PowerOfTwoBufferPool::new());
        let mut out = PooledChainOutput::new(pool);

        out.write(&[0u8; 8])?;
        let msg = format!("{}", out.backpatch_len(100, 0).unwrap_err());
        assert!(msg.contains("behind position"), "{}", msg);
        Ok(())
    }

    #[test]
    fn backpatch_rejects_a_target_beyond_the_written_range() -> Result<()> {
        let pool = Arc::new(PowerOfTwoBufferPool::new());
        let mut out = PooledChainOutput::new(pool);

        /* Target offset 0, but only 2 bytes are written there. */
        out.write(&[0u8; 2])?;
        let msg = format!("{}", out.backpatch_len(2, 0).unwrap_err());
        assert!(msg.contains("exceeds the written range"), "{}", msg);
        Ok(())
    }

    #[test]
    fn drain_loops_through_short_channel_writes() -> Result<()> {
        let pool = Arc::new(PowerOfTwoBufferPool::new());
        let mut out = PooledChainOutput::new(pool);

        let expected = patterned(5000);
        out.write(&expected)?;

        let mut channel = ShortChannel::new(700);
        let drained = out.drain_to(&mut channel)?;
        assert_eq!(5000, *drained);
        assert_eq!(expected, channel.accepted);
        Ok(())
    }

    #[test]
    fn close_releases_every_lease_exactly_once() -> Result<()> {
        let pool = Arc::new(CountingPool::new());
        let mut out = PooledChainOutput::new(Arc::clone(&pool));

        out.write(&patterned(3000))?;
        assert_eq!(2, pool.leased());
        assert_eq!(0, pool.released());

        out.close();
        assert_eq!(2, pool.released());
        assert_eq!(2, pool.inner.idle_count());

        /* Drop after close must not release again. */
        drop(out);
        assert_eq!(2, pool.released());
        Ok(())
    }

    #[test]
    fn drop_without_close_releases_all_leases() -> Result<()> {
        let pool = Arc::new(CountingPool::new());
        {
            let mut out = PooledChainOutput::new(Arc::clone(&pool));
            out.write(&patterned(1500))?;
            assert_eq!(2, pool.leased());
        }
        assert_eq!(2, pool.released());
        assert_eq!(2, pool.inner.idle_count());
        Ok(())
    }

    #[test]
    fn released_links_are_reused_by_the_next_output() -> Result<()> {
        let pool = Arc::new(CountingPool::new());

        let mut out = PooledChainOutput::new(Arc::clone(&pool));
        out.write(&patterned(1500))?;
        out.close();

        let mut out = PooledChainOutput::new(Arc::clone(&pool));
        out.write(&patterned(1500))?;
        /* 4 leases total, but the second pair came off the free lists. */
        assert_eq!(4, pool.leased());
        assert_eq!(0, pool.inner.idle_count());
        out.close();
        Ok(())
    }
}
