#[cfg(test)]
mod test {
    use super::super::*;
    use std::thread;

    #[test]
    fn lease_allocates_on_miss_and_reuses_on_hit() {
        let pool = PowerOfTwoBufferPool::new();
        assert_eq!(0, pool.idle_count());

        let mut buf = pool.lease(1024);
        assert_eq!(1024, buf.capacity());
        buf.put_some(&[1, 2, 3]);
        pool.release(buf);
        assert_eq!(1, pool.idle_count());

        /* Reuse comes back cleared. */
        let buf = pool.lease(1024);
        assert_eq!(0, pool.idle_count());
        assert_eq!(0, buf.written());
        assert_eq!(1024, buf.remaining());
        pool.release(buf);
    }

    #[test]
    fn size_classes_do_not_mix() {
        let pool = PowerOfTwoBufferPool::new();
        pool.release(pool.lease(1024));
        pool.release(pool.lease(2048));
        assert_eq!(2, pool.idle_count());

        let buf = pool.lease(2048);
        assert_eq!(2048, buf.capacity());
        assert_eq!(1, pool.idle_count());
        pool.release(buf);
    }

    #[test]
    fn concurrent_lease_release() {
        let pool = Arc::new(PowerOfTwoBufferPool::new());

        let handles = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let mut buf = pool.lease(1024);
                        buf.put_some(&[0xab; 64]);
                        pool.release(buf);
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(pool.idle_count() >= 1);
        assert!(pool.idle_count() <= 4);
    }
}
