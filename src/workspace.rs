//! Reusable scratch vectors.
//!
//! An operation whose receiver is also one of its inputs computes into a
//! workspace vector first and copies the result back. The pool keeps the
//! scratch buffers between calls so that repeated isolations do not allocate.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{MatError, Result};
use crate::vecdense::VecDense;

/// Idle buffers retained per length by [`WorkspacePool::new`].
pub const DEFAULT_RETENTION: usize = 4;

/// Pool of zeroed scratch buffers keyed by length.
///
/// ```
/// use mat32::WorkspacePool;
///
/// let pool = WorkspacePool::new();
/// {
///     let mut w = pool.checkout(3).unwrap();
///     w.set_vec(0, 1.0);
/// }
/// assert_eq!(pool.idle(3), 1);
/// // Buffers come back zeroed.
/// assert_eq!(pool.checkout(3).unwrap().to_vec(), vec![0.0; 3]);
/// ```
#[derive(Debug)]
pub struct WorkspacePool {
    idle: Mutex<HashMap<usize, Vec<Vec<f32>>>>,
    retention: usize,
}

impl WorkspacePool {
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }

    /// A pool keeping at most `retention` idle buffers of each length.
    pub fn with_retention(retention: usize) -> Self {
        Self {
            idle: Mutex::new(HashMap::new()),
            retention,
        }
    }

    /// The process-wide pool.
    pub fn global() -> &'static WorkspacePool {
        static GLOBAL: OnceLock<WorkspacePool> = OnceLock::new();
        GLOBAL.get_or_init(WorkspacePool::new)
    }

    /// Borrow a zeroed unit-stride vector of length `len`.
    ///
    /// The buffer returns to the pool when the guard drops.
    pub fn checkout(&self, len: usize) -> Result<Workspace<'_>> {
        if len == 0 {
            return Err(MatError::ZeroLength);
        }
        let reused = self.idle.lock().get_mut(&len).and_then(Vec::pop);
        let buf = match reused {
            Some(mut buf) => {
                buf.fill(0.0);
                buf
            }
            None => {
                debug!(len, "workspace pool miss");
                vec![0.0; len]
            }
        };
        Ok(Workspace {
            pool: self,
            vec: VecDense::from_buffer(buf),
        })
    }

    /// Number of idle buffers of length `len`.
    pub fn idle(&self, len: usize) -> usize {
        self.idle.lock().get(&len).map_or(0, Vec::len)
    }

    fn give_back(&self, buf: Vec<f32>) {
        let mut idle = self.idle.lock();
        let slot = idle.entry(buf.len()).or_default();
        if slot.len() < self.retention {
            slot.push(buf);
        }
    }
}

impl Default for WorkspacePool {
    fn default() -> Self {
        Self::new()
    }
}

/// A checked-out scratch vector. Dereferences to [`VecDense`].
///
/// If the vector is reset or still has views alive when the guard drops, its
/// buffer is simply freed.
pub struct Workspace<'p> {
    pool: &'p WorkspacePool,
    vec: VecDense,
}

impl Deref for Workspace<'_> {
    type Target = VecDense;

    fn deref(&self) -> &VecDense {
        &self.vec
    }
}

impl DerefMut for Workspace<'_> {
    fn deref_mut(&mut self) -> &mut VecDense {
        &mut self.vec
    }
}

impl Drop for Workspace<'_> {
    fn drop(&mut self) {
        let vec = core::mem::take(&mut self.vec);
        if let Some(buf) = vec.into_buffer() {
            self.pool.give_back(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_checkout() {
        let pool = WorkspacePool::new();
        assert_eq!(pool.checkout(0).err(), Some(MatError::ZeroLength));
    }

    #[test]
    fn buffers_are_reused_and_zeroed() {
        let pool = WorkspacePool::new();
        {
            let mut w = pool.checkout(4).unwrap();
            assert_eq!(w.len(), 4);
            w.set_vec(3, 9.0);
        }
        assert_eq!(pool.idle(4), 1);
        let w = pool.checkout(4).unwrap();
        assert_eq!(pool.idle(4), 0);
        assert_eq!(w.to_vec(), vec![0.0; 4]);
    }

    #[test]
    fn retention_bounds_idle_buffers() {
        let pool = WorkspacePool::with_retention(2);
        let held: Vec<_> = (0..3).map(|_| pool.checkout(5).unwrap()).collect();
        drop(held);
        assert_eq!(pool.idle(5), 2);
    }

    #[test]
    fn lengths_do_not_mix() {
        let pool = WorkspacePool::new();
        drop(pool.checkout(2).unwrap());
        assert_eq!(pool.idle(2), 1);
        assert_eq!(pool.idle(3), 0);
    }

    #[test]
    fn viewed_buffer_is_not_returned() {
        let pool = WorkspacePool::new();
        let view = {
            let w = pool.checkout(2).unwrap();
            w.view()
        };
        assert_eq!(pool.idle(2), 0);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn global_pool_is_shared() {
        assert!(core::ptr::eq(WorkspacePool::global(), WorkspacePool::global()));
    }

    /// `v = A v` on `threads` threads at once, each isolating through `pool`.
    fn aliased_products_on_threads(pool: &WorkspacePool, threads: usize) {
        std::thread::scope(|s| {
            for t in 0..threads {
                s.spawn(move || {
                    let a = crate::Dense::new(4, 4, Some((0..16).map(|k| (k % 5) as f32).collect())).unwrap();
                    let start = [1.0, 2.0, t as f32, -1.0];
                    let want: Vec<f32> =
                        (0..4).map(|i| (0..4).map(|j| a.at(i, j) * start[j]).sum()).collect();
                    for _ in 0..50 {
                        let mut v = VecDense::from_slice(&start);
                        let me = v.view();
                        v.mul_vec_in(pool, &a, &me).unwrap();
                        assert_eq!(v.to_vec(), want);
                    }
                });
            }
        });
    }

    #[test]
    fn concurrent_checkout_and_return() {
        let pool = WorkspacePool::new();
        aliased_products_on_threads(&pool, 8);
        let idle = pool.idle(4);
        assert!((1..=DEFAULT_RETENTION).contains(&idle), "idle = {idle}");
    }

    #[test]
    fn global_pool_across_threads() {
        aliased_products_on_threads(WorkspacePool::global(), 8);
    }
}
