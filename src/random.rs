/*!
 * Random Source
 *
 * Thread-safe random numbers drawn from a pooled, OS-seeded
 * cryptographically strong generator. The pool is refilled when the
 * remaining bytes cannot satisfy a request.
 */

use crate::core::config::{FicheConfig, RandomConfig};
use crate::core::errors::Result;
use crate::core::validation::{ensure_argument, ensure_at_least};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::sync::OnceLock;
use tracing::trace;

/// Source of random bits used by shuffling and sampling
///
/// Implementors provide raw 32-bit words and byte fills; the ranged
/// helpers are derived from those and are free of modulo bias.
pub trait RandomSource: Send + Sync {
    fn next_u32(&self) -> u32;

    fn fill_bytes(&self, buffer: &mut [u8]);

    /// Uniform value in `[0, i32::MAX)`
    fn next_non_negative(&self) -> i32 {
        loop {
            let value = (self.next_u32() & i32::MAX as u32) as i32;
            if value != i32::MAX {
                return value;
            }
        }
    }

    /// Uniform value in `[0, max)`; `max` must be positive
    fn next_below(&self, max: i32) -> Result<i32> {
        ensure_at_least(max, 1, "max")?;
        self.next_in_range(0, max)
    }

    /// Uniform value in `[min, max)` by rejection sampling
    fn next_in_range(&self, min: i32, max: i32) -> Result<i32> {
        ensure_argument(
            min < max,
            "min, max",
            "min cannot be greater than or equal to max",
        )?;
        const SPAN: i64 = 1 + u32::MAX as i64;
        let diff = max as i64 - min as i64;
        let limit = SPAN - (SPAN % diff);
        loop {
            let value = self.next_u32() as i64;
            if value < limit {
                return Ok((min as i64 + value % diff) as i32);
            }
        }
    }

    /// Uniform value in `[0, 1)`
    fn next_f64(&self) -> f64 {
        self.next_u32() as f64 / (1.0 + u32::MAX as f64)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    #[inline]
    fn next_u32(&self) -> u32 {
        (**self).next_u32()
    }

    #[inline]
    fn fill_bytes(&self, buffer: &mut [u8]) {
        (**self).fill_bytes(buffer)
    }
}

struct Pool {
    rng: StdRng,
    bytes: Vec<u8>,
    position: usize,
}

impl Pool {
    fn new(size: usize) -> Self {
        let mut pool = Self {
            rng: StdRng::from_entropy(),
            bytes: vec![0; size],
            position: 0,
        };
        pool.refill();
        pool
    }

    fn refill(&mut self) {
        self.rng.fill_bytes(&mut self.bytes);
        self.position = 0;
        trace!(size = self.bytes.len(), "random pool refilled");
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn take(&mut self, out: &mut [u8]) {
        if self.remaining() < out.len() {
            self.refill();
        }
        let end = self.position + out.len();
        out.copy_from_slice(&self.bytes[self.position..end]);
        self.position = end;
    }
}

/// Pooled cryptographically strong random source
///
/// Small requests are served from a shared byte pool under a
/// `parking_lot::Mutex`; requests at least as large as the pool bypass it
/// and draw from the generator directly.
pub struct SafeRandom {
    pool: Mutex<Pool>,
    pool_size: usize,
}

impl SafeRandom {
    /// Source with the pool size from the global configuration
    pub fn new() -> Self {
        Self::with_config(FicheConfig::global().random)
    }

    pub fn with_config(config: RandomConfig) -> Self {
        let pool_size = config.pool_size.max(std::mem::size_of::<u32>());
        Self {
            pool: Mutex::new(Pool::new(pool_size)),
            pool_size,
        }
    }

    /// Process-wide shared source
    pub fn shared() -> &'static SafeRandom {
        static SHARED: OnceLock<SafeRandom> = OnceLock::new();
        SHARED.get_or_init(SafeRandom::new)
    }

    #[inline]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }
}

impl Default for SafeRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SafeRandom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeRandom")
            .field("pool_size", &self.pool_size)
            .finish_non_exhaustive()
    }
}

impl RandomSource for SafeRandom {
    fn next_u32(&self) -> u32 {
        let mut word = [0u8; 4];
        self.pool.lock().take(&mut word);
        u32::from_le_bytes(word)
    }

    fn fill_bytes(&self, buffer: &mut [u8]) {
        let mut pool = self.pool.lock();
        if buffer.len() < self.pool_size {
            pool.take(buffer);
        } else {
            pool.rng.fill_bytes(buffer);
        }
    }
}
