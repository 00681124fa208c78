/*!
 * Library Configuration
 *
 * Runtime knobs for the graph walker and the random source
 */

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Default size of the pooled random byte buffer
pub const DEFAULT_RANDOM_POOL_SIZE: usize = 2048;

/// Graph walker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Track in-progress object pairs during deep equality so cyclic graphs terminate
    pub equality_cycle_guard: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::guarded()
    }
}

impl WalkConfig {
    /// Cycle-safe equality (default)
    pub const fn guarded() -> Self {
        Self {
            equality_cycle_guard: true,
        }
    }

    /// Plain recursive equality; cyclic graphs overflow the stack
    pub const fn unguarded() -> Self {
        Self {
            equality_cycle_guard: false,
        }
    }
}

/// Random source configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomConfig {
    /// Bytes drawn from the generator per refill
    pub pool_size: usize,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_RANDOM_POOL_SIZE,
        }
    }
}

impl RandomConfig {
    /// Small pool for short-lived sources
    pub const fn compact() -> Self {
        Self { pool_size: 256 }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicheConfig {
    pub walk: WalkConfig,
    pub random: RandomConfig,
}

impl FicheConfig {
    /// Read overrides from the environment
    ///
    /// Environment variables:
    /// - FICHE_EQUALITY_CYCLE_GUARD: `0`/`false` disables the equality cycle guard
    /// - FICHE_RANDOM_POOL_SIZE: random pool size in bytes (must be at least 4)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("FICHE_EQUALITY_CYCLE_GUARD") {
            config.walk.equality_cycle_guard = !(value == "0" || value.eq_ignore_ascii_case("false"));
        }

        if let Ok(value) = std::env::var("FICHE_RANDOM_POOL_SIZE") {
            match value.parse::<usize>() {
                Ok(size) if size >= 4 => config.random.pool_size = size,
                _ => tracing::warn!(
                    value = %value,
                    "ignoring invalid FICHE_RANDOM_POOL_SIZE"
                ),
            }
        }

        config
    }

    /// Process-wide configuration, read from the environment on first use
    pub fn global() -> &'static FicheConfig {
        static CONFIG: OnceLock<FicheConfig> = OnceLock::new();
        CONFIG.get_or_init(Self::from_env)
    }
}
