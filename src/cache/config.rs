//! Cache configuration.

use std::num::NonZeroUsize;

use serde::Deserialize;

const DEFAULT_TIP_LIMIT: usize = 256;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum tips held in the by-id cache.
    pub tip_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            tip_limit: DEFAULT_TIP_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            tip_limit: settings.tip_limit,
        }
    }
}

impl CacheConfig {
    /// The by-id limit as NonZeroUsize, clamping to 1 if zero.
    pub(crate) fn tip_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.tip_limit).unwrap_or(NonZeroUsize::MIN)
    }
}
