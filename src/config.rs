//! Configuration for the Segmented LRU policy engine.
//!
//! The configuration is a plain struct with public fields, built once and
//! handed to [`SegmentedLruPolicy`](crate::SegmentedLruPolicy) at construction.
//! Nothing is looked up from ambient or global state.
//!
//! # Sizing Guidelines
//!
//! - **`maximum_size`**: total number of resident keys across both segments.
//! - **`percent_protected`**: fraction of `maximum_size` reserved for the
//!   protected segment. The bound is derived once as
//!   `floor(maximum_size * percent_protected)`.
//!
//! ```text
//! maximum_size = 10, percent_protected = 0.8
//!   protected  bound = 8
//!   probation  holds whatever protected does not (at least 2 entries at steady state)
//! ```
//!
//! A `percent_protected` of `0.0` disables the protected segment entirely and
//! the policy behaves as plain LRU.
//!
//! # Examples
//!
//! ```
//! use slru_policy::config::SegmentedLruConfig;
//! use core::num::NonZeroUsize;
//!
//! let config = SegmentedLruConfig {
//!     maximum_size: NonZeroUsize::new(10).unwrap(),
//!     percent_protected: 0.8,
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.max_protected(), 8);
//! ```

use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;

/// Default total capacity, in entries.
pub const DEFAULT_MAXIMUM_SIZE: usize = 512;

/// Default fraction of the capacity reserved for the protected segment.
pub const DEFAULT_PERCENT_PROTECTED: f64 = 0.80;

/// Configuration for a [`SegmentedLruPolicy`](crate::SegmentedLruPolicy).
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentedLruConfig {
    /// Maximum number of keys resident across both segments.
    pub maximum_size: NonZeroUsize,

    /// Fraction of `maximum_size` the protected segment may hold, in `[0, 1]`.
    pub percent_protected: f64,
}

impl SegmentedLruConfig {
    /// Creates a configuration from its two parameters.
    ///
    /// The values are not checked here; see [`validate`](Self::validate).
    pub fn new(maximum_size: NonZeroUsize, percent_protected: f64) -> Self {
        Self {
            maximum_size,
            percent_protected,
        }
    }

    /// Checks that `percent_protected` is a finite fraction in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.percent_protected.is_finite() {
            return Err(ConfigError::PercentProtectedNotFinite);
        }
        if !(0.0..=1.0).contains(&self.percent_protected) {
            return Err(ConfigError::PercentProtectedOutOfRange(
                self.percent_protected,
            ));
        }
        Ok(())
    }

    /// Returns the protected segment bound, `floor(maximum_size * percent_protected)`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn max_protected(&self) -> usize {
        (self.maximum_size.get() as f64 * self.percent_protected) as usize
    }
}

impl Default for SegmentedLruConfig {
    fn default() -> Self {
        Self {
            maximum_size: NonZeroUsize::new(DEFAULT_MAXIMUM_SIZE).unwrap_or(NonZeroUsize::MIN),
            percent_protected: DEFAULT_PERCENT_PROTECTED,
        }
    }
}

impl fmt::Debug for SegmentedLruConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedLruConfig")
            .field("maximum_size", &self.maximum_size)
            .field("percent_protected", &self.percent_protected)
            .field("max_protected", &self.max_protected())
            .finish()
    }
}
