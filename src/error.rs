//! Error types for the SLRU policy engine.
//!
//! [`SegmentedLruPolicy::record`](crate::SegmentedLruPolicy::record) has no
//! error channel; the only fallible surfaces are construction and the
//! `check_invariants` self-check.
//!
//! - [`ConfigError`]: returned when a [`SegmentedLruConfig`](crate::config::SegmentedLruConfig)
//!   is rejected at construction time.
//! - [`InvariantError`]: returned by
//!   [`SegmentedLruPolicy::check_invariants`](crate::SegmentedLruPolicy::check_invariants)
//!   when the index and segment lists disagree.
//!
//! ```
//! use slru_policy::config::SegmentedLruConfig;
//! use slru_policy::error::ConfigError;
//! use core::num::NonZeroUsize;
//!
//! let config = SegmentedLruConfig::new(NonZeroUsize::new(10).unwrap(), 1.5);
//! assert_eq!(config.validate(), Err(ConfigError::PercentProtectedOutOfRange(1.5)));
//! ```

use crate::meta::QueueType;
use thiserror::Error;

/// Error returned when configuration parameters are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `percent_protected` is NaN or infinite.
    #[error("percent_protected must be a finite number")]
    PercentProtectedNotFinite,

    /// `percent_protected` lies outside `[0, 1]`.
    #[error("percent_protected must be within [0, 1], got {0}")]
    PercentProtectedOutOfRange(f64),
}

/// Error returned when an internal invariant of the engine does not hold.
///
/// Seeing one of these means the index and the segment lists have drifted
/// apart, which is a bug in the engine rather than a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvariantError {
    /// The index size differs from the combined length of both segments.
    #[error("index holds {index} keys but the segments hold {segments} entries")]
    IndexSizeMismatch {
        /// Keys in the index.
        index: usize,
        /// Entries linked into either segment.
        segments: usize,
    },

    /// An indexed key points at a slot that does not hold that key.
    #[error("index entry for slot {slot} does not resolve to its node")]
    DanglingIndex {
        /// Arena slot the index pointed at.
        slot: usize,
    },

    /// A node is linked into one segment but tagged with the other.
    #[error("slot {slot} is tagged {tagged} but linked into the {found} segment")]
    SegmentTagMismatch {
        /// Arena slot of the offending node.
        slot: usize,
        /// Tag stored on the node.
        tagged: QueueType,
        /// Segment the node was found in.
        found: QueueType,
    },

    /// `prev`/`next` links are not symmetric, or a segment's cached length is off.
    #[error("broken links in the {segment} segment at slot {slot}")]
    BrokenLink {
        /// Segment being walked.
        segment: QueueType,
        /// Slot where the walk failed.
        slot: usize,
    },

    /// The protected occupancy counter disagrees with the protected segment.
    #[error("protected counter is {counter} but the protected segment holds {actual}")]
    ProtectedSizeMismatch {
        /// Value of the engine's counter.
        counter: usize,
        /// Entries linked into the protected segment.
        actual: usize,
    },

    /// More entries are resident than the configured maximum.
    #[error("{len} entries resident, maximum size is {maximum}")]
    CapacityExceeded {
        /// Resident entries.
        len: usize,
        /// Configured maximum.
        maximum: usize,
    },

    /// The protected segment holds more entries than its bound.
    #[error("{len} protected entries, protected bound is {maximum}")]
    ProtectedCapacityExceeded {
        /// Protected entries.
        len: usize,
        /// Protected bound.
        maximum: usize,
    },
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::ToString;

    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::PercentProtectedOutOfRange(-0.5).to_string(),
            "percent_protected must be within [0, 1], got -0.5"
        );
        assert!(ConfigError::PercentProtectedNotFinite
            .to_string()
            .contains("finite"));
    }

    #[test]
    fn test_invariant_error_messages() {
        let err = InvariantError::SegmentTagMismatch {
            slot: 7,
            tagged: QueueType::Protected,
            found: QueueType::Probation,
        };
        assert_eq!(
            err.to_string(),
            "slot 7 is tagged protected but linked into the probation segment"
        );

        let err = InvariantError::CapacityExceeded { len: 3, maximum: 2 };
        assert_eq!(err.to_string(), "3 entries resident, maximum size is 2");
    }
}
