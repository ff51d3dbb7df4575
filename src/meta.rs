//! Per-Entry Segment Metadata
//!
//! Every resident entry of a [`SegmentedLruPolicy`](crate::SegmentedLruPolicy)
//! carries a single tag naming the segment list it currently lives in.
//!
//! | Tag | Meaning | Entered by |
//! |-----|---------|------------|
//! | [`QueueType::Probation`] | seen once since (re)entry | miss, demotion |
//! | [`QueueType::Protected`] | seen at least twice | promotion |
//!
//! # Usage
//!
//! ```
//! use slru_policy::meta::QueueType;
//!
//! let tag = QueueType::Probation;
//! assert_eq!(tag.to_string(), "probation");
//! assert_ne!(tag, QueueType::Protected);
//! ```

use core::fmt;

/// Segment an entry resides in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QueueType {
    /// Entries observed exactly once since they entered (or re-entered) the segment.
    Probation,
    /// Entries observed two or more times; bounded by the protected capacity.
    Protected,
}

impl QueueType {
    /// Both segments, in sentinel slot order.
    pub(crate) const ALL: [QueueType; 2] = [QueueType::Probation, QueueType::Protected];

    /// Slot of this segment's sentinel node inside the list arena.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            QueueType::Probation => 0,
            QueueType::Protected => 1,
        }
    }
}

impl fmt::Display for QueueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueType::Probation => f.write_str("probation"),
            QueueType::Protected => f.write_str("protected"),
        }
    }
}
