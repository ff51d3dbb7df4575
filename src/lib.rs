#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## How a Trace Event Flows Through the Engine
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────────┐
//! │ record(key)                                                               │
//! │   stats.record_operation()                                                │
//! │   admittor.record(&key)                                                   │
//! │                                                                           │
//! │   resident? ──No──▶ probation tail ──▶ over capacity? ──No──▶ done        │
//! │      │                                      │Yes                          │
//! │     Yes                                     ▼                             │
//! │      │                      admittor.admit(candidate, victim)             │
//! │      ▼                           true ─▶ evict victim                     │
//! │   protected? ──Yes──▶ move to protected tail                              │
//! │      │No                         false ─▶ evict candidate                 │
//! │      ▼                                                                    │
//! │   promote to protected tail (demote protected head on overflow)           │
//! └───────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Item | Description |
//! |------|-------------|
//! | [`SegmentedLruPolicy`] | The SLRU engine; `record(key)` is its only mutating operation |
//! | [`SegmentedLruConfig`](config::SegmentedLruConfig) | Capacity and protected fraction |
//! | [`Admittor`](admission::Admittor) | Pluggable arbiter consulted on every over-capacity miss |
//! | [`StatsSink`](metrics::StatsSink) | Receiver for hit/miss/eviction events |
//! | [`SlruPolicyStats`](metrics::SlruPolicyStats) | Counter-based sink shipped with the crate |
//! | [`Policy`](traits::Policy) | Uniform interface a trace driver replays against |
//!
//! ## Code Example
//!
//! ```rust
//! use slru_policy::admission::AlwaysAdmit;
//! use slru_policy::config::SegmentedLruConfig;
//! use slru_policy::SegmentedLruPolicy;
//! use core::num::NonZeroUsize;
//!
//! // Plain LRU: no protected capacity
//! let config = SegmentedLruConfig::new(NonZeroUsize::new(2).unwrap(), 0.0);
//! let mut policy = SegmentedLruPolicy::new(config, AlwaysAdmit);
//!
//! for key in ["A", "B", "C"] {
//!     policy.record(key);
//! }
//!
//! assert!(!policy.contains(&"A"));
//! assert!(policy.contains(&"B"));
//! assert!(policy.contains(&"C"));
//! ```
//!
//! ## Modules
//!
//! - [`slru`]: Segmented LRU policy engine
//! - [`admission`]: Admission strategy capability and stock strategies
//! - [`metrics`]: Stats sink capability and counters
//! - [`config`]: Engine configuration
//! - [`meta`]: Segment tag
//! - [`error`]: Configuration and invariant errors
//! - [`traits`]: Driver-facing `Policy` trait

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

/// Segment tag carried by every resident entry.
pub mod meta;

/// Arena-backed doubly linked segment lists.
///
/// Both segment lists share one slab of nodes addressed by stable indices,
/// each list anchored by its own sentinel slot.
///
/// **Note**: This module is internal infrastructure. Its operations assume the
/// caller keeps the key index in sync and panic when that assumption breaks.
pub(crate) mod list;

/// Engine configuration.
pub mod config;

/// Configuration and invariant errors.
pub mod error;

/// Admission strategy capability.
///
/// Decides, on every over-capacity miss, whether the incoming key displaces
/// the policy's chosen victim.
pub mod admission;

/// Stats sink capability and counter implementations.
pub mod metrics;

/// Driver-facing policy trait.
pub mod traits;

/// Segmented LRU (SLRU) policy engine.
///
/// Replays key accesses against a probation and a protected segment, with
/// eviction gated by an [`Admittor`](admission::Admittor).
pub mod slru;

pub use slru::SegmentedLruPolicy;

pub use admission::{Admittor, AlwaysAdmit, RejectAll};
pub use config::SegmentedLruConfig;
pub use error::{ConfigError, InvariantError};
pub use meta::QueueType;
pub use metrics::{CacheMetrics, CorePolicyStats, SlruPolicyStats, StatsSink};
pub use traits::Policy;
