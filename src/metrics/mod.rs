//! Policy Metrics System
//!
//! The policy engine does not aggregate statistics itself; it reports events to
//! a [`StatsSink`] supplied at construction. The crate ships
//! [`SlruPolicyStats`], a counter-based sink, and a [`CacheMetrics`] trait that
//! turns any sink into a `BTreeMap` of named values for reporting.
//!
//! # Why BTreeMap over HashMap?
//!
//! Metrics are compared across simulation runs, so their order must be stable:
//! a BTreeMap always yields keys alphabetically, which keeps exported output
//! and test expectations reproducible. With a dozen keys the O(log n) lookup
//! is irrelevant.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod slru;

pub use slru::SlruPolicyStats;

/// Receiver for the events a policy emits while replaying a trace.
///
/// The four required counters are monotonically incremented; nothing else is
/// expected of an implementation. The segment-movement hooks default to no-ops
/// so minimal sinks only need the required methods.
pub trait StatsSink {
    /// One trace event was processed.
    fn record_operation(&mut self);

    /// The accessed key was resident.
    fn record_hit(&mut self);

    /// The accessed key was not resident.
    fn record_miss(&mut self);

    /// A miss pushed the cache over capacity and one entry was evicted.
    fn record_eviction(&mut self);

    /// A probation entry moved to the protected segment.
    fn record_promotion(&mut self) {}

    /// A protected entry spilled back into the probation segment.
    fn record_demotion(&mut self) {}

    /// The admittor refused the incoming key, so it was evicted in place of the victim.
    fn record_rejection(&mut self) {}

    /// Name the statistics are reported under, if the sink carries one.
    fn policy_name(&self) -> Option<&str> {
        None
    }
}

impl<S: StatsSink + ?Sized> StatsSink for &mut S {
    fn record_operation(&mut self) {
        (**self).record_operation();
    }

    fn record_hit(&mut self) {
        (**self).record_hit();
    }

    fn record_miss(&mut self) {
        (**self).record_miss();
    }

    fn record_eviction(&mut self) {
        (**self).record_eviction();
    }

    fn record_promotion(&mut self) {
        (**self).record_promotion();
    }

    fn record_demotion(&mut self) {
        (**self).record_demotion();
    }

    fn record_rejection(&mut self) {
        (**self).record_rejection();
    }

    fn policy_name(&self) -> Option<&str> {
        (**self).policy_name()
    }
}

/// Counters common to every replacement policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorePolicyStats {
    /// Trace events processed.
    pub operations: u64,

    /// Accesses that found the key resident.
    pub hits: u64,

    /// Accesses that did not find the key resident.
    pub misses: u64,

    /// Entries removed because a miss exceeded capacity.
    pub evictions: u64,
}

impl CorePolicyStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of lookups, `hits + misses`.
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of requests that hit, or 0.0 before any request.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.requests())
    }

    /// Fraction of requests that missed, or 0.0 before any request.
    pub fn miss_rate(&self) -> f64 {
        ratio(self.misses, self.requests())
    }

    /// Evictions per request, or 0.0 before any request.
    pub fn eviction_rate(&self) -> f64 {
        ratio(self.evictions, self.requests())
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        // Counters
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("hits".to_string(), self.hits as f64);
        metrics.insert("misses".to_string(), self.misses as f64);
        metrics.insert("operations".to_string(), self.operations as f64);
        metrics.insert("requests".to_string(), self.requests() as f64);

        // Rates (0.0 to 1.0)
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());
        metrics.insert("eviction_rate".to_string(), self.eviction_rate());

        metrics
    }
}

impl StatsSink for CorePolicyStats {
    fn record_operation(&mut self) {
        self.operations += 1;
    }

    fn record_hit(&mut self) {
        self.hits += 1;
    }

    fn record_miss(&mut self) {
        self.misses += 1;
    }

    fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

/// Trait that all policy statistics implement for metrics reporting
///
/// Gives a simulation driver one way to collect and compare results from
/// different policies without knowing their concrete stats types.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in alphabetical key order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "SLRU")
    fn algorithm_name(&self) -> &'static str;
}

#[inline]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}
