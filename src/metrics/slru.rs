//! SLRU Policy Statistics
//!
//! Counters specific to the Segmented LRU policy, layered over
//! [`CorePolicyStats`].

extern crate alloc;

use super::{CacheMetrics, CorePolicyStats, StatsSink};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Name the SLRU policy reports under unless another is given.
pub const DEFAULT_POLICY_NAME: &str = "linked.SegmentedLru";

/// SLRU-specific statistics (extends CorePolicyStats)
///
/// Besides hits, misses and evictions this tracks how entries move between the
/// two segments and how often the admittor turned an incoming key away.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlruPolicyStats {
    /// Label used when reporting this run.
    pub name: String,

    /// Core counters common to all policies
    pub core: CorePolicyStats,

    /// Probation entries promoted to the protected segment
    pub promotions: u64,

    /// Protected entries demoted back to the probation segment
    pub demotions: u64,

    /// Evictions where the admittor kept the victim and evicted the incoming key
    pub rejections: u64,
}

impl SlruPolicyStats {
    /// Creates zeroed statistics reported under `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            core: CorePolicyStats::new(),
            promotions: 0,
            demotions: 0,
            rejections: 0,
        }
    }

    /// Fraction of evictions decided in favour of the incoming key.
    pub fn admission_rate(&self) -> f64 {
        if self.core.evictions > 0 {
            (self.core.evictions - self.rejections) as f64 / self.core.evictions as f64
        } else {
            0.0
        }
    }

    /// Promotions per request, or 0.0 before any request.
    pub fn promotion_rate(&self) -> f64 {
        let requests = self.core.requests();
        if requests > 0 {
            self.promotions as f64 / requests as f64
        } else {
            0.0
        }
    }

    /// Converts SLRU statistics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        // Segment movement
        metrics.insert("promotions".to_string(), self.promotions as f64);
        metrics.insert("demotions".to_string(), self.demotions as f64);
        metrics.insert("promotion_rate".to_string(), self.promotion_rate());

        // Admission
        metrics.insert("rejections".to_string(), self.rejections as f64);
        metrics.insert("admission_rate".to_string(), self.admission_rate());

        metrics
    }
}

impl Default for SlruPolicyStats {
    fn default() -> Self {
        Self::new(DEFAULT_POLICY_NAME)
    }
}

impl StatsSink for SlruPolicyStats {
    fn record_operation(&mut self) {
        self.core.record_operation();
    }

    fn record_hit(&mut self) {
        self.core.record_hit();
    }

    fn record_miss(&mut self) {
        self.core.record_miss();
    }

    fn record_eviction(&mut self) {
        self.core.record_eviction();
    }

    fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    fn record_demotion(&mut self) {
        self.demotions += 1;
    }

    fn record_rejection(&mut self) {
        self.rejections += 1;
    }

    fn policy_name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl CacheMetrics for SlruPolicyStats {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "SLRU"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name() {
        let stats = SlruPolicyStats::default();
        assert_eq!(stats.name, DEFAULT_POLICY_NAME);
        assert_eq!(stats.algorithm_name(), "SLRU");
    }

    #[test]
    fn test_movement_counters() {
        let mut stats = SlruPolicyStats::new("test");
        stats.record_operation();
        stats.record_hit();
        stats.record_promotion();
        stats.record_demotion();

        assert_eq!(stats.core.hits, 1);
        assert_eq!(stats.promotions, 1);
        assert_eq!(stats.demotions, 1);
        assert_eq!(stats.promotion_rate(), 1.0);
    }

    #[test]
    fn test_admission_rate() {
        let mut stats = SlruPolicyStats::new("test");
        assert_eq!(stats.admission_rate(), 0.0);

        for _ in 0..4 {
            stats.record_eviction();
        }
        stats.record_rejection();
        assert_eq!(stats.admission_rate(), 0.75);
    }

    #[test]
    fn test_metrics_include_core_and_slru_keys() {
        let mut stats = SlruPolicyStats::new("test");
        stats.record_operation();
        stats.record_miss();

        let metrics = stats.metrics();
        assert_eq!(metrics["misses"], 1.0);
        assert_eq!(metrics["miss_rate"], 1.0);
        assert_eq!(metrics["promotions"], 0.0);
        assert!(metrics.contains_key("admission_rate"));
    }
}
