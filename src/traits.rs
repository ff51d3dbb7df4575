//! Driver-facing policy interface.
//!
//! A trace driver owns a policy, feeds it keys in trace order and reads the
//! statistics back when the trace is exhausted:
//!
//! ```text
//!   for key in trace ──▶ policy.record(key)
//!   end of trace     ──▶ policy.finished()
//!   report           ──▶ policy.stats()
//! ```
//!
//! # Example
//!
//! ```
//! use slru_policy::admission::AlwaysAdmit;
//! use slru_policy::config::SegmentedLruConfig;
//! use slru_policy::traits::Policy;
//! use slru_policy::SegmentedLruPolicy;
//! use core::num::NonZeroUsize;
//!
//! let config = SegmentedLruConfig::new(NonZeroUsize::new(2).unwrap(), 0.5);
//! let mut policy = SegmentedLruPolicy::new(config, AlwaysAdmit);
//!
//! policy.record_all(["a", "a", "b", "c"]);
//!
//! let stats = policy.stats();
//! assert_eq!(stats.core.hits, 1);
//! assert_eq!(stats.core.misses, 3);
//! assert_eq!(stats.core.evictions, 1);
//! ```

/// A replacement policy that can be replayed against a trace of keys.
pub trait Policy<K> {
    /// Statistics type the policy reports into.
    type Stats;

    /// Processes one access. Never fails.
    fn record(&mut self, key: K);

    /// Returns the statistics gathered so far.
    fn stats(&self) -> &Self::Stats;

    /// Name the policy reports under.
    fn name(&self) -> &str;

    /// Called once after the last access of a trace.
    fn finished(&mut self) {}

    /// Replays `trace` in order, then calls [`finished`](Self::finished).
    fn record_all<I>(&mut self, trace: I)
    where
        I: IntoIterator<Item = K>,
        Self: Sized,
    {
        for key in trace {
            self.record(key);
        }
        self.finished();
    }
}
