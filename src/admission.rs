//! Admission Strategies
//!
//! When a miss pushes the cache over capacity, the policy picks a victim from
//! its own population and then asks an [`Admittor`] whether the incoming key
//! deserves the slot more than the victim does. The admittor also sees every
//! access so it can keep whatever model it needs (frequency sketches, ghost
//! lists and the like live outside this crate).
//!
//! ```text
//!   record(key) ──▶ admittor.record(&key)          (every access)
//!        │
//!        └─ miss over capacity ──▶ admittor.admit(&candidate, &victim)
//!                                      true  → victim evicted
//!                                      false → candidate evicted
//! ```
//!
//! Two stateless strategies ship with the crate:
//!
//! | Strategy | Decision |
//! |----------|----------|
//! | [`AlwaysAdmit`] | always favors the incoming key (classic SLRU) |
//! | [`RejectAll`] | always keeps the resident victim |
//!
//! # Implementing a strategy
//!
//! ```
//! use slru_policy::admission::Admittor;
//!
//! /// Admits a candidate only if it has been seen at least as often as the victim.
//! #[derive(Debug, Default)]
//! struct CountingAdmittor {
//!     counts: std::collections::HashMap<u64, u32>,
//! }
//!
//! impl Admittor<u64> for CountingAdmittor {
//!     fn record(&mut self, key: &u64) {
//!         *self.counts.entry(*key).or_default() += 1;
//!     }
//!
//!     fn admit(&mut self, candidate: &u64, victim: &u64) -> bool {
//!         let count = |key: &u64| self.counts.get(key).copied().unwrap_or(0);
//!         count(candidate) >= count(victim)
//!     }
//! }
//!
//! let mut admittor = CountingAdmittor::default();
//! admittor.record(&1);
//! admittor.record(&1);
//! admittor.record(&2);
//! assert!(admittor.admit(&1, &2));
//! assert!(!admittor.admit(&2, &1));
//! ```

extern crate alloc;

use alloc::boxed::Box;

/// Capability consulted by the policy on every access and on every
/// over-capacity miss.
///
/// Implementations are called synchronously from inside
/// [`SegmentedLruPolicy::record`](crate::SegmentedLruPolicy::record) and
/// cannot reach back into the policy.
pub trait Admittor<K: ?Sized> {
    /// Notifies the strategy that `key` was accessed, whether it hit or missed.
    fn record(&mut self, key: &K);

    /// Decides whether `candidate` (the key that just missed) should take the
    /// place of `victim` (the entry the policy would otherwise evict).
    ///
    /// Returns `true` to evict the victim, `false` to evict the candidate.
    fn admit(&mut self, candidate: &K, victim: &K) -> bool;
}

/// Admits every candidate; the policy then evicts strictly by recency.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AlwaysAdmit;

impl<K: ?Sized> Admittor<K> for AlwaysAdmit {
    #[inline]
    fn record(&mut self, _key: &K) {}

    #[inline]
    fn admit(&mut self, _candidate: &K, _victim: &K) -> bool {
        true
    }
}

/// Rejects every candidate, so the resident population never changes once full.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RejectAll;

impl<K: ?Sized> Admittor<K> for RejectAll {
    #[inline]
    fn record(&mut self, _key: &K) {}

    #[inline]
    fn admit(&mut self, _candidate: &K, _victim: &K) -> bool {
        false
    }
}

impl<K: ?Sized, A: Admittor<K> + ?Sized> Admittor<K> for &mut A {
    #[inline]
    fn record(&mut self, key: &K) {
        (**self).record(key);
    }

    #[inline]
    fn admit(&mut self, candidate: &K, victim: &K) -> bool {
        (**self).admit(candidate, victim)
    }
}

impl<K: ?Sized, A: Admittor<K> + ?Sized> Admittor<K> for Box<A> {
    #[inline]
    fn record(&mut self, key: &K) {
        (**self).record(key);
    }

    #[inline]
    fn admit(&mut self, candidate: &K, victim: &K) -> bool {
        (**self).admit(candidate, victim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_admit() {
        let mut admittor = AlwaysAdmit;
        Admittor::<u32>::record(&mut admittor, &1);
        assert!(admittor.admit(&1u32, &2u32));
    }

    #[test]
    fn test_reject_all() {
        let mut admittor = RejectAll;
        Admittor::<str>::record(&mut admittor, "a");
        assert!(!admittor.admit("a", "b"));
    }

    #[test]
    fn test_forwarding_impls() {
        let mut inner = RejectAll;
        let mut by_ref: &mut RejectAll = &mut inner;
        assert!(!Admittor::<u8>::admit(&mut by_ref, &1, &2));

        let mut boxed: Box<dyn Admittor<u8>> = Box::new(AlwaysAdmit);
        boxed.record(&3);
        assert!(boxed.admit(&1, &2));
    }
}
