//! Segmented Least Recently Used (SLRU) Policy Engine
//!
//! SLRU splits a fixed-capacity cache into a **probation** segment for keys
//! seen once and a **protected** segment for keys seen at least twice. This
//! engine replays a trace of keys against that structure and reports hits,
//! misses and evictions to a stats sink; no values are stored.
//!
//! > "Segmented LRU is based on the observation that objects with at least two
//! > accesses are much more popular than those with only one access during a
//! > short interval."
//! > (Cheng & Kambayashi, *LRU-SP: A Size-Adjusted and Popularity-Aware LRU
//! > Replacement Algorithm for Web Caching*)
//!
//! # How the Algorithm Works
//!
//! ## Segment Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                            SegmentedLruPolicy                               │
//! │                                                                             │
//! │  index: HashMap<K, NodeId>  ───────────────┐                                │
//! │                                            ▼                                │
//! │  ┌─────────────────────────────────────────────────────────────────────┐    │
//! │  │ PROTECTED (≤ max_protected)                                         │    │
//! │  │   [S] ⇄ LRU [p1] ⇄ [p2] ⇄ ... ⇄ [pn] MRU ⇄ [S]                       │    │
//! │  └─────────────────────────────────────────────────────────────────────┘    │
//! │          │ overflow: head demoted to probation MRU         ▲ 2nd access     │
//! │          ▼                                                 │                │
//! │  ┌─────────────────────────────────────────────────────────────────────┐    │
//! │  │ PROBATION                                                           │    │
//! │  │   [S] ⇄ LRU [q1] ⇄ [q2] ⇄ ... ⇄ [qn] MRU ⇄ [S]                       │    │
//! │  └─────────────────────────────────────────────────────────────────────┘    │
//! │          │ victim (head)                                   ▲ miss           │
//! │          ▼                                                 │                │
//! │     admittor.admit(candidate, victim)                  new keys             │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `[S]` is a sentinel node; each segment is a circular list around it.
//!
//! ## Per-Access State Machine
//!
//! | State of key | Action | Reported |
//! |--------------|--------|----------|
//! | not resident | append to probation tail, then eviction check | miss |
//! | probation | promote to protected tail (demote protected head on overflow) | hit |
//! | protected | move to protected tail | hit |
//!
//! ## Admission-Gated Eviction
//!
//! A miss that leaves more than `maximum_size` keys resident selects the
//! probation head as victim and asks the [`Admittor`] whether the incoming key
//! should replace it. If not, the incoming key itself is evicted. Either way
//! exactly one key leaves and one eviction is reported.
//!
//! ## Degraded Mode
//!
//! With `max_protected == 0` nothing is ever promoted. Repeat accesses refresh
//! the key inside probation, which then behaves as a single plain LRU list.
//!
//! # Performance Characteristics
//!
//! | Metric | Value |
//! |--------|-------|
//! | `record` | O(1) |
//! | Memory per key | key × 2 + node (two slot indices, tag) + index bucket |
//!
//! # Thread Safety
//!
//! `SegmentedLruPolicy` is single-threaded. Every call runs to completion and
//! the admittor and sink are invoked synchronously.
//!
//! # Examples
//!
//! ```
//! use slru_policy::admission::AlwaysAdmit;
//! use slru_policy::config::SegmentedLruConfig;
//! use slru_policy::meta::QueueType;
//! use slru_policy::SegmentedLruPolicy;
//! use core::num::NonZeroUsize;
//!
//! let config = SegmentedLruConfig::new(NonZeroUsize::new(2).unwrap(), 0.5);
//! let mut policy = SegmentedLruPolicy::new(config, AlwaysAdmit);
//!
//! policy.record("a"); // miss, probation
//! policy.record("a"); // hit, promoted
//! policy.record("b"); // miss, probation
//! policy.record("c"); // miss, evicts "b" from probation
//!
//! assert_eq!(policy.segment_of(&"a"), Some(QueueType::Protected));
//! assert!(!policy.contains(&"b"));
//! assert_eq!(policy.stats().core.evictions, 1);
//! ```

extern crate alloc;

use crate::admission::Admittor;
use crate::config::SegmentedLruConfig;
use crate::error::{ConfigError, InvariantError};
use crate::list::{NodeId, SegmentedList};
use crate::meta::QueueType;
use crate::metrics::slru::DEFAULT_POLICY_NAME;
use crate::metrics::{SlruPolicyStats, StatsSink};
use crate::traits::Policy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use tracing::{debug, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Upper bound on the slots reserved at construction.
const PREALLOCATE_LIMIT: usize = 1 << 12;

/// Segmented LRU replacement policy driven one key at a time.
///
/// Generic over the key type `K`, the admission strategy `A` and the stats
/// sink `S`. Keys are cloned once on a miss: one copy lives in the index, the
/// other in the list node.
pub struct SegmentedLruPolicy<K, A, S = SlruPolicyStats> {
    /// Key to node handle; membership equals the union of both segments.
    data: HashMap<K, NodeId, DefaultHashBuilder>,

    /// Probation and protected lists.
    lists: SegmentedList<K>,

    admittor: A,
    stats: S,

    maximum_size: usize,
    max_protected: usize,

    /// Protected occupancy, adjusted on every promotion and demotion.
    size_protected: usize,
}

impl<K, A> SegmentedLruPolicy<K, A>
where
    K: Hash + Eq + Clone,
    A: Admittor<K>,
{
    /// Creates a policy reporting into a fresh [`SlruPolicyStats`].
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid; see [`try_new`](Self::try_new).
    pub fn new(config: SegmentedLruConfig, admittor: A) -> Self {
        Self::with_stats(config, admittor, SlruPolicyStats::default())
    }

    /// Creates a policy reporting into a fresh [`SlruPolicyStats`], rejecting
    /// an invalid configuration.
    pub fn try_new(config: SegmentedLruConfig, admittor: A) -> Result<Self, ConfigError> {
        Self::try_with_stats(config, admittor, SlruPolicyStats::default())
    }
}

impl<K, A, S> SegmentedLruPolicy<K, A, S>
where
    K: Hash + Eq + Clone,
    A: Admittor<K>,
    S: StatsSink,
{
    /// Creates a policy reporting into `stats`.
    ///
    /// # Panics
    ///
    /// Panics if `percent_protected` is not a finite fraction in `[0, 1]`.
    pub fn with_stats(config: SegmentedLruConfig, admittor: A, stats: S) -> Self {
        match Self::try_with_stats(config, admittor, stats) {
            Ok(policy) => policy,
            Err(err) => panic!("invalid SLRU configuration: {err}"),
        }
    }

    /// Creates a policy reporting into `stats`, rejecting an invalid configuration.
    pub fn try_with_stats(
        config: SegmentedLruConfig,
        admittor: A,
        stats: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let maximum_size = config.maximum_size.get();
        let max_protected = config.max_protected();
        debug!(
            maximum_size,
            max_protected,
            percent_protected = config.percent_protected,
            "created segmented LRU policy"
        );

        // One extra slot for the entry admitted before the eviction decision.
        // Large capacities grow on demand instead of reserving up front.
        let slots = maximum_size.saturating_add(1).min(PREALLOCATE_LIMIT);
        Ok(SegmentedLruPolicy {
            data: HashMap::with_capacity_and_hasher(slots, DefaultHashBuilder::default()),
            lists: SegmentedList::with_capacity(slots),
            admittor,
            stats,
            maximum_size,
            max_protected,
            size_protected: 0,
        })
    }

    /// Records an access to `key`.
    ///
    /// Reports one operation and exactly one of hit or miss to the stats sink,
    /// plus at most one eviction on a miss. The admittor sees every access.
    pub fn record(&mut self, key: K) {
        self.stats.record_operation();
        let node = self.data.get(&key).copied();
        self.admittor.record(&key);
        match node {
            Some(node) => self.on_hit(node),
            None => self.on_miss(key),
        }
    }

    fn on_hit(&mut self, node: NodeId) {
        if self.lists.queue(node) == QueueType::Protected || self.max_protected == 0 {
            self.lists.move_to_back(node);
        } else {
            self.size_protected += 1;
            if self.size_protected > self.max_protected {
                self.demote_protected_head();
                self.size_protected -= 1;
            }
            self.lists.transfer_back(node, QueueType::Protected);
            self.stats.record_promotion();
            trace!(
                slot = node.slot(),
                size_protected = self.size_protected,
                "promoted to protected"
            );
        }
        self.stats.record_hit();
    }

    /// Spills the protected head to the probation tail, keeping its recency credit.
    fn demote_protected_head(&mut self) {
        let demote = self
            .lists
            .head(QueueType::Protected)
            .expect("protected segment exceeded its bound while empty");
        self.lists.transfer_back(demote, QueueType::Probation);
        self.stats.record_demotion();
        trace!(slot = demote.slot(), "demoted to probation");
    }

    fn on_miss(&mut self, key: K) {
        let node = self.lists.push_back(QueueType::Probation, key.clone());
        self.data.insert(key, node);
        self.stats.record_miss();
        self.evict(node);
    }

    fn evict(&mut self, candidate: NodeId) {
        if self.data.len() <= self.maximum_size {
            return;
        }

        let victim = if self.max_protected == 0 {
            // degrade to LRU: protected is never populated, so this reaches the probation head
            self.lists
                .head(QueueType::Protected)
                .or_else(|| self.lists.head(QueueType::Probation))
        } else {
            self.lists.head(QueueType::Probation)
        };
        let victim = victim.expect("over-capacity policy has no eviction victim");
        self.stats.record_eviction();

        let admit = self
            .admittor
            .admit(self.lists.key(candidate), self.lists.key(victim));
        if admit {
            trace!(slot = victim.slot(), "evicted victim");
            self.evict_entry(victim);
        } else {
            trace!(slot = candidate.slot(), "rejected candidate");
            self.stats.record_rejection();
            self.evict_entry(candidate);
        }
    }

    fn evict_entry(&mut self, node: NodeId) {
        if self.lists.queue(node) == QueueType::Protected {
            self.size_protected -= 1;
        }
        let key = self.lists.remove(node);
        self.data.remove(&key);
    }
}

impl<K, A, S> SegmentedLruPolicy<K, A, S>
where
    K: Hash + Eq,
{
    /// Returns the number of resident keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no key is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the configured total capacity.
    #[inline]
    pub fn maximum_size(&self) -> usize {
        self.maximum_size
    }

    /// Returns the protected segment bound derived from the configuration.
    #[inline]
    pub fn max_protected(&self) -> usize {
        self.max_protected
    }

    /// Returns the number of keys in the protected segment.
    #[inline]
    pub fn protected_len(&self) -> usize {
        self.size_protected
    }

    /// Returns the number of keys in the probation segment.
    #[inline]
    pub fn probation_len(&self) -> usize {
        self.lists.len(QueueType::Probation)
    }

    /// Returns `true` if `key` is resident. Does not count as an access.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.data.contains_key(key)
    }

    /// Returns the segment `key` currently resides in, if resident.
    pub fn segment_of<Q>(&self, key: &Q) -> Option<QueueType>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.data.get(key).map(|&node| self.lists.queue(node))
    }

    /// Iterates probation keys from least to most recently used.
    pub fn probation_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.lists.keys(QueueType::Probation)
    }

    /// Iterates protected keys from least to most recently used.
    pub fn protected_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.lists.keys(QueueType::Protected)
    }

    /// Returns the stats sink.
    #[inline]
    pub fn stats(&self) -> &S {
        &self.stats
    }

    /// Returns the stats sink mutably.
    #[inline]
    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    /// Returns the admission strategy.
    #[inline]
    pub fn admittor(&self) -> &A {
        &self.admittor
    }

    /// Consumes the policy and hands back its collaborators.
    pub fn into_parts(self) -> (A, S) {
        (self.admittor, self.stats)
    }

    /// Verifies that the index, both segment lists and the protected counter
    /// agree, and that both capacity bounds hold. Runs in O(n).
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.lists.validate()?;

        let segments = self.lists.total_len();
        if self.data.len() != segments {
            return Err(InvariantError::IndexSizeMismatch {
                index: self.data.len(),
                segments,
            });
        }
        for (key, &node) in &self.data {
            if self.lists.get(node) != Some(key) {
                return Err(InvariantError::DanglingIndex { slot: node.slot() });
            }
        }

        let actual = self.lists.len(QueueType::Protected);
        if self.size_protected != actual {
            return Err(InvariantError::ProtectedSizeMismatch {
                counter: self.size_protected,
                actual,
            });
        }
        if segments > self.maximum_size {
            return Err(InvariantError::CapacityExceeded {
                len: segments,
                maximum: self.maximum_size,
            });
        }
        if self.size_protected > self.max_protected {
            return Err(InvariantError::ProtectedCapacityExceeded {
                len: self.size_protected,
                maximum: self.max_protected,
            });
        }
        Ok(())
    }
}

impl<K, A, S> Policy<K> for SegmentedLruPolicy<K, A, S>
where
    K: Hash + Eq + Clone,
    A: Admittor<K>,
    S: StatsSink,
{
    type Stats = S;

    fn record(&mut self, key: K) {
        SegmentedLruPolicy::record(self, key);
    }

    fn stats(&self) -> &S {
        &self.stats
    }

    fn name(&self) -> &str {
        self.stats.policy_name().unwrap_or(DEFAULT_POLICY_NAME)
    }

    fn finished(&mut self) {
        debug!(
            resident = self.data.len(),
            protected = self.size_protected,
            probation = self.lists.len(QueueType::Probation),
            "trace finished"
        );
    }
}

// Manual Debug: keys, admittor and sink need not be Debug
impl<K, A, S> fmt::Debug for SegmentedLruPolicy<K, A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedLruPolicy")
            .field("maximum_size", &self.maximum_size)
            .field("max_protected", &self.max_protected)
            .field("size_protected", &self.size_protected)
            .field("len", &self.data.len())
            .field("lists", &self.lists)
            .finish()
    }
}
