extern crate alloc;

use crate::error::InvariantError;
use crate::meta::QueueType;
use alloc::vec::Vec;
use core::fmt;

/// Marks the `prev`/`next` fields of a node that is not linked into any list.
const UNLINKED: usize = usize::MAX;

/// Number of arena slots reserved for sentinel nodes, one per segment.
const SENTINELS: usize = QueueType::ALL.len();

/// Stable handle to a node in the arena.
///
/// Handles stay valid until the node is removed; the slot may then be reused
/// for a later entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    /// Returns the arena slot this handle addresses.
    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.0
    }
}

/// A node in one of the circular segment lists.
///
/// Sentinels and free slots hold no key.
struct Node<K> {
    key: Option<K>,
    queue: QueueType,
    prev: usize,
    next: usize,
}

impl<K> Node<K> {
    fn sentinel(queue: QueueType) -> Self {
        let slot = queue.index();
        Node {
            key: None,
            queue,
            prev: slot,
            next: slot,
        }
    }

    #[inline]
    fn is_linked(&self) -> bool {
        self.prev != UNLINKED
    }
}

/// The probation and protected lists, sharing one slab of nodes.
///
/// Each list is circular and anchored by a sentinel occupying a fixed slot
/// (see [`QueueType::index`]). An empty list is a sentinel linked to itself,
/// so linking and unlinking never need boundary checks. The sentinel's `next`
/// is the head (least recently used) and its `prev` is the tail (most recently
/// used).
///
/// Moving a node between lists only rewrites links; the node keeps its slot
/// and therefore its [`NodeId`].
pub(crate) struct SegmentedList<K> {
    nodes: Vec<Node<K>>,
    free: Vec<usize>,
    lens: [usize; SENTINELS],
}

impl<K> SegmentedList<K> {
    /// Creates two empty lists with room for `capacity` entries before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(SENTINELS));
        for queue in QueueType::ALL {
            nodes.push(Node::sentinel(queue));
        }
        SegmentedList {
            nodes,
            free: Vec::new(),
            lens: [0; SENTINELS],
        }
    }

    /// Returns the number of entries linked into `queue`.
    #[inline]
    pub(crate) fn len(&self, queue: QueueType) -> usize {
        self.lens[queue.index()]
    }

    /// Returns the number of entries linked into either list.
    #[inline]
    pub(crate) fn total_len(&self) -> usize {
        self.lens.iter().sum()
    }

    /// Returns the head (least recently used) node of `queue`, if any.
    pub(crate) fn head(&self, queue: QueueType) -> Option<NodeId> {
        let sentinel = queue.index();
        let next = self.nodes[sentinel].next;
        (next != sentinel).then_some(NodeId(next))
    }

    /// Returns the segment `id` is tagged with.
    #[inline]
    pub(crate) fn queue(&self, id: NodeId) -> QueueType {
        self.nodes[id.0].queue
    }

    /// Returns the key stored at `id`, or `None` for sentinels and free slots.
    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&K> {
        self.nodes.get(id.0).and_then(|node| node.key.as_ref())
    }

    /// Returns the key stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` addresses a sentinel or a free slot.
    pub(crate) fn key(&self, id: NodeId) -> &K {
        match self.get(id) {
            Some(key) => key,
            None => panic!("slot {} holds no entry", id.0),
        }
    }

    /// Allocates a node for `key` and appends it to the tail of `queue`.
    pub(crate) fn push_back(&mut self, queue: QueueType, key: K) -> NodeId {
        let node = Node {
            key: Some(key),
            queue,
            prev: UNLINKED,
            next: UNLINKED,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.link_back(slot, queue);
        NodeId(slot)
    }

    /// Moves `id` to the tail of the list it is already in.
    pub(crate) fn move_to_back(&mut self, id: NodeId) {
        let queue = self.nodes[id.0].queue;
        if self.nodes[queue.index()].prev == id.0 {
            return;
        }
        self.unlink(id.0);
        self.link_back(id.0, queue);
    }

    /// Unlinks `id` from its current list, retags it, and appends it to the tail of `queue`.
    pub(crate) fn transfer_back(&mut self, id: NodeId, queue: QueueType) {
        self.unlink(id.0);
        self.link_back(id.0, queue);
    }

    /// Unlinks `id`, frees its slot and returns the key it held.
    pub(crate) fn remove(&mut self, id: NodeId) -> K {
        self.unlink(id.0);
        let key = match self.nodes[id.0].key.take() {
            Some(key) => key,
            None => panic!("slot {} was linked without a key", id.0),
        };
        self.free.push(id.0);
        key
    }

    /// Iterates the keys of `queue` from head (LRU) to tail (MRU).
    pub(crate) fn keys(&self, queue: QueueType) -> Keys<'_, K> {
        let sentinel = queue.index();
        Keys {
            list: self,
            sentinel,
            cursor: self.nodes[sentinel].next,
        }
    }

    /// Walks both lists and checks link symmetry, tags and cached lengths.
    pub(crate) fn validate(&self) -> Result<(), InvariantError> {
        for queue in QueueType::ALL {
            let sentinel = queue.index();
            let mut prev = sentinel;
            let mut cursor = self.nodes[sentinel].next;
            let mut count = 0;

            while cursor != sentinel {
                let broken = InvariantError::BrokenLink {
                    segment: queue,
                    slot: cursor,
                };
                let node = self.nodes.get(cursor).ok_or(broken.clone())?;
                if node.prev != prev || node.key.is_none() || cursor < SENTINELS {
                    return Err(broken);
                }
                if node.queue != queue {
                    return Err(InvariantError::SegmentTagMismatch {
                        slot: cursor,
                        tagged: node.queue,
                        found: queue,
                    });
                }
                count += 1;
                if count > self.lens[sentinel] {
                    return Err(broken);
                }
                prev = cursor;
                cursor = node.next;
            }

            if self.nodes[sentinel].prev != prev || count != self.lens[sentinel] {
                return Err(InvariantError::BrokenLink {
                    segment: queue,
                    slot: sentinel,
                });
            }
        }
        Ok(())
    }

    fn link_back(&mut self, slot: usize, queue: QueueType) {
        let sentinel = queue.index();
        let tail = self.nodes[sentinel].prev;

        let node = &mut self.nodes[slot];
        node.queue = queue;
        node.prev = tail;
        node.next = sentinel;

        self.nodes[tail].next = slot;
        self.nodes[sentinel].prev = slot;
        self.lens[sentinel] += 1;
    }

    /// Detaches `slot` from its list.
    ///
    /// # Panics
    ///
    /// Unlinking a sentinel or a node that is not linked means the index and
    /// the lists have desynchronized; this is treated as fatal.
    fn unlink(&mut self, slot: usize) {
        let node = &self.nodes[slot];
        assert!(
            slot >= SENTINELS && node.is_linked(),
            "attempted to unlink slot {slot}, which is not a linked entry"
        );
        let (prev, next, queue) = (node.prev, node.next, node.queue);

        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;

        let node = &mut self.nodes[slot];
        node.prev = UNLINKED;
        node.next = UNLINKED;
        self.lens[queue.index()] -= 1;
    }
}

impl<K> fmt::Debug for SegmentedList<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedList")
            .field("probation", &self.len(QueueType::Probation))
            .field("protected", &self.len(QueueType::Protected))
            .field("free_slots", &self.free.len())
            .finish()
    }
}

/// Iterator over the keys of one segment, head to tail.
pub(crate) struct Keys<'a, K> {
    list: &'a SegmentedList<K>,
    sentinel: usize,
    cursor: usize,
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.cursor == self.sentinel {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.next;
        node.key.as_ref()
    }
}

impl<K> fmt::Debug for Keys<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys")
            .field("sentinel", &self.sentinel)
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;

    fn keys<K: Copy>(list: &SegmentedList<K>, queue: QueueType) -> Vec<K> {
        list.keys(queue).copied().collect()
    }

    #[test]
    fn test_empty_lists() {
        let list: SegmentedList<u32> = SegmentedList::with_capacity(4);
        assert_eq!(list.total_len(), 0);
        assert!(list.head(QueueType::Probation).is_none());
        assert!(list.head(QueueType::Protected).is_none());
        assert!(keys(&list, QueueType::Probation).is_empty());
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_push_back_appends_at_tail() {
        let mut list = SegmentedList::with_capacity(4);
        let a = list.push_back(QueueType::Probation, 'a');
        list.push_back(QueueType::Probation, 'b');
        list.push_back(QueueType::Probation, 'c');

        assert_eq!(keys(&list, QueueType::Probation), ['a', 'b', 'c']);
        assert_eq!(list.head(QueueType::Probation), Some(a));
        assert_eq!(list.len(QueueType::Probation), 3);
        assert_eq!(list.len(QueueType::Protected), 0);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_move_to_back() {
        let mut list = SegmentedList::with_capacity(4);
        let a = list.push_back(QueueType::Protected, 1);
        let b = list.push_back(QueueType::Protected, 2);
        let c = list.push_back(QueueType::Protected, 3);

        list.move_to_back(a);
        assert_eq!(keys(&list, QueueType::Protected), [2, 3, 1]);

        // Already at the tail
        list.move_to_back(a);
        assert_eq!(keys(&list, QueueType::Protected), [2, 3, 1]);

        list.move_to_back(c);
        assert_eq!(keys(&list, QueueType::Protected), [2, 1, 3]);
        assert_eq!(list.head(QueueType::Protected), Some(b));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_transfer_back_retags() {
        let mut list = SegmentedList::with_capacity(4);
        let a = list.push_back(QueueType::Probation, 1);
        list.push_back(QueueType::Probation, 2);
        list.push_back(QueueType::Protected, 3);

        list.transfer_back(a, QueueType::Protected);

        assert_eq!(list.queue(a), QueueType::Protected);
        assert_eq!(keys(&list, QueueType::Probation), [2]);
        assert_eq!(keys(&list, QueueType::Protected), [3, 1]);
        assert_eq!(list.total_len(), 3);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_remove_recycles_slot() {
        let mut list = SegmentedList::with_capacity(2);
        let a = list.push_back(QueueType::Probation, 10);
        list.push_back(QueueType::Probation, 20);

        assert_eq!(list.remove(a), 10);
        assert!(list.get(a).is_none());
        assert_eq!(keys(&list, QueueType::Probation), [20]);

        let c = list.push_back(QueueType::Probation, 30);
        assert_eq!(c.slot(), a.slot());
        assert_eq!(list.key(c), &30);
        assert_eq!(keys(&list, QueueType::Probation), [20, 30]);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_remove_last_entry_empties_list() {
        let mut list = SegmentedList::with_capacity(1);
        let a = list.push_back(QueueType::Protected, "only");
        assert_eq!(list.remove(a), "only");
        assert!(list.head(QueueType::Protected).is_none());
        assert_eq!(list.total_len(), 0);
        assert!(list.validate().is_ok());
    }

    #[test]
    #[should_panic(expected = "not a linked entry")]
    fn test_unlink_removed_node_panics() {
        let mut list = SegmentedList::with_capacity(1);
        let a = list.push_back(QueueType::Probation, 1);
        list.remove(a);
        list.transfer_back(a, QueueType::Protected);
    }

    #[test]
    #[should_panic(expected = "not a linked entry")]
    fn test_unlink_sentinel_panics() {
        let mut list: SegmentedList<u8> = SegmentedList::with_capacity(1);
        list.unlink(QueueType::Protected.index());
    }

    #[test]
    fn test_validate_detects_tag_mismatch() {
        let mut list = SegmentedList::with_capacity(2);
        let a = list.push_back(QueueType::Probation, 1);
        list.nodes[a.slot()].queue = QueueType::Protected;

        assert_eq!(
            list.validate(),
            Err(InvariantError::SegmentTagMismatch {
                slot: a.slot(),
                tagged: QueueType::Protected,
                found: QueueType::Probation,
            })
        );
    }

    #[test]
    fn test_validate_detects_length_drift() {
        let mut list = SegmentedList::with_capacity(2);
        list.push_back(QueueType::Probation, 1);
        list.lens[QueueType::Probation.index()] = 2;

        assert!(matches!(
            list.validate(),
            Err(InvariantError::BrokenLink {
                segment: QueueType::Probation,
                ..
            })
        ));
    }
}
