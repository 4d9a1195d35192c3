/*! A soft heap: an approximate min-priority queue

# About
A soft heap trades exactness of `extract_min` for amortized O(log(1/ε))
insert, meld, and extract-min, where ε ∈ (0,1) is fixed when the heap is
created. In exchange for that speed, a bounded fraction of the elements
currently in the heap may be "corrupted" -- reported under a *working key*
(`ckey`) that is larger than the key they were actually inserted with. Across
any sequence of operations containing n inserts, at most `⌊εn⌋` elements are
corrupted at once. This is Kaplan and Zwick's binary-tree reformulation of
Chazelle's original (binomial-tree) soft heap.

Nothing about this structure makes it a drop-in replacement for an exact
binary heap: if you need exact ordering, decrease-key, or delete-by-handle,
reach for one of those instead. This one is for algorithms that only need an
approximately-sorted stream cheaply -- Chazelle's own motivating use case is
a near-linear-time MST algorithm.

# Design
The forest lives in two arenas owned by the [`SoftHeap`]: one for tree nodes
([`node::NodeArena`]), one for the root list's per-tree bookkeeping
([`tree::TreeArena`]). Both follow a free-list-recycling arena idiom, with
ids standing in for pointers. `meld` consumes both input
heaps by value and folds the smaller heap's arenas into the surviving one
(see [`node::NodeArena::absorb_into`] and [`tree::TreeArena::absorb_into`]),
so there is never a dangling cross-heap reference to worry about -- the
compiler's move semantics enforce what other languages would have to
document as "do not touch the non-returned input again."

# Example
```
use soft_heap::hierarchies::soft_heap::SoftHeap;

let mut heap = SoftHeap::singleton(5, 0.1).unwrap();
heap = heap.insert(3);
heap = heap.insert(8);
assert_eq!(heap.len(), 3);
assert_eq!(heap.extract_min().unwrap(), 3);
```
*/

mod heap;
mod node;
mod tree;

pub use heap::{SoftHeap, SoftHeapError};

/// Index into a [`node::NodeArena`]. Stands in for an owning pointer to a
/// tree node; see the module design note on arena-plus-index forests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

impl NodeId {
    fn offset(self, by: usize) -> NodeId {
        NodeId(self.0 + by)
    }
}

/// Index into a [`tree::TreeArena`]. Stands in for a tree's position in the
/// root list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TreeId(usize);

impl TreeId {
    fn offset(self, by: usize) -> TreeId {
        TreeId(self.0 + by)
    }
}
