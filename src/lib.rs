/*! # About
A soft heap: an approximate min-priority queue that trades exactness of
`extract_min` for amortized O(log(1/ε)) insert, meld, and extract-min. This
is Kaplan and Zwick's binary-tree reformulation of Chazelle's original
(binomial-tree) soft heap.

# Hierarchies
- [Soft heap](crate::hierarchies::soft_heap): the arena-allocated forest of
  binary trees, the sift repair primitive, and the binomial-style carry
  propagating meld. See the module docs for the full design.
*/

pub mod hierarchies {
    pub mod soft_heap;
}
