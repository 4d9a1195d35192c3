/*! The public soft heap handle: construction, meld, and extract-min

# About
[`SoftHeap`] is the opaque handle callers get. Every mutator that could
invalidate one of its two input heaps (`insert`, `meld`) consumes `self` by
value and returns the (possibly different) surviving heap, which is how this
crate encodes spec's "after `meld(P, Q)`, neither P nor Q may be used
independently" rule in a way the compiler checks instead of merely
documenting.

# Design
`meld` always keeps the lower-rank heap's forest and folds it into the
higher-rank heap's arenas (see [`node::NodeArena::absorb_into`] /
[`tree::TreeArena::absorb_into`]), then interleaves the root lists
([`tree::merge_into`]) and resolves same-rank collisions with carry
propagation ([`repeated_combine`]), exactly as spec describes for the
binomial-tree-style union. `insert` is `meld` with a freshly made singleton
heap, per spec's note that insert is just a special case of meld.
*/

use super::node::{self, NodeArena};
use super::tree::{self, TreeArena, TreeSlot};
use super::TreeId;

/// Errors a caller can trigger; see spec's distinction between invariant
/// violations (this enum) and internal consistency failures (`debug_assert`s
/// scattered through [`super::node`] and [`super::tree`]).
#[derive(Debug, Clone, PartialEq)]
pub enum SoftHeapError {
    /// `epsilon` was not in `(0, 1)`.
    InvalidEpsilon(f64),
    /// Two heaps' error rates disagreed by more than the ~0.1% tolerance.
    IncompatibleEpsilon { left: f64, right: f64 },
    /// `extract_min`/`extract_min_with_ckey` called on an empty heap.
    EmptyHeap,
}

impl std::fmt::Display for SoftHeapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoftHeapError::InvalidEpsilon(e) => write!(f, "epsilon must be in (0, 1), got {e}"),
            SoftHeapError::IncompatibleEpsilon { left, right } => write!(
                f,
                "cannot meld heaps with incompatible epsilon values ({left} vs {right})"
            ),
            SoftHeapError::EmptyHeap => write!(f, "cannot extract from an empty soft heap"),
        }
    }
}

impl std::error::Error for SoftHeapError {}

/// An approximate min-priority queue. See the [module-level
/// documentation](crate::hierarchies::soft_heap) for the full picture.
#[derive(Debug)]
pub struct SoftHeap<T: Ord + Clone> {
    nodes: NodeArena<T>,
    trees: TreeArena,
    first: Option<TreeId>,
    last: Option<TreeId>,
    /// Rank of the last tree in the root list, or -1 when empty.
    rank: i64,
    epsilon: f64,
    r: u32,
    count: usize,
}

fn validate_epsilon(epsilon: f64) -> Result<(), SoftHeapError> {
    if epsilon > 0.0 && epsilon < 1.0 {
        Ok(())
    } else {
        Err(SoftHeapError::InvalidEpsilon(epsilon))
    }
}

/// `r = max(5, ceil(log2(1/epsilon)) + 5)`. See spec's note on the two
/// conflicting source variants of this formula -- this is the one that
/// actually grows as `epsilon` shrinks, which is the one Kaplan-Zwick
/// requires for the corruption bound to hold.
fn compute_r(epsilon: f64) -> u32 {
    let raw = (1.0 / epsilon).log2().ceil() as i64 + 5;
    raw.max(5) as u32
}

/// Two heaps are compatible for melding if their epsilons agree within a
/// ~0.1% relative tolerance.
fn epsilon_compatible(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(f64::MIN_POSITIVE);
    (a - b).abs() <= 1e-3 * scale
}

impl<T: Ord + Clone> SoftHeap<T> {
    /// Creates an empty heap with the given error rate.
    pub fn new(epsilon: f64) -> Result<Self, SoftHeapError> {
        validate_epsilon(epsilon)?;
        Ok(SoftHeap {
            nodes: NodeArena::new(),
            trees: TreeArena::new(),
            first: None,
            last: None,
            rank: -1,
            epsilon,
            r: compute_r(epsilon),
            count: 0,
        })
    }

    /// Creates a heap containing exactly one element, special-casing the
    /// rank-0 tree directly rather than routing through `meld`.
    pub fn singleton(elem: T, epsilon: f64) -> Result<Self, SoftHeapError> {
        validate_epsilon(epsilon)?;
        let r = compute_r(epsilon);
        Ok(Self::singleton_unchecked(elem, epsilon, r))
    }

    fn singleton_unchecked(elem: T, epsilon: f64, r: u32) -> Self {
        let mut nodes = NodeArena::new();
        let mut trees = TreeArena::new();
        let node_id = nodes.alloc(node::makenode(elem));
        let tree_id = trees.alloc_with(|id| TreeSlot {
            root: node_id,
            rank: 0,
            prev: None,
            next: None,
            sufmin: id,
        });
        let mut first = None;
        let mut last = None;
        tree::insert_tree(&mut first, &mut last, &mut trees, tree_id, None);
        SoftHeap {
            nodes,
            trees,
            first,
            last,
            rank: 0,
            epsilon,
            r,
            count: 1,
        }
    }

    /// `true` if the heap contains no elements.
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// The number of elements currently in the heap (not a spec primitive --
    /// every test scenario in spec's testable-properties section needs it,
    /// and every queue-shaped structure elsewhere in this crate exposes it).
    pub fn len(&self) -> usize {
        self.count
    }

    /// The error rate this heap was created with.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Inserts `elem`, consuming and returning `self` (see module docs on
    /// why melding-style operations move rather than borrow).
    pub fn insert(self, elem: T) -> Self {
        let singleton = Self::singleton_unchecked(elem, self.epsilon, self.r);
        self.meld_with(singleton)
    }

    /// Unions two heaps. Consumes both; the returned heap is the only valid
    /// handle to either forest afterward.
    pub fn meld(self, other: Self) -> Result<Self, SoftHeapError> {
        if !epsilon_compatible(self.epsilon, other.epsilon) {
            return Err(SoftHeapError::IncompatibleEpsilon {
                left: self.epsilon,
                right: other.epsilon,
            });
        }
        Ok(self.meld_with(other))
    }

    /// Core of `meld`/`insert`: fold the lower-rank heap's arenas into the
    /// higher-rank heap's, interleave root lists, then carry-propagate.
    fn meld_with(self, other: Self) -> Self {
        let (low, mut high) = if self.rank <= other.rank {
            (self, other)
        } else {
            (other, self)
        };

        let low_rank = low.rank;
        let low_count = low.count;
        let low_first = low.first;
        let low_nodes = low.nodes;
        let low_trees = low.trees;

        let node_offset = low_nodes.absorb_into(&mut high.nodes);
        let tree_offset = low_trees.absorb_into(&mut high.trees, node_offset);
        let low_first = low_first.map(|id| id.offset(tree_offset));

        high.count += low_count;

        tree::merge_into(&mut high.first, &mut high.last, &mut high.trees, low_first);

        if high.first.is_some() {
            repeated_combine(&mut high, low_rank);
        }

        high
    }

    /// Pops one item from the minimum-`ckey` root, reporting only the
    /// original element.
    pub fn extract_min(&mut self) -> Result<T, SoftHeapError> {
        self.extract_min_with_ckey().map(|(elem, _ckey)| elem)
    }

    /// Pops one item from the minimum-`ckey` root, also reporting the
    /// working key (an upper bound on the element's true original key) it
    /// was traveling under.
    pub fn extract_min_with_ckey(&mut self) -> Result<(T, T), SoftHeapError> {
        let first = self.first.ok_or(SoftHeapError::EmptyHeap)?;
        let t = self.trees.get(first).sufmin;
        let x = self.trees.get(t).root;

        let e = node::extract_elem(&mut self.nodes, x)
            .expect("sufmin always names a tree whose root has a nonempty item list");
        let ckey = self.nodes.get(x).ckey.clone();
        self.count -= 1;

        let half = (self.nodes.get(x).size / 2) as usize;
        if self.nodes.get(x).nelems <= half {
            if !self.nodes.get(x).is_leaf() {
                node::sift(x, &mut self.nodes);
                tree::update_suffix_min(&mut self.trees, &self.nodes, t);
            } else if self.nodes.get(x).nelems == 0 {
                self.nodes.free(x);
                let prev = self.trees.get(t).prev;
                let next = self.trees.get(t).next;
                tree::remove_tree(&mut self.first, &mut self.last, &mut self.trees, t);
                self.trees.free(t);

                if next.is_none() {
                    self.rank = match prev {
                        Some(p) => self.trees.get(p).rank as i64,
                        None => -1,
                    };
                }
                if let Some(p) = prev {
                    tree::update_suffix_min(&mut self.trees, &self.nodes, p);
                }
            }
        }

        Ok((e, ckey))
    }

    /// Deallocates the entire forest. Spelled out as its own method (rather
    /// than relying on the implicit `Drop` at scope exit) because spec's
    /// external-interface table lists `destroy` as an explicit operation --
    /// see `DESIGN.md` for why the arena-owned-by-value layout makes the
    /// "destroy leaks the forest" failure mode spec warns about impossible
    /// to express here.
    pub fn destroy(self) {
        drop(self);
    }
}

/// Walks the root list resolving same-rank collisions left by `merge_into`:
/// combine exactly-two-equal-rank trees, skip over exactly-three (leaving
/// the first of the triple undisturbed so the list stays rank-sorted), and
/// stop advancing once no more carries above `l_rank` are possible.
fn repeated_combine<T: Ord + Clone>(heap: &mut SoftHeap<T>, l_rank: i64) {
    let mut curr = match heap.first {
        Some(c) => c,
        None => return,
    };
    loop {
        let next = match heap.trees.get(curr).next {
            Some(n) => n,
            None => break,
        };
        let c_rank = heap.trees.get(curr).rank;
        let n_rank = heap.trees.get(next).rank;
        let two = c_rank == n_rank;
        let three = two
            && heap
                .trees
                .get(next)
                .next
                .map(|n2| heap.trees.get(n2).rank == c_rank)
                .unwrap_or(false);

        if !two {
            if c_rank as i64 > l_rank {
                break;
            }
            curr = next;
        } else if !three {
            let x = heap.trees.get(curr).root;
            let y = heap.trees.get(next).root;
            let merged = node::combine(x, y, heap.r, &mut heap.nodes);
            heap.trees.get_mut(curr).root = merged;
            heap.trees.get_mut(curr).rank = heap.nodes.get(merged).rank;
            tree::remove_tree(&mut heap.first, &mut heap.last, &mut heap.trees, next);
            heap.trees.free(next);
            // `curr` is left in place: the new carry may match its new successor.
        } else {
            curr = next;
        }
    }

    let curr_rank = heap.trees.get(curr).rank as i64;
    if curr_rank > heap.rank {
        heap.rank = curr_rank;
    }
    tree::update_suffix_min(&mut heap.trees, &heap.nodes, curr);
}
