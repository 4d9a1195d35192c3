/*! The root list: per-tree bookkeeping and rank-sorted splicing

# About
A [`TreeSlot`] is one entry of the soft heap's root list: it names a root
node, the rank that node had when it was placed in the list, its neighbors,
and its `sufmin` -- the tree of minimum root-`ckey` among itself and every
tree after it. `extract_min` always targets `first.sufmin`, so `sufmin` is
what makes extraction a lookup instead of a scan.

# Design
Same arena-plus-free-list idiom as [`super::node::NodeArena`]. Root-list
splicing (`insert_tree`, `remove_tree`, `merge_into`) and `sufmin` repair
(`update_suffix_min`) are kept separate from node-level operations
(`combine`, `sift` in [`super::node`]) because they operate on different
arenas -- trees never reach into another tree's root node except to read its
`ckey` for a `sufmin` comparison.
*/

use super::node::NodeArena;
use super::{NodeId, TreeId};

#[derive(Debug)]
pub(crate) struct TreeSlot {
    pub(crate) root: NodeId,
    pub(crate) rank: u32,
    pub(crate) prev: Option<TreeId>,
    pub(crate) next: Option<TreeId>,
    pub(crate) sufmin: TreeId,
}

/// Arena of root-list entries belonging to a single [`super::heap::SoftHeap`].
#[derive(Debug)]
pub(crate) struct TreeArena {
    slots: Vec<TreeSlot>,
    free_list: Vec<usize>,
}

impl TreeArena {
    pub(crate) fn new() -> Self {
        TreeArena {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Allocates a slot built by `make`, which is handed the id the slot
    /// will occupy -- needed because a fresh tree's `sufmin` starts out
    /// pointing at itself.
    pub(crate) fn alloc_with(&mut self, make: impl FnOnce(TreeId) -> TreeSlot) -> TreeId {
        if let Some(idx) = self.free_list.pop() {
            let id = TreeId(idx);
            self.slots[idx] = make(id);
            id
        } else {
            let id = TreeId(self.slots.len());
            self.slots.push(make(id));
            id
        }
    }

    pub(crate) fn free(&mut self, id: TreeId) {
        self.free_list.push(id.0);
    }

    pub(crate) fn get(&self, id: TreeId) -> &TreeSlot {
        &self.slots[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: TreeId) -> &mut TreeSlot {
        &mut self.slots[id.0]
    }

    /// Moves every tree owned by `self` into `dst`; `node_offset` is the
    /// shift already applied when the corresponding node arena was folded
    /// in, so `root` fields land on the right nodes. Returns the shift
    /// applied to this arena's own ids, for the caller to apply to any
    /// `TreeId` (e.g. a saved `first`) it is still holding onto.
    pub(crate) fn absorb_into(mut self, dst: &mut TreeArena, node_offset: usize) -> usize {
        let tree_offset = dst.slots.len();
        for idx in self.free_list.drain(..) {
            dst.free_list.push(idx + tree_offset);
        }
        for mut slot in self.slots.drain(..) {
            slot.root = slot.root.offset(node_offset);
            slot.prev = slot.prev.map(|id| id.offset(tree_offset));
            slot.next = slot.next.map(|id| id.offset(tree_offset));
            slot.sufmin = slot.sufmin.offset(tree_offset);
            dst.slots.push(slot);
        }
        tree_offset
    }
}

/// Splices `inserted` immediately before `successor`, or onto the tail of
/// the list if `successor` is `None`.
pub(crate) fn insert_tree(
    first: &mut Option<TreeId>,
    last: &mut Option<TreeId>,
    trees: &mut TreeArena,
    inserted: TreeId,
    successor: Option<TreeId>,
) {
    match successor {
        Some(succ) => {
            let prev = trees.get(succ).prev;
            trees.get_mut(inserted).prev = prev;
            trees.get_mut(inserted).next = Some(succ);
            trees.get_mut(succ).prev = Some(inserted);
            match prev {
                Some(p) => trees.get_mut(p).next = Some(inserted),
                None => *first = Some(inserted),
            }
        }
        None => {
            trees.get_mut(inserted).prev = *last;
            trees.get_mut(inserted).next = None;
            match *last {
                Some(l) => trees.get_mut(l).next = Some(inserted),
                None => *first = Some(inserted),
            }
            *last = Some(inserted);
        }
    }
}

/// Unlinks `removed` from the list. Does not free its arena slot -- the
/// caller decides when the tree itself is actually gone.
pub(crate) fn remove_tree(
    first: &mut Option<TreeId>,
    last: &mut Option<TreeId>,
    trees: &mut TreeArena,
    removed: TreeId,
) {
    let (prev, next) = {
        let t = trees.get(removed);
        (t.prev, t.next)
    };
    match prev {
        Some(p) => trees.get_mut(p).next = next,
        None => *first = next,
    }
    match next {
        Some(n) => trees.get_mut(n).prev = prev,
        None => *last = prev,
    }
}

/// Walks backward from `from` to the head of the list, recomputing
/// `sufmin` at each stop from its (already correct) successor's `sufmin`.
pub(crate) fn update_suffix_min<T: Ord>(trees: &mut TreeArena, nodes: &NodeArena<T>, from: TreeId) {
    let mut cur = Some(from);
    while let Some(id) = cur {
        let next = trees.get(id).next;
        let sufmin = match next {
            None => id,
            Some(n) => {
                let own = &nodes.get(trees.get(id).root).ckey;
                let next_sufmin = trees.get(n).sufmin;
                let next_min = &nodes.get(trees.get(next_sufmin).root).ckey;
                if *own <= *next_min {
                    id
                } else {
                    next_sufmin
                }
            }
        };
        trees.get_mut(id).sufmin = sufmin;
        cur = trees.get(id).prev;
    }
}

/// Interleaves the trees reachable from `l_first` into the rank-sorted list
/// anchored at `first`/`last`, preserving sort order. Up to three trees may
/// share a rank afterward; `repeated_combine` resolves that.
pub(crate) fn merge_into(
    first: &mut Option<TreeId>,
    last: &mut Option<TreeId>,
    trees: &mut TreeArena,
    l_first: Option<TreeId>,
) {
    let mut h_cursor = *first;
    let mut l_cursor = l_first;
    while let Some(l_id) = l_cursor {
        let l_next = trees.get(l_id).next;
        let l_rank = trees.get(l_id).rank;
        while let Some(h_id) = h_cursor {
            if trees.get(h_id).rank >= l_rank {
                break;
            }
            h_cursor = trees.get(h_id).next;
        }
        insert_tree(first, last, trees, l_id, h_cursor);
        l_cursor = l_next;
    }
}
