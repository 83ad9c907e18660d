use crate::callback::Comparator;
use crate::entry::Entry;
use crate::splay_tree::arena::{Arena, NodeId, SlotsMut};
use crate::splay_tree::node::{Node, Side};
use log::trace;
use std::cmp::Ordering;
use std::mem;
use std::ops::Index;

/// Outcome of walking down from the root towards a key. `parent` is the node whose child slot on
/// the given side holds the match (or would hold it), or `None` at the root.
pub enum Search {
    Found {
        node: NodeId,
        parent: Option<(NodeId, Side)>,
    },
    Vacant {
        parent: Option<(NodeId, Side)>,
    },
}

pub struct Tree<T, U> {
    arena: Arena<Node<T, U>>,
    root: Option<NodeId>,
}

impl<T, U> Tree<T, U> {
    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Walks from the root towards `key`. When `path` is given, every visited node is pushed onto
    /// it, so on a match its last element is the matched node.
    pub fn descend(
        &self,
        cmp: &dyn Comparator<T>,
        key: &T,
        mut path: Option<&mut Vec<NodeId>>,
    ) -> Search {
        let mut parent = None;
        let mut curr = self.root;
        while let Some(id) = curr {
            if let Some(path) = path.as_mut() {
                path.push(id);
            }
            let node = &self.arena[id];
            let side = match cmp.compare(key, &node.entry.key) {
                Ordering::Equal => return Search::Found { node: id, parent },
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            parent = Some((id, side));
            curr = node.child(side);
        }
        Search::Vacant { parent }
    }

    /// Inserts a key-value pair without splaying. If the key already exists, only its entry is
    /// swapped and the previous entry is returned; the node keeps its position and children.
    pub fn insert(&mut self, cmp: &dyn Comparator<T>, key: T, value: U) -> Option<Entry<T, U>> {
        match self.descend(cmp, &key, None) {
            Search::Found { node, .. } => {
                trace!("replacing entry of node {}", node.index());
                Some(mem::replace(&mut self.arena[node].entry, Entry::new(key, value)))
            },
            Search::Vacant { parent } => {
                let id = self.arena.allocate(Node::new(key, value));
                match parent {
                    Some((parent, side)) => {
                        self.arena[parent].set_child(side, Some(id));
                    },
                    None => self.root = Some(id),
                }
                None
            },
        }
    }

    /// Looks up `key` and, on a hit, splays its node to the root. A miss leaves the tree as is.
    pub fn access(&mut self, cmp: &dyn Comparator<T>, key: &T) -> Option<NodeId> {
        let mut path = Vec::new();
        match self.descend(cmp, key, Some(&mut path)) {
            Search::Found { node, .. } => {
                self.splay(path);
                Some(node)
            },
            Search::Vacant { .. } => None,
        }
    }

    /// Looks up `key` without restructuring the tree.
    pub fn peek(&self, cmp: &dyn Comparator<T>, key: &T) -> Option<&Entry<T, U>> {
        match self.descend(cmp, key, None) {
            Search::Found { node, .. } => Some(&self.arena[node].entry),
            Search::Vacant { .. } => None,
        }
    }

    pub fn entry(&self, id: NodeId) -> &Entry<T, U> {
        &self.arena[id].entry
    }

    pub fn entry_mut(&mut self, id: NodeId) -> &mut Entry<T, U> {
        &mut self.arena[id].entry
    }

    /// Promotes the last node of `path` to the root. `path` must be the chain of nodes from the
    /// root down to that node, as recorded by `descend`.
    fn splay(&mut self, mut path: Vec<NodeId>) {
        let target = match path.pop() {
            Some(target) => target,
            None => return,
        };
        let mut rotations = 0;
        while let Some(parent) = path.pop() {
            match path.pop() {
                // zig
                None => {
                    self.rotate(target, parent, None);
                    rotations += 1;
                },
                Some(grandparent) => {
                    let above = path.last().cloned();
                    if self.side_of(parent, target) == self.side_of(grandparent, parent) {
                        // zig-zig
                        self.rotate(parent, grandparent, above);
                        self.rotate(target, parent, above);
                    } else {
                        // zig-zag
                        self.rotate(target, parent, Some(grandparent));
                        self.rotate(target, grandparent, above);
                    }
                    rotations += 2;
                },
            }
        }
        debug_assert_eq!(self.root, Some(target));
        trace!("splayed node {} to the root with {} rotations", target.index(), rotations);
    }

    fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        let node = &self.arena[parent];
        if node.left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(node.right, Some(child));
            Side::Right
        }
    }

    /// Rotates `pivot` above its parent `demoted`. The subtree of `pivot` facing `demoted` moves
    /// across to `demoted`, and `pivot` takes the place of `demoted` under `above`, or at the root
    /// when there is no `above`.
    fn rotate(&mut self, pivot: NodeId, demoted: NodeId, above: Option<NodeId>) {
        let side = self.side_of(demoted, pivot);
        let inner = self.arena[pivot].child(side.opposite());
        self.arena[demoted].set_child(side, inner);
        self.arena[pivot].set_child(side.opposite(), Some(demoted));
        match above {
            Some(above) => {
                let side = self.side_of(above, demoted);
                self.arena[above].set_child(side, Some(pivot));
            },
            None => self.root = Some(pivot),
        }
    }

    /// Unlinks the node holding `key` and returns its entry. The left subtree takes the node's
    /// place; the right subtree is hung under the left subtree's root, and that root's former
    /// right subtree is re-grafted below it. Does not splay.
    pub fn remove(&mut self, cmp: &dyn Comparator<T>, key: &T) -> Option<Entry<T, U>> {
        let (node, parent) = match self.descend(cmp, key, None) {
            Search::Found { node, parent } => (node, parent),
            Search::Vacant { .. } => return None,
        };
        let left = self.arena[node].left;
        let right = self.arena[node].right;

        let replacement = left.or(right);
        match parent {
            Some((parent, side)) => {
                self.arena[parent].set_child(side, replacement);
            },
            None => self.root = replacement,
        }

        if let Some(left) = left {
            if let Some(orphan) = self.arena[left].set_child(Side::Right, right) {
                self.graft(cmp, left, orphan);
            }
        }

        Some(self.arena.free(node).entry)
    }

    /// Attaches the subtree rooted at `orphan` at the first empty slot found by descending from
    /// `from` with the orphan's key.
    fn graft(&mut self, cmp: &dyn Comparator<T>, from: NodeId, orphan: NodeId) {
        let mut curr = from;
        let mut depth = 0;
        loop {
            let ordering = cmp.compare(&self.arena[orphan].entry.key, &self.arena[curr].entry.key);
            let side = match ordering {
                Ordering::Less => Side::Left,
                _ => Side::Right,
            };
            match self.arena[curr].child(side) {
                Some(next) => {
                    curr = next;
                    depth += 1;
                },
                None => {
                    self.arena[curr].set_child(side, Some(orphan));
                    trace!(
                        "grafted orphan node {} at depth {} below node {}",
                        orphan.index(),
                        depth,
                        from.index(),
                    );
                    return;
                },
            }
        }
    }

    pub fn min(&self) -> Option<&Entry<T, U>> {
        self.extreme(Side::Left)
    }

    pub fn max(&self) -> Option<&Entry<T, U>> {
        self.extreme(Side::Right)
    }

    fn extreme(&self, side: Side) -> Option<&Entry<T, U>> {
        let mut curr = self.root?;
        while let Some(next) = self.arena[curr].child(side) {
            curr = next;
        }
        Some(&self.arena[curr].entry)
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    pub fn floor(&self, cmp: &dyn Comparator<T>, key: &T) -> Option<&Entry<T, U>> {
        self.bound(cmp, key, Ordering::Greater)
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    pub fn ceil(&self, cmp: &dyn Comparator<T>, key: &T) -> Option<&Entry<T, U>> {
        self.bound(cmp, key, Ordering::Less)
    }

    // Remembers every node where `key` compares as `toward` and keeps the deepest one.
    fn bound(&self, cmp: &dyn Comparator<T>, key: &T, toward: Ordering) -> Option<&Entry<T, U>> {
        let mut best = None;
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            let ordering = cmp.compare(key, &node.entry.key);
            if ordering == Ordering::Equal {
                return Some(&node.entry);
            }
            if ordering == toward {
                best = Some(&node.entry);
            }
            curr = match ordering {
                Ordering::Less => node.left,
                _ => node.right,
            };
        }
        best
    }

    /// Frees every node, handing each entry to `release`, and returns how many were freed. Uses
    /// an explicit stack so degenerate trees do not exhaust the call stack.
    pub fn drain<F>(&mut self, mut release: F) -> usize
    where
        F: FnMut(Entry<T, U>),
    {
        let mut stack: Vec<NodeId> = self.root.take().into_iter().collect();
        let mut drained = 0;
        while let Some(id) = stack.pop() {
            let Node { entry, left, right } = self.arena.free(id);
            stack.extend(left);
            stack.extend(right);
            release(entry);
            drained += 1;
        }
        self.arena.clear();
        drained
    }

    /// Frees a single node without relinking anything. Only for consumers that own the tree and
    /// never revisit the node's parent.
    pub fn free_node(&mut self, id: NodeId) -> Node<T, U> {
        self.arena.free(id)
    }

    /// Borrows the nodes for handing out disjoint mutable references by id.
    pub fn nodes_mut(&mut self) -> SlotsMut<Node<T, U>> {
        self.arena.slots_mut()
    }
}

impl<T, U> Index<NodeId> for Tree<T, U> {
    type Output = Node<T, U>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.arena[id]
    }
}
