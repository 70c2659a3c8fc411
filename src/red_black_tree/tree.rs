use crate::arena::Arena;
use crate::entry::Entry;
use crate::red_black_tree::node::{Color, Node, NIL};
use crate::red_black_tree::{Error, Result};
use std::cmp::Ordering;

/// A red-black tree over arena-allocated nodes.
///
/// The arena owns every node; all links between nodes are plain arena indices. Index `NIL` holds
/// the shared sentinel that stands in for every missing child and for the root of an empty tree,
/// so color and child inspections are branch-free. A parent index is a back-reference used only
/// for rebalancing and confers no ownership.
///
/// The tree maintains the red-black invariants after every public operation: every node is red or
/// black, the root and the sentinel are black, a red node has no red child, every path from a node
/// to a descendant sentinel passes through the same number of black nodes, and the keys are in
/// strict binary-search-tree order.
pub struct RedBlackTree<T, U> {
    arena: Arena<Node<T, U>>,
    root: usize,
    len: usize,
}

impl<T, U> RedBlackTree<T, U> {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let sentinel = arena.allocate(Node::sentinel());
        debug_assert_eq!(sentinel, NIL);
        RedBlackTree {
            arena,
            root: NIL,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every node and reinstates a fresh sentinel. All node indices are invalidated.
    pub fn clear(&mut self) {
        self.arena.clear();
        let sentinel = self.arena.allocate(Node::sentinel());
        debug_assert_eq!(sentinel, NIL);
        self.root = NIL;
        self.len = 0;
    }

    fn color(&self, node: usize) -> Color {
        self.arena[node].color
    }

    fn set_color(&mut self, node: usize, color: Color) {
        self.arena[node].color = color;
    }

    fn parent(&self, node: usize) -> usize {
        self.arena[node].parent
    }

    fn left(&self, node: usize) -> usize {
        self.arena[node].left
    }

    fn right(&self, node: usize) -> usize {
        self.arena[node].right
    }

    /// Returns the index of the node holding `key`, or `NIL` if no node matches.
    ///
    /// The descent is iterative; the stack stays flat regardless of tree shape.
    pub fn find(&self, key: &T) -> usize
    where
        T: Ord,
    {
        let mut current = self.root;
        while current != NIL {
            current = match key.cmp(self.arena[current].key()) {
                Ordering::Less => self.left(current),
                Ordering::Greater => self.right(current),
                Ordering::Equal => return current,
            };
        }
        NIL
    }

    pub fn contains(&self, key: &T) -> bool
    where
        T: Ord,
    {
        self.find(key) != NIL
    }

    pub fn get(&self, key: &T) -> Option<&Entry<T, U>>
    where
        T: Ord,
    {
        match self.find(key) {
            NIL => None,
            node => Some(self.arena[node].entry()),
        }
    }

    pub fn get_mut(&mut self, key: &T) -> Option<&mut Entry<T, U>>
    where
        T: Ord,
    {
        match self.find(key) {
            NIL => None,
            node => Some(self.arena[node].entry_mut()),
        }
    }

    /// Inserts a new entry at its binary-search-tree position and rebalances.
    ///
    /// The key must not already be present; a duplicate key would leave the tree without a unique
    /// node per key and make later removals ambiguous. Callers check membership first.
    pub fn insert(&mut self, key: T, value: U)
    where
        T: Ord,
    {
        debug_assert!(self.find(&key) == NIL, "Expected the key to be absent.");

        let mut parent = NIL;
        let mut current = self.root;
        while current != NIL {
            parent = current;
            current = if key < self.arena[current].entry().key {
                self.left(current)
            } else {
                self.right(current)
            };
        }

        let node = self.arena.allocate(Node::new(key, value));
        self.arena[node].parent = parent;
        if parent == NIL {
            self.root = node;
        } else if self.arena[node].key() < self.arena[parent].key() {
            self.arena[parent].left = node;
        } else {
            self.arena[parent].right = node;
        }
        self.len += 1;

        if parent == NIL {
            self.set_color(node, Color::Black);
            return;
        }
        if self.parent(parent) == NIL {
            return;
        }
        self.insert_fixup(node);
    }

    // Restores the red-black invariants after linking a red leaf. Walks red-parent violations up
    // the tree, recoloring past a red uncle and rotating once the uncle is black.
    fn insert_fixup(&mut self, mut node: usize) {
        while self.color(self.parent(node)) == Color::Red {
            let parent = self.parent(node);
            let grandparent = self.parent(parent);
            if parent == self.right(grandparent) {
                let uncle = self.left(grandparent);
                if self.color(uncle) == Color::Red {
                    self.set_color(uncle, Color::Black);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.left(parent) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    let parent = self.parent(node);
                    let grandparent = self.parent(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                }
            } else {
                let uncle = self.right(grandparent);
                if self.color(uncle) == Color::Red {
                    self.set_color(uncle, Color::Black);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.right(parent) {
                        node = parent;
                        self.rotate_left(node);
                    }
                    let parent = self.parent(node);
                    let grandparent = self.parent(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                }
            }
            if node == self.root {
                break;
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Removes the entry for `key` and rebalances. Returns `Error::KeyNotFound` carrying the key
    /// when no node matches.
    pub fn remove(&mut self, key: &T) -> Result<Entry<T, U>, T>
    where
        T: Ord + Clone,
    {
        match self.find(key) {
            NIL => Err(Error::KeyNotFound(key.clone())),
            node => Ok(self.remove_node(node)),
        }
    }

    /// Removes the node at `node` from the tree, frees its storage, and returns its entry.
    ///
    /// A node with at most one child is spliced out directly. A node with two children trades
    /// places with its in-order successor, which adopts the removed node's color. If the node
    /// physically unlinked from its position was black, a black-height deficit remains at the
    /// vacated slot and the fixup walk repairs it.
    pub fn remove_node(&mut self, node: usize) -> Entry<T, U> {
        let mut unlinked = node;
        let mut unlinked_color = self.color(unlinked);
        let occupant;
        if self.left(node) == NIL {
            occupant = self.right(node);
            self.transplant(node, occupant);
        } else if self.right(node) == NIL {
            occupant = self.left(node);
            self.transplant(node, occupant);
        } else {
            let successor = self.minimum(self.right(node));
            unlinked = successor;
            unlinked_color = self.color(successor);
            occupant = self.right(successor);
            if self.parent(successor) == node {
                // the occupant may be the sentinel; the fixup reads its parent link
                self.arena[occupant].parent = successor;
            } else {
                self.transplant(successor, occupant);
                self.arena[successor].right = self.right(node);
                let right = self.right(successor);
                self.arena[right].parent = successor;
            }
            self.transplant(node, successor);
            self.arena[successor].left = self.left(node);
            let left = self.left(successor);
            self.arena[left].parent = successor;
            let color = self.color(node);
            self.set_color(successor, color);
        }

        let removed = self.arena.free(node);
        self.len -= 1;
        if unlinked_color == Color::Black {
            self.remove_fixup(occupant);
        }
        removed.into_entry()
    }

    // Restores the red-black invariants after unlinking a black node. `node` carries an extra
    // unit of blackness; the walk pushes it up past black siblings and discharges it with a
    // rotation once a suitably colored sibling is found.
    fn remove_fixup(&mut self, mut node: usize) {
        while node != self.root && self.color(node) == Color::Black {
            let parent = self.parent(node);
            if node == self.left(parent) {
                let mut sibling = self.right(parent);
                if self.color(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sibling = self.right(parent);
                }
                if self.color(self.left(sibling)) == Color::Black
                    && self.color(self.right(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    node = parent;
                } else {
                    if self.color(self.right(sibling)) == Color::Black {
                        let near = self.left(sibling);
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right(parent);
                    }
                    let color = self.color(parent);
                    self.set_color(sibling, color);
                    self.set_color(parent, Color::Black);
                    let far = self.right(sibling);
                    self.set_color(far, Color::Black);
                    self.rotate_left(parent);
                    node = self.root;
                }
            } else {
                let mut sibling = self.left(parent);
                if self.color(sibling) == Color::Red {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sibling = self.left(parent);
                }
                if self.color(self.right(sibling)) == Color::Black
                    && self.color(self.left(sibling)) == Color::Black
                {
                    self.set_color(sibling, Color::Red);
                    node = parent;
                } else {
                    if self.color(self.left(sibling)) == Color::Black {
                        let near = self.right(sibling);
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left(parent);
                    }
                    let color = self.color(parent);
                    self.set_color(sibling, color);
                    self.set_color(parent, Color::Black);
                    let far = self.left(sibling);
                    self.set_color(far, Color::Black);
                    self.rotate_right(parent);
                    node = self.root;
                }
            }
        }
        self.set_color(node, Color::Black);
    }

    // Replaces the subtree rooted at `from` with the subtree rooted at `to` in `from`'s parent.
    // `to` may be the sentinel; its parent link is still updated because the removal fixup
    // starts from it.
    fn transplant(&mut self, from: usize, to: usize) {
        let parent = self.parent(from);
        if parent == NIL {
            self.root = to;
        } else if from == self.left(parent) {
            self.arena[parent].left = to;
        } else {
            self.arena[parent].right = to;
        }
        self.arena[to].parent = parent;
    }

    fn rotate_left(&mut self, node: usize) {
        let pivot = self.right(node);
        let child = self.left(pivot);
        self.arena[node].right = child;
        if child != NIL {
            self.arena[child].parent = node;
        }
        let parent = self.parent(node);
        self.arena[pivot].parent = parent;
        if parent == NIL {
            self.root = pivot;
        } else if node == self.left(parent) {
            self.arena[parent].left = pivot;
        } else {
            self.arena[parent].right = pivot;
        }
        self.arena[pivot].left = node;
        self.arena[node].parent = pivot;
    }

    fn rotate_right(&mut self, node: usize) {
        let pivot = self.left(node);
        let child = self.right(pivot);
        self.arena[node].left = child;
        if child != NIL {
            self.arena[child].parent = node;
        }
        let parent = self.parent(node);
        self.arena[pivot].parent = parent;
        if parent == NIL {
            self.root = pivot;
        } else if node == self.right(parent) {
            self.arena[parent].right = pivot;
        } else {
            self.arena[parent].left = pivot;
        }
        self.arena[pivot].right = node;
        self.arena[node].parent = pivot;
    }

    pub fn minimum(&self, mut node: usize) -> usize {
        while self.left(node) != NIL {
            node = self.left(node);
        }
        node
    }

    pub fn maximum(&self, mut node: usize) -> usize {
        while self.right(node) != NIL {
            node = self.right(node);
        }
        node
    }

    pub fn min(&self) -> Option<&Entry<T, U>> {
        if self.root == NIL {
            return None;
        }
        Some(self.arena[self.minimum(self.root)].entry())
    }

    pub fn max(&self) -> Option<&Entry<T, U>> {
        if self.root == NIL {
            return None;
        }
        Some(self.arena[self.maximum(self.root)].entry())
    }

    /// Returns the entries in key order using an explicit traversal stack.
    pub fn traverse(&self) -> Vec<(&T, &U)> {
        let mut entries = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut current = self.root;
        while current != NIL || !stack.is_empty() {
            while current != NIL {
                stack.push(current);
                current = self.left(current);
            }
            let node = stack.pop().expect("Expected a non-empty stack.");
            let entry = self.arena[node].entry();
            entries.push((&entry.key, &entry.value));
            current = self.right(node);
        }
        entries
    }
}

impl<T, U> Default for RedBlackTree<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl<T, U> RedBlackTree<T, U>
where
    T: Ord,
{
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    fn height_of(&self, node: usize) -> usize {
        if node == NIL {
            return 0;
        }
        1 + std::cmp::max(self.height_of(self.left(node)), self.height_of(self.right(node)))
    }

    pub fn check_invariants(&self) {
        assert_eq!(self.color(NIL), Color::Black);
        assert!(self.arena[NIL].entry.is_none());
        assert_eq!(self.color(self.root), Color::Black);
        let mut count = 0;
        self.check_subtree(self.root, NIL, None, None, &mut count);
        assert_eq!(count, self.len);
        assert_eq!(count + 1, self.arena.len());
    }

    // Returns the black-height of the subtree, counting the sentinel, and checks parent links,
    // strict key ordering within (lower, upper), and the no-red-red rule.
    fn check_subtree(
        &self,
        node: usize,
        parent: usize,
        lower: Option<&T>,
        upper: Option<&T>,
        count: &mut usize,
    ) -> usize {
        if node == NIL {
            return 1;
        }
        assert_eq!(self.parent(node), parent);
        let key = self.arena[node].key();
        if let Some(lower) = lower {
            assert!(lower < key);
        }
        if let Some(upper) = upper {
            assert!(key < upper);
        }
        if self.color(node) == Color::Red {
            assert_eq!(self.color(self.left(node)), Color::Black);
            assert_eq!(self.color(self.right(node)), Color::Black);
        }
        *count += 1;
        let left_height = self.check_subtree(self.left(node), node, lower, Some(key), count);
        let right_height = self.check_subtree(self.right(node), node, Some(key), upper, count);
        assert_eq!(left_height, right_height);
        match self.color(node) {
            Color::Black => left_height + 1,
            Color::Red => left_height,
        }
    }
}
