//! Node-local operations for leaf and branch nodes.
//!
//! Everything here acts on a single node; capacity limits are supplied by the
//! caller because minima/maxima are tree-wide parameters, not per-node state.
//! Splits are left-biased: the pivot sits at `floor(len / 2)`, a leaf keeps
//! the pivot entry on the left side and promotes a copy of its key, a branch
//! removes the pivot key entirely and promotes it.

use crate::types::{BranchNode, LeafNode, NodeRef, NULL_NODE};

// ============================================================================
// LEAF NODE
// ============================================================================

impl<K: Ord + Clone, V> LeafNode<K, V> {
    /// Lower-bound position of `key`: the lowest index holding `key`, or the
    /// index where `key` would be inserted to keep the sequence sorted.
    pub(crate) fn locate(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Get a value by key, if an exact match is stored here.
    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let index = self.locate(key);
        if self.keys.get(index) == Some(key) {
            Some(&self.values[index])
        } else {
            None
        }
    }

    /// Number of entries in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this leaf holds no entries.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The stored keys, in order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The stored values, parallel to [`keys`](Self::keys).
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Id of the previous leaf in the chain (`NULL_NODE` at the left end).
    pub fn prev(&self) -> crate::types::NodeId {
        self.prev
    }

    /// Id of the next leaf in the chain (`NULL_NODE` at the right end).
    pub fn next(&self) -> crate::types::NodeId {
        self.next
    }

    pub(crate) fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }

    /// Insert an entry at `index`, shifting later entries right.
    pub(crate) fn insert_at(&mut self, index: usize, key: K, value: V) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    /// Remove and return the entry at `index`.
    pub(crate) fn remove_at(&mut self, index: usize) -> (K, V) {
        (self.keys.remove(index), self.values.remove(index))
    }

    pub(crate) fn is_overfull(&self, max_keys: usize) -> bool {
        self.keys.len() > max_keys
    }

    pub(crate) fn is_underfull(&self, min_keys: usize) -> bool {
        self.keys.len() < min_keys
    }

    /// Whether this leaf can give up an entry without going below minimum.
    pub(crate) fn can_donate(&self, min_keys: usize) -> bool {
        self.keys.len() > min_keys
    }

    /// Split an overfull leaf, returning the promoted separator and the new
    /// right sibling.
    ///
    /// The pivot entry stays on the left and a copy of its key becomes the
    /// separator, so the "less-or-equal goes left" routing rule holds. The
    /// right node inherits this node's `next` id; the caller must finish the
    /// chain splice once the right node has an arena id.
    pub(crate) fn split(&mut self) -> (K, LeafNode<K, V>) {
        let pivot = self.keys.len() / 2;
        let right_keys = self.keys.split_off(pivot + 1);
        let right_values = self.values.split_off(pivot + 1);

        let separator = self
            .keys
            .last()
            .cloned()
            .expect("leaf split left an empty left half");

        let new_right = LeafNode {
            keys: right_keys,
            values: right_values,
            prev: NULL_NODE,
            next: self.next,
        };
        self.next = NULL_NODE;

        (separator, new_right)
    }

    /// Give up the last entry (donation to a right neighbor).
    pub(crate) fn borrow_last(&mut self) -> (K, V) {
        let key = self.keys.pop().expect("borrow_last from empty leaf");
        let value = self.values.pop().expect("leaf keys/values out of step");
        (key, value)
    }

    /// Give up the first entry (donation to a left neighbor).
    pub(crate) fn borrow_first(&mut self) -> (K, V) {
        assert!(!self.keys.is_empty(), "borrow_first from empty leaf");
        (self.keys.remove(0), self.values.remove(0))
    }

    /// Accept a donated entry at the front (it came from the left sibling).
    pub(crate) fn accept_from_left(&mut self, key: K, value: V) {
        self.keys.insert(0, key);
        self.values.insert(0, value);
    }

    /// Accept a donated entry at the end (it came from the right sibling).
    pub(crate) fn accept_from_right(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    /// Absorb all entries of `other`, which must be this leaf's immediate
    /// right neighbor in key order. Chain relinking is the caller's job.
    pub(crate) fn merge_from(&mut self, mut other: LeafNode<K, V>) {
        self.keys.append(&mut other.keys);
        self.values.append(&mut other.values);
    }
}

// ============================================================================
// BRANCH NODE
// ============================================================================

impl<K: Ord + Clone, V> BranchNode<K, V> {
    /// Lower-bound position of `key` among the separators. This doubles as
    /// the index of the child to descend into: keys equal to a separator
    /// route left-of-or-at it, greater keys route right.
    pub(crate) fn locate(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Number of separator keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this branch holds no separators.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The separator keys, in order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The child references; always one more than [`keys`](Self::keys).
    pub fn children(&self) -> &[NodeRef<K, V>] {
        &self.children
    }

    /// Record a child split: the separator goes in at `child_index` and the
    /// new right node directly after the child that split.
    pub(crate) fn insert_split_at(
        &mut self,
        child_index: usize,
        separator: K,
        new_right: NodeRef<K, V>,
    ) {
        self.keys.insert(child_index, separator);
        self.children.insert(child_index + 1, new_right);
    }

    pub(crate) fn is_overfull(&self, max_keys: usize) -> bool {
        self.keys.len() > max_keys
    }

    pub(crate) fn is_underfull(&self, min_keys: usize) -> bool {
        self.keys.len() < min_keys
    }

    pub(crate) fn can_donate(&self, min_keys: usize) -> bool {
        self.keys.len() > min_keys
    }

    /// Split an overfull branch, returning the promoted separator and the new
    /// right sibling. The pivot key is removed from both halves: branch
    /// separators are routing data, not entries, so no copy stays behind.
    pub(crate) fn split(&mut self) -> (K, BranchNode<K, V>) {
        let pivot = self.keys.len() / 2;
        let right_keys = self.keys.split_off(pivot + 1);
        let right_children = self.children.split_off(pivot + 1);
        let promoted = self.keys.pop().expect("branch split left no pivot key");

        let new_right = BranchNode {
            keys: right_keys,
            children: right_children,
        };

        (promoted, new_right)
    }

    /// Give up the last key and child (donation to a right neighbor).
    pub(crate) fn borrow_last(&mut self) -> (K, NodeRef<K, V>) {
        let key = self.keys.pop().expect("borrow_last from empty branch");
        let child = self
            .children
            .pop()
            .expect("branch keys/children out of step");
        (key, child)
    }

    /// Give up the first key and child (donation to a left neighbor).
    pub(crate) fn borrow_first(&mut self) -> (K, NodeRef<K, V>) {
        assert!(!self.keys.is_empty(), "borrow_first from empty branch");
        (self.keys.remove(0), self.children.remove(0))
    }

    /// Rotate in from the left: the parent separator becomes this node's
    /// first key and the donated child its first child.
    pub(crate) fn accept_from_left(&mut self, separator: K, moved_child: NodeRef<K, V>) {
        self.keys.insert(0, separator);
        self.children.insert(0, moved_child);
    }

    /// Rotate in from the right: the parent separator becomes this node's
    /// last key and the donated child its last child.
    pub(crate) fn accept_from_right(&mut self, separator: K, moved_child: NodeRef<K, V>) {
        self.keys.push(separator);
        self.children.push(moved_child);
    }

    /// Absorb `other` (the immediate right neighbor), reinserting the parent
    /// separator between the two key runs. Child count is the sum of both;
    /// only the separator count drops, at the parent.
    pub(crate) fn merge_from(&mut self, separator: K, mut other: BranchNode<K, V>) {
        self.keys.push(separator);
        self.keys.append(&mut other.keys);
        self.children.append(&mut other.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_of(keys: &[i32]) -> LeafNode<i32, i32> {
        let mut leaf = LeafNode::new();
        for &k in keys {
            let at = leaf.locate(&k);
            leaf.insert_at(at, k, k * 10);
        }
        leaf
    }

    #[test]
    fn locate_is_lower_bound() {
        let leaf = leaf_of(&[10, 20, 30]);
        assert_eq!(leaf.locate(&5), 0);
        assert_eq!(leaf.locate(&10), 0);
        assert_eq!(leaf.locate(&15), 1);
        assert_eq!(leaf.locate(&30), 2);
        assert_eq!(leaf.locate(&31), 3);
    }

    #[test]
    fn leaf_split_keeps_pivot_copy_left() {
        // Overfull leaf with 3 keys: pivot index 1, key 20 stays left and is
        // promoted as the separator.
        let mut leaf = leaf_of(&[10, 20, 30]);
        let (separator, right) = leaf.split();

        assert_eq!(separator, 20);
        assert_eq!(leaf.keys, vec![10, 20]);
        assert_eq!(right.keys, vec![30]);
        assert_eq!(leaf.values, vec![100, 200]);
        assert_eq!(right.values, vec![300]);
    }

    #[test]
    fn leaf_split_hands_over_next_pointer() {
        let mut leaf = leaf_of(&[1, 2, 3]);
        leaf.next = 7;
        let (_, right) = leaf.split();
        assert_eq!(right.next, 7);
        assert_eq!(leaf.next, NULL_NODE);
    }

    #[test]
    fn branch_split_removes_pivot_from_both_halves() {
        let mut branch: BranchNode<i32, i32> = BranchNode {
            keys: vec![10, 20, 30],
            children: vec![
                NodeRef::leaf(0),
                NodeRef::leaf(1),
                NodeRef::leaf(2),
                NodeRef::leaf(3),
            ],
        };

        let (promoted, right) = branch.split();

        assert_eq!(promoted, 20);
        assert_eq!(branch.keys, vec![10]);
        assert_eq!(right.keys, vec![30]);
        assert_eq!(branch.children.len(), 2);
        assert_eq!(right.children.len(), 2);
        assert_eq!(branch.children[1].id(), 1);
        assert_eq!(right.children[0].id(), 2);
    }

    #[test]
    fn leaf_merge_concatenates() {
        let mut left = leaf_of(&[1, 2]);
        let right = leaf_of(&[3, 4]);
        left.merge_from(right);
        assert_eq!(left.keys, vec![1, 2, 3, 4]);
        assert_eq!(left.values, vec![10, 20, 30, 40]);
    }

    #[test]
    fn branch_merge_reinserts_separator() {
        let mut left: BranchNode<i32, i32> = BranchNode {
            keys: vec![10],
            children: vec![NodeRef::leaf(0), NodeRef::leaf(1)],
        };
        let right: BranchNode<i32, i32> = BranchNode {
            keys: vec![30],
            children: vec![NodeRef::leaf(2), NodeRef::leaf(3)],
        };

        left.merge_from(20, right);

        assert_eq!(left.keys, vec![10, 20, 30]);
        assert_eq!(left.children.len(), 4);
    }
}
