//! Insert operations: leaf insertion and upward overflow repair.
//!
//! An insert always lands in a leaf first. If that leaf ends up over
//! capacity it is split and the separator is promoted into the parent
//! recorded on the descent path; the promotion walks upward level by level
//! until a node absorbs it without overflowing, or the root itself splits
//! and the tree grows by one level.

use crate::types::{BPlusTree, BranchNode, NodeId, NodeRef, Path, NULL_NODE};

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Insert a key/value entry.
    ///
    /// Duplicate keys are not detected: inserting a key that is already
    /// present stores a second entry whose position among equal keys is
    /// unspecified.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4, 4).unwrap();
    /// for i in 0..100 {
    ///     tree.insert(i, i * 10);
    /// }
    /// assert_eq!(tree.len(), 100);
    /// assert_eq!(tree.get(&42), Some(&420));
    /// ```
    pub fn insert(&mut self, key: K, value: V) {
        let (leaf_id, path) = self.descend_to_leaf_with_path(&key);

        let leaf = self.leaf_mut(leaf_id);
        let index = leaf.locate(&key);
        leaf.insert_at(index, key, value);

        self.repair_overflow(leaf_id, path);
    }

    /// Walk the breadcrumb path upward, splitting every overfull node and
    /// promoting its separator into the next ancestor.
    fn repair_overflow(&mut self, leaf_id: NodeId, mut path: Path) {
        let max_keys_leaf = self.max_keys_leaf;
        let max_keys_inner = self.max_keys_inner;

        if !self.leaf(leaf_id).is_overfull(max_keys_leaf) {
            return;
        }

        let (separator, right_id) = self.split_leaf(leaf_id);
        let mut promoted = Some((separator, NodeRef::leaf(right_id)));

        while let Some((separator, new_right)) = promoted.take() {
            match path.pop() {
                Some((branch_id, child_index)) => {
                    let branch = self.branch_mut(branch_id);
                    branch.insert_split_at(child_index, separator, new_right);
                    if branch.is_overfull(max_keys_inner) {
                        let (promoted_key, right_id) = self.split_branch(branch_id);
                        promoted = Some((promoted_key, NodeRef::branch(right_id)));
                    }
                }
                None => {
                    // The node that split was the root: grow a new root
                    // holding just the promoted separator.
                    self.grow_root(separator, new_right);
                }
            }
        }
    }

    /// Split the leaf `left_id`, splice the new right sibling into the chain,
    /// and return the promoted separator with the right sibling's id.
    ///
    /// The overfull node stays in place as the left half, so the parent's
    /// existing child reference remains valid.
    fn split_leaf(&mut self, left_id: NodeId) -> (K, NodeId) {
        let (separator, mut right) = self.leaf_mut(left_id).split();
        right.prev = left_id;
        let old_next = right.next;

        let right_id = self.leaf_arena.allocate(right);
        self.leaf_mut(left_id).next = right_id;
        if old_next != NULL_NODE {
            self.leaf_mut(old_next).prev = right_id;
        }

        (separator, right_id)
    }

    /// Split the branch `left_id`, returning the promoted separator and the
    /// new right sibling's id.
    fn split_branch(&mut self, left_id: NodeId) -> (K, NodeId) {
        let (promoted, right) = self.branch_mut(left_id).split();
        let right_id = self.branch_arena.allocate(right);
        (promoted, right_id)
    }

    /// Replace the root with a fresh branch holding one separator and the
    /// two halves of the old root. Tree height grows by one.
    fn grow_root(&mut self, separator: K, new_right: NodeRef<K, V>) {
        let mut new_root = BranchNode::new();
        new_root.keys.push(separator);
        new_root.children.push(self.root);
        new_root.children.push(new_right);

        let root_id = self.branch_arena.allocate(new_root);
        self.root = NodeRef::branch(root_id);
        self.height += 1;
    }
}
