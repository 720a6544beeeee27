//! Delete operations: leaf removal and upward underflow repair.
//!
//! Removal mutates the owning leaf, then walks the descent path upward. At
//! each level the deficient child first tries to steal an entry from a
//! sibling with surplus (left first, then right) because stealing is O(1)
//! and keeps the node count unchanged; only when neither sibling can donate
//! is the child merged with a sibling, which removes one parent separator
//! and may propagate the deficiency one level up. A root branch left with
//! zero separators collapses into its only child and the tree shrinks by
//! one level.
//!
//! Each level ends in one of two terminal states: "balanced, stop" or
//! "replace root".

use crate::types::{BPlusTree, NodeId, NodeRef, Path, NULL_NODE};

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Remove the first entry matching `key`.
    ///
    /// Returns `true` if an entry was removed. Absence is an expected
    /// outcome, not an error; the tree is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4, 4).unwrap();
    /// tree.insert(1, "one");
    /// assert!(tree.remove(&1));
    /// assert!(!tree.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        let (leaf_id, mut path) = self.descend_to_leaf_with_path(key);

        {
            let leaf = self.leaf_mut(leaf_id);
            let index = leaf.locate(key);
            if leaf.keys.get(index) != Some(key) {
                return false;
            }
            leaf.remove_at(index);
        }

        // A root leaf has no minimum occupancy; nothing to repair.
        if let Some((parent_id, child_index)) = path.pop() {
            self.repair_underflow(parent_id, child_index, path);
        }
        true
    }

    /// Walk the breadcrumb path upward restoring minimum occupancy.
    ///
    /// Stops at the first level that is balanced or fixed by a steal; a
    /// merge removes a separator from the parent and the loop continues one
    /// level up to re-check it.
    fn repair_underflow(&mut self, mut parent_id: NodeId, mut child_index: usize, mut path: Path) {
        loop {
            if !self.child_is_underfull(parent_id, child_index) {
                return;
            }
            if self.try_steal(parent_id, child_index) {
                return;
            }
            self.merge_child(parent_id, child_index);

            match path.pop() {
                Some((next_parent, next_index)) => {
                    parent_id = next_parent;
                    child_index = next_index;
                }
                None => {
                    self.collapse_root_if_empty();
                    return;
                }
            }
        }
    }

    fn child_is_underfull(&self, parent_id: NodeId, child_index: usize) -> bool {
        match self.branch(parent_id).children[child_index] {
            NodeRef::Leaf(id, _) => self.leaf(id).is_underfull(self.min_keys_leaf),
            NodeRef::Branch(id, _) => self.branch(id).is_underfull(self.min_keys_inner),
        }
    }

    // ============================================================================
    // STEAL (REDISTRIBUTION)
    // ============================================================================

    /// Try to redistribute one entry from a sibling with surplus into the
    /// deficient child. Left sibling first, then right. Returns whether a
    /// steal happened.
    fn try_steal(&mut self, parent_id: NodeId, child_index: usize) -> bool {
        let parent = self.branch(parent_id);
        let child = parent.children[child_index];
        let left = (child_index > 0).then(|| parent.children[child_index - 1]);
        let right = (child_index + 1 < parent.children.len())
            .then(|| parent.children[child_index + 1]);

        match child {
            NodeRef::Leaf(child_id, _) => {
                if let Some(left_ref) = left {
                    if self.leaf(left_ref.id()).can_donate(self.min_keys_leaf) {
                        self.steal_leaf_from_left(parent_id, child_index, left_ref.id(), child_id);
                        return true;
                    }
                }
                if let Some(right_ref) = right {
                    if self.leaf(right_ref.id()).can_donate(self.min_keys_leaf) {
                        self.steal_leaf_from_right(parent_id, child_index, child_id, right_ref.id());
                        return true;
                    }
                }
                false
            }
            NodeRef::Branch(child_id, _) => {
                if let Some(left_ref) = left {
                    if self.branch(left_ref.id()).can_donate(self.min_keys_inner) {
                        self.steal_branch_from_left(parent_id, child_index, left_ref.id(), child_id);
                        return true;
                    }
                }
                if let Some(right_ref) = right {
                    if self.branch(right_ref.id()).can_donate(self.min_keys_inner) {
                        self.steal_branch_from_right(
                            parent_id,
                            child_index,
                            child_id,
                            right_ref.id(),
                        );
                        return true;
                    }
                }
                false
            }
        }
    }

    /// Move the left sibling's last entry to the front of the child. The
    /// separator between them becomes the sibling's new last key, keeping
    /// everything under the left child less than or equal to it.
    fn steal_leaf_from_left(
        &mut self,
        parent_id: NodeId,
        child_index: usize,
        left_id: NodeId,
        child_id: NodeId,
    ) {
        let (key, value) = self.leaf_mut(left_id).borrow_last();
        let new_separator = self
            .leaf(left_id)
            .last_key()
            .cloned()
            .expect("left sibling emptied by donation");
        self.leaf_mut(child_id).accept_from_left(key, value);
        self.branch_mut(parent_id).keys[child_index - 1] = new_separator;
    }

    /// Move the right sibling's first entry to the end of the child. The
    /// moved key becomes the new separator: it is now the child's maximum.
    fn steal_leaf_from_right(
        &mut self,
        parent_id: NodeId,
        child_index: usize,
        child_id: NodeId,
        right_id: NodeId,
    ) {
        let (key, value) = self.leaf_mut(right_id).borrow_first();
        let new_separator = key.clone();
        self.leaf_mut(child_id).accept_from_right(key, value);
        self.branch_mut(parent_id).keys[child_index] = new_separator;
    }

    /// Branch steal rotates through the parent: the current separator drops
    /// into the child, the sibling's edge child moves across, and the
    /// sibling's edge key replaces the separator.
    fn steal_branch_from_left(
        &mut self,
        parent_id: NodeId,
        child_index: usize,
        left_id: NodeId,
        child_id: NodeId,
    ) {
        let separator = self.branch(parent_id).keys[child_index - 1].clone();
        let (moved_key, moved_child) = self.branch_mut(left_id).borrow_last();
        self.branch_mut(child_id).accept_from_left(separator, moved_child);
        self.branch_mut(parent_id).keys[child_index - 1] = moved_key;
    }

    fn steal_branch_from_right(
        &mut self,
        parent_id: NodeId,
        child_index: usize,
        child_id: NodeId,
        right_id: NodeId,
    ) {
        let separator = self.branch(parent_id).keys[child_index].clone();
        let (moved_key, moved_child) = self.branch_mut(right_id).borrow_first();
        self.branch_mut(child_id).accept_from_right(separator, moved_child);
        self.branch_mut(parent_id).keys[child_index] = moved_key;
    }

    // ============================================================================
    // MERGE
    // ============================================================================

    /// Merge the deficient child with a sibling, preferring the left one.
    /// One parent separator and one child reference disappear; the absorbed
    /// node is deallocated.
    fn merge_child(&mut self, parent_id: NodeId, child_index: usize) {
        if child_index > 0 {
            // Absorb the child into its left sibling.
            let parent = self.branch_mut(parent_id);
            let separator = parent.keys.remove(child_index - 1);
            let removed = parent.children.remove(child_index);
            let survivor = self.branch(parent_id).children[child_index - 1];
            self.merge_nodes(survivor, separator, removed);
        } else {
            // Leftmost child: absorb the right sibling into it.
            let parent = self.branch_mut(parent_id);
            assert!(
                parent.children.len() > 1,
                "deficient child has no sibling to merge with"
            );
            let separator = parent.keys.remove(0);
            let removed = parent.children.remove(1);
            let survivor = self.branch(parent_id).children[0];
            self.merge_nodes(survivor, separator, removed);
        }
    }

    /// Absorb `removed` (the right node) into `survivor` (its immediate left
    /// neighbor). Leaf merges drop the separator (leaf separators are
    /// routing copies) and relink the chain around the removed leaf; branch
    /// merges reinsert it between the two key runs.
    fn merge_nodes(&mut self, survivor: NodeRef<K, V>, separator: K, removed: NodeRef<K, V>) {
        match (survivor, removed) {
            (NodeRef::Leaf(left_id, _), NodeRef::Leaf(right_id, _)) => {
                let right = self
                    .leaf_arena
                    .deallocate(right_id)
                    .unwrap_or_else(|| panic!("leaf {} is not in the arena", right_id));
                let old_next = right.next;

                let left = self.leaf_mut(left_id);
                left.merge_from(right);
                left.next = old_next;
                if old_next != NULL_NODE {
                    self.leaf_mut(old_next).prev = left_id;
                }
                let _ = separator;
            }
            (NodeRef::Branch(left_id, _), NodeRef::Branch(right_id, _)) => {
                let right = self
                    .branch_arena
                    .deallocate(right_id)
                    .unwrap_or_else(|| panic!("branch {} is not in the arena", right_id));
                self.branch_mut(left_id).merge_from(separator, right);
            }
            _ => panic!("merge of mismatched node kinds"),
        }
    }

    // ============================================================================
    // ROOT SHRINK
    // ============================================================================

    /// If the root branch has lost its last separator it has exactly one
    /// child left; that child becomes the new root and the height drops.
    fn collapse_root_if_empty(&mut self) {
        let NodeRef::Branch(root_id, _) = self.root else {
            return;
        };
        if !self.branch(root_id).is_empty() {
            return;
        }

        let root = self
            .branch_arena
            .deallocate(root_id)
            .unwrap_or_else(|| panic!("branch {} is not in the arena", root_id));
        assert_eq!(
            root.children.len(),
            1,
            "empty root branch must have exactly one child"
        );
        self.root = root.children[0];
        self.height -= 1;
    }
}
