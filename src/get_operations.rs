//! Read operations: point lookup and root-to-leaf descent.
//!
//! Descent follows the lower-bound index at every branch, so a key equal to a
//! separator goes into the child left of (at) it and a greater key goes
//! right. The path-recording variant is the shared entry point for both
//! insertion and deletion: the breadcrumbs it returns are exactly the
//! ancestors a later repair pass may need to touch, with the chosen child
//! index memoized so no ancestor is ever re-searched.

use crate::types::{BPlusTree, BranchNode, LeafNode, NodeId, NodeRef, Path};

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Get a reference to the value associated with a key.
    ///
    /// With duplicate keys present, this returns the first entry in key
    /// order. Cost is O(height × log capacity).
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4, 4).unwrap();
    /// tree.insert(1, "one");
    /// assert_eq!(tree.get(&1), Some(&"one"));
    /// assert_eq!(tree.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let leaf_id = self.descend_to_leaf(key);
        self.leaf(leaf_id).get(key)
    }

    /// Check if a key exists in the tree.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    // ============================================================================
    // DESCENT
    // ============================================================================

    /// Descend from the root to the leaf owning `key`, without recording a
    /// path. Read-only lookups use this.
    pub(crate) fn descend_to_leaf(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id, _) => return id,
                NodeRef::Branch(id, _) => {
                    let branch = self.branch(id);
                    current = branch.children[branch.locate(key)];
                }
            }
        }
    }

    /// Descend from the root to the leaf owning `key`, recording at each
    /// branch level the (branch id, chosen child index) breadcrumb.
    pub(crate) fn descend_to_leaf_with_path(&self, key: &K) -> (NodeId, Path) {
        let mut path = Path::with_capacity(self.height.saturating_sub(1));
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id, _) => return (id, path),
                NodeRef::Branch(id, _) => {
                    let branch = self.branch(id);
                    let child_index = branch.locate(key);
                    path.push((id, child_index));
                    current = branch.children[child_index];
                }
            }
        }
    }

    // ============================================================================
    // ARENA ACCESS
    // ============================================================================

    /// Read-only access to a leaf node by id, for external traversal
    /// (dumpers, benchmarks). Returns `None` for dead or null ids.
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.leaf_arena.get(id)
    }

    /// Read-only access to a branch node by id.
    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K, V>> {
        self.branch_arena.get(id)
    }

    // Internal accessors. A miss here means a node reference survived its
    // node, which is an engine bug; failing loudly beats corrupting the tree.

    pub(crate) fn leaf(&self, id: NodeId) -> &LeafNode<K, V> {
        self.leaf_arena
            .get(id)
            .unwrap_or_else(|| panic!("leaf {} is not in the arena", id))
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        self.leaf_arena
            .get_mut(id)
            .unwrap_or_else(|| panic!("leaf {} is not in the arena", id))
    }

    pub(crate) fn branch(&self, id: NodeId) -> &BranchNode<K, V> {
        self.branch_arena
            .get(id)
            .unwrap_or_else(|| panic!("branch {} is not in the arena", id))
    }

    pub(crate) fn branch_mut(&mut self, id: NodeId) -> &mut BranchNode<K, V> {
        self.branch_arena
            .get_mut(id)
            .unwrap_or_else(|| panic!("branch {} is not in the arena", id))
    }
}

#[cfg(test)]
mod tests {
    use crate::BPlusTree;

    #[test]
    fn get_on_empty_tree_is_none() {
        let tree = BPlusTree::<i32, i32>::new(4, 4).unwrap();
        assert_eq!(tree.get(&1), None);
        assert!(!tree.contains_key(&1));
    }

    #[test]
    fn descent_path_matches_height() {
        let mut tree = BPlusTree::new(2, 2).unwrap();
        for i in 0..20 {
            tree.insert(i, i);
        }
        let (_, path) = tree.descend_to_leaf_with_path(&7);
        assert_eq!(path.len(), tree.height() - 1);
    }

    #[test]
    fn keys_equal_to_separator_route_left() {
        // With capacity 2 the third insert splits the root leaf and promotes
        // the pivot key; that key must still be findable (it lives in the
        // left leaf under the "less-or-equal goes left" rule).
        let mut tree = BPlusTree::new(2, 2).unwrap();
        tree.insert(10, "a");
        tree.insert(20, "b");
        tree.insert(30, "c");
        assert!(tree.height() >= 2);
        for k in [10, 20, 30] {
            assert!(tree.contains_key(&k), "lost key {}", k);
        }
    }
}
