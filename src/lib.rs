//! An in-memory ordered key/value index built on a B+ tree.
//!
//! Entries live exclusively in leaf nodes; branch nodes carry only routing
//! separators. Nodes are stored in per-type arenas and referenced by compact
//! ids, and the leaves are threaded into a doubly linked chain that drives
//! in-order iteration.
//!
//! Leaf and branch capacities are configured independently at construction;
//! everything else (minimum occupancy, split pivots) is derived from them.
//!
//! # Examples
//!
//! ```
//! use bptree::BPlusTree;
//!
//! let mut tree = BPlusTree::new(16, 16).unwrap();
//! for i in 0..1000 {
//!     tree.insert(i, i * 2);
//! }
//! assert_eq!(tree.get(&500), Some(&1000));
//! assert!(tree.remove(&500));
//! assert_eq!(tree.len(), 999);
//! tree.validate().unwrap();
//! ```

mod arena;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod types;
mod validation;

pub use arena::{ArenaStats, NodeId, NULL_NODE};
pub use error::{InitResult, TreeError, TreeResult};
pub use iteration::{ItemIterator, KeyIterator, ValueIterator};
pub use types::{BPlusTree, BranchNode, LeafNode, NodeRef};

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Number of levels in the tree. A fresh tree is a single root leaf at
    /// height 1.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The current root node reference.
    pub fn root(&self) -> NodeRef<K, V> {
        self.root
    }

    /// Returns `true` while the tree is a single root leaf.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.count_entries(&self.root)
    }

    /// Returns `true` if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        self.count_leaves(&self.root)
    }

    /// Remove every entry, returning the tree to a single empty root leaf.
    /// Arena slots are released for reuse.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.branch_arena.clear();
        let root_id = self.leaf_arena.allocate(LeafNode::new());
        self.root = NodeRef::leaf(root_id);
        self.height = 1;
    }

    fn count_entries(&self, node: &NodeRef<K, V>) -> usize {
        match node {
            NodeRef::Leaf(id, _) => self.leaf(*id).len(),
            NodeRef::Branch(id, _) => self
                .branch(*id)
                .children
                .iter()
                .map(|child| self.count_entries(child))
                .sum(),
        }
    }

    fn count_leaves(&self, node: &NodeRef<K, V>) -> usize {
        match node {
            NodeRef::Leaf(_, _) => 1,
            NodeRef::Branch(id, _) => self
                .branch(*id)
                .children
                .iter()
                .map(|child| self.count_leaves(child))
                .sum(),
        }
    }
}
