//! Construction and initialization for the tree and its nodes.

use crate::arena::Arena;
use crate::error::{InitResult, TreeError};
use crate::types::{BPlusTree, BranchNode, LeafNode, NodeRef, MIN_CAPACITY, NULL_NODE};

/// Minimum occupancy for a node type: `ceil((max + 1) / 2) - 1`.
///
/// Computed once per tree at construction; guarantees that splitting a node
/// holding `max + 1` keys leaves at least this many on each side.
fn min_keys_for(max_keys: usize) -> usize {
    (max_keys + 1).div_ceil(2) - 1
}

impl<K, V> BPlusTree<K, V> {
    /// Create a B+ tree with independent branch and leaf capacities.
    ///
    /// `max_keys_inner` bounds the separator count per branch node and
    /// `max_keys_leaf` the entry count per leaf node. Both must be at least 2.
    /// The tree starts as a single empty root leaf at height 1.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidCapacity`] if either capacity is below 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTree;
    ///
    /// let tree = BPlusTree::<i32, String>::new(4, 8).unwrap();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.height(), 1);
    ///
    /// assert!(BPlusTree::<i32, String>::new(1, 8).is_err());
    /// ```
    pub fn new(max_keys_inner: usize, max_keys_leaf: usize) -> InitResult<Self> {
        if max_keys_inner < MIN_CAPACITY {
            return Err(TreeError::invalid_capacity(max_keys_inner, MIN_CAPACITY));
        }
        if max_keys_leaf < MIN_CAPACITY {
            return Err(TreeError::invalid_capacity(max_keys_leaf, MIN_CAPACITY));
        }

        let mut leaf_arena = Arena::new();
        let root_id = leaf_arena.allocate(LeafNode::new());

        Ok(Self {
            root: NodeRef::leaf(root_id),
            height: 1,
            max_keys_inner,
            min_keys_inner: min_keys_for(max_keys_inner),
            max_keys_leaf,
            min_keys_leaf: min_keys_for(max_keys_leaf),
            leaf_arena,
            branch_arena: Arena::new(),
        })
    }
}

impl<K, V> LeafNode<K, V> {
    /// Creates a new empty leaf, unlinked from the chain.
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            prev: NULL_NODE,
            next: NULL_NODE,
        }
    }
}

impl<K, V> Default for LeafNode<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BranchNode<K, V> {
    /// Creates a new empty branch node.
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl<K, V> Default for BranchNode<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
