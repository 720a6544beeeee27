//! Core types and data structures for the B+ tree index.

use std::marker::PhantomData;

use crate::arena::Arena;
pub use crate::arena::{NodeId, NULL_NODE};

/// Minimum node capacity accepted by [`BPlusTree::new`](crate::BPlusTree::new).
pub(crate) const MIN_CAPACITY: usize = 2;

/// In-memory ordered key/value index built on a B+ tree.
///
/// All entries live in leaf nodes; internal (branch) nodes hold only routing
/// separator keys. A separator partitions its children so that every key under
/// the left child is less than or equal to it, and every key under the right
/// child is strictly greater. Leaves are additionally threaded into a doubly
/// linked chain in key order, which drives iteration and the validator's
/// chain checks.
///
/// Leaf and branch capacities are configured independently; the minimum
/// occupancy for each node type is derived once at construction as
/// `ceil((max + 1) / 2) - 1` and never recomputed.
///
/// The tree is single-writer: callers must serialize mutations against each
/// other and against reads. There is no internal locking, and a read that
/// overlaps an in-progress mutation observes unspecified intermediate state.
///
/// Duplicate keys are not detected. Inserting a key that is already present
/// stores a second entry; its position among equal keys is unspecified, and
/// `remove` deletes the first matching entry it finds.
///
/// # Examples
///
/// ```
/// use bptree::BPlusTree;
///
/// let mut tree = BPlusTree::new(4, 4).unwrap();
/// tree.insert(1, "one");
/// tree.insert(2, "two");
///
/// assert_eq!(tree.get(&2), Some(&"two"));
/// assert!(tree.remove(&1));
/// assert_eq!(tree.get(&1), None);
/// ```
#[derive(Debug)]
pub struct BPlusTree<K, V> {
    /// The root node of the tree.
    pub(crate) root: NodeRef<K, V>,
    /// Number of levels, root = 1. A fresh tree is a single root leaf.
    pub(crate) height: usize,

    /// Maximum number of separator keys per branch node.
    pub(crate) max_keys_inner: usize,
    /// Minimum keys per non-root branch node (derived at construction).
    pub(crate) min_keys_inner: usize,
    /// Maximum number of entries per leaf node.
    pub(crate) max_keys_leaf: usize,
    /// Minimum entries per non-root leaf node (derived at construction).
    pub(crate) min_keys_leaf: usize,

    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: Arena<LeafNode<K, V>>,
    /// Arena storage for branch nodes.
    pub(crate) branch_arena: Arena<BranchNode<K, V>>,
}

/// Leaf node: parallel sorted key/value sequences plus its chain neighbors.
///
/// `prev` and `next` are lookup-only ids into the leaf arena; they are never
/// used to free a node.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) values: Vec<V>,
    /// Previous leaf in key order, `NULL_NODE` for the leftmost leaf.
    pub(crate) prev: NodeId,
    /// Next leaf in key order, `NULL_NODE` for the rightmost leaf.
    pub(crate) next: NodeId,
}

/// Branch node: separator keys and one more child reference than keys.
#[derive(Debug, Clone)]
pub struct BranchNode<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeRef<K, V>>,
}

/// Tagged node reference: arena id plus which arena it lives in.
#[derive(Debug, PartialEq, Eq)]
pub enum NodeRef<K, V> {
    Leaf(NodeId, PhantomData<(K, V)>),
    Branch(NodeId, PhantomData<(K, V)>),
}

// Derived Clone/Copy would put bounds on K and V; implement by hand.
impl<K, V> Clone for NodeRef<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<K, V> {}

impl<K, V> NodeRef<K, V> {
    /// Construct a leaf reference.
    pub(crate) fn leaf(id: NodeId) -> Self {
        NodeRef::Leaf(id, PhantomData)
    }

    /// Construct a branch reference.
    pub(crate) fn branch(id: NodeId) -> Self {
        NodeRef::Branch(id, PhantomData)
    }

    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id, _) => id,
            NodeRef::Branch(id, _) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_, _))
    }
}

/// Breadcrumb stack recorded while descending from the root to a leaf:
/// each entry is (branch id, index of the child that was entered). Both
/// repair directions consume it to walk back up without re-searching.
pub(crate) type Path = Vec<(NodeId, usize)>;
