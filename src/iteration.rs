//! Ordered iteration over the leaf chain.
//!
//! Iterators walk the doubly linked leaf chain from the leftmost leaf via
//! `next` ids, yielding entries in key order without touching branch nodes.

use crate::types::{BPlusTree, LeafNode, NodeId, NodeRef, NULL_NODE};

/// Iterator over key-value pairs in key order.
pub struct ItemIterator<'a, K, V> {
    tree: &'a BPlusTree<K, V>,
    /// Leaf currently being drained; `None` once the chain is exhausted.
    current_leaf: Option<&'a LeafNode<K, V>>,
    index: usize,
}

/// Iterator over keys in order.
pub struct KeyIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

/// Iterator over values in key order.
pub struct ValueIterator<'a, K, V> {
    items: ItemIterator<'a, K, V>,
}

impl<K: Ord + Clone, V> BPlusTree<K, V> {
    /// Returns an iterator over all key-value pairs in key order.
    pub fn items(&self) -> ItemIterator<'_, K, V> {
        ItemIterator::new(self)
    }

    /// Returns an iterator over all keys in order.
    pub fn keys(&self) -> KeyIterator<'_, K, V> {
        KeyIterator {
            items: self.items(),
        }
    }

    /// Returns an iterator over all values in key order.
    pub fn values(&self) -> ValueIterator<'_, K, V> {
        ValueIterator {
            items: self.items(),
        }
    }

    /// Returns the first key-value pair, if any.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.items().next()
    }

    /// Returns the last key-value pair, if any.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.items().last()
    }

    /// Id of the leftmost leaf, the head of the chain.
    pub(crate) fn first_leaf_id(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id, _) => return id,
                NodeRef::Branch(id, _) => current = self.branch(id).children[0],
            }
        }
    }
}

impl<'a, K: Ord + Clone, V> ItemIterator<'a, K, V> {
    fn new(tree: &'a BPlusTree<K, V>) -> Self {
        Self {
            tree,
            current_leaf: tree.get_leaf(tree.first_leaf_id()),
            index: 0,
        }
    }
}

impl<'a, K: Ord + Clone, V> Iterator for ItemIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.current_leaf?;
            if self.index < leaf.keys.len() {
                let item = (&leaf.keys[self.index], &leaf.values[self.index]);
                self.index += 1;
                return Some(item);
            }

            // Leaf drained; follow the chain.
            if leaf.next == NULL_NODE {
                self.current_leaf = None;
                return None;
            }
            self.current_leaf = self.tree.get_leaf(leaf.next);
            self.index = 0;
        }
    }
}

impl<'a, K: Ord + Clone, V> Iterator for KeyIterator<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(k, _)| k)
    }
}

impl<'a, K: Ord + Clone, V> Iterator for ValueIterator<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use crate::BPlusTree;

    #[test]
    fn iteration_is_sorted_across_leaves() {
        let mut tree = BPlusTree::new(2, 2).unwrap();
        for k in [5, 1, 9, 3, 7, 2, 8, 4, 6, 0] {
            tree.insert(k, k * 100);
        }

        let keys: Vec<i32> = tree.keys().copied().collect();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());

        let values: Vec<i32> = tree.values().copied().collect();
        assert_eq!(values, (0..10).map(|k| k * 100).collect::<Vec<_>>());
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = BPlusTree::<i32, i32>::new(4, 4).unwrap();
        assert_eq!(tree.items().count(), 0);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
    }

    #[test]
    fn first_and_last() {
        let mut tree = BPlusTree::new(2, 2).unwrap();
        for k in 1..=20 {
            tree.insert(k, k);
        }
        assert_eq!(tree.first(), Some((&1, &1)));
        assert_eq!(tree.last(), Some((&20, &20)));
    }
}
