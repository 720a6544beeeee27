//! Invariant validation and debugging utilities.
//!
//! The validator is a read-only breadth-first walk that carries, for every
//! node, the open key-range bound `(lower, upper]` inherited from its
//! position among ancestor separators. It never repairs anything: the first
//! broken invariant is reported with enough context (level, node id,
//! expected bound) to diagnose the engine defect that produced it.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::fmt::Write as _;

use crate::error::{TreeError, TreeResult};
use crate::types::{BPlusTree, NodeId, NodeRef, NULL_NODE};

struct WalkEntry<K, V> {
    node: NodeRef<K, V>,
    level: usize,
    /// Every key in this subtree must be strictly greater than this.
    lower: Option<K>,
    /// Every key in this subtree must be less than or equal to this.
    upper: Option<K>,
}

impl<K: Ord + Clone + Debug, V> BPlusTree<K, V> {
    /// Check every tree invariant, reporting the first violation.
    ///
    /// An `Err` here always signals a defect in the engine, never a user
    /// error; normal operation keeps every invariant intact.
    ///
    /// # Examples
    ///
    /// ```
    /// use bptree::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(4, 4).unwrap();
    /// for i in 0..100 {
    ///     tree.insert(i, i);
    /// }
    /// tree.validate().unwrap();
    /// ```
    pub fn validate(&self) -> TreeResult<()> {
        self.check_parameters()?;
        let leaves = self.check_structure()?;
        self.check_leaf_chain(&leaves)?;
        self.check_arena_accounting(&leaves)?;
        Ok(())
    }

    /// Tree-level parameter sanity.
    fn check_parameters(&self) -> TreeResult<()> {
        if self.height < 1 {
            return Err(TreeError::invariant("tree height must be at least 1"));
        }
        if self.max_keys_inner < 2 || self.max_keys_leaf < 2 {
            return Err(TreeError::invariant(format!(
                "max keys must be at least 2 (inner {}, leaf {})",
                self.max_keys_inner, self.max_keys_leaf
            )));
        }
        if self.min_keys_inner < 1 || self.min_keys_leaf < 1 {
            return Err(TreeError::invariant(format!(
                "min keys must be at least 1 (inner {}, leaf {})",
                self.min_keys_inner, self.min_keys_leaf
            )));
        }
        if self.min_keys_inner > self.max_keys_inner || self.min_keys_leaf > self.max_keys_leaf {
            return Err(TreeError::invariant(
                "min keys must not exceed max keys for either node type",
            ));
        }
        Ok(())
    }

    /// BFS over the tree checking ordering, bounds, occupancy, and shape.
    /// Returns the leaf ids in left-to-right order for the chain checks.
    fn check_structure(&self) -> TreeResult<Vec<NodeId>> {
        let mut leaves = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(WalkEntry {
            node: self.root,
            level: 1,
            lower: None,
            upper: None,
        });

        while let Some(entry) = queue.pop_front() {
            let is_root = entry.level == 1;
            match entry.node {
                NodeRef::Leaf(id, _) => {
                    self.check_leaf_node(id, &entry, is_root)?;
                    if entry.level != self.height {
                        return Err(TreeError::invariant(format!(
                            "leaf {} at level {} but tree height is {}",
                            id, entry.level, self.height
                        )));
                    }
                    leaves.push(id);
                }
                NodeRef::Branch(id, _) => {
                    let branch = self.get_branch(id).ok_or_else(|| {
                        TreeError::invariant(format!(
                            "level {}: branch {} is not in the arena",
                            entry.level, id
                        ))
                    })?;

                    if branch.children.len() != branch.keys.len() + 1 {
                        return Err(TreeError::invariant(format!(
                            "level {}, branch {}: {} keys but {} children",
                            entry.level,
                            id,
                            branch.keys.len(),
                            branch.children.len()
                        )));
                    }
                    check_key_run(
                        &branch.keys,
                        entry.lower.as_ref(),
                        entry.upper.as_ref(),
                        entry.level,
                        "branch",
                        id,
                    )?;
                    if branch.keys.len() > self.max_keys_inner {
                        return Err(TreeError::invariant(format!(
                            "level {}, branch {}: {} keys exceeds max {}",
                            entry.level,
                            id,
                            branch.keys.len(),
                            self.max_keys_inner
                        )));
                    }
                    if !is_root && branch.keys.len() < self.min_keys_inner {
                        return Err(TreeError::invariant(format!(
                            "level {}, branch {}: {} keys below min {}",
                            entry.level,
                            id,
                            branch.keys.len(),
                            self.min_keys_inner
                        )));
                    }

                    for (i, child) in branch.children.iter().enumerate() {
                        // Child i inherits: greater than separator i-1,
                        // less than or equal to separator i.
                        let lower = if i == 0 {
                            entry.lower.clone()
                        } else {
                            Some(branch.keys[i - 1].clone())
                        };
                        let upper = if i == branch.keys.len() {
                            entry.upper.clone()
                        } else {
                            Some(branch.keys[i].clone())
                        };
                        queue.push_back(WalkEntry {
                            node: *child,
                            level: entry.level + 1,
                            lower,
                            upper,
                        });
                    }
                }
            }
        }

        Ok(leaves)
    }

    fn check_leaf_node(&self, id: NodeId, entry: &WalkEntry<K, V>, is_root: bool) -> TreeResult<()> {
        let leaf = self.get_leaf(id).ok_or_else(|| {
            TreeError::invariant(format!(
                "level {}: leaf {} is not in the arena",
                entry.level, id
            ))
        })?;

        if leaf.keys.len() != leaf.values.len() {
            return Err(TreeError::invariant(format!(
                "level {}, leaf {}: {} keys but {} values",
                entry.level,
                id,
                leaf.keys.len(),
                leaf.values.len()
            )));
        }
        check_key_run(
            &leaf.keys,
            entry.lower.as_ref(),
            entry.upper.as_ref(),
            entry.level,
            "leaf",
            id,
        )?;
        if leaf.keys.len() > self.max_keys_leaf {
            return Err(TreeError::invariant(format!(
                "level {}, leaf {}: {} keys exceeds max {}",
                entry.level,
                id,
                leaf.keys.len(),
                self.max_keys_leaf
            )));
        }
        if !is_root && leaf.keys.len() < self.min_keys_leaf {
            return Err(TreeError::invariant(format!(
                "level {}, leaf {}: {} keys below min {}",
                entry.level,
                id,
                leaf.keys.len(),
                self.min_keys_leaf
            )));
        }
        Ok(())
    }

    /// The chain must thread exactly the leaves the tree reaches, in order,
    /// with null ids at both ends and no key overlap between neighbors.
    fn check_leaf_chain(&self, leaves: &[NodeId]) -> TreeResult<()> {
        let first = leaves
            .first()
            .copied()
            .expect("a tree always has at least one leaf");
        let last = leaves
            .last()
            .copied()
            .expect("a tree always has at least one leaf");

        if self.leaf(first).prev != NULL_NODE {
            return Err(TreeError::invariant(format!(
                "leftmost leaf {} has a prev link",
                first
            )));
        }
        if self.leaf(last).next != NULL_NODE {
            return Err(TreeError::invariant(format!(
                "rightmost leaf {} has a next link",
                last
            )));
        }

        for pair in leaves.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let left = self.leaf(a);
            let right = self.leaf(b);
            if left.next != b {
                return Err(TreeError::invariant(format!(
                    "leaf {} next link is {} but its right neighbor is {}",
                    a, left.next, b
                )));
            }
            if right.prev != a {
                return Err(TreeError::invariant(format!(
                    "leaf {} prev link is {} but its left neighbor is {}",
                    b, right.prev, a
                )));
            }
            if let (Some(max_left), Some(min_right)) = (left.keys.last(), right.keys.first()) {
                if max_left >= min_right {
                    return Err(TreeError::invariant(format!(
                        "leaf chain overlap: {:?} in leaf {} not below {:?} in leaf {}",
                        max_left, a, min_right, b
                    )));
                }
            }
        }
        Ok(())
    }

    /// Arena allocation must match the tree structure exactly: merged-away
    /// nodes are deallocated, live nodes are reachable.
    fn check_arena_accounting(&self, leaves: &[NodeId]) -> TreeResult<()> {
        if leaves.len() != self.leaf_arena.allocated_count() {
            return Err(TreeError::invariant(format!(
                "{} leaves reachable but {} allocated in the arena",
                leaves.len(),
                self.leaf_arena.allocated_count()
            )));
        }
        let branch_count = self.count_branches(&self.root);
        if branch_count != self.branch_arena.allocated_count() {
            return Err(TreeError::invariant(format!(
                "{} branches reachable but {} allocated in the arena",
                branch_count,
                self.branch_arena.allocated_count()
            )));
        }
        Ok(())
    }

    fn count_branches(&self, node: &NodeRef<K, V>) -> usize {
        match node {
            NodeRef::Leaf(_, _) => 0,
            NodeRef::Branch(id, _) => {
                let branch = self.branch(*id);
                1 + branch
                    .children
                    .iter()
                    .map(|child| self.count_branches(child))
                    .sum::<usize>()
            }
        }
    }

    // ============================================================================
    // DEBUGGING UTILITIES
    // ============================================================================

    /// Render the tree level by level, one bracketed key list per node.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "height = {}", self.height);

        let mut row: Vec<NodeRef<K, V>> = vec![self.root];
        let mut level = 1;
        while !row.is_empty() {
            let _ = write!(out, "{} -- ", level);
            let mut next_row = Vec::new();
            for node in &row {
                match node {
                    NodeRef::Leaf(id, _) => {
                        let _ = write!(out, " {:?}", self.leaf(*id).keys);
                    }
                    NodeRef::Branch(id, _) => {
                        let branch = self.branch(*id);
                        let _ = write!(out, " {:?}", branch.keys);
                        next_row.extend(branch.children.iter().copied());
                    }
                }
            }
            let _ = writeln!(out);
            row = next_row;
            level += 1;
        }
        out
    }

    /// Print [`dump`](Self::dump) to stdout.
    pub fn print_tree(&self) {
        println!("{}", self.dump());
    }
}

/// Shared key-sequence check: strictly increasing and inside `(lower, upper]`.
fn check_key_run<K: Ord + Debug>(
    keys: &[K],
    lower: Option<&K>,
    upper: Option<&K>,
    level: usize,
    kind: &str,
    id: NodeId,
) -> TreeResult<()> {
    for (i, key) in keys.iter().enumerate() {
        if i > 0 && keys[i - 1] >= *key {
            return Err(TreeError::invariant(format!(
                "level {}, {} {}: keys out of order at index {} ({:?} >= {:?})",
                level,
                kind,
                id,
                i,
                keys[i - 1],
                key
            )));
        }
        if let Some(lower) = lower {
            if key <= lower {
                return Err(TreeError::invariant(format!(
                    "level {}, {} {}: key {:?} not above lower bound {:?}",
                    level, kind, id, key, lower
                )));
            }
        }
        if let Some(upper) = upper {
            if key > upper {
                return Err(TreeError::invariant(format!(
                    "level {}, {} {}: key {:?} above upper bound {:?}",
                    level, kind, id, key, upper
                )));
            }
        }
    }
    Ok(())
}
