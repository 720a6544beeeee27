//! Slab allocator backing node storage.
//!
//! Nodes live in flat `Vec<T>` storage and refer to each other by index, so
//! the leaf chain can be expressed as plain ids instead of owning references.
//! Freed slots go on a free list and are reused by later allocations.

use std::convert::TryFrom;

/// Node ID type for arena-based allocation.
pub type NodeId = u32;

/// Sentinel for "no node" (end of the leaf chain, unlinked sibling).
pub const NULL_NODE: NodeId = u32::MAX;

/// Statistics for an arena.
#[derive(Debug, Clone, Copy)]
pub struct ArenaStats {
    pub allocated_count: usize,
    pub free_count: usize,
    pub total_slots: usize,
}

/// Arena allocator with direct storage and a free list.
#[derive(Debug)]
pub struct Arena<T> {
    storage: Vec<T>,
    /// Free slot indices available for reuse.
    free_list: Vec<usize>,
    /// Tracks which slots are live. A freed slot keeps a default value in
    /// `storage` until it is reused.
    allocated_mask: Vec<bool>,
}

impl<T: Default> Arena<T> {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
            free_list: Vec::new(),
            allocated_mask: Vec::new(),
        }
    }

    /// Allocate a new item and return its ID.
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = if let Some(free_index) = self.free_list.pop() {
            self.storage[free_index] = item;
            self.allocated_mask[free_index] = true;
            free_index
        } else {
            let index = self.storage.len();
            self.storage.push(item);
            self.allocated_mask.push(true);
            index
        };

        NodeId::try_from(index).expect("arena index should fit in NodeId")
    }

    /// Deallocate an item and return it, or `None` if the ID is not live.
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T> {
        let index = self.live_index(id)?;
        self.allocated_mask[index] = false;
        self.free_list.push(index);
        Some(std::mem::take(&mut self.storage[index]))
    }

    /// Get a reference to an item.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.live_index(id).map(|index| &self.storage[index])
    }

    /// Get a mutable reference to an item.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.live_index(id).map(|index| &mut self.storage[index])
    }

    /// Check if an ID refers to a live item.
    pub fn contains(&self, id: NodeId) -> bool {
        self.live_index(id).is_some()
    }

    /// Number of live items.
    pub fn allocated_count(&self) -> usize {
        self.allocated_mask.iter().filter(|&&live| live).count()
    }

    /// Number of free slots awaiting reuse.
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Arena statistics.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            allocated_count: self.allocated_count(),
            free_count: self.free_list.len(),
            total_slots: self.storage.len(),
        }
    }

    /// Drop all items and reset the arena.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.free_list.clear();
        self.allocated_mask.clear();
    }

    fn live_index(&self, id: NodeId) -> Option<usize> {
        if id == NULL_NODE {
            return None;
        }
        let index = usize::try_from(id).ok()?;
        if self.allocated_mask.get(index).copied().unwrap_or(false) {
            Some(index)
        } else {
            None
        }
    }
}

impl<T: Default> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_get() {
        let mut arena = Arena::new();
        let a = arena.allocate(42);
        let b = arena.allocate(84);

        assert_eq!(arena.get(a), Some(&42));
        assert_eq!(arena.get(b), Some(&84));
        assert!(arena.contains(a));
        assert!(!arena.contains(NULL_NODE));
        assert_eq!(arena.allocated_count(), 2);
    }

    #[test]
    fn deallocate_frees_slot_for_reuse() {
        let mut arena: Arena<i32> = Arena::new();
        let a = arena.allocate(1);
        let _b = arena.allocate(2);

        assert_eq!(arena.deallocate(a), Some(1));
        assert!(!arena.contains(a));
        assert_eq!(arena.free_count(), 1);

        // The freed slot is reused by the next allocation.
        let c = arena.allocate(3);
        assert_eq!(c, a);
        assert_eq!(arena.get(c), Some(&3));
        assert_eq!(arena.free_count(), 0);
    }

    #[test]
    fn deallocate_dead_id_is_none() {
        let mut arena: Arena<i32> = Arena::new();
        let a = arena.allocate(1);
        assert_eq!(arena.deallocate(a), Some(1));
        assert_eq!(arena.deallocate(a), None);
        assert_eq!(arena.deallocate(NULL_NODE), None);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena = Arena::new();
        let a = arena.allocate(String::from("x"));
        arena.get_mut(a).unwrap().push('y');
        assert_eq!(arena.get(a).map(String::as_str), Some("xy"));
    }
}
