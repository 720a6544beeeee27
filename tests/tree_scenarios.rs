//! End-to-end scenarios driving the tree through its whole lifecycle:
//! growth from a root leaf, bulk random load, shrink back to empty, and the
//! edge cases around construction and absent keys.

use bptree::{BPlusTree, TreeError};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[test]
fn sequential_fill_grows_the_tree() {
    let mut tree = BPlusTree::new(2, 2).unwrap();
    for k in 1..=7 {
        tree.insert(k, k * 10);
        tree.validate().unwrap();
        if k >= 5 {
            // Five keys cannot fit under a single root leaf of capacity 2.
            assert!(tree.height() >= 2);
        }
    }

    assert_eq!(tree.len(), 7);
    for k in 1..=7 {
        assert_eq!(tree.get(&k), Some(&(k * 10)));
    }
    let keys: Vec<i32> = tree.keys().copied().collect();
    assert_eq!(keys, (1..=7).collect::<Vec<_>>());
}

#[test]
fn bulk_random_load_and_lookup() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut keys: Vec<u32> = (0..10_000).collect();
    keys.shuffle(&mut rng);

    let mut tree = BPlusTree::new(5, 5).unwrap();
    for (step, &k) in keys.iter().enumerate() {
        tree.insert(k, u64::from(k) * 3);
        if step % 997 == 0 {
            tree.validate().unwrap();
        }
    }
    tree.validate().unwrap();

    assert_eq!(tree.len(), 10_000);
    for k in 0..10_000u32 {
        assert_eq!(tree.get(&k), Some(&(u64::from(k) * 3)), "key {}", k);
    }

    // Iteration yields every key exactly once, in order.
    let collected: Vec<u32> = tree.keys().copied().collect();
    assert_eq!(collected, (0..10_000).collect::<Vec<_>>());
}

#[test]
fn delete_all_in_random_order_returns_to_empty() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut keys: Vec<u32> = (0..10_000).collect();
    keys.shuffle(&mut rng);

    let mut tree = BPlusTree::new(5, 5).unwrap();
    for &k in &keys {
        tree.insert(k, k);
    }
    tree.validate().unwrap();

    // Remove in a different random order than insertion.
    keys.shuffle(&mut rng);
    for (step, &k) in keys.iter().enumerate() {
        assert!(tree.remove(&k), "key {} missing at removal", k);
        assert!(!tree.contains_key(&k));
        if step % 997 == 0 {
            tree.validate().unwrap();
        }
    }
    tree.validate().unwrap();

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.leaf_count(), 1);
}

#[test]
fn churn_holds_invariants_at_every_step() {
    let mut rng = StdRng::seed_from_u64(1234);
    let mut keys: Vec<u32> = (0..2_000).collect();
    keys.shuffle(&mut rng);

    let mut tree = BPlusTree::new(3, 4).unwrap();
    for &k in &keys {
        tree.insert(k, k);
        tree.validate().unwrap();
    }
    keys.shuffle(&mut rng);
    for &k in &keys {
        assert!(tree.remove(&k));
        tree.validate().unwrap();
    }
    assert!(tree.is_empty());
}

#[test]
fn single_delete_repairs_and_keeps_chain_intact() {
    let mut tree = BPlusTree::new(2, 2).unwrap();
    for k in [10, 20, 30, 40] {
        tree.insert(k, k);
    }
    tree.validate().unwrap();

    assert!(tree.remove(&20));
    tree.validate().unwrap();

    let keys: Vec<i32> = tree.keys().copied().collect();
    assert_eq!(keys, vec![10, 30, 40]);
}

#[test]
fn remove_from_empty_tree_is_a_no_op() {
    let mut tree = BPlusTree::<i32, i32>::new(4, 4).unwrap();
    assert!(!tree.remove(&1));
    assert_eq!(tree.height(), 1);
    assert!(tree.is_empty());
    tree.validate().unwrap();

    // Repeated removal of the same absent key stays false.
    assert!(!tree.remove(&1));
}

#[test]
fn undersized_capacities_are_rejected() {
    let err = BPlusTree::<i32, i32>::new(1, 2).unwrap_err();
    assert!(matches!(err, TreeError::InvalidCapacity(_)));
    assert!(err.is_capacity_error());

    assert!(BPlusTree::<i32, i32>::new(2, 1).is_err());
    assert!(BPlusTree::<i32, i32>::new(0, 0).is_err());
}

#[test]
fn insertion_order_does_not_change_contents() {
    let mut sorted = BPlusTree::new(3, 3).unwrap();
    for k in 0..500u32 {
        sorted.insert(k, k * 2);
    }

    let mut rng = StdRng::seed_from_u64(99);
    let mut keys: Vec<u32> = (0..500).collect();
    keys.shuffle(&mut rng);
    let mut shuffled = BPlusTree::new(3, 3).unwrap();
    for &k in &keys {
        shuffled.insert(k, k * 2);
    }

    sorted.validate().unwrap();
    shuffled.validate().unwrap();

    let a: Vec<(u32, u32)> = sorted.items().map(|(k, v)| (*k, *v)).collect();
    let b: Vec<(u32, u32)> = shuffled.items().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(a, b);
}

#[test]
fn mixed_workload_round_trip() {
    let mut tree = BPlusTree::new(4, 4).unwrap();
    for k in 0..1_000 {
        tree.insert(k, format!("v{}", k));
    }
    for k in (0..1_000).step_by(3) {
        assert!(tree.remove(&k));
    }
    tree.validate().unwrap();

    for k in 0..1_000 {
        let expected = if k % 3 == 0 {
            None
        } else {
            Some(format!("v{}", k))
        };
        assert_eq!(tree.get(&k).cloned(), expected, "key {}", k);
    }

    // Deleted keys can be reinserted.
    for k in (0..1_000).step_by(3) {
        tree.insert(k, format!("w{}", k));
    }
    tree.validate().unwrap();
    assert_eq!(tree.len(), 1_000);
    assert_eq!(tree.get(&0).map(String::as_str), Some("w0"));
}

#[test]
fn asymmetric_capacities_behave_independently() {
    // Wide leaves, narrow branches: the branch layer splits long before the
    // leaves are full.
    let mut tree = BPlusTree::new(2, 32).unwrap();
    for k in 0..2_000u32 {
        tree.insert(k, k);
    }
    tree.validate().unwrap();
    assert_eq!(tree.len(), 2_000);

    // And the reverse.
    let mut tree = BPlusTree::new(32, 2).unwrap();
    for k in 0..2_000u32 {
        tree.insert(k, k);
    }
    tree.validate().unwrap();
    assert_eq!(tree.len(), 2_000);
}
