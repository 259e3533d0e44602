use std::time::{SystemTime, UNIX_EPOCH};

use proptest::prelude::*;
use rand::prelude::random;
use rand::seq::SliceRandom;
use rand::{rngs::SmallRng, SeedableRng};

use crate::avl::Avl;
use crate::error::Error;
use crate::node::levels;
use crate::tree::BinaryTree;

#[test]
fn test_id() {
    let index: Avl<i64> = Avl::new("test-avl");
    assert_eq!(index.id(), "test-avl".to_string());
}

#[test]
fn test_len() {
    let index: Avl<i64> = Avl::new("test-avl");
    assert_eq!(index.len(), 0);
    assert!(index.is_empty());
    assert_eq!(index.height(), -1);
    assert_eq!(index.width(), 0);
    assert_eq!(index.leaf_count(), 0);
    assert_eq!(index.first(), None);
    assert_eq!(index.last(), None);
    assert!(index.iter().next().is_none());
}

#[test]
fn test_insert() {
    let mut index: Avl<i64> = Avl::new("test-avl");
    let mut refns = RefSet::new(10);

    for key in [2, 1, 3, 6, 5, 4, 8, 0, 9, 7].iter() {
        assert!(index.insert(*key).is_ok());
        assert!(refns.insert(*key));
        assert!(index.validate().is_ok());
    }

    assert_eq!(index.len(), 10);
    assert_eq!(index.version(), 10);
    assert_eq!(index.first(), Some(&0));
    assert_eq!(index.last(), Some(&9));

    // error case
    assert_eq!(index.insert(7), Err(Error::DuplicateKey));
    assert_eq!(index.len(), 10);
    assert_eq!(index.version(), 10);
    assert!(index.validate().is_ok());

    for key in 0..10 {
        assert_eq!(index.contains(&key), refns.contains(key));
        assert_eq!(index.get(&key), Some(&key));
    }
    assert!(!index.contains(&10));

    let (iter, iter_ref) = (index.iter(), refns.iter());
    assert!(iter.cloned().eq(iter_ref));
    let (iter, iter_ref) = (index.iter_rev(), refns.reverse());
    assert!(iter.cloned().eq(iter_ref));
}

#[test]
fn test_scenario_mixed() {
    let index = Avl::load_from("test-avl", vec![5, 3, 8, 1, 4, 7, 9]).unwrap();
    assert_eq!(index.to_vec(), vec![1, 3, 4, 5, 7, 8, 9]);
    assert!(index.height() <= 3);
    assert_eq!(index.height(), 2);
    assert_eq!(index.leaf_count(), 4);
    assert_eq!(index.width(), 4);
}

#[test]
fn test_scenario_ascending() {
    let index = Avl::load_from("test-avl", 1..=7).unwrap();
    assert!(index.height() <= 3);

    let mut pre = vec![];
    index.traverse_pre_order(|v| pre.push(*v));
    assert_eq!(pre, vec![4, 2, 1, 3, 6, 5, 7]);
}

#[test]
fn test_scenario_remove() {
    let mut index = Avl::load_from("test-avl", vec![10, 20, 30]).unwrap();
    assert!(index.remove(&20));
    assert_eq!(index.to_vec(), vec![10, 30]);
    assert_eq!(index.len(), 2);
    assert!(index.validate().is_ok());
}

#[test]
fn test_load_duplicate() {
    let res = Avl::load_from("test-avl", vec![1, 2, 1]);
    assert_eq!(res.err(), Some(Error::DuplicateKey));
}

#[test]
fn test_rotations() {
    // left-left
    let index = Avl::load_from("ll", vec![3, 2, 1]).unwrap();
    assert_eq!(index.root().map(|n| *n.value()), Some(2));
    // left-right
    let index = Avl::load_from("lr", vec![3, 1, 2]).unwrap();
    assert_eq!(index.root().map(|n| *n.value()), Some(2));
    // right-right
    let index = Avl::load_from("rr", vec![1, 2, 3]).unwrap();
    assert_eq!(index.root().map(|n| *n.value()), Some(2));
    // right-left
    let index = Avl::load_from("rl", vec![1, 3, 2]).unwrap();
    assert_eq!(index.root().map(|n| *n.value()), Some(2));

    for order in [vec![3, 2, 1], vec![3, 1, 2], vec![1, 2, 3], vec![1, 3, 2]].iter() {
        let index = Avl::load_from("rot", order.clone()).unwrap();
        let stats = index.validate().unwrap();
        assert_eq!(stats.height(), Some(1));
        assert_eq!(stats.leaves(), Some(2));
    }
}

#[test]
fn test_remove_rotations() {
    // removing 4 leaves 1 <- 2 <- 3 heavy on the left, left child is
    // balanced-left: single right rotation.
    let mut index = Avl::load_from("del-ll", vec![3, 2, 4, 1]).unwrap();
    assert!(index.remove(&4));
    assert_eq!(index.root().map(|n| *n.value()), Some(2));
    assert!(index.validate().is_ok());

    // left child heavy on the right: double rotation.
    let mut index = Avl::load_from("del-lr", vec![3, 1, 4, 2]).unwrap();
    assert!(index.remove(&4));
    assert_eq!(index.root().map(|n| *n.value()), Some(2));
    assert!(index.validate().is_ok());

    // left child with balance factor zero resolves to a single rotation.
    let mut index = Avl::load_from("del-tie", vec![5, 3, 6, 2, 4]).unwrap();
    assert!(index.remove(&6));
    assert_eq!(index.root().map(|n| *n.value()), Some(3));
    assert_eq!(index.to_vec(), vec![2, 3, 4, 5]);
    assert!(index.validate().is_ok());

    // mirrors.
    let mut index = Avl::load_from("del-rr", vec![2, 1, 3, 4]).unwrap();
    assert!(index.remove(&1));
    assert_eq!(index.root().map(|n| *n.value()), Some(3));
    let mut index = Avl::load_from("del-rl", vec![2, 1, 4, 3]).unwrap();
    assert!(index.remove(&1));
    assert_eq!(index.root().map(|n| *n.value()), Some(3));
    let mut index = Avl::load_from("del-tie", vec![2, 1, 4, 3, 5]).unwrap();
    assert!(index.remove(&1));
    assert_eq!(index.root().map(|n| *n.value()), Some(4));
    assert!(index.validate().is_ok());
}

#[test]
fn test_remove() {
    let mut index: Avl<i64> = Avl::new("test-avl");
    let mut refns = RefSet::new(11);

    for key in [2, 1, 3, 6, 5, 4, 8, 0, 9, 7].iter() {
        index.insert(*key).unwrap();
        refns.insert(*key);
    }

    // remove a missing value.
    let (height, version) = (index.height(), index.version());
    assert!(!index.remove(&10));
    assert!(!refns.remove(10));
    assert_eq!(index.len(), 10);
    assert_eq!(index.height(), height);
    assert_eq!(index.version(), version);
    assert!(index.iter().cloned().eq(refns.iter()));

    // two children, successor copied up.
    let root = index.root().map(|n| *n.value()).unwrap();
    assert_eq!(index.take(&root), Some(root));
    assert!(refns.remove(root));
    assert!(index.validate().is_ok());
    assert!(index.iter().cloned().eq(refns.iter()));

    for key in 0..10 {
        assert_eq!(index.remove(&key), refns.remove(key));
        assert!(index.validate().is_ok());
    }
    assert_eq!(index.len(), 0);
    assert_eq!(index.height(), -1);
    assert!(index.iter().next().is_none());
}

#[test]
fn test_clear() {
    let mut index = Avl::load_from("test-avl", 0..100).unwrap();
    let version = index.version();
    index.clear();
    assert_eq!(index.len(), 0);
    assert_eq!(index.id(), "test-avl".to_string());
    assert!(index.version() > version);
    assert!(index.root().is_none());
    assert!(index.insert(1).is_ok());
    assert_eq!(index.to_vec(), vec![1]);
}

#[test]
fn test_traversals() {
    let index = Avl::load_from("test-avl", vec![5, 3, 8, 1, 4, 7, 9]).unwrap();

    let (mut pre, mut ino, mut post, mut rev) = (vec![], vec![], vec![], vec![]);
    index.traverse_pre_order(|v| pre.push(*v));
    index.traverse_in_order(|v| ino.push(*v));
    index.traverse_post_order(|v| post.push(*v));
    index.traverse_in_reverse_order(|v| rev.push(*v));

    assert_eq!(pre, vec![5, 3, 1, 4, 8, 7, 9]);
    assert_eq!(ino, vec![1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(post, vec![1, 4, 3, 7, 9, 8, 5]);
    assert_eq!(rev, vec![9, 8, 7, 5, 4, 3, 1]);

    let items: Vec<i32> = (&index).into_iter().cloned().collect();
    assert_eq!(items, ino);
}

#[test]
fn test_copy_to() {
    let index = Avl::load_from("test-avl", vec![3, 1, 2]).unwrap();

    let mut dest = [0; 5];
    assert!(index.copy_to(&mut dest, 2).is_ok());
    assert_eq!(dest, [0, 0, 1, 2, 3]);

    let mut dest = [0; 5];
    match index.copy_to(&mut dest, 3) {
        Err(Error::InvalidArgument(_)) => (),
        res => panic!("unexpected {:?}", res),
    }
    assert_eq!(dest, [0; 5]);
    match index.copy_to(&mut dest, 6) {
        Err(Error::InvalidArgument(_)) => (),
        res => panic!("unexpected {:?}", res),
    }

    let empty: Avl<i32> = Avl::new("empty");
    let mut dest: [i32; 0] = [];
    assert!(empty.copy_to(&mut dest, 0).is_ok());
}

#[test]
fn test_comparator() {
    let by_len = |a: &String, b: &String| a.len().cmp(&b.len());
    let mut index = Avl::with_comparator("test-avl", by_len);
    index.insert("ccc".to_string()).unwrap();
    index.insert("a".to_string()).unwrap();
    index.insert("bb".to_string()).unwrap();

    // equal length is a duplicate as per the comparator.
    assert_eq!(index.insert("zz".to_string()), Err(Error::DuplicateKey));
    assert_eq!(index.get(&"xy".to_string()), Some(&"bb".to_string()));
    assert_eq!(index.take(&"qq".to_string()), Some("bb".to_string()));

    let items: Vec<&str> = index.iter().map(|s| s.as_str()).collect();
    assert_eq!(items, vec!["a", "ccc"]);
    assert!(index.validate().is_ok());
}

#[test]
fn test_stats() {
    let index = Avl::load_from("test-avl", 0..1000_i64).unwrap();
    assert_eq!(index.stats().entries(), 1000);
    assert_eq!(index.stats().height(), None);

    let stats = index.validate().unwrap();
    assert_eq!(stats.entries(), 1000);
    assert_eq!(stats.height(), Some(index.height()));
    assert_eq!(stats.leaves(), Some(index.leaf_count()));
    assert_eq!(stats.width(), Some(index.width()));

    let depths = stats.depths().unwrap();
    assert_eq!(depths.samples(), index.leaf_count());
    assert_eq!(depths.max() as isize, index.height());
    assert!(depths.min() <= depths.mean() && depths.mean() <= depths.max());
    assert!(!depths.percentiles().is_empty());
    depths.log_summary("test-avl ");

    let empty: Avl<i64> = Avl::new("empty");
    assert!(empty.validate().unwrap().depths().is_none());
}

#[test]
fn test_height_bound() {
    let mut rng = SmallRng::from_seed(make_seed().to_le_bytes());
    let mut keys: Vec<i64> = (0..10_000).collect();
    keys.shuffle(&mut rng);

    let mut index: Avl<i64> = Avl::new("test-avl");
    for (i, key) in keys.into_iter().enumerate() {
        index.insert(key).unwrap();
        if i % 997 == 0 {
            assert!(index.height() <= avl_height_bound(index.len()));
        }
    }
    assert!(index.height() <= avl_height_bound(index.len()));
    assert!(index.validate().is_ok());

    let index = Avl::load_from("sorted", 0..10_000_i64).unwrap();
    assert!(index.height() <= avl_height_bound(index.len()));
}

#[test]
fn test_cached_height() {
    let mut index: Avl<i64> = Avl::new("test-avl");
    assert_eq!(index.height(), -1);
    for key in 0..2000 {
        index.insert((key * 7919) % 2000).unwrap();
        if key % 101 == 0 {
            assert_eq!(index.height(), levels(index.root()) as isize - 1);
        }
    }
    for key in (0..2000).step_by(3) {
        assert!(index.remove(&key));
        assert_eq!(index.height(), levels(index.root()) as isize - 1);
    }
    index.clear();
    assert_eq!(index.height(), -1);
}

#[test]
fn test_clone() {
    let index = Avl::load_from("test-avl", 0..100_i64).unwrap();
    let copy = index.clone();
    assert_ne!(copy.instance(), index.instance());
    assert_eq!(copy.version(), index.version());
    assert_eq!(copy.id(), index.id());
    assert!(copy.iter().eq(index.iter()));
    assert!(copy.validate().is_ok());
}

#[test]
fn test_crud() {
    let size = 1000;
    let mut index: Avl<i64> = Avl::new("test-avl");
    let mut refns = RefSet::new(size);

    for _ in 0..100_000 {
        let key: i64 = (random::<i64>() % (size as i64)).abs();
        let op: i64 = (random::<i64>() % 3).abs();
        match op {
            0 => {
                let ok = index.insert(key).is_ok();
                assert_eq!(ok, refns.insert(key));
            }
            1 => {
                assert_eq!(index.remove(&key), refns.remove(key));
            }
            2 => {
                assert_eq!(index.contains(&key), refns.contains(key));
            }
            op => panic!("unreachable {}", op),
        };
        assert_eq!(index.len(), refns.len());
    }
    assert!(index.validate().is_ok());
    assert!(index.height() <= avl_height_bound(index.len()));

    assert!(index.iter().cloned().eq(refns.iter()));
    assert!(index.iter_rev().cloned().eq(refns.reverse()));
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u16),
    Remove(u16),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    // small domain so removes hit existing values.
    prop_oneof![
        (0..256_u16).prop_map(Op::Insert),
        (0..256_u16).prop_map(Op::Remove),
    ]
}

proptest! {
    /// After every insert and remove the tree stays sorted, balanced and
    /// in agreement with BTreeSet.
    #[test]
    fn prop_invariants(ops in prop::collection::vec(arbitrary_op(), 0..400)) {
        let mut index: Avl<u16> = Avl::new("prop");
        let mut control = std::collections::BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    let version = index.version();
                    let res = index.insert(v);
                    if control.insert(v) {
                        prop_assert!(res.is_ok());
                        prop_assert_eq!(index.version(), version + 1);
                    } else {
                        prop_assert_eq!(res, Err(Error::DuplicateKey));
                        prop_assert_eq!(index.version(), version);
                    }
                }
                Op::Remove(v) => {
                    prop_assert_eq!(index.remove(&v), control.remove(&v));
                }
            }
            prop_assert!(index.validate().is_ok());
            prop_assert_eq!(index.len(), control.len());
        }

        prop_assert!(index.iter().eq(control.iter()));
        prop_assert!(index.iter_rev().eq(control.iter().rev()));
        prop_assert!(index.height() <= avl_height_bound(index.len()));
    }

    /// Distinct values come back strictly ascending and descending.
    #[test]
    fn prop_round_trip(values in prop::collection::hash_set(any::<i32>(), 0..300)) {
        let index = Avl::load_from("prop", values.iter().cloned()).unwrap();
        let items = index.to_vec();
        prop_assert_eq!(items.len(), values.len());
        prop_assert!(items.windows(2).all(|w| w[0] < w[1]));

        let rev: Vec<i32> = index.iter_rev().cloned().collect();
        prop_assert_eq!(rev.len(), values.len());
        prop_assert!(rev.windows(2).all(|w| w[0] > w[1]));
    }
}

include!("./ref_test.rs");
