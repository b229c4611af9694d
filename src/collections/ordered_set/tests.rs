use crate::collections::{Error, OrderedSet};
use rand::seq::SliceRandom;
use rand::Rng;

const N: usize = if cfg!(miri) { 100 } else { 10000 };

fn drain_in_order<T: Ord + Clone>(set: &OrderedSet<T>) -> Result<Vec<T>, Error> {
    let mut it = set.in_order_iter();
    let mut result = Vec::new();
    while it.has_next() {
        result.push(it.next(set)?.clone());
    }
    Ok(result)
}

fn drain_pre_order<T: Ord + Clone>(set: &OrderedSet<T>) -> Result<Vec<T>, Error> {
    let mut it = set.pre_order_iter();
    let mut result = Vec::new();
    while it.has_next() {
        result.push(it.next(set)?.clone());
    }
    Ok(result)
}

/// In-order sequence is strictly ascending and agrees with len.
fn check_bst<T: Ord + Clone>(set: &OrderedSet<T>) {
    let v = set.to_vec();
    assert!(v.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(v.len(), set.len());
    assert_eq!(set.in_order().len(), set.len());
}

#[test]
fn insert_remove_scenario() {
    let mut set = OrderedSet::new();
    for x in [5, 3, 8, 1, 4] {
        assert!(set.insert(x));
    }
    assert_eq!(drain_in_order(&set), Ok(vec![1, 3, 4, 5, 8]));
    assert!(set.remove(&3));
    assert_eq!(drain_in_order(&set), Ok(vec![1, 4, 5, 8]));
    assert!(!set.contains(&3));
}

#[test]
fn duplicate_insert() {
    let mut set = OrderedSet::new();
    assert!(set.insert(7));
    assert!(set.contains(&7));
    let h = set.height();
    assert!(!set.insert(7));
    assert_eq!(set.len(), 1);
    assert_eq!(set.height(), h);
}

#[test]
fn remove_absent() {
    let mut set = OrderedSet::from([2, 1, 3]);
    let before = set.pre_order().into_iter().cloned().collect::<Vec<_>>();
    assert!(!set.remove(&9));
    assert_eq!(set.len(), 3);
    assert_eq!(set.to_vec(), [1, 2, 3]);
    let after = set.pre_order().into_iter().cloned().collect::<Vec<_>>();
    assert_eq!(before, after);
}

#[test]
fn remove_absent_does_not_trip_iterators() {
    let mut set = OrderedSet::from([2, 1, 3]);
    let mut it = set.in_order_iter();
    set.remove(&9);
    assert_eq!(it.next(&set), Ok(&1));
}

#[test]
fn height_and_size() {
    let mut set = OrderedSet::new();
    assert_eq!(set.height(), -1);
    assert_eq!(set.len(), 0);
    assert!(set.is_empty());
    set.insert(10);
    assert_eq!(set.height(), 0);
    assert_eq!(set.len(), 1);
    for x in [5, 15, 3] {
        set.insert(x);
    }
    assert_eq!(set.height(), 2);
    assert_eq!(set.len(), 4);
}

#[test]
fn ascending_insert_is_a_list() {
    let n = N;
    let mut set = OrderedSet::new();
    for i in 0..n {
        set.insert(i);
    }
    assert_eq!(set.height(), n as isize - 1);
    assert_eq!(set.iter().count(), n);
    assert_eq!(drain_in_order(&set).unwrap().len(), n);
    for i in (0..n).rev() {
        assert!(set.remove(&i));
    }
    assert!(set.is_empty());
    crate::print_memory();
}

#[test]
fn remove_leaf() {
    let mut set = OrderedSet::from([5, 3, 8]);
    assert!(set.remove(&8));
    assert_eq!(drain_pre_order(&set), Ok(vec![5, 3]));
}

#[test]
fn remove_right_child_only() {
    let mut set = OrderedSet::from([5, 3, 8, 9]);
    assert!(set.remove(&8));
    assert_eq!(drain_pre_order(&set), Ok(vec![5, 3, 9]));
}

#[test]
fn remove_left_child_only() {
    let mut set = OrderedSet::from([5, 3, 8, 7]);
    assert!(set.remove(&8));
    assert_eq!(drain_pre_order(&set), Ok(vec![5, 3, 7]));
}

#[test]
fn remove_two_children_uses_predecessor() {
    let mut set = OrderedSet::from([5, 3, 8, 1, 4, 7, 9]);
    assert!(set.remove(&5));
    // 4 is the rightmost of the left subtree and takes the root.
    assert_eq!(drain_pre_order(&set), Ok(vec![4, 3, 1, 8, 7, 9]));
    assert!(set.remove(&4));
    assert_eq!(drain_pre_order(&set), Ok(vec![3, 1, 8, 7, 9]));
    check_bst(&set);
}

#[test]
fn remove_root_until_empty() {
    let mut set = OrderedSet::from([5, 3, 8, 1, 4, 7, 9]);
    loop {
        let root = match set.pre_order().first() {
            Some(&&root) => root,
            None => break,
        };
        assert!(set.remove(&root));
        check_bst(&set);
    }
    assert_eq!(set.height(), -1);
}

#[test]
fn traversals() {
    let set = OrderedSet::from([5, 3, 8, 1, 4]);
    assert_eq!(set.pre_order(), [&5, &3, &1, &4, &8]);
    assert_eq!(set.in_order(), [&1, &3, &4, &5, &8]);
    assert_eq!(set.post_order(), [&1, &4, &3, &8, &5]);
    assert_eq!(set.first(), Some(&1));
    assert_eq!(set.last(), Some(&8));
    let empty: OrderedSet<i32> = OrderedSet::new();
    assert!(empty.pre_order().is_empty());
    assert!(empty.post_order().is_empty());
    assert_eq!(empty.first(), None);
}

#[test]
fn absent_arguments() {
    let mut set = OrderedSet::from([1]);
    assert_eq!(set.try_insert(None), Err(Error::InvalidArgument));
    assert_eq!(set.try_remove::<i32>(None), Err(Error::InvalidArgument));
    assert_eq!(set.len(), 1);
    assert_eq!(set.try_insert(Some(2)), Ok(true));
    assert_eq!(set.try_remove(Some(&1)), Ok(true));
    assert_eq!(set.try_remove(Some(&1)), Ok(false));
}

#[test]
fn rejected_argument_does_not_trip_iterators() {
    let mut set = OrderedSet::from([1, 2]);
    let mut it = set.in_order_iter();
    let _ = set.try_insert(None);
    assert_eq!(it.next(&set), Ok(&1));
}

#[test]
fn borrowed_lookup() {
    let mut set = OrderedSet::new();
    set.insert("b".to_string());
    set.insert("a".to_string());
    assert!(set.contains("a"));
    assert!(set.remove("b"));
    assert_eq!(set.to_string(), "[a]");
}

#[test]
fn display_and_debug() {
    let set = OrderedSet::from([3, 1, 2]);
    assert_eq!(set.to_string(), "[1, 2, 3]");
    assert_eq!(format!("{set:?}"), "{1, 2, 3}");
    let empty: OrderedSet<i32> = OrderedSet::new();
    assert_eq!(empty.to_string(), "[]");
}

#[test]
fn concurrent_insert_detected() {
    let mut set = OrderedSet::from([1, 2, 3]);
    let mut it = set.in_order_iter();
    set.insert(4);
    assert_eq!(it.next(&set), Err(Error::ConcurrentModification));
    // Still failing, the iterator did not advance.
    assert!(it.has_next());
    assert_eq!(it.next(&set), Err(Error::ConcurrentModification));
}

#[test]
fn concurrent_change_after_next() {
    let mut set = OrderedSet::from([2, 1, 3]);
    let mut it = set.pre_order_iter();
    assert_eq!(it.next(&set), Ok(&2));
    set.remove(&3);
    assert_eq!(it.next(&set), Err(Error::ConcurrentModification));
    assert_eq!(it.remove(&mut set), Err(Error::ConcurrentModification));
    assert!(set.contains(&2));
}

#[test]
fn clear_detected() {
    let mut set = OrderedSet::from([1, 2]);
    let mut it = set.in_order_iter();
    set.clear();
    assert!(set.is_empty());
    assert_eq!(it.next(&set), Err(Error::ConcurrentModification));
}

#[test]
fn iterator_from_other_set_rejected() {
    let a = OrderedSet::from([1, 2, 3]);
    let b = a.clone();
    let mut it = a.in_order_iter();
    assert_eq!(it.next(&b), Err(Error::ConcurrentModification));
    assert_eq!(it.next(&a), Ok(&1));
}

#[test]
fn new_iterator_after_change_is_valid() {
    let mut set = OrderedSet::from([1, 2]);
    set.insert(3);
    assert_eq!(drain_in_order(&set), Ok(vec![1, 2, 3]));
}

#[test]
fn exhausted_iterator() {
    let set = OrderedSet::from([1]);
    let mut it = set.in_order_iter();
    assert_eq!(it.next(&set), Ok(&1));
    assert!(!it.has_next());
    assert_eq!(it.next(&set), Err(Error::NoSuchElement));
    let empty: OrderedSet<i32> = OrderedSet::new();
    let mut it = empty.pre_order_iter();
    assert!(!it.has_next());
    assert_eq!(it.next(&empty), Err(Error::NoSuchElement));
}

#[test]
fn exhausted_takes_priority_over_modification() {
    let mut set = OrderedSet::new();
    let mut it = set.in_order_iter();
    set.insert(1);
    assert_eq!(it.next(&set), Err(Error::NoSuchElement));
}

#[test]
fn iterator_remove_illegal_state() {
    let mut set = OrderedSet::from([1, 2, 3]);
    let mut it = set.in_order_iter();
    assert_eq!(it.remove(&mut set), Err(Error::IllegalState));
    assert_eq!(it.next(&set), Ok(&1));
    assert_eq!(it.remove(&mut set), Ok(1));
    assert_eq!(it.remove(&mut set), Err(Error::IllegalState));
    assert_eq!(it.next(&set), Ok(&2));
    assert_eq!(it.next(&set), Ok(&3));
    // Nothing left to visit.
    assert_eq!(it.remove(&mut set), Err(Error::IllegalState));
    assert_eq!(set.to_vec(), [2, 3]);
}

#[test]
fn iterator_remove_continues() {
    // Own removals do not trip the iterator that made them.
    let mut set = OrderedSet::from([5, 3, 8, 1, 4, 7, 9]);
    let mut it = set.in_order_iter();
    let mut seen = Vec::new();
    while it.has_next() {
        let x = *it.next(&set).unwrap();
        seen.push(x);
        if x % 2 == 1 && it.has_next() {
            assert_eq!(it.remove(&mut set), Ok(x));
            check_bst(&set);
        }
    }
    assert_eq!(seen, [1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(set.to_vec(), [4, 8, 9]);
}

#[test]
fn iterator_remove_trips_other_iterators() {
    let mut set = OrderedSet::from([2, 1, 3]);
    let mut a = set.in_order_iter();
    let mut b = set.in_order_iter();
    assert_eq!(a.next(&set), Ok(&1));
    assert_eq!(a.remove(&mut set), Ok(1));
    assert_eq!(b.next(&set), Err(Error::ConcurrentModification));
    assert_eq!(a.next(&set), Ok(&2));
}

#[test]
fn pre_order_iterator_remove_two_children() {
    let mut set = OrderedSet::from([5, 3, 8, 1, 4, 7, 9]);
    let mut it = set.pre_order_iter();
    assert_eq!(it.next(&set), Ok(&5));
    assert_eq!(it.remove(&mut set), Ok(5));
    let mut rest = Vec::new();
    while it.has_next() {
        rest.push(*it.next(&set).unwrap());
    }
    // Node 5 now holds 4, which had not been visited yet.
    assert_eq!(rest, [4, 3, 1, 8, 7, 9]);
    assert_eq!(drain_pre_order(&set), Ok(rest));
}

#[test]
fn pre_order_iterator_remove_one_child() {
    let mut set = OrderedSet::from([5, 3, 1, 8]);
    let mut it = set.pre_order_iter();
    assert_eq!(it.next(&set), Ok(&5));
    assert_eq!(it.next(&set), Ok(&3));
    assert_eq!(it.remove(&mut set), Ok(3));
    let mut rest = Vec::new();
    while it.has_next() {
        rest.push(*it.next(&set).unwrap());
    }
    assert_eq!(rest, [1, 8]);
    assert_eq!(set.to_vec(), [1, 5, 8]);
}

#[test]
fn pre_order_iterator_remove_all_but_last() {
    let mut rng = rand::thread_rng();
    let mut v: Vec<u32> = (0..200).collect();
    v.shuffle(&mut rng);
    let mut set: OrderedSet<u32> = v.iter().copied().collect();
    let order = drain_pre_order(&set).unwrap();
    let mut it = set.pre_order_iter();
    let mut seen = Vec::new();
    while it.has_next() {
        seen.push(*it.next(&set).unwrap());
        if it.has_next() {
            it.remove(&mut set).unwrap();
        }
    }
    assert_eq!(set.len(), 1);
    assert_eq!(seen.len(), 200);
    let mut sorted = seen.clone();
    sorted.sort();
    assert_eq!(sorted, (0..200).collect::<Vec<_>>());
    // First visit is the same root either way.
    assert_eq!(seen[0], order[0]);
}

#[test]
fn snapshot_iterator_ignores_changes() {
    let mut set = OrderedSet::from([1, 2, 3]);
    let mut it = set.snapshot_iter();
    assert!(it.has_next());
    assert_eq!(it.next(), Some(1));
    set.insert(4);
    set.remove(&2);
    assert_eq!(it.len(), 2);
    assert_eq!(it.collect::<Vec<_>>(), [2, 3]);
}

#[test]
fn snapshot_iterator_exhausted() {
    let set: OrderedSet<i32> = OrderedSet::new();
    let mut it = set.snapshot_iter();
    assert!(!it.has_next());
    assert_eq!(it.next(), None);
}

#[test]
fn borrowing_iter() {
    let set = OrderedSet::from([4, 2, 6, 1, 3, 5, 7]);
    let it = set.iter();
    assert_eq!(it.len(), 7);
    assert_eq!(it.min(), Some(&1));
    let v: Vec<_> = (&set).into_iter().copied().collect();
    assert_eq!(v, [1, 2, 3, 4, 5, 6, 7]);
    let mut sum = 0;
    for x in &set {
        sum += x;
    }
    assert_eq!(sum, 28);
}

#[test]
fn extend_and_collect() {
    let mut set: OrderedSet<i32> = [3, 1].into_iter().collect();
    set.extend([2, 3]);
    set.extend(&[0, 9]);
    assert_eq!(set.to_vec(), [0, 1, 2, 3, 9]);
    assert_eq!(set, OrderedSet::from([9, 3, 2, 1, 0]));
    assert_ne!(set, OrderedSet::from([9, 3, 2, 1]));
}

#[test]
fn clone_is_independent() {
    let mut a = OrderedSet::from([1, 2, 3]);
    let b = a.clone();
    a.remove(&2);
    assert_eq!(b.to_vec(), [1, 2, 3]);
    assert_eq!(a.to_vec(), [1, 3]);
}

#[test]
fn slots_are_reused() {
    let mut set = OrderedSet::new();
    for round in 0..10 {
        for i in 0..100 {
            set.insert(i * 7 % 100 + round);
        }
        for i in 0..100 {
            set.remove(&(i * 7 % 100 + round));
        }
        assert!(set.is_empty());
    }
    set.insert(1);
    assert_eq!(set.to_vec(), [1]);
}

#[test]
fn random_against_std() {
    let mut rng = rand::thread_rng();
    let mut set = OrderedSet::new();
    let mut std_set = std::collections::BTreeSet::new();
    for _ in 0..N {
        let x: u16 = rng.gen_range(0..500);
        if rng.gen_bool(0.6) {
            assert_eq!(set.insert(x), std_set.insert(x));
        } else {
            assert_eq!(set.remove(&x), std_set.remove(&x));
        }
        assert_eq!(set.len(), std_set.len());
    }
    assert!(set.iter().eq(std_set.iter()));
    for x in 0..500u16 {
        assert_eq!(set.contains(&x), std_set.contains(&x));
    }
    check_bst(&set);
    assert!(set.height() >= (set.len() as f64).log2().floor() as isize);
}

const ROUNDS: usize = if cfg!(miri) { 10 } else { 300 };

#[test]
fn in_order_iterator_random_input() {
    let mut rng = rand::thread_rng();
    for _ in 0..ROUNDS {
        let n = rng.gen_range(0..200);
        let v: Vec<u32> = (0..n).map(|_| rng.gen_range(0..150)).collect();
        let set: OrderedSet<u32> = v.iter().copied().collect();
        let std_set: std::collections::BTreeSet<u32> = v.into_iter().collect();
        let seen = drain_in_order(&set).unwrap();
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen, std_set.into_iter().collect::<Vec<_>>());
    }
}

#[test]
fn in_order_iterator_random_remove() {
    let mut rng = rand::thread_rng();
    for _ in 0..ROUNDS {
        let mut v: Vec<u32> = (0..1000).collect();
        v.shuffle(&mut rng);
        v.truncate(rng.gen_range(1..100));
        let mut set: OrderedSet<u32> = v.iter().copied().collect();
        let mut kept: std::collections::BTreeSet<u32> = v.into_iter().collect();
        let all: Vec<u32> = kept.iter().copied().collect();
        let mut it = set.in_order_iter();
        let mut seen = Vec::new();
        while it.has_next() {
            let x = *it.next(&set).unwrap();
            seen.push(x);
            if it.has_next() && rng.gen_bool(0.5) {
                assert_eq!(it.remove(&mut set), Ok(x));
                kept.remove(&x);
                check_bst(&set);
            }
        }
        // Every element is visited once, in order, whether or not it was removed.
        assert_eq!(seen, all);
        assert!(set.iter().eq(kept.iter()));
        check_bst(&set);
    }
}

#[test]
fn storage_released_when_empty() {
    let mut set = OrderedSet::new();
    for i in 0..N {
        set.insert(i);
    }
    assert!(set.tree.slot_capacity() > N);
    for i in 0..N {
        set.remove(&i);
    }
    assert!(set.is_empty());
    assert!(set.tree.slot_capacity() < N);
    set.insert(3);
    set.insert(1);
    assert_eq!(set.to_vec(), [1, 3]);
    crate::print_memory();
}

#[test]
#[cfg(feature = "serde")]
fn serde_keeps_shape() {
    let set = OrderedSet::from([5, 3, 8, 1, 4, 7, 9]);
    let ser = bincode::serialize(&set).unwrap();
    let de: OrderedSet<i32> = bincode::deserialize(&ser).unwrap();
    assert_eq!(de, set);
    assert_eq!(de.pre_order(), set.pre_order());
    assert_eq!(de.height(), set.height());
}
