use std::num::NonZeroUsize;

use gdata::{vector, ErasedVector, Policy, Vector, VectorError, GROWTH_CHUNK};

fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

fn int(bytes: &[u8]) -> i32 {
    i32::from_ne_bytes(bytes.try_into().expect("element is 4 bytes"))
}

// =============================================================================
// Typed vector
// =============================================================================

#[test]
fn round_trip_at_each_end() {
    let mut v = Vector::new();
    v.push_back(7u64).expect("push_back");
    assert_eq!(v.pop_back(), Some(7));

    v.push_front(11).expect("push_front");
    assert_eq!(v.pop_front(), Some(11));
    assert!(v.is_empty());
}

#[test]
fn bulk_front_push_keeps_order() {
    let mut v = Vector::new();
    v.extend_front_from_slice(&[1, 2, 3]).expect("extend_front");
    assert_eq!(v, [1, 2, 3]);
}

#[test]
fn one_at_a_time_across_chunk_boundaries() {
    let n = 2 * GROWTH_CHUNK + 1;
    let mut v = Vector::new();
    for i in 0..n {
        v.push_back(i).expect("push_back");
        assert!(v.window().is_valid());
    }
    assert_eq!(v.iter().copied().collect::<Vec<_>>(), (0..n).collect::<Vec<_>>());

    let mut v = Vector::new();
    for i in 0..n {
        v.push_front(i).expect("push_front");
    }
    assert_eq!(
        v.iter().copied().collect::<Vec<_>>(),
        (0..n).rev().collect::<Vec<_>>()
    );
}

#[test]
fn emptied_vector_is_reusable() {
    let mut v: Vector<u32> = Vector::new();
    v.extend_back_from_slice(&(0..10_000).collect::<Vec<_>>())
        .expect("extend_back");
    let peak = v.capacity();

    for expected in (0..10_000).rev() {
        assert_eq!(v.pop_back(), Some(expected));
    }
    assert_eq!(v.pop_back(), None);
    assert!(v.capacity() < peak);

    v.push_back(1).expect("push_back");
    v.push_front(0).expect("push_front");
    assert_eq!(v, [0, 1]);
}

#[test]
fn equality_ignores_headroom() {
    let v = vector![1, 2, 3, 4];
    let mut copy = v.clone();
    for _ in 0..100 {
        copy.push_front(0).expect("push_front");
    }
    for _ in 0..100 {
        copy.pop_front();
    }
    assert_ne!(v.window(), copy.window());
    assert_eq!(v, copy);
}

#[test]
fn slices_own_their_storage() {
    let v = vector![1, 2, 3, 4];
    let mut s = v.slice(1..3).expect("slice");
    assert_eq!(s, [2, 3]);
    s[0] = 20;
    assert_eq!(v, [1, 2, 3, 4]);
    assert_eq!(s, [20, 3]);

    assert_eq!(
        v.slice(1..9).err(),
        Some(VectorError::InvalidRange {
            begin: 1,
            end: 9,
            len: 4
        })
    );
}

#[test]
fn remove_from_either_half() {
    let mut v = vector![1, 2, 3, 4, 5];
    assert_eq!(v.remove(1), Some(2));
    assert_eq!(v, [1, 3, 4, 5]);

    let mut left = vector![1, 2, 3, 4, 5, 6];
    let mut right = left.clone();
    left.remove(2);
    right.remove(3);
    assert_eq!(left, [1, 2, 4, 5, 6]);
    assert_eq!(right, [1, 2, 3, 5, 6]);
    assert_eq!(left.remove(5), None);
}

#[test]
fn concrete_scenario() {
    let mut v: Vector<i32> = Vector::new();
    v.extend_back_from_slice(&[1, 2, 3]).expect("extend_back");
    v.extend_front_from_slice(&[9, 8]).expect("extend_front");
    assert_eq!(v, [9, 8, 1, 2, 3]);
    assert_eq!(v.len(), 5);

    assert_eq!(v.pop_back(), Some(3));
    assert_eq!(v, [9, 8, 1, 2]);
    assert_eq!(v.pop_front(), Some(9));
    assert_eq!(v, [8, 1, 2]);
}

#[test]
fn small_policies_still_work() {
    let policy = Policy::default()
        .with_growth_chunk(NonZeroUsize::MIN)
        .with_max_lateral_slack(0);
    let mut v = Vector::with_policy(policy);
    for i in 0..500 {
        v.push_front(i).expect("push_front");
        v.push_back(i).expect("push_back");
    }
    while v.len() > 2 {
        let front = v.pop_front();
        let back = v.pop_back();
        assert_eq!(front, back);
        assert!(v.window().is_valid());
    }
    assert_eq!(v, [0, 0]);
}

// =============================================================================
// Byte vector
// =============================================================================

#[test]
fn erased_concrete_scenario() {
    let mut v = ErasedVector::create(4, 0, None).expect("create");
    v.push_back(3, Some(&ints(&[1, 2, 3]))).expect("push_back");
    v.push_front(2, Some(&ints(&[9, 8]))).expect("push_front");
    assert_eq!(v.as_bytes(), ints(&[9, 8, 1, 2, 3]));
    assert_eq!(v.len(), 5);

    assert_eq!(v.pop_back().map(int), Some(3));
    assert_eq!(v.as_bytes(), ints(&[9, 8, 1, 2]));
    assert_eq!(v.pop_front().map(int), Some(9));
    assert_eq!(v.as_bytes(), ints(&[8, 1, 2]));
}

#[test]
fn erased_matches_typed() {
    let mut erased = ErasedVector::new(4).expect("new");
    let mut typed = Vector::new();
    for i in 0..200 {
        if i % 3 == 0 {
            erased.push_front(1, Some(&ints(&[i]))).expect("push_front");
            typed.push_front(i).expect("push_front");
        } else {
            erased.push_back(1, Some(&ints(&[i]))).expect("push_back");
            typed.push_back(i).expect("push_back");
        }
    }
    for i in (0..150).step_by(7) {
        erased.remove(i).expect("remove");
        typed.remove(i);
    }
    assert_eq!(erased.iter().map(int).collect::<Vec<_>>(), typed.as_slice());
}
