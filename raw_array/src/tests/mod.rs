use super::*;
use crossbeam::scope;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Droppable(Arc<AtomicUsize>);

impl Drop for Droppable {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn filled(values: &[i32]) -> RawArray<i32> {
    let mut v = RawArray::try_with_capacity(values.len()).unwrap();
    for &x in values {
        v.push_within_capacity(x).unwrap();
    }
    v
}

#[test]
fn test_push_within_capacity() {
    let mut v = RawArray::try_with_capacity(2).unwrap();
    assert_eq!(v.push_within_capacity(1), Ok(()));
    assert_eq!(v.push_within_capacity(2), Ok(()));
    assert_eq!(v.push_within_capacity(3), Err(3));
    assert_eq!(v.as_slice(), &[1, 2]);
}

#[test]
fn test_grow_doubles() {
    let mut v: RawArray<u64> = RawArray::new();
    assert_eq!(v.capacity(), 0);
    v.try_grow().unwrap();
    assert_eq!(v.capacity(), 1);
    v.try_grow().unwrap();
    assert_eq!(v.capacity(), 2);
    v.try_grow().unwrap();
    assert_eq!(v.capacity(), 4);
}

#[test]
fn test_insert_remove() {
    let mut v = RawArray::try_with_capacity(3).unwrap();
    v.push_within_capacity(1).unwrap();
    v.push_within_capacity(3).unwrap();
    v.insert_within_capacity(1, 2).unwrap();
    assert_eq!(v.as_slice(), &[1, 2, 3]);
    assert_eq!(v.insert_within_capacity(0, 0), Err(0));
    assert_eq!(v.remove(1), 2);
    assert_eq!(v.as_slice(), &[1, 3]);
}

#[test]
fn test_reserve_and_shrink() {
    let mut v = filled(&[1, 2]);
    v.try_reserve_total(10).unwrap();
    assert_eq!(v.capacity(), 10);
    v.try_reserve_total(4).unwrap();
    assert_eq!(v.capacity(), 10);
    v.try_shrink_to_fit().unwrap();
    assert_eq!(v.capacity(), 2);
    assert_eq!(v.as_slice(), &[1, 2]);
    v.clear_with(drop);
    v.try_shrink_to_fit().unwrap();
    assert_eq!(v.capacity(), 0);
}

#[test]
fn test_capacity_overflow_is_reported() {
    let mut v: RawArray<u64> = RawArray::new();
    assert_eq!(
        v.try_reserve_total(usize::MAX),
        Err(AllocError::CapacityOverflow)
    );
    assert_eq!(v.capacity(), 0);
}

#[test]
fn test_insert_with_fills_gap() {
    let mut v = filled(&[1, 5]);
    v.try_reserve_total(5).unwrap();
    let made: Result<(), ()> = v.insert_with(1, 3, |k| Ok(k as i32 + 2), drop);
    assert_eq!(made, Ok(()));
    assert_eq!(v.as_slice(), &[1, 2, 3, 4, 5]);
}

#[test]
fn test_insert_with_rolls_back() {
    let mut v = filled(&[10, 20, 30]);
    v.try_reserve_total(6).unwrap();
    let mut discarded = Vec::new();
    let result = v.insert_with(
        1,
        3,
        |k| if k < 2 { Ok(100 + k as i32) } else { Err("boom") },
        |x| discarded.push(x),
    );
    assert_eq!(result, Err("boom"));
    assert_eq!(v.as_slice(), &[10, 20, 30]);
    assert_eq!(discarded, vec![100, 101]);
}

#[test]
fn test_insert_with_rollback_drops_nothing_twice() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let mut v = RawArray::try_with_capacity(4).unwrap();
        assert!(v.push_within_capacity(Droppable(counter.clone())).is_ok());
        assert!(v.push_within_capacity(Droppable(counter.clone())).is_ok());
        let c = counter.clone();
        let result = v.insert_with(
            0,
            2,
            |k| if k == 0 { Ok(Droppable(c.clone())) } else { Err(()) },
            drop,
        );
        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(v.len(), 2);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[test]
fn test_remove_range_with() {
    let mut v = filled(&[0, 1, 2, 3, 4, 5]);
    let mut gone = Vec::new();
    v.remove_range_with(1, 4, |x| gone.push(x));
    assert_eq!(v.as_slice(), &[0, 4, 5]);
    assert_eq!(gone, vec![1, 2, 3]);
    v.remove_range_with(1, 1, |_| unreachable!());
    assert_eq!(v.as_slice(), &[0, 4, 5]);
}

#[test]
fn test_truncate_with() {
    let mut v = filled(&[1, 2, 3, 4]);
    let mut gone = Vec::new();
    v.truncate_with(2, |x| gone.push(x));
    assert_eq!(v.as_slice(), &[1, 2]);
    assert_eq!(gone, vec![3, 4]);
    v.truncate_with(5, |_| unreachable!());
    assert_eq!(v.len(), 2);
}

#[test]
fn test_raii_drop() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let mut v = RawArray::new();
        for _ in 0..10 {
            if v.spare() == 0 {
                v.try_grow().unwrap();
            }
            assert!(v.push_within_capacity(Droppable(counter.clone())).is_ok());
        }
    }
    assert_eq!(counter.load(Ordering::SeqCst), 10);
}

static UNIT_DROPS: AtomicUsize = AtomicUsize::new(0);

struct Unit;

impl Drop for Unit {
    fn drop(&mut self) {
        UNIT_DROPS.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_zero_sized_elements() {
    {
        let mut v = RawArray::try_with_capacity(1).unwrap();
        assert_eq!(v.capacity(), usize::MAX);
        for _ in 0..5 {
            assert!(v.push_within_capacity(Unit).is_ok());
        }
        assert!(v.insert_within_capacity(2, Unit).is_ok());
        drop(v.remove(0));
        assert_eq!(UNIT_DROPS.load(Ordering::SeqCst), 1);
        assert_eq!(v.len(), 5);

        v.try_reserve_total(1000).unwrap();
        v.try_shrink_to_fit().unwrap();
        assert_eq!(v.capacity(), usize::MAX);
        assert_eq!(v.try_grow(), Err(AllocError::CapacityOverflow));

        v.truncate_with(3, drop);
        assert_eq!(UNIT_DROPS.load(Ordering::SeqCst), 3);
        assert_eq!(v.len(), 3);
    }
    assert_eq!(UNIT_DROPS.load(Ordering::SeqCst), 6);
}

#[test]
fn test_iterators() {
    let mut v = filled(&[10, 20, 30]);

    let mut sum = 0;
    for &x in &v {
        sum += x;
    }
    assert_eq!(sum, 60);

    for x in &mut v {
        *x += 1;
    }
    assert_eq!(v[0], 11);
    assert_eq!(format!("{v:?}"), "[11, 21, 31]");
}

#[test]
fn test_concurrent_reads() {
    let v = filled(&(0..100).collect::<Vec<_>>());

    scope(|s| {
        s.spawn(|_| assert_eq!(v.iter().sum::<i32>(), 4950));
        s.spawn(|_| assert_eq!(v.iter().filter(|x| *x % 2 == 0).count(), 50));
    })
    .unwrap();
}

#[test]
#[should_panic(expected = "Index out of bounds")]
fn test_out_of_bounds_remove() {
    let mut v: RawArray<i32> = RawArray::new();
    v.remove(0);
}

#[test]
#[should_panic(expected = "Index out of bounds")]
fn test_out_of_bounds_insert() {
    let mut v: RawArray<i32> = RawArray::try_with_capacity(4).unwrap();
    let _ = v.insert_within_capacity(1, 10);
}

#[test]
#[should_panic(expected = "insufficient capacity")]
fn test_insert_with_requires_reservation() {
    let mut v = filled(&[1]);
    let _: Result<(), ()> = v.insert_with(0, 1, |_| Ok(0), drop);
}
