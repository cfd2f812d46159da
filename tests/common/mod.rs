#![allow(dead_code)]

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use dynlist::DataType;

const NEVER: usize = usize::MAX;

/// An `i32` descriptor whose `dup` can be armed to fail, and which counts
/// every copy and release it performs.
pub struct FlakyType {
    fail_after: AtomicUsize,
    dups: AtomicUsize,
    destroys: AtomicUsize,
}

impl FlakyType {
    pub fn new() -> Self {
        Self {
            fail_after: AtomicUsize::new(NEVER),
            dups: AtomicUsize::new(0),
            destroys: AtomicUsize::new(0),
        }
    }

    /// The next `successes` copies succeed; the one after fails once.
    pub fn fail_after(&self, successes: usize) {
        self.fail_after.store(successes, AtomicOrdering::SeqCst);
    }

    pub fn dups(&self) -> usize {
        self.dups.load(AtomicOrdering::SeqCst)
    }

    pub fn destroys(&self) -> usize {
        self.destroys.load(AtomicOrdering::SeqCst)
    }

    /// Copies made and not yet released.
    pub fn live(&self) -> usize {
        self.dups() - self.destroys()
    }
}

impl DataType<i32> for FlakyType {
    fn name(&self) -> &str {
        "flaky-int"
    }

    fn dup(&self, value: &i32) -> Option<i32> {
        let remaining = self.fail_after.load(AtomicOrdering::SeqCst);
        if remaining != NEVER {
            if remaining == 0 {
                self.fail_after.store(NEVER, AtomicOrdering::SeqCst);
                return None;
            }
            self.fail_after.store(remaining - 1, AtomicOrdering::SeqCst);
        }
        self.dups.fetch_add(1, AtomicOrdering::SeqCst);
        Some(*value)
    }

    fn destroy(&self, _value: i32) {
        self.destroys.fetch_add(1, AtomicOrdering::SeqCst);
    }

    fn print(&self, value: &i32, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{value}")
    }

    fn compare(&self, a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }
}

pub fn contents<T: Clone>(array: &dynlist::DynamicArray<'_, T>) -> Vec<T> {
    array.iter().cloned().collect()
}
