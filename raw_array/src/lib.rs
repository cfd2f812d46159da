use std::alloc::{Layout, alloc, dealloc, realloc};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use thiserror::Error;
use tracing::trace;

/// Failure of a growing operation. The array is left untouched when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("capacity overflow")]
    CapacityOverflow,
    #[error("allocation of {requested} slots failed")]
    OutOfMemory { requested: usize },
}

/// Contiguous, manually allocated storage for the elements of a dynamic array.
///
/// Unlike `Vec`, every operation that needs more memory reports failure as an
/// [`AllocError`] instead of aborting, and nothing ever grows implicitly: the
/// caller decides when and by how much via [`try_grow`](Self::try_grow) and
/// [`try_reserve_total`](Self::try_reserve_total).
///
/// Zero-sized `T` never allocates: the capacity is `usize::MAX` from the start.
pub struct RawArray<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    _marker: PhantomData<T>,
}

// SAFETY: RawArray owns its elements exclusively, so it can move across threads whenever T can.
unsafe impl<T: Send> Send for RawArray<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for RawArray<T> {}

impl<T> RawArray<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Creates an empty array without allocating.
    pub fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Creates an empty array with room for exactly `capacity` elements.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        let mut array = Self::new();
        if capacity > 0 && !Self::IS_ZST {
            array.do_realloc(capacity)?;
        }
        Ok(array)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots that can be filled before the next reallocation.
    pub fn spare(&self) -> usize {
        self.cap - self.len
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized and `ptr` is valid (or dangling with len 0).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Grows the buffer to exactly `total` slots if it is currently smaller.
    /// Never shrinks.
    pub fn try_reserve_total(&mut self, total: usize) -> Result<(), AllocError> {
        if total > self.cap {
            self.do_realloc(total)?;
        }
        Ok(())
    }

    /// Doubles the capacity (an empty buffer grows to one slot).
    pub fn try_grow(&mut self) -> Result<(), AllocError> {
        let new_cap = if self.cap == 0 {
            1
        } else {
            self.cap.checked_mul(2).ok_or(AllocError::CapacityOverflow)?
        };
        self.do_realloc(new_cap)
    }

    /// Shrinks the capacity to the current length. An empty array releases its buffer.
    /// No-op for zero-sized `T`.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), AllocError> {
        if Self::IS_ZST || self.len == self.cap {
            return Ok(());
        }
        if self.len == 0 {
            self.release();
            return Ok(());
        }
        self.do_realloc(self.len)
    }

    /// Appends `elem` if a free slot exists, otherwise hands it back.
    pub fn push_within_capacity(&mut self, elem: T) -> Result<(), T> {
        if self.len == self.cap {
            return Err(elem);
        }
        unsafe {
            // SAFETY: len < cap, so the slot is allocated and unoccupied.
            ptr::write(self.ptr.as_ptr().add(self.len), elem);
        }
        self.len += 1;
        Ok(())
    }

    /// Inserts `elem` before `index`, shifting the tail right, if a free slot exists.
    pub fn insert_within_capacity(&mut self, index: usize, elem: T) -> Result<(), T> {
        assert!(index <= self.len, "Index out of bounds");
        if self.len == self.cap {
            return Err(elem);
        }
        unsafe {
            let p = self.ptr.as_ptr().add(index);
            ptr::copy(p, p.add(1), self.len - index);
            ptr::write(p, elem);
        }
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting the tail left.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "Index out of bounds");
        unsafe {
            self.len -= 1;
            let p = self.ptr.as_ptr().add(index);
            let result = ptr::read(p);
            ptr::copy(p.add(1), p, self.len - index);
            result
        }
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(i < self.len && j < self.len, "Index out of bounds");
        self.as_mut_slice().swap(i, j);
    }

    /// Opens a gap of `count` slots before `index` and fills slot `k` of it with `make(k)`.
    ///
    /// If `make` fails, every element it already produced is handed to `discard`,
    /// the tail is moved back and the error is returned: the array holds exactly
    /// the elements it held before the call, in the same order.
    ///
    /// The caller must have reserved room for `count` more elements.
    pub fn insert_with<E>(
        &mut self,
        index: usize,
        count: usize,
        mut make: impl FnMut(usize) -> Result<T, E>,
        mut discard: impl FnMut(T),
    ) -> Result<(), E> {
        assert!(index <= self.len, "Index out of bounds");
        assert!(count <= self.spare(), "insufficient capacity for {count} slots");
        if count == 0 {
            return Ok(());
        }

        let len = self.len;
        let tail = len - index;
        let base = self.ptr.as_ptr();
        // The tail is parked past the gap; a panic in `make` leaks it instead of double-dropping.
        self.len = index;
        unsafe {
            ptr::copy(base.add(index), base.add(index + count), tail);
            for k in 0..count {
                match make(k) {
                    Ok(elem) => ptr::write(base.add(index + k), elem),
                    Err(err) => {
                        for j in 0..k {
                            discard(ptr::read(base.add(index + j)));
                        }
                        ptr::copy(base.add(index + count), base.add(index), tail);
                        self.len = len;
                        trace!(index, count, filled = k, "gap insert rolled back");
                        return Err(err);
                    }
                }
            }
        }
        self.len = len + count;
        Ok(())
    }

    /// Hands the elements of `[from, to)` to `discard` and closes the gap.
    pub fn remove_range_with(&mut self, from: usize, to: usize, mut discard: impl FnMut(T)) {
        assert!(from <= to && to <= self.len, "Index out of bounds");
        let len = self.len;
        let base = self.ptr.as_ptr();
        self.len = from;
        unsafe {
            for i in from..to {
                discard(ptr::read(base.add(i)));
            }
            ptr::copy(base.add(to), base.add(from), len - to);
        }
        self.len = len - (to - from);
    }

    /// Hands every element past `new_len` to `discard`. No-op if `new_len >= len`.
    pub fn truncate_with(&mut self, new_len: usize, mut discard: impl FnMut(T)) {
        if new_len >= self.len {
            return;
        }
        let old_len = self.len;
        let base = self.ptr.as_ptr();
        self.len = new_len;
        for i in new_len..old_len {
            // SAFETY: slots in [new_len, old_len) are initialized and no longer counted by len.
            discard(unsafe { ptr::read(base.add(i)) });
        }
    }

    pub fn clear_with(&mut self, discard: impl FnMut(T)) {
        self.truncate_with(0, discard);
    }

    fn do_realloc(&mut self, new_cap: usize) -> Result<(), AllocError> {
        let new_layout = Layout::array::<T>(new_cap).map_err(|_| AllocError::CapacityOverflow)?;

        let new_ptr = if self.cap == 0 {
            unsafe { alloc(new_layout) }
        } else {
            let old_layout =
                Layout::array::<T>(self.cap).map_err(|_| AllocError::CapacityOverflow)?;
            unsafe { realloc(self.ptr.as_ptr() as *mut u8, old_layout, new_layout.size()) }
        };

        // On failure realloc leaves the old block untouched, so `self` is still valid.
        self.ptr = NonNull::new(new_ptr as *mut T)
            .ok_or(AllocError::OutOfMemory { requested: new_cap })?;
        trace!(from = self.cap, to = new_cap, "reallocated storage");
        self.cap = new_cap;
        Ok(())
    }

    fn release(&mut self) {
        if self.cap != 0 && !Self::IS_ZST {
            if let Ok(layout) = Layout::array::<T>(self.cap) {
                unsafe { dealloc(self.ptr.as_ptr() as *mut u8, layout) };
            }
            self.ptr = NonNull::dangling();
            self.cap = 0;
        }
    }
}

impl<T> Drop for RawArray<T> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
        }
        self.len = 0;
        self.release();
    }
}

impl<T> Deref for RawArray<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for RawArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Default for RawArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RawArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a RawArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut RawArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests;
