//! The descriptor-driven dynamic array.
//!
//! A [`DynamicArray`] stores deep copies of the values handed to it. Copies
//! are made, released, compared and printed exclusively through the
//! [`DataType`] the array is bound to, so the same container serves any
//! element type the caller can describe.

use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::io;
use std::mem;
use std::ops::Index;

use raw_array::RawArray;
use tracing::{debug, trace};

use crate::datatype::{DataType, same_type};
use crate::error::{Error, Result};
use crate::runtime::size_type;

const DEFAULT_INIT_CAPACITY: usize = 1;

/// A resizable array owning deep copies of its elements.
///
/// Capacity doubles when a single insertion finds the array full and never
/// shrinks unless [`reclaim`](Self::reclaim) is called.
///
/// Mutable access to a stored element borrows the whole array, so no call
/// that could move the backing storage can happen while the reference is
/// alive:
///
/// ```compile_fail
/// use dynlist::{DynamicArray, runtime::int_type};
///
/// let mut arr = DynamicArray::new(int_type()).unwrap();
/// arr.append(&1).unwrap();
/// let first = arr.get_mut(0);
/// arr.append(&2).unwrap();
/// *first += 1;
/// ```
pub struct DynamicArray<'t, T> {
    ty: &'t dyn DataType<T>,
    items: RawArray<T>,
}

impl<'t, T> DynamicArray<'t, T> {
    /// Creates an empty array with the default initial capacity of one slot.
    pub fn new(ty: &'t dyn DataType<T>) -> Result<Self> {
        Self::with_capacity(ty, DEFAULT_INIT_CAPACITY)
    }

    /// Creates an empty array with room for `capacity` elements.
    ///
    /// Zero-sized element types never allocate and report a capacity of
    /// `usize::MAX`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(ty: &'t dyn DataType<T>, capacity: usize) -> Result<Self> {
        assert!(capacity > 0, "initial capacity must be positive");
        let items = RawArray::try_with_capacity(capacity)?;
        Ok(Self { ty, items })
    }

    /// Builds an array holding deep copies of `values`, in order.
    pub fn from_slice(ty: &'t dyn DataType<T>, values: &[T]) -> Result<Self> {
        let mut array = Self::with_capacity(ty, values.len().max(DEFAULT_INIT_CAPACITY))?;
        for value in values {
            array.append(value)?;
        }
        Ok(array)
    }

    /// The descriptor every element of this array is handled through.
    pub fn descriptor(&self) -> &'t dyn DataType<T> {
        self.ty
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Ensures room for at least `n` elements. Never shrinks.
    pub fn reserve(&mut self, n: usize) -> Result<()> {
        let before = self.capacity();
        self.items.try_reserve_total(n)?;
        if self.capacity() != before {
            debug!(ty = self.ty.name(), from = before, to = n, "reserved capacity");
        }
        Ok(())
    }

    /// Shrinks the capacity to the current length.
    pub fn reclaim(&mut self) -> Result<()> {
        let before = self.capacity();
        self.items.try_shrink_to_fit()?;
        if self.capacity() != before {
            debug!(ty = self.ty.name(), from = before, to = self.capacity(), "reclaimed capacity");
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> &T {
        assert!(index < self.len(), "Index out of bounds");
        &self.items[index]
    }

    /// Mutable access to a stored element, without a copy/release cycle.
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        assert!(index < self.len(), "Index out of bounds");
        &mut self.items[index]
    }

    /// Replaces the element at `index` with a copy of `item`.
    ///
    /// The copy is made before the old element is released, so a failed copy
    /// leaves the array unchanged.
    pub fn set(&mut self, index: usize, item: &T) -> Result<()> {
        assert!(index < self.len(), "Index out of bounds");
        let copy = self.duplicate(item)?;
        let old = mem::replace(&mut self.items[index], copy);
        self.ty.destroy(old);
        Ok(())
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(i < self.len() && j < self.len(), "Index out of bounds");
        self.items.swap(i, j);
    }

    pub fn append(&mut self, item: &T) -> Result<()> {
        self.insert(self.len(), item)
    }

    /// Inserts a copy of `item` before `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, item: &T) -> Result<()> {
        assert!(index <= self.len(), "Index out of bounds");
        let copy = self.duplicate(item)?;
        if let Err(err) = self.ensure_spare(1) {
            self.ty.destroy(copy);
            return Err(err);
        }
        match self.items.insert_within_capacity(index, copy) {
            Ok(()) => Ok(()),
            Err(copy) => {
                self.ty.destroy(copy);
                Err(Error::Alloc {
                    requested: self.len() + 1,
                })
            }
        }
    }

    pub fn insert_front(&mut self, item: &T) -> Result<()> {
        self.insert(0, item)
    }

    /// Appends copies of every element of `src`. Either all are appended or
    /// the array is left as it was.
    pub fn append_all(&mut self, src: &DynamicArray<'_, T>) -> Result<()> {
        self.insert_all(self.len(), src)
    }

    /// Inserts copies of every element of `src` before `index`.
    ///
    /// Either every copy is inserted, or the copies already made are released
    /// and the array keeps its previous elements in their previous order. Only
    /// the capacity may have grown.
    ///
    /// # Panics
    ///
    /// Panics if `src` uses a different descriptor instance or `index > len`.
    pub fn insert_all(&mut self, index: usize, src: &DynamicArray<'_, T>) -> Result<()> {
        assert!(
            same_type(self.ty, src.ty),
            "descriptor mismatch: `{}` and `{}` are different types",
            self.ty.name(),
            src.ty.name()
        );
        assert!(index <= self.len(), "Index out of bounds");

        let count = src.len();
        self.ensure_spare(count)?;
        let ty = self.ty;
        let result = self.items.insert_with(
            index,
            count,
            |k| ty.dup(&src.items[k]).ok_or(Error::Duplicate),
            |copy| ty.destroy(copy),
        );
        if let Err(err) = &result {
            debug!(ty = ty.name(), index, count, %err, "bulk insert rolled back");
        }
        result
    }

    /// Removes and releases the element at `index`.
    pub fn pop(&mut self, index: usize) {
        assert!(index < self.len(), "Index out of bounds");
        let item = self.items.remove(index);
        self.ty.destroy(item);
    }

    /// Removes the first element equal to `item`, returning where it was.
    pub fn remove(&mut self, item: &T) -> Option<usize> {
        let index = self.index(item)?;
        self.pop(index);
        Some(index)
    }

    /// Removes the last element equal to `item`, returning where it was.
    pub fn remove_last(&mut self, item: &T) -> Option<usize> {
        let index = self.index_last(item)?;
        self.pop(index);
        Some(index)
    }

    /// Removes every element equal to `item`; survivors keep their order.
    /// Returns the number removed.
    pub fn remove_all(&mut self, item: &T) -> usize {
        let ty = self.ty;
        self.compact(|_, stored| ty.compare(item, stored) != Ordering::Equal)
    }

    /// Removes every element for which `pred` holds; survivors keep their
    /// order. Returns the number removed.
    pub fn remove_if(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.compact(|_, stored| !pred(stored))
    }

    /// Removes the elements in `[from, to)`.
    ///
    /// # Panics
    ///
    /// Panics unless `from < len` and `from <= to <= len`.
    pub fn remove_range(&mut self, from: usize, to: usize) {
        assert!(from < self.len(), "Index out of bounds");
        assert!(from <= to && to <= self.len(), "Index out of bounds");
        let ty = self.ty;
        self.items.remove_range_with(from, to, |item| ty.destroy(item));
        trace!(ty = ty.name(), from, to, "removed range");
    }

    /// Removes repeated elements, keeping the first occurrence of each value.
    /// Returns the number removed.
    ///
    /// Each element is compared against every survivor before it, so this is
    /// quadratic in the length. The descriptor only gives an ordering, not a
    /// hash; sort first and walk adjacent pairs if order does not matter.
    pub fn remove_dup(&mut self) -> usize {
        let ty = self.ty;
        self.compact(|kept, stored| {
            !kept
                .iter()
                .any(|seen| ty.compare(seen, stored) == Ordering::Equal)
        })
    }

    /// Releases every element. The capacity is kept.
    pub fn clear(&mut self) {
        let ty = self.ty;
        self.items.clear_with(|item| ty.destroy(item));
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index(item).is_some()
    }

    /// Position of the first element equal to `item`.
    pub fn index(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|stored| self.matches(item, stored))
    }

    /// Position of the last element equal to `item`.
    pub fn index_last(&self, item: &T) -> Option<usize> {
        self.items.iter().rposition(|stored| self.matches(item, stored))
    }

    pub fn count(&self, item: &T) -> usize {
        self.items
            .iter()
            .filter(|stored| self.matches(item, stored))
            .count()
    }

    /// Positions of every element equal to `item`, as an array of indices.
    pub fn index_all(&self, item: &T) -> Result<DynamicArray<'static, usize>> {
        self.index_all_if(|stored| self.matches(item, stored))
    }

    /// Positions of every element for which `pred` holds.
    pub fn index_all_if(
        &self,
        mut pred: impl FnMut(&T) -> bool,
    ) -> Result<DynamicArray<'static, usize>> {
        let mut indices = DynamicArray::new(size_type())?;
        for (i, stored) in self.items.iter().enumerate() {
            if pred(stored) {
                indices.append(&i)?;
            }
        }
        Ok(indices)
    }

    /// Finds `item` in an array sorted in ascending order.
    ///
    /// Returns the position of any equal element. The array must be sorted
    /// (e.g. by [`qsort`](Self::qsort)); this is checked in debug builds only,
    /// and the result on an unsorted array is unspecified otherwise.
    pub fn bsearch(&self, item: &T) -> Option<usize> {
        debug_assert!(
            self.is_sorted(),
            "bsearch requires an array sorted in ascending order"
        );
        let (mut low, mut high) = (0, self.len());
        while low < high {
            let mid = low + (high - low) / 2;
            match self.ty.compare(&self.items[mid], item) {
                Ordering::Equal => return Some(mid),
                Ordering::Less => low = mid + 1,
                Ordering::Greater => high = mid,
            }
        }
        None
    }

    /// `true` if no adjacent pair is out of ascending order.
    pub fn is_sorted(&self) -> bool {
        self.items
            .windows(2)
            .all(|pair| self.ty.compare(&pair[0], &pair[1]) != Ordering::Greater)
    }

    /// Sorts in place with quicksort, using the first element of each range
    /// as the pivot. Worst case (already sorted input) is quadratic.
    pub fn qsort(&mut self) {
        let ty = self.ty;
        quicksort(ty, self.items.as_mut_slice());
    }

    pub fn reverse(&mut self) {
        self.items.as_mut_slice().reverse();
    }

    /// Replaces the first element equal to `old` with a copy of `new`.
    pub fn replace(&mut self, old: &T, new: &T) -> Result<Option<usize>> {
        match self.index(old) {
            Some(index) => self.set(index, new).map(|()| Some(index)),
            None => Ok(None),
        }
    }

    /// Replaces the last element equal to `old` with a copy of `new`.
    pub fn replace_last(&mut self, old: &T, new: &T) -> Result<Option<usize>> {
        match self.index_last(old) {
            Some(index) => self.set(index, new).map(|()| Some(index)),
            None => Ok(None),
        }
    }

    /// Replaces every element equal to `old` with a copy of `new`.
    pub fn replace_all(&mut self, old: &T, new: &T) -> Result<usize> {
        let ty = self.ty;
        self.replace_where(new, |stored| ty.compare(old, stored) == Ordering::Equal)
    }

    /// Replaces every element for which `pred` holds with a copy of `new`.
    ///
    /// All copies are made before any element is touched; if one fails the
    /// array is unchanged.
    pub fn replace_if(&mut self, new: &T, pred: impl FnMut(&T) -> bool) -> Result<usize> {
        self.replace_where(new, pred)
    }

    /// A new array holding copies of the elements in `[from, to)`.
    ///
    /// # Panics
    ///
    /// Panics unless `from < len` and `from <= to <= len`.
    pub fn slice(&self, from: usize, to: usize) -> Result<Self> {
        assert!(from < self.len(), "Index out of bounds");
        assert!(from <= to && to <= self.len(), "Index out of bounds");
        Self::from_slice(self.ty, &self.items[from..to])
    }

    /// A new array holding copies of the elements for which `pred` holds.
    pub fn filter(&self, mut pred: impl FnMut(&T) -> bool) -> Result<Self> {
        let mut filtered = Self::new(self.ty)?;
        for stored in self.items.iter() {
            if pred(stored) {
                filtered.append(stored)?;
            }
        }
        Ok(filtered)
    }

    /// A new array holding the first occurrence of each distinct value.
    ///
    /// Quadratic in the length, like [`remove_dup`](Self::remove_dup).
    pub fn unique(&self) -> Result<Self> {
        let mut unique = Self::new(self.ty)?;
        for stored in self.items.iter() {
            if !unique.contains(stored) {
                unique.append(stored)?;
            }
        }
        Ok(unique)
    }

    /// Applies `f` to every element in place.
    pub fn map(&mut self, f: impl FnMut(&mut T)) {
        self.items.iter_mut().for_each(f);
    }

    /// An independent deep copy with the same descriptor and capacity.
    pub fn try_clone(&self) -> Result<Self> {
        let mut copy = Self::with_capacity(self.ty, self.capacity().max(DEFAULT_INIT_CAPACITY))?;
        copy.append_all(self)?;
        Ok(copy)
    }

    /// Deep copies of every element, for use outside the array.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.len()).map_err(|_| Error::Alloc {
            requested: self.len(),
        })?;
        for stored in self.items.iter() {
            match self.ty.dup(stored) {
                Some(copy) => out.push(copy),
                None => {
                    out.into_iter().for_each(|copy| self.ty.destroy(copy));
                    return Err(Error::Duplicate);
                }
            }
        }
        Ok(out)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Writes the array to stdout as `[e0, e1, ...]` followed by a newline.
    pub fn print(&self) {
        println!("{self}");
    }

    /// Writes the array to `out` as `[e0, e1, ...]` followed by a newline.
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{self}")
    }

    fn matches(&self, item: &T, stored: &T) -> bool {
        self.ty.compare(item, stored) == Ordering::Equal
    }

    fn duplicate(&self, item: &T) -> Result<T> {
        self.ty.dup(item).ok_or_else(|| {
            debug!(ty = self.ty.name(), "element duplication failed");
            Error::Duplicate
        })
    }

    /// Makes room for `additional` more elements: doubling for a single
    /// element, exact growth for bulk inserts.
    fn ensure_spare(&mut self, additional: usize) -> Result<()> {
        if additional <= self.items.spare() {
            return Ok(());
        }
        let before = self.capacity();
        if additional == 1 {
            self.items.try_grow()?;
        } else {
            let required = self
                .len()
                .checked_add(additional)
                .ok_or(Error::CapacityOverflow)?;
            self.items.try_reserve_total(required)?;
        }
        debug!(ty = self.ty.name(), from = before, to = self.capacity(), "grew capacity");
        Ok(())
    }

    /// Keeps the elements for which `keep(kept_so_far, element)` holds,
    /// preserving their order, and releases the rest. Single pass.
    fn compact(&mut self, mut keep: impl FnMut(&[T], &T) -> bool) -> usize {
        let len = self.len();
        let slots = self.items.as_mut_slice();
        let mut kept = 0;
        for read in 0..len {
            let (head, rest) = slots.split_at(read);
            if keep(&head[..kept], &rest[0]) {
                // Everything in [kept, read) is marked for removal.
                slots.swap(kept, read);
                kept += 1;
            }
        }
        let ty = self.ty;
        self.items.truncate_with(kept, |item| ty.destroy(item));
        len - kept
    }

    fn replace_where(&mut self, new: &T, mut pred: impl FnMut(&T) -> bool) -> Result<usize> {
        let targets: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, stored)| pred(*stored))
            .map(|(i, _)| i)
            .collect();

        let ty = self.ty;
        let mut copies = Vec::new();
        copies.try_reserve_exact(targets.len()).map_err(|_| Error::Alloc {
            requested: targets.len(),
        })?;
        for _ in &targets {
            match self.duplicate(new) {
                Ok(copy) => copies.push(copy),
                Err(err) => {
                    copies.into_iter().for_each(|copy| ty.destroy(copy));
                    return Err(err);
                }
            }
        }

        let replaced = targets.len();
        for (index, copy) in targets.into_iter().zip(copies) {
            let old = mem::replace(&mut self.items[index], copy);
            ty.destroy(old);
        }
        Ok(replaced)
    }
}

fn quicksort<T>(ty: &dyn DataType<T>, slots: &mut [T]) {
    let mut slots = slots;
    // Recurse into the shorter side, loop on the longer one.
    while slots.len() > 1 {
        let pos = partition(ty, slots);
        let (left, right) = mem::take(&mut slots).split_at_mut(pos);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quicksort(ty, left);
            slots = right;
        } else {
            quicksort(ty, right);
            slots = left;
        }
    }
}

/// Partitions around `slots[0]`, moving strictly greater elements to the high
/// end while scanning down from the last slot. Returns the pivot's final index.
fn partition<T>(ty: &dyn DataType<T>, slots: &mut [T]) -> usize {
    let last = slots.len() - 1;
    let mut pos = last;
    for i in (1..=last).rev() {
        if ty.compare(&slots[i], &slots[0]) == Ordering::Greater {
            slots.swap(i, pos);
            pos -= 1;
        }
    }
    slots.swap(0, pos);
    pos
}

impl<T> Drop for DynamicArray<'_, T> {
    fn drop(&mut self) {
        let ty = self.ty;
        self.items.clear_with(|item| ty.destroy(item));
    }
}

impl<T> PartialEq for DynamicArray<'_, T> {
    /// Equal when both arrays share the descriptor instance and hold pairwise
    /// equal elements in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && same_type(self.ty, other.ty)
            && self
                .items
                .iter()
                .zip(other.items.iter())
                .all(|(a, b)| self.ty.compare(a, b) == Ordering::Equal)
    }
}

impl<T> Index<usize> for DynamicArray<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<'_, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Display for DynamicArray<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        for (i, item) in self.items.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            self.ty.print(item, f)?;
        }
        f.write_char(']')
    }
}

impl<T> fmt::Debug for DynamicArray<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicArray")
            .field("type", &self.ty.name())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("items", &format_args!("{self}"))
            .finish()
    }
}
