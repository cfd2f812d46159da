//! Type descriptors: the per-type operation table a [`DynamicArray`](crate::DynamicArray)
//! delegates every element-level operation to.

use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ptr;

use crate::error::{Error, Result};

pub type DupFn<T> = fn(&T) -> Option<T>;
pub type DestroyFn<T> = fn(T);
pub type PrintFn<T> = fn(&T, &mut dyn fmt::Write) -> fmt::Result;
pub type CmpFn<T> = fn(&T, &T) -> Ordering;

/// Describes how values of `T` are copied, released, printed and ordered.
///
/// Arrays borrow their descriptor and compare descriptors by identity (see
/// [`same_type`]), so a program should create exactly one descriptor per
/// logical element type and share it. Implementors must not be zero-sized:
/// distinct zero-sized values may share an address and would be
/// indistinguishable.
pub trait DataType<T>: Send + Sync {
    /// Human-readable type name, used in diagnostics.
    fn name(&self) -> &str;

    /// Size of one value in bytes. Informational only.
    fn size(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Produces an independent deep copy of `value`, or `None` if the copy
    /// could not be made (typically an allocation failure).
    fn dup(&self, value: &T) -> Option<T>;

    /// Releases a value previously produced by [`dup`](Self::dup).
    fn destroy(&self, value: T) {
        drop(value);
    }

    fn print(&self, value: &T, out: &mut dyn fmt::Write) -> fmt::Result;

    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// `true` iff `a` and `b` are the same descriptor instance.
///
/// Two descriptors with identical operations are still different types.
pub fn same_type<T>(a: &dyn DataType<T>, b: &dyn DataType<T>) -> bool {
    ptr::addr_eq(a, b)
}

/// A descriptor assembled from plain function pointers.
///
/// Built-in descriptors are `static` instances of this type; user code can
/// build its own with [`TypeDescriptor::create`].
pub struct TypeDescriptor<T> {
    name: &'static str,
    size: usize,
    dup: DupFn<T>,
    destroy: DestroyFn<T>,
    print: PrintFn<T>,
    compare: CmpFn<T>,
}

impl<T> TypeDescriptor<T> {
    pub const fn new(
        name: &'static str,
        size: usize,
        dup: DupFn<T>,
        destroy: DestroyFn<T>,
        print: PrintFn<T>,
        compare: CmpFn<T>,
    ) -> Self {
        Self {
            name,
            size,
            dup,
            destroy,
            print,
            compare,
        }
    }

    /// Builds a descriptor, failing if any of the four operations is absent.
    pub fn create(
        name: &'static str,
        size: usize,
        dup: Option<DupFn<T>>,
        destroy: Option<DestroyFn<T>>,
        print: Option<PrintFn<T>>,
        compare: Option<CmpFn<T>>,
    ) -> Result<Self> {
        Ok(Self::new(
            name,
            size,
            dup.ok_or(Error::MissingOperation("dup"))?,
            destroy.ok_or(Error::MissingOperation("destroy"))?,
            print.ok_or(Error::MissingOperation("print"))?,
            compare.ok_or(Error::MissingOperation("compare"))?,
        ))
    }
}

impl<T> DataType<T> for TypeDescriptor<T> {
    fn name(&self) -> &str {
        self.name
    }

    fn size(&self) -> usize {
        self.size
    }

    fn dup(&self, value: &T) -> Option<T> {
        (self.dup)(value)
    }

    fn destroy(&self, value: T) {
        (self.destroy)(value)
    }

    fn print(&self, value: &T, out: &mut dyn fmt::Write) -> fmt::Result {
        (self.print)(value, out)
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
