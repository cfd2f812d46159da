use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::datatype::TypeDescriptor;

fn dup_copy<T: Copy>(value: &T) -> Option<T> {
    Some(*value)
}

fn release<T>(value: T) {
    drop(value);
}

fn print_display<T: fmt::Display>(value: &T, out: &mut dyn fmt::Write) -> fmt::Result {
    write!(out, "{value}")
}

// Unordered pairs (NaN) compare equal.
fn compare_partial<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Defines a shared singleton descriptor for a `Copy + Display + PartialOrd` type.
macro_rules! scalar_type {
    ($(#[$meta:meta])* $accessor:ident, $singleton:ident, $ty:ty, $name:literal) => {
        static $singleton: TypeDescriptor<$ty> = TypeDescriptor::new(
            $name,
            mem::size_of::<$ty>(),
            dup_copy::<$ty>,
            release::<$ty>,
            print_display::<$ty>,
            compare_partial::<$ty>,
        );

        $(#[$meta])*
        pub fn $accessor() -> &'static TypeDescriptor<$ty> {
            &$singleton
        }
    };
}

scalar_type!(
    /// Descriptor for `i32`.
    int_type, INT_TYPE, i32, "int"
);
scalar_type!(
    /// Descriptor for `i64`.
    long_type, LONG_TYPE, i64, "long"
);
scalar_type!(
    /// Descriptor for `char`, printed as the bare character.
    char_type, CHAR_TYPE, char, "char"
);
scalar_type!(
    /// Descriptor for `bool`, printed as `true` / `false`.
    bool_type, BOOL_TYPE, bool, "bool"
);
scalar_type!(
    /// Descriptor for `usize`; index lists produced by the array use it.
    size_type, SIZE_TYPE, usize, "size"
);
scalar_type!(
    /// Descriptor for `f32`.
    float_type, FLOAT_TYPE, f32, "float"
);
scalar_type!(
    /// Descriptor for `f64`.
    double_type, DOUBLE_TYPE, f64, "double"
);
