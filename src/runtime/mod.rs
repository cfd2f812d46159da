//! Shared built-in descriptors for primitive types and strings.
//!
//! Every accessor returns the same `'static` instance on each call, so arrays
//! built from repeated calls are still of the same type.

pub mod registry;
mod scalar;
mod string;

pub use registry::{BuiltinVisitor, ElementKind, builtin_names};
pub use scalar::{bool_type, char_type, double_type, float_type, int_type, long_type, size_type};
pub use string::string_type;
