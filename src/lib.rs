//! A generic dynamic array whose element semantics come from a runtime type
//! descriptor.
//!
//! ```
//! use dynlist::{DynamicArray, runtime::int_type};
//!
//! let mut arr = DynamicArray::new(int_type())?;
//! for x in [3, 1, 2] {
//!     arr.append(&x)?;
//! }
//! arr.qsort();
//! assert_eq!(arr.to_string(), "[1, 2, 3]");
//! assert_eq!(arr.bsearch(&2), Some(1));
//! # Ok::<(), dynlist::Error>(())
//! ```

pub mod array;
pub mod cli;
pub mod datatype;
pub mod error;
pub mod runtime;

pub use array::DynamicArray;
pub use datatype::{DataType, TypeDescriptor, same_type};
pub use error::{Error, Result};
