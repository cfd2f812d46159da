use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::datatype::TypeDescriptor;

static STRING_TYPE: TypeDescriptor<String> = TypeDescriptor::new(
    "string",
    mem::size_of::<String>(),
    dup_string,
    drop_string,
    print_string,
    compare_string,
);

/// Descriptor for owned strings, ordered byte-lexicographically.
pub fn string_type() -> &'static TypeDescriptor<String> {
    &STRING_TYPE
}

// A failed reservation is reported instead of aborting.
fn dup_string(value: &String) -> Option<String> {
    let mut copy = String::new();
    copy.try_reserve_exact(value.len()).ok()?;
    copy.push_str(value);
    Some(copy)
}

fn drop_string(value: String) {
    drop(value);
}

fn print_string(value: &String, out: &mut dyn fmt::Write) -> fmt::Result {
    out.write_str(value)
}

fn compare_string(a: &String, b: &String) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}
