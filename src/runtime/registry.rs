use std::error::Error as StdError;
use std::str::FromStr;

use clap::ValueEnum;

use crate::datatype::{DataType, TypeDescriptor};
use crate::runtime::{
    bool_type, char_type, double_type, float_type, int_type, long_type, size_type, string_type,
};

/// The built-in element types, selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ElementKind {
    Int,
    Long,
    Char,
    Bool,
    Size,
    Float,
    Double,
    String,
}

/// Code that is generic over the element type of a built-in descriptor.
///
/// [`ElementKind::dispatch`] picks the descriptor at runtime and calls
/// [`visit`](Self::visit) with the matching static type.
pub trait BuiltinVisitor {
    type Output;

    fn visit<T>(self, ty: &'static TypeDescriptor<T>) -> Self::Output
    where
        T: FromStr + 'static,
        T::Err: StdError + Send + Sync + 'static;
}

impl ElementKind {
    pub const ALL: [ElementKind; 8] = [
        ElementKind::Int,
        ElementKind::Long,
        ElementKind::Char,
        ElementKind::Bool,
        ElementKind::Size,
        ElementKind::Float,
        ElementKind::Double,
        ElementKind::String,
    ];

    pub fn dispatch<V: BuiltinVisitor>(self, visitor: V) -> V::Output {
        match self {
            ElementKind::Int => visitor.visit(int_type()),
            ElementKind::Long => visitor.visit(long_type()),
            ElementKind::Char => visitor.visit(char_type()),
            ElementKind::Bool => visitor.visit(bool_type()),
            ElementKind::Size => visitor.visit(size_type()),
            ElementKind::Float => visitor.visit(float_type()),
            ElementKind::Double => visitor.visit(double_type()),
            ElementKind::String => visitor.visit(string_type()),
        }
    }

    /// Name of the descriptor this kind resolves to.
    pub fn type_name(self) -> &'static str {
        struct Name;

        impl BuiltinVisitor for Name {
            type Output = &'static str;

            fn visit<T>(self, ty: &'static TypeDescriptor<T>) -> &'static str
            where
                T: FromStr + 'static,
                T::Err: StdError + Send + Sync + 'static,
            {
                ty.name()
            }
        }

        self.dispatch(Name)
    }
}

/// Names of every registered built-in descriptor.
pub fn builtin_names() -> Vec<&'static str> {
    ElementKind::ALL.iter().map(|kind| kind.type_name()).collect()
}
