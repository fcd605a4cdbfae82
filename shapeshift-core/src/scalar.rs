//! Scalar type identification for shapes.

use core::fmt;

use crate::{Def, Shape};

/// All scalar types supported out of the box by shapeshift.
///
/// Scalars are the leaves of every conversion: a struct, list or map is
/// eventually converted by coercing one scalar into another.
///
/// # Example
///
/// ```
/// use shapeshift_core::{Reflect, ScalarType};
///
/// assert_eq!(u32::SHAPE.scalar_type(), Some(ScalarType::U32));
/// assert_eq!(String::SHAPE.scalar_type(), Some(ScalarType::String));
/// assert_eq!(Vec::<u32>::SHAPE.scalar_type(), None);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ScalarType {
    /// Primitive type `bool`.
    Bool,
    /// Primitive type `char`.
    Char,
    /// `&'static str`. Readable, never writable.
    Str,
    /// `alloc::string::String`.
    String,
    /// Primitive type `f32`.
    F32,
    /// Primitive type `f64`.
    F64,
    /// Primitive type `u8`.
    U8,
    /// Primitive type `u16`.
    U16,
    /// Primitive type `u32`.
    U32,
    /// Primitive type `u64`.
    U64,
    /// Primitive type `u128`.
    U128,
    /// Primitive type `usize`.
    USize,
    /// Primitive type `i8`.
    I8,
    /// Primitive type `i16`.
    I16,
    /// Primitive type `i32`.
    I32,
    /// Primitive type `i64`.
    I64,
    /// Primitive type `i128`.
    I128,
    /// Primitive type `isize`.
    ISize,
}

/// Coarse grouping of scalar types, used to decide which coercions exist.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScalarClass {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// Signed and unsigned integers of every width.
    Integer,
    /// `f32` and `f64`.
    Float,
    /// `String` and `&str`.
    Text,
}

impl ScalarType {
    /// Infer the scalar type from a shape definition.
    ///
    /// Returns `None` for non-scalar shapes.
    #[inline]
    pub fn try_from_shape(shape: &Shape) -> Option<Self> {
        shape.scalar_type()
    }

    /// Returns the class this scalar belongs to.
    pub const fn class(self) -> ScalarClass {
        match self {
            ScalarType::Bool => ScalarClass::Bool,
            ScalarType::Char => ScalarClass::Char,
            ScalarType::Str | ScalarType::String => ScalarClass::Text,
            ScalarType::F32 | ScalarType::F64 => ScalarClass::Float,
            ScalarType::U8
            | ScalarType::U16
            | ScalarType::U32
            | ScalarType::U64
            | ScalarType::U128
            | ScalarType::USize
            | ScalarType::I8
            | ScalarType::I16
            | ScalarType::I32
            | ScalarType::I64
            | ScalarType::I128
            | ScalarType::ISize => ScalarClass::Integer,
        }
    }

    /// Rust spelling of the type, e.g. `"u32"` or `"String"`.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Char => "char",
            ScalarType::Str => "&str",
            ScalarType::String => "String",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::U128 => "u128",
            ScalarType::USize => "usize",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::I128 => "i128",
            ScalarType::ISize => "isize",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Shape {
    /// Get the scalar type if this shape represents a scalar.
    #[inline]
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self.def {
            Def::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reflect;

    #[test]
    fn every_builtin_scalar_reports_its_type() {
        let cases: &[(&Shape, ScalarType)] = &[
            (bool::SHAPE, ScalarType::Bool),
            (char::SHAPE, ScalarType::Char),
            (<&str>::SHAPE, ScalarType::Str),
            (String::SHAPE, ScalarType::String),
            (f32::SHAPE, ScalarType::F32),
            (f64::SHAPE, ScalarType::F64),
            (u8::SHAPE, ScalarType::U8),
            (u16::SHAPE, ScalarType::U16),
            (u32::SHAPE, ScalarType::U32),
            (u64::SHAPE, ScalarType::U64),
            (u128::SHAPE, ScalarType::U128),
            (usize::SHAPE, ScalarType::USize),
            (i8::SHAPE, ScalarType::I8),
            (i16::SHAPE, ScalarType::I16),
            (i32::SHAPE, ScalarType::I32),
            (i64::SHAPE, ScalarType::I64),
            (i128::SHAPE, ScalarType::I128),
            (isize::SHAPE, ScalarType::ISize),
        ];
        for (shape, expected) in cases {
            assert_eq!(ScalarType::try_from_shape(shape), Some(*expected));
        }
    }

    #[test]
    fn classes() {
        assert_eq!(ScalarType::USize.class(), ScalarClass::Integer);
        assert_eq!(ScalarType::F32.class(), ScalarClass::Float);
        assert_eq!(ScalarType::Str.class(), ScalarClass::Text);
        assert_eq!(ScalarType::String.class(), ScalarClass::Text);
    }
}
