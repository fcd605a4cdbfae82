//! Scalar coercion table.
//!
//! Which coercion applies to a pair of scalar types is decided once, when a
//! plan is compiled. Applying it is then a read into a stack-allocated
//! [`ScalarValue`] followed by a write into the destination; neither step
//! allocates (writing into a `String` reuses its buffer).

use core::fmt::{self, Write as _};
use core::str::FromStr;

use shapeshift_core::{PtrConst, PtrMut, ScalarClass, ScalarType};

use crate::{CoercionFailure, CoercionReason};

/// A scalar read out of memory, borrowing strings from the source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValue<'mem> {
    /// A `bool`.
    Bool(bool),
    /// A `char`.
    Char(char),
    /// Any signed integer, widened.
    Signed(i128),
    /// Any unsigned integer, widened.
    Unsigned(u128),
    /// An `f32`, kept at its own width so it prints the way `f32` does.
    Float32(f32),
    /// An `f64`.
    Float(f64),
    /// A `String` or `&str`.
    Str(&'mem str),
}

impl ScalarValue<'_> {
    /// Appends the value to `out` the way `Display` renders it, without quotes.
    fn write_plain(self, out: &mut String) -> fmt::Result {
        match self {
            ScalarValue::Bool(v) => write!(out, "{v}"),
            ScalarValue::Char(v) => {
                out.push(v);
                Ok(())
            }
            ScalarValue::Signed(v) => write!(out, "{v}"),
            ScalarValue::Unsigned(v) => write!(out, "{v}"),
            ScalarValue::Float32(v) => write!(out, "{v}"),
            ScalarValue::Float(v) => write!(out, "{v}"),
            ScalarValue::Str(v) => {
                out.push_str(v);
                Ok(())
            }
        }
    }
}

impl fmt::Display for ScalarValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(v) => write!(f, "{v}"),
            ScalarValue::Char(v) => write!(f, "{v:?}"),
            ScalarValue::Signed(v) => write!(f, "{v}"),
            ScalarValue::Unsigned(v) => write!(f, "{v}"),
            ScalarValue::Float32(v) => write!(f, "{v}"),
            ScalarValue::Float(v) => write!(f, "{v}"),
            ScalarValue::Str(v) => write!(f, "{v:?}"),
        }
    }
}

type ReadFn = unsafe fn(src: PtrConst<'_>) -> ScalarValue<'_>;
type WriteFn = unsafe fn(value: ScalarValue<'_>, dst: PtrMut<'_>) -> Result<(), CoercionReason>;

/// A resolved scalar-to-scalar coercion.
#[derive(Clone, Copy)]
pub struct Coercion {
    src: ScalarType,
    dst: ScalarType,
    op: CoercionOp,
}

#[derive(Clone, Copy)]
enum CoercionOp {
    /// Same plain-old-data type on both sides.
    Bitwise { size: usize },
    Convert { read: ReadFn, write: WriteFn },
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercion")
            .field("src", &self.src)
            .field("dst", &self.dst)
            .field("bitwise", &self.is_bitwise())
            .finish()
    }
}

impl Coercion {
    /// Looks up the coercion from `src` to `dst`, if there is one.
    ///
    /// Supported pairs:
    /// - identity, for every scalar type
    /// - numeric to numeric, in both directions (range-checked)
    /// - anything to `String`, and `String`/`&str` to anything writable (parsed)
    /// - `bool` to and from integers
    /// - `char` to and from integers (Unicode scalar values)
    ///
    /// `&str` is never a destination: there is nowhere to store a new string.
    pub fn resolve(src: ScalarType, dst: ScalarType) -> Option<Self> {
        if src == dst {
            if let Some(size) = bitwise_size(src) {
                return Some(Coercion {
                    src,
                    dst,
                    op: CoercionOp::Bitwise { size },
                });
            }
        }

        if !classes_compatible(src.class(), dst.class()) {
            return None;
        }

        Some(Coercion {
            src,
            dst,
            op: CoercionOp::Convert {
                read: reader(src),
                write: writer(dst)?,
            },
        })
    }

    /// The source scalar type.
    pub fn src(&self) -> ScalarType {
        self.src
    }

    /// The destination scalar type.
    pub fn dst(&self) -> ScalarType {
        self.dst
    }

    /// True if the coercion is a plain byte copy.
    pub fn is_bitwise(&self) -> bool {
        matches!(self.op, CoercionOp::Bitwise { .. })
    }

    /// Coerces the scalar at `src` into the scalar at `dst`.
    ///
    /// # Safety
    ///
    /// `src` must point to an initialized value of the source scalar type, and
    /// `dst` to an initialized value of the destination scalar type.
    pub(crate) unsafe fn apply(
        &self,
        src: PtrConst<'_>,
        dst: PtrMut<'_>,
    ) -> Result<(), CoercionFailure> {
        match self.op {
            CoercionOp::Bitwise { size } => {
                unsafe {
                    core::ptr::copy_nonoverlapping(src.as_byte_ptr(), dst.as_mut_byte_ptr(), size)
                };
                Ok(())
            }
            CoercionOp::Convert { read, write } => {
                let value = unsafe { read(src) };
                unsafe { write(value, dst) }.map_err(|reason| CoercionFailure {
                    src: self.src,
                    dst: self.dst,
                    value: value.to_string(),
                    reason,
                })
            }
        }
    }
}

fn classes_compatible(src: ScalarClass, dst: ScalarClass) -> bool {
    use ScalarClass::*;
    match (src, dst) {
        (Text, _) | (_, Text) => true,
        (Integer | Float, Integer | Float) => true,
        (Bool, Bool | Integer) | (Integer, Bool) => true,
        (Char, Char | Integer) | (Integer, Char) => true,
        _ => false,
    }
}

fn bitwise_size(scalar: ScalarType) -> Option<usize> {
    use core::mem::size_of;
    Some(match scalar {
        ScalarType::Bool => size_of::<bool>(),
        ScalarType::Char => size_of::<char>(),
        ScalarType::Str => size_of::<&str>(),
        ScalarType::String => return None,
        ScalarType::F32 => size_of::<f32>(),
        ScalarType::F64 => size_of::<f64>(),
        ScalarType::U8 => size_of::<u8>(),
        ScalarType::U16 => size_of::<u16>(),
        ScalarType::U32 => size_of::<u32>(),
        ScalarType::U64 => size_of::<u64>(),
        ScalarType::U128 => size_of::<u128>(),
        ScalarType::USize => size_of::<usize>(),
        ScalarType::I8 => size_of::<i8>(),
        ScalarType::I16 => size_of::<i16>(),
        ScalarType::I32 => size_of::<i32>(),
        ScalarType::I64 => size_of::<i64>(),
        ScalarType::I128 => size_of::<i128>(),
        ScalarType::ISize => size_of::<isize>(),
    })
}

fn reader(scalar: ScalarType) -> ReadFn {
    match scalar {
        ScalarType::Bool => read_bool,
        ScalarType::Char => read_char,
        ScalarType::Str => read_str,
        ScalarType::String => read_string,
        ScalarType::F32 => read_float::<f32>,
        ScalarType::F64 => read_float::<f64>,
        ScalarType::U8 => read_integer::<u8>,
        ScalarType::U16 => read_integer::<u16>,
        ScalarType::U32 => read_integer::<u32>,
        ScalarType::U64 => read_integer::<u64>,
        ScalarType::U128 => read_integer::<u128>,
        ScalarType::USize => read_integer::<usize>,
        ScalarType::I8 => read_integer::<i8>,
        ScalarType::I16 => read_integer::<i16>,
        ScalarType::I32 => read_integer::<i32>,
        ScalarType::I64 => read_integer::<i64>,
        ScalarType::I128 => read_integer::<i128>,
        ScalarType::ISize => read_integer::<isize>,
    }
}

fn writer(scalar: ScalarType) -> Option<WriteFn> {
    Some(match scalar {
        ScalarType::Bool => write_bool,
        ScalarType::Char => write_char,
        ScalarType::Str => return None,
        ScalarType::String => write_string,
        ScalarType::F32 => write_float::<f32>,
        ScalarType::F64 => write_float::<f64>,
        ScalarType::U8 => write_integer::<u8>,
        ScalarType::U16 => write_integer::<u16>,
        ScalarType::U32 => write_integer::<u32>,
        ScalarType::U64 => write_integer::<u64>,
        ScalarType::U128 => write_integer::<u128>,
        ScalarType::USize => write_integer::<usize>,
        ScalarType::I8 => write_integer::<i8>,
        ScalarType::I16 => write_integer::<i16>,
        ScalarType::I32 => write_integer::<i32>,
        ScalarType::I64 => write_integer::<i64>,
        ScalarType::I128 => write_integer::<i128>,
        ScalarType::ISize => write_integer::<isize>,
    })
}

trait Integer: Copy + FromStr + TryFrom<i128> + TryFrom<u128> + 'static {
    fn to_value(self) -> ScalarValue<'static>;
}

macro_rules! impl_integer {
    (signed: $($s:ty),*; unsigned: $($u:ty),*) => {
        $(impl Integer for $s {
            fn to_value(self) -> ScalarValue<'static> {
                ScalarValue::Signed(self as i128)
            }
        })*
        $(impl Integer for $u {
            fn to_value(self) -> ScalarValue<'static> {
                ScalarValue::Unsigned(self as u128)
            }
        })*
    };
}

impl_integer!(signed: i8, i16, i32, i64, i128, isize; unsigned: u8, u16, u32, u64, u128, usize);

trait Float: Copy + FromStr + 'static {
    fn to_value(self) -> ScalarValue<'static>;
    fn from_f64(v: f64) -> Self;
    fn from_i128(v: i128) -> Self;
    fn from_u128(v: u128) -> Self;
    fn is_finite(self) -> bool;
}

macro_rules! impl_float {
    ($($f:ty => $variant:ident),*) => {
        $(impl Float for $f {
            fn to_value(self) -> ScalarValue<'static> {
                ScalarValue::$variant(self)
            }
            fn from_f64(v: f64) -> Self {
                v as $f
            }
            fn from_i128(v: i128) -> Self {
                v as $f
            }
            fn from_u128(v: u128) -> Self {
                v as $f
            }
            fn is_finite(self) -> bool {
                <$f>::is_finite(self)
            }
        })*
    };
}

impl_float!(f32 => Float32, f64 => Float);

unsafe fn read_bool(src: PtrConst<'_>) -> ScalarValue<'_> {
    ScalarValue::Bool(*unsafe { src.get::<bool>() })
}

unsafe fn read_char(src: PtrConst<'_>) -> ScalarValue<'_> {
    ScalarValue::Char(*unsafe { src.get::<char>() })
}

unsafe fn read_str(src: PtrConst<'_>) -> ScalarValue<'_> {
    ScalarValue::Str(unsafe { src.get::<&'static str>() })
}

unsafe fn read_string(src: PtrConst<'_>) -> ScalarValue<'_> {
    ScalarValue::Str(unsafe { src.get::<String>() }.as_str())
}

unsafe fn read_integer<T: Integer>(src: PtrConst<'_>) -> ScalarValue<'_> {
    unsafe { *src.get::<T>() }.to_value()
}

unsafe fn read_float<T: Float>(src: PtrConst<'_>) -> ScalarValue<'_> {
    unsafe { *src.get::<T>() }.to_value()
}

unsafe fn write_bool(value: ScalarValue<'_>, dst: PtrMut<'_>) -> Result<(), CoercionReason> {
    let out = match value {
        ScalarValue::Bool(v) => v,
        ScalarValue::Signed(v) => v != 0,
        ScalarValue::Unsigned(v) => v != 0,
        ScalarValue::Str(s) => s.parse().map_err(|_| CoercionReason::Unparseable)?,
        ScalarValue::Char(_) | ScalarValue::Float32(_) | ScalarValue::Float(_) => {
            return Err(CoercionReason::Unsupported);
        }
    };
    unsafe { *dst.as_mut::<bool>() = out };
    Ok(())
}

unsafe fn write_char(value: ScalarValue<'_>, dst: PtrMut<'_>) -> Result<(), CoercionReason> {
    let from_code = |code: Option<u32>| code.and_then(char::from_u32).ok_or(CoercionReason::NotAChar);
    let out = match value {
        ScalarValue::Char(v) => v,
        ScalarValue::Signed(v) => from_code(u32::try_from(v).ok())?,
        ScalarValue::Unsigned(v) => from_code(u32::try_from(v).ok())?,
        ScalarValue::Str(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(CoercionReason::NotAChar),
            }
        }
        ScalarValue::Bool(_) | ScalarValue::Float32(_) | ScalarValue::Float(_) => {
            return Err(CoercionReason::Unsupported);
        }
    };
    unsafe { *dst.as_mut::<char>() = out };
    Ok(())
}

unsafe fn write_string(value: ScalarValue<'_>, dst: PtrMut<'_>) -> Result<(), CoercionReason> {
    let out = unsafe { dst.as_mut::<String>() };
    out.clear();
    value
        .write_plain(out)
        .map_err(|_| CoercionReason::Unsupported)
}

unsafe fn write_integer<T: Integer>(
    value: ScalarValue<'_>,
    dst: PtrMut<'_>,
) -> Result<(), CoercionReason> {
    let out = match value {
        ScalarValue::Signed(v) => {
            <T as TryFrom<i128>>::try_from(v).map_err(|_| CoercionReason::OutOfRange)?
        }
        ScalarValue::Unsigned(v) => {
            <T as TryFrom<u128>>::try_from(v).map_err(|_| CoercionReason::OutOfRange)?
        }
        ScalarValue::Float32(v) => float_to_integer::<T>(f64::from(v))?,
        ScalarValue::Float(v) => float_to_integer::<T>(v)?,
        ScalarValue::Bool(v) => {
            <T as TryFrom<u128>>::try_from(u128::from(v)).map_err(|_| CoercionReason::OutOfRange)?
        }
        ScalarValue::Char(v) => <T as TryFrom<u128>>::try_from(u128::from(u32::from(v)))
            .map_err(|_| CoercionReason::OutOfRange)?,
        ScalarValue::Str(s) => s.parse::<T>().map_err(|_| CoercionReason::Unparseable)?,
    };
    unsafe { *dst.as_mut::<T>() = out };
    Ok(())
}

/// Truncates toward zero, then range-checks.
fn float_to_integer<T: Integer>(v: f64) -> Result<T, CoercionReason> {
    if !v.is_finite() {
        return Err(CoercionReason::NotFinite);
    }
    let truncated = v.trunc();
    if truncated < 0.0 {
        // i128::MIN is exactly representable as an f64
        if truncated < i128::MIN as f64 {
            return Err(CoercionReason::OutOfRange);
        }
        <T as TryFrom<i128>>::try_from(truncated as i128).map_err(|_| CoercionReason::OutOfRange)
    } else {
        // u128::MAX rounds up to 2^128, which is already out of range
        if truncated >= u128::MAX as f64 {
            return Err(CoercionReason::OutOfRange);
        }
        <T as TryFrom<u128>>::try_from(truncated as u128).map_err(|_| CoercionReason::OutOfRange)
    }
}

unsafe fn write_float<T: Float>(value: ScalarValue<'_>, dst: PtrMut<'_>) -> Result<(), CoercionReason> {
    // a finite input never turns into an infinity
    let finite = |out: T| {
        if out.is_finite() {
            Ok(out)
        } else {
            Err(CoercionReason::OutOfRange)
        }
    };
    let out = match value {
        ScalarValue::Float32(v) if !v.is_finite() => T::from_f64(f64::from(v)),
        ScalarValue::Float32(v) => finite(T::from_f64(f64::from(v)))?,
        ScalarValue::Float(v) if !v.is_finite() => T::from_f64(v),
        ScalarValue::Float(v) => finite(T::from_f64(v))?,
        ScalarValue::Signed(v) => finite(T::from_i128(v))?,
        ScalarValue::Unsigned(v) => finite(T::from_u128(v))?,
        ScalarValue::Str(s) => s.parse::<T>().map_err(|_| CoercionReason::Unparseable)?,
        ScalarValue::Bool(_) | ScalarValue::Char(_) => return Err(CoercionReason::Unsupported),
    };
    unsafe { *dst.as_mut::<T>() = out };
    Ok(())
}
