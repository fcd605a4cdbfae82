#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

pub use shapeshift_core::*;

mod error;
pub use error::*;

mod options;
pub use options::*;

mod coerce;
pub use coerce::Coercion;

mod plan;
pub use plan::{ConversionPlan, PlanKind};

mod compiler;
pub use compiler::PlanCompiler;

mod converter;
pub use converter::*;

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
/// Forwards to tracing::trace when the tracing feature is enabled
macro_rules! trace {
    ($($tt:tt)*) => {};
}
#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
/// Forwards to tracing::debug when the tracing feature is enabled
macro_rules! debug {
    ($($tt:tt)*) => {};
}

/// Converts `src` into `dst` with the global [`Converter`], matching struct
/// fields by name.
pub fn convert<S: Reflect, D: Reflect>(src: &S, dst: &mut D) -> Result<(), ConvertError> {
    Converter::global().convert(src, dst)
}

/// Converts `src` into `dst` with the global [`Converter`], matching struct
/// fields as `options` says.
pub fn convert_with_options<S: Reflect, D: Reflect>(
    src: &S,
    dst: &mut D,
    options: &FieldMappingOptions,
) -> Result<(), ConvertError> {
    Converter::global().convert_with_options(src, dst, options)
}

/// See [`Converter::convert_with_callback`].
pub fn convert_with_callback<S: Reflect, D: Reflect>(
    src: &S,
    dst: &mut D,
    callback: impl FnOnce(&S, &mut D),
) -> Result<(), ConvertError> {
    Converter::global().convert_with_callback(src, dst, callback)
}

/// See [`Converter::convert_with_options_and_callback`].
pub fn convert_with_options_and_callback<S: Reflect, D: Reflect>(
    src: &S,
    dst: &mut D,
    options: &FieldMappingOptions,
    callback: impl FnOnce(&S, &mut D),
) -> Result<(), ConvertError> {
    Converter::global().convert_with_options_and_callback(src, dst, options, callback)
}

/// See [`Converter::convert_optional`].
pub fn convert_optional<S: Reflect, D: Reflect>(
    src: Option<&S>,
    dst: Option<&mut D>,
) -> Result<(), ConvertError> {
    Converter::global().convert_optional(src, dst)
}

/// See [`Converter::convert_to`].
pub fn convert_to<S: Reflect, D: Reflect + Default>(src: &S) -> Result<D, ConvertError> {
    Converter::global().convert_to(src)
}

/// See [`Converter::convert_array`].
pub fn convert_array<S: Reflect, D: Reflect + Default>(
    srcs: &[S],
    dsts: &mut Vec<D>,
) -> Result<(), ConvertError> {
    Converter::global().convert_array(srcs, dsts)
}

/// See [`Converter::convert_array_with_options`].
pub fn convert_array_with_options<S: Reflect, D: Reflect + Default>(
    srcs: &[S],
    dsts: &mut Vec<D>,
    options: &FieldMappingOptions,
) -> Result<(), ConvertError> {
    Converter::global().convert_array_with_options(srcs, dsts, options)
}

/// See [`Converter::convert_array_with_callback`].
pub fn convert_array_with_callback<S: Reflect, D: Reflect + Default>(
    srcs: &[S],
    dsts: &mut Vec<D>,
    callback: impl FnMut(&S, &mut D),
) -> Result<(), ConvertError> {
    Converter::global().convert_array_with_callback(srcs, dsts, callback)
}
