#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

// Opaque pointer utilities
mod ptr;
pub use ptr::*;

// Scalar type identification
mod scalar;
pub use scalar::*;

// Shape, field and container definitions
mod types;
pub use types::*;

// Declarative macros describing user structs
mod macros;

// Definitions for `core`, `alloc` and `std` types
mod impls;

/// Allows querying the [`Shape`] of a type, which in turn lets the conversion
/// engine inspect its fields, walk its items, and write into it through
/// type-erased pointers.
///
/// # Safety
///
/// If you implement this wrong, every conversion touching the type reads and
/// writes memory it does not own. Field offsets, the layout, and every vtable
/// function must describe `Self` exactly. Prefer [`record!`] and
/// [`impl_record!`], which derive all of it from the struct declaration.
pub unsafe trait Reflect: 'static {
    /// The shape of this type
    const SHAPE: &'static Shape;
}

/// Returns the shape of `T`.
///
/// Shapes refer to the shapes of their children through this function rather
/// than directly, which lets types refer to themselves.
#[inline]
pub fn shape_of<T: Reflect>() -> &'static Shape {
    T::SHAPE
}
