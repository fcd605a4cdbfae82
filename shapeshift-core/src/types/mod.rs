//! Shape, field and container definitions.

use core::{alloc::Layout, any::TypeId, fmt, hash::Hash};

mod field;
pub use field::*;

mod def;
pub use def::*;

/// A [`TypeId`] that can be stored in a `const`.
///
/// `TypeId::of` cannot be called in const context on stable, so we store the
/// monomorphized function instead and resolve it on demand.
#[derive(Clone, Copy)]
pub struct ConstTypeId {
    type_id_fn: fn() -> TypeId,
}

impl ConstTypeId {
    /// Create a [`ConstTypeId`] for a type.
    #[must_use]
    pub const fn of<T: ?Sized + 'static>() -> Self {
        ConstTypeId {
            type_id_fn: TypeId::of::<T>,
        }
    }

    /// Get the underlying [`TypeId`].
    #[inline]
    pub fn get(self) -> TypeId {
        (self.type_id_fn)()
    }
}

impl fmt::Debug for ConstTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.get(), f)
    }
}

impl PartialEq for ConstTypeId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for ConstTypeId {}

impl Hash for ConstTypeId {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.get().hash(state);
    }
}

/// Schema for a reflected type: identity, memory layout and semantic
/// definition.
#[derive(Clone, Copy)]
pub struct Shape {
    /// Unique type identifier.
    pub id: ConstTypeId,

    /// Fully qualified type name, as reported by [`core::any::type_name`].
    pub type_name: fn() -> &'static str,

    /// Size and alignment of the type.
    pub layout: Layout,

    /// What the type is made of.
    pub def: Def,

    /// Whether a value may be duplicated with a raw byte copy (no heap
    /// ownership, no drop glue).
    pub bitwise: bool,
}

impl Shape {
    /// Starts a shape for the sized type `T`, with the given definition.
    pub const fn of<T: 'static>(def: Def) -> Self {
        Shape {
            id: ConstTypeId::of::<T>(),
            type_name: core::any::type_name::<T>,
            layout: Layout::new::<T>(),
            def,
            bitwise: false,
        }
    }

    /// Marks the shape as bitwise-copyable.
    pub const fn bitwise(mut self) -> Self {
        self.bitwise = true;
        self
    }

    /// Returns the fully qualified type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Returns true if this shape describes the type `T`.
    #[inline]
    pub fn is_type<T: ?Sized + 'static>(&self) -> bool {
        self.id.get() == TypeId::of::<T>()
    }

    /// Returns true if this shape is an `Option<T>` or a `Box<T>`, i.e. a
    /// wrapper that conversion looks through.
    pub fn is_indirection(&self) -> bool {
        matches!(self.def, Def::Option(_) | Def::Pointer(_))
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Shape {}

impl Hash for Shape {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type", &self.type_name())
            .field("def", &self.def.kind())
            .field("size", &self.layout.size())
            .finish_non_exhaustive()
    }
}
