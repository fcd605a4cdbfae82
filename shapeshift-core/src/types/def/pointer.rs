use crate::{PtrConst, PtrMut, Shape};

/// Describes an owning pointer to exactly one value (`Box<T>`).
#[derive(Clone, Copy, Debug)]
pub struct PointerDef {
    /// vtable for interacting with the pointer
    pub vtable: &'static PointerVTable,

    /// shape of the pointee
    pub pointee: fn() -> &'static Shape,
}

impl PointerDef {
    /// Returns the shape of the pointee
    #[inline]
    pub fn pointee(&self) -> &'static Shape {
        (self.pointee)()
    }
}

/// Borrow the pointee.
///
/// # Safety
///
/// The `pointer` parameter must point to aligned, initialized memory of the correct type.
pub type PointerBorrowFn = unsafe fn(pointer: PtrConst<'_>) -> PtrConst<'_>;

/// Mutably borrow the pointee.
///
/// # Safety
///
/// The `pointer` parameter must point to aligned, initialized memory of the correct type.
pub type PointerBorrowMutFn = unsafe fn(pointer: PtrMut<'_>) -> PtrMut<'_>;

/// Virtual table for an owning pointer
#[derive(Clone, Copy, Debug)]
pub struct PointerVTable {
    /// cf. [`PointerBorrowFn`]
    pub borrow: PointerBorrowFn,

    /// cf. [`PointerBorrowMutFn`]
    pub borrow_mut: PointerBorrowMutFn,
}
