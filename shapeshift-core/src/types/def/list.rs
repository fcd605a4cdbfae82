use crate::{PtrConst, PtrMut, Shape};

/// Fields for list types
#[derive(Clone, Copy, Debug)]
pub struct ListDef {
    /// vtable for interacting with the list
    pub vtable: &'static ListVTable,

    /// shape of the items in the list
    pub t: fn() -> &'static Shape,
}

impl ListDef {
    /// Returns the shape of the items in the list
    #[inline]
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// Get the number of items in the list
///
/// # Safety
///
/// The `list` parameter must point to aligned, initialized memory of the correct type.
pub type ListLenFn = unsafe fn(list: PtrConst<'_>) -> usize;

/// Get pointer to the first element of the list's contiguous buffer.
///
/// # Safety
///
/// The `list` parameter must point to aligned, initialized memory of the correct type.
pub type ListAsPtrFn = unsafe fn(list: PtrConst<'_>) -> PtrConst<'_>;

/// Get mutable pointer to the first element of the list's contiguous buffer.
///
/// # Safety
///
/// The `list` parameter must point to aligned, initialized memory of the correct type.
pub type ListAsMutPtrFn = unsafe fn(list: PtrMut<'_>) -> PtrMut<'_>;

/// Make the list hold exactly `len` default items.
///
/// Prior items are dropped. If the current capacity is insufficient, the
/// buffer is regrown to exactly `len`; otherwise it is reused in place.
///
/// # Safety
///
/// The `list` parameter must point to aligned, initialized memory of the correct type.
pub type ListResetFn = unsafe fn(list: PtrMut<'_>, len: usize);

/// Virtual table for a list-like type (like `Vec<T>`)
#[derive(Clone, Copy, Debug)]
pub struct ListVTable {
    /// cf. [`ListLenFn`]
    pub len: ListLenFn,

    /// cf. [`ListAsPtrFn`]
    pub as_ptr: ListAsPtrFn,

    /// cf. [`ListAsMutPtrFn`]
    pub as_mut_ptr: ListAsMutPtrFn,

    /// cf. [`ListResetFn`]
    pub reset: ListResetFn,
}
