use crate::{PtrConst, PtrMut, Shape};

/// Describes an Option: a vtable to query and alter its state, and the inner
/// shape (the `T` in `Option<T>`).
#[derive(Clone, Copy, Debug)]
pub struct OptionDef {
    /// vtable for interacting with the option
    pub vtable: &'static OptionVTable,

    /// shape of the inner type of the option
    pub t: fn() -> &'static Shape,
}

impl OptionDef {
    /// Returns the inner type shape of the option
    #[inline]
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// Get the value contained in an option, if present
///
/// # Safety
///
/// The `option` parameter must point to aligned, initialized memory of the correct type.
pub type OptionGetFn = unsafe fn(option: PtrConst<'_>) -> Option<PtrConst<'_>>;

/// Get the value contained in an option, replacing `None` with
/// `Some(T::default())` first.
///
/// # Safety
///
/// The `option` parameter must point to aligned, initialized memory of the correct type.
pub type OptionGetOrInsertDefaultFn = unsafe fn(option: PtrMut<'_>) -> PtrMut<'_>;

/// Virtual table for `Option<T>`
#[derive(Clone, Copy, Debug)]
pub struct OptionVTable {
    /// cf. [`OptionGetFn`]
    pub get: OptionGetFn,

    /// cf. [`OptionGetOrInsertDefaultFn`]
    pub get_or_insert_default: OptionGetOrInsertDefaultFn,
}
