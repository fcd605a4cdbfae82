use core::ops::ControlFlow;

use crate::{PtrConst, PtrMut, Shape};

/// Fields for map types
#[derive(Clone, Copy, Debug)]
pub struct MapDef {
    /// vtable for interacting with the map
    pub vtable: &'static MapVTable,
    /// shape of the keys in the map
    pub k: fn() -> &'static Shape,
    /// shape of the values in the map
    pub v: fn() -> &'static Shape,
}

impl MapDef {
    /// Returns the shape of the keys of the map
    #[inline]
    pub fn k(&self) -> &'static Shape {
        (self.k)()
    }

    /// Returns the shape of the values of the map
    #[inline]
    pub fn v(&self) -> &'static Shape {
        (self.v)()
    }
}

/// Get the number of entries in the map
///
/// # Safety
///
/// The `map` parameter must point to aligned, initialized memory of the correct type.
pub type MapLenFn = unsafe fn(map: PtrConst<'_>) -> usize;

/// Reserve room for at least `additional` more entries, where the map type
/// supports it.
///
/// # Safety
///
/// The `map` parameter must point to aligned, initialized memory of the correct type.
pub type MapReserveFn = unsafe fn(map: PtrMut<'_>, additional: usize);

/// Visit every entry of the map, stopping early on [`ControlFlow::Break`].
///
/// # Safety
///
/// The `map` parameter must point to aligned, initialized memory of the correct type.
pub type MapForEachFn = unsafe fn(
    map: PtrConst<'_>,
    visit: &mut dyn FnMut(PtrConst<'_>, PtrConst<'_>) -> ControlFlow<()>,
) -> ControlFlow<()>;

/// Build a default key and a default value, let `fill` write into them, then
/// insert the pair (replacing any value already stored under an equal key).
///
/// If `fill` returns [`ControlFlow::Break`], nothing is inserted and the
/// half-built key and value are dropped.
///
/// # Safety
///
/// The `map` parameter must point to aligned, initialized memory of the correct type.
pub type MapInsertWithFn = unsafe fn(
    map: PtrMut<'_>,
    fill: &mut dyn FnMut(PtrMut<'_>, PtrMut<'_>) -> ControlFlow<()>,
) -> ControlFlow<()>;

/// Virtual table for a `Map<K, V>`
#[derive(Clone, Copy, Debug)]
pub struct MapVTable {
    /// cf. [`MapLenFn`]
    pub len: MapLenFn,

    /// cf. [`MapReserveFn`]
    pub reserve: MapReserveFn,

    /// cf. [`MapForEachFn`]
    pub for_each: MapForEachFn,

    /// cf. [`MapInsertWithFn`]
    pub insert_with: MapInsertWithFn,
}
