use core::hash::{BuildHasher, Hash};
use core::ops::ControlFlow;
use std::collections::HashMap;

use crate::*;

unsafe fn hashmap_len<K, V, S>(map: PtrConst<'_>) -> usize {
    unsafe { map.get::<HashMap<K, V, S>>() }.len()
}

unsafe fn hashmap_reserve<K, V, S>(map: PtrMut<'_>, additional: usize)
where
    K: Eq + Hash,
    S: BuildHasher,
{
    unsafe { map.as_mut::<HashMap<K, V, S>>() }.reserve(additional);
}

unsafe fn hashmap_for_each<K, V, S>(
    map: PtrConst<'_>,
    visit: &mut dyn FnMut(PtrConst<'_>, PtrConst<'_>) -> ControlFlow<()>,
) -> ControlFlow<()> {
    for (k, v) in unsafe { map.get::<HashMap<K, V, S>>() } {
        if visit(PtrConst::new(k), PtrConst::new(v)).is_break() {
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}

unsafe fn hashmap_insert_with<K, V, S>(
    map: PtrMut<'_>,
    fill: &mut dyn FnMut(PtrMut<'_>, PtrMut<'_>) -> ControlFlow<()>,
) -> ControlFlow<()>
where
    K: Eq + Hash + Default,
    V: Default,
    S: BuildHasher,
{
    let mut key = K::default();
    let mut value = V::default();
    if fill(PtrMut::new(&mut key), PtrMut::new(&mut value)).is_break() {
        return ControlFlow::Break(());
    }
    unsafe { map.as_mut::<HashMap<K, V, S>>() }.insert(key, value);
    ControlFlow::Continue(())
}

unsafe impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: Reflect + Eq + Hash + Default,
    V: Reflect + Default,
    S: BuildHasher + Default + 'static,
{
    const SHAPE: &'static Shape = &const {
        Shape::of::<HashMap<K, V, S>>(Def::Map(MapDef {
            vtable: &const {
                MapVTable {
                    len: hashmap_len::<K, V, S>,
                    reserve: hashmap_reserve::<K, V, S>,
                    for_each: hashmap_for_each::<K, V, S>,
                    insert_with: hashmap_insert_with::<K, V, S>,
                }
            },
            k: shape_of::<K>,
            v: shape_of::<V>,
        }))
    };
}
