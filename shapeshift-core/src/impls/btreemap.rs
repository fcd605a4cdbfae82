use core::ops::ControlFlow;
use std::collections::BTreeMap;

use crate::*;

unsafe fn btreemap_len<K, V>(map: PtrConst<'_>) -> usize {
    unsafe { map.get::<BTreeMap<K, V>>() }.len()
}

unsafe fn btreemap_reserve(_map: PtrMut<'_>, _additional: usize) {}

unsafe fn btreemap_for_each<K, V>(
    map: PtrConst<'_>,
    visit: &mut dyn FnMut(PtrConst<'_>, PtrConst<'_>) -> ControlFlow<()>,
) -> ControlFlow<()> {
    for (k, v) in unsafe { map.get::<BTreeMap<K, V>>() } {
        if visit(PtrConst::new(k), PtrConst::new(v)).is_break() {
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}

unsafe fn btreemap_insert_with<K, V>(
    map: PtrMut<'_>,
    fill: &mut dyn FnMut(PtrMut<'_>, PtrMut<'_>) -> ControlFlow<()>,
) -> ControlFlow<()>
where
    K: Ord + Default,
    V: Default,
{
    let mut key = K::default();
    let mut value = V::default();
    if fill(PtrMut::new(&mut key), PtrMut::new(&mut value)).is_break() {
        return ControlFlow::Break(());
    }
    unsafe { map.as_mut::<BTreeMap<K, V>>() }.insert(key, value);
    ControlFlow::Continue(())
}

unsafe impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + Ord + Default,
    V: Reflect + Default,
{
    const SHAPE: &'static Shape = &const {
        Shape::of::<BTreeMap<K, V>>(Def::Map(MapDef {
            vtable: &const {
                MapVTable {
                    len: btreemap_len::<K, V>,
                    reserve: btreemap_reserve,
                    for_each: btreemap_for_each::<K, V>,
                    insert_with: btreemap_insert_with::<K, V>,
                }
            },
            k: shape_of::<K>,
            v: shape_of::<V>,
        }))
    };
}
