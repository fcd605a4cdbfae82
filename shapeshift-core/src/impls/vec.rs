use crate::*;

unsafe fn vec_len<T>(list: PtrConst<'_>) -> usize {
    unsafe { list.get::<Vec<T>>() }.len()
}

unsafe fn vec_as_ptr<T: 'static>(list: PtrConst<'_>) -> PtrConst<'_> {
    PtrConst::new(unsafe { list.get::<Vec<T>>() }.as_slice())
}

unsafe fn vec_as_mut_ptr<T: 'static>(list: PtrMut<'_>) -> PtrMut<'_> {
    PtrMut::new(unsafe { list.as_mut::<Vec<T>>() }.as_mut_slice())
}

unsafe fn vec_reset<T: Default>(list: PtrMut<'_>, len: usize) {
    let vec = unsafe { list.as_mut::<Vec<T>>() };
    vec.clear();
    // no-op when the current buffer is already large enough
    vec.reserve_exact(len);
    vec.resize_with(len, T::default);
}

unsafe impl<T> Reflect for Vec<T>
where
    T: Reflect + Default,
{
    const SHAPE: &'static Shape = &const {
        Shape::of::<Vec<T>>(Def::List(ListDef {
            vtable: &const {
                ListVTable {
                    len: vec_len::<T>,
                    as_ptr: vec_as_ptr::<T>,
                    as_mut_ptr: vec_as_mut_ptr::<T>,
                    reset: vec_reset::<T>,
                }
            },
            t: shape_of::<T>,
        }))
    };
}
