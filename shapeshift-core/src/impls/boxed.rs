use crate::*;

unsafe fn box_borrow<T: 'static>(pointer: PtrConst<'_>) -> PtrConst<'_> {
    PtrConst::new(&**unsafe { pointer.get::<Box<T>>() })
}

unsafe fn box_borrow_mut<T: 'static>(pointer: PtrMut<'_>) -> PtrMut<'_> {
    PtrMut::new(&mut **unsafe { pointer.as_mut::<Box<T>>() })
}

unsafe impl<T> Reflect for Box<T>
where
    T: Reflect,
{
    const SHAPE: &'static Shape = &const {
        Shape::of::<Box<T>>(Def::Pointer(PointerDef {
            vtable: &const {
                PointerVTable {
                    borrow: box_borrow::<T>,
                    borrow_mut: box_borrow_mut::<T>,
                }
            },
            pointee: shape_of::<T>,
        }))
    };
}
