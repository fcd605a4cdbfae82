use crate::*;

unsafe fn option_get<T: 'static>(option: PtrConst<'_>) -> Option<PtrConst<'_>> {
    unsafe { option.get::<Option<T>>() }
        .as_ref()
        .map(PtrConst::new)
}

unsafe fn option_get_or_insert_default<T: Default + 'static>(option: PtrMut<'_>) -> PtrMut<'_> {
    PtrMut::new(unsafe { option.as_mut::<Option<T>>() }.get_or_insert_with(T::default))
}

unsafe impl<T> Reflect for Option<T>
where
    T: Reflect + Default,
{
    const SHAPE: &'static Shape = &const {
        Shape::of::<Option<T>>(Def::Option(OptionDef {
            vtable: &const {
                OptionVTable {
                    get: option_get::<T>,
                    get_or_insert_default: option_get_or_insert_default::<T>,
                }
            },
            t: shape_of::<T>,
        }))
    };
}
