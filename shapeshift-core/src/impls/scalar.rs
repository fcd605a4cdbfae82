use crate::{Def, Reflect, ScalarType, Shape};

macro_rules! impl_reflect_for_scalar {
    ($($ty:ty => $scalar:ident),* $(,)?) => {
        $(
            unsafe impl Reflect for $ty {
                const SHAPE: &'static Shape =
                    &const { Shape::of::<$ty>(Def::Scalar(ScalarType::$scalar)).bitwise() };
            }
        )*
    };
}

impl_reflect_for_scalar! {
    bool => Bool,
    char => Char,
    &'static str => Str,
    f32 => F32,
    f64 => F64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => USize,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => ISize,
}

unsafe impl Reflect for String {
    const SHAPE: &'static Shape = &const { Shape::of::<String>(Def::Scalar(ScalarType::String)) };
}
