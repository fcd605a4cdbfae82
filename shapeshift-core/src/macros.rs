/// Declares one or more structs and implements [`Reflect`](crate::Reflect)
/// for each of them.
///
/// Every field type must itself implement `Reflect`. Attributes (derives,
/// doc comments) on the struct and its fields are passed through.
///
/// ```
/// shapeshift_core::record! {
///     #[derive(Debug, Default)]
///     pub struct Point {
///         pub x: i32,
///         pub y: i32,
///     }
///
///     #[derive(Debug, Default)]
///     pub struct Polyline {
///         pub points: Vec<Point>,
///         pub label: Option<String>,
///     }
/// }
///
/// use shapeshift_core::{Def, Reflect};
/// let Def::Struct(sd) = Polyline::SHAPE.def else { unreachable!() };
/// assert_eq!(sd.fields[0].name, "points");
/// assert!(sd.fields[1].shape().is_type::<Option<String>>());
/// ```
#[macro_export]
macro_rules! record {
    ($(
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    )+) => {
        $(
            $(#[$meta])*
            $vis struct $name {
                $(
                    $(#[$field_meta])*
                    $field_vis $field: $ty,
                )*
            }

            $crate::impl_record!($name { $($field: $ty),* });
        )+
    };
}

/// Implements [`Reflect`](crate::Reflect) for a struct declared elsewhere.
///
/// List the fields that conversion should see; fields left out are invisible
/// to it (never read, never written).
///
/// ```
/// #[derive(Default)]
/// struct Celsius {
///     degrees: f64,
///     sensor: u32,
/// }
///
/// shapeshift_core::impl_record!(Celsius { degrees: f64 });
///
/// use shapeshift_core::{Def, Reflect};
/// let Def::Struct(sd) = Celsius::SHAPE.def else { unreachable!() };
/// assert_eq!(sd.fields.len(), 1);
/// ```
///
/// Each listed type must be the field's declared type:
///
/// ```compile_fail
/// struct Tag {
///     label: [usize; 3],
/// }
///
/// shapeshift_core::impl_record!(Tag { label: String });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($name:ty { $($field:ident : $ty:ty),* $(,)? }) => {
        const _: () = {
            // raw pointers do not coerce, so the field types must match exactly
            #[allow(dead_code)]
            fn field_types(record: &$name) {
                $(let _: *const $ty = &raw const record.$field;)*
            }
        };

        unsafe impl $crate::Reflect for $name {
            const SHAPE: &'static $crate::Shape = &const {
                const FIELDS: &[$crate::Field] = &[$(
                    $crate::Field {
                        name: ::core::stringify!($field),
                        shape: $crate::shape_of::<$ty>,
                        offset: ::core::mem::offset_of!($name, $field),
                    }
                ),*];

                $crate::Shape::of::<$name>($crate::Def::Struct($crate::StructDef { fields: FIELDS }))
            };
        }
    };
}
