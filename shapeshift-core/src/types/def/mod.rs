use super::*;

mod list;
pub use list::*;

mod map;
pub use map::*;

mod option;
pub use option::*;

mod pointer;
pub use pointer::*;

use crate::ScalarType;

/// The semantic definition of a shape: is it more like a scalar, a struct, a
/// list, a map?
#[derive(Clone, Copy, Debug)]
pub enum Def {
    /// Scalar: not composed of other things.
    ///
    /// e.g. `u32`, `String`, `bool`
    Scalar(ScalarType),

    /// Struct with named fields.
    Struct(StructDef),

    /// Ordered list of homogenous values, variable size.
    ///
    /// e.g. `Vec<T>`
    List(ListDef),

    /// Map of homogenous keys to homogenous values.
    ///
    /// e.g. `HashMap<K, V>`, `BTreeMap<K, V>`
    Map(MapDef),

    /// Optional value.
    ///
    /// e.g. `Option<T>`
    Option(OptionDef),

    /// Owning pointer to a single value.
    ///
    /// e.g. `Box<T>`
    Pointer(PointerDef),
}

/// The variant of a [`Def`], without its payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DefKind {
    /// [`Def::Scalar`]
    Scalar,
    /// [`Def::Struct`]
    Struct,
    /// [`Def::List`]
    List,
    /// [`Def::Map`]
    Map,
    /// [`Def::Option`]
    Option,
    /// [`Def::Pointer`]
    Pointer,
}

impl Def {
    /// Returns the variant of this definition.
    pub const fn kind(&self) -> DefKind {
        match self {
            Def::Scalar(_) => DefKind::Scalar,
            Def::Struct(_) => DefKind::Struct,
            Def::List(_) => DefKind::List,
            Def::Map(_) => DefKind::Map,
            Def::Option(_) => DefKind::Option,
            Def::Pointer(_) => DefKind::Pointer,
        }
    }
}

impl fmt::Display for DefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefKind::Scalar => "scalar",
            DefKind::Struct => "struct",
            DefKind::List => "list",
            DefKind::Map => "map",
            DefKind::Option => "option",
            DefKind::Pointer => "pointer",
        })
    }
}
