use crate::Shape;

/// Describes a named field of a struct.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// Name of the field, as written in the struct declaration.
    pub name: &'static str,

    /// Shape of the field's type.
    ///
    /// The layer of indirection allows for cyclic type definitions.
    pub shape: fn() -> &'static Shape,

    /// Offset of the field in the struct (obtained through `core::mem::offset_of`).
    pub offset: usize,
}

impl Field {
    /// Returns the shape of the field's type.
    #[inline]
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }

    /// Returns the byte range this field occupies within its parent.
    #[inline]
    pub fn byte_range(&self) -> core::ops::Range<usize> {
        self.offset..self.offset + self.shape().layout.size()
    }
}

/// Fields for struct types.
#[derive(Clone, Copy, Debug)]
pub struct StructDef {
    /// All fields, in declaration order (not necessarily in memory order).
    pub fields: &'static [Field],
}

impl StructDef {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}
