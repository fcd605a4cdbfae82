use core::fmt;

use shapeshift_core::{DefKind, ScalarType, Shape};

/// Errors that can occur while compiling or executing a conversion.
///
/// Compile-time errors ([`ConvertError::StructuralMismatch`],
/// [`ConvertError::UnsupportedScalarPair`]) are discovered once per type pair
/// and cached; [`ConvertError::Coercion`] is the only error that depends on
/// the value being converted.
#[derive(Clone, Debug)]
pub enum ConvertError {
    /// No conversion path exists between the two types.
    StructuralMismatch {
        /// The source shape.
        src: &'static Shape,
        /// The destination shape.
        dst: &'static Shape,
        /// Why no plan could be built.
        reason: MismatchReason,
    },

    /// Both sides are scalars, but no coercion exists between them.
    UnsupportedScalarPair {
        /// The source scalar type.
        src: ScalarType,
        /// The destination scalar type.
        dst: ScalarType,
    },

    /// A scalar coercion failed for a particular value (e.g. a string that
    /// does not parse as a number). Fields converted before the failure keep
    /// their new values.
    Coercion {
        /// What failed.
        failure: CoercionFailure,
        /// Where in the value it failed.
        path: FieldPath,
    },

    /// `convert_slice` was called with sequences of different lengths.
    ArityMismatch {
        /// Number of source values.
        src_len: usize,
        /// Number of destination values.
        dst_len: usize,
    },

    /// A plan was applied to values of types it was not compiled for.
    WrongShape {
        /// The shape the plan was compiled for.
        expected: &'static Shape,
        /// The shape it was applied to.
        actual: &'static Shape,
    },

    /// An invariant of the engine was violated.
    InvariantViolation {
        /// What went wrong.
        message: &'static str,
    },
}

/// Why a [`ConvertError::StructuralMismatch`] happened.
#[derive(Clone, Debug)]
pub enum MismatchReason {
    /// The two types are different kinds of things (e.g. a struct and a list).
    IncompatibleKinds {
        /// Kind of the source type.
        src: DefKind,
        /// Kind of the destination type.
        dst: DefKind,
    },

    /// A destination field has no conversion from its source field.
    Field {
        /// Name of the destination field.
        name: &'static str,
        /// What went wrong for the field's types.
        cause: Box<ConvertError>,
    },

    /// List items cannot be converted.
    Element(Box<ConvertError>),

    /// Map keys cannot be converted.
    Key(Box<ConvertError>),

    /// Map values cannot be converted.
    Value(Box<ConvertError>),

    /// The types wrapped in an `Option` or a `Box` cannot be converted.
    Inner(Box<ConvertError>),

    /// A field override was registered for types other than the field's.
    OverrideShape {
        /// Name of the destination field.
        field: &'static str,
    },

    /// A field's declared offset does not fit in its struct.
    FieldOutOfBounds {
        /// Name of the field.
        field: &'static str,
    },
}

impl ConvertError {
    /// Returns true for errors that are properties of the type pair rather
    /// than of a particular value.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ConvertError::StructuralMismatch { .. } | ConvertError::UnsupportedScalarPair { .. }
        )
    }

    /// Follows nested mismatch reasons down to the innermost error.
    pub fn root_cause(&self) -> &ConvertError {
        let mut current = self;
        while let ConvertError::StructuralMismatch { reason, .. } = current {
            match reason {
                MismatchReason::Field { cause, .. }
                | MismatchReason::Element(cause)
                | MismatchReason::Key(cause)
                | MismatchReason::Value(cause)
                | MismatchReason::Inner(cause) => current = &**cause,
                _ => break,
            }
        }
        current
    }

    /// Records that the failure happened under `segment`. Only
    /// execution-time failures carry a path.
    pub(crate) fn at(mut self, segment: PathSegment) -> Self {
        if let ConvertError::Coercion { path, .. } = &mut self {
            path.segments.insert(0, segment);
        }
        self
    }

    pub(crate) fn mismatch(
        src: &'static Shape,
        dst: &'static Shape,
        reason: MismatchReason,
    ) -> Self {
        ConvertError::StructuralMismatch { src, dst, reason }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::StructuralMismatch { src, dst, reason } => {
                write!(f, "no conversion available from {src} to {dst}: {reason}")
            }
            ConvertError::UnsupportedScalarPair { src, dst } => {
                write!(f, "no coercion from {src} to {dst}")
            }
            ConvertError::Coercion { failure, path } => {
                if path.is_empty() {
                    write!(f, "{failure}")
                } else {
                    write!(f, "at {path}: {failure}")
                }
            }
            ConvertError::ArityMismatch { src_len, dst_len } => write!(
                f,
                "cannot convert {src_len} values into {dst_len} destinations"
            ),
            ConvertError::WrongShape { expected, actual } => {
                write!(f, "wrong shape: expected {expected}, got {actual}")
            }
            ConvertError::InvariantViolation { message } => {
                write!(f, "invariant violation: {message}")
            }
        }
    }
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReason::IncompatibleKinds { src, dst } => {
                write!(f, "cannot turn a {src} into a {dst}")
            }
            MismatchReason::Field { name, cause } => write!(f, "field `{name}`: {cause}"),
            MismatchReason::Element(cause) => write!(f, "items: {cause}"),
            MismatchReason::Key(cause) => write!(f, "keys: {cause}"),
            MismatchReason::Value(cause) => write!(f, "values: {cause}"),
            MismatchReason::Inner(cause) => write!(f, "{cause}"),
            MismatchReason::OverrideShape { field } => {
                write!(f, "override for field `{field}` does not match the field types")
            }
            MismatchReason::FieldOutOfBounds { field } => {
                write!(f, "field `{field}` lies outside its struct")
            }
        }
    }
}

impl core::error::Error for ConvertError {}

/// A scalar value that could not be coerced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoercionFailure {
    /// Source scalar type.
    pub src: ScalarType,
    /// Destination scalar type.
    pub dst: ScalarType,
    /// The offending value, rendered for humans (strings are quoted).
    pub value: String,
    /// Why the coercion failed.
    pub reason: CoercionReason,
}

/// Why a [`CoercionFailure`] happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoercionReason {
    /// The value does not fit in the destination type.
    OutOfRange,
    /// NaN or an infinity cannot become an integer.
    NotFinite,
    /// The string does not parse as the destination type.
    Unparseable,
    /// The value is not exactly one Unicode scalar value.
    NotAChar,
    /// The value has a kind the destination cannot represent.
    Unsupported,
}

impl fmt::Display for CoercionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot coerce {} ({}) into {}: {}",
            self.value, self.src, self.dst, self.reason
        )
    }
}

impl fmt::Display for CoercionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoercionReason::OutOfRange => "out of range",
            CoercionReason::NotFinite => "not a finite number",
            CoercionReason::Unparseable => "invalid syntax",
            CoercionReason::NotAChar => "not a single character",
            CoercionReason::Unsupported => "unsupported",
        })
    }
}

impl core::error::Error for CoercionFailure {}

/// Location of a value inside a converted tree, outermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

/// One step of a [`FieldPath`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A struct field, by name.
    Field(&'static str),
    /// A list item, by index.
    Index(usize),
    /// A map key.
    Key,
    /// A map value.
    Value,
}

impl FieldPath {
    /// The segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True for the path of the top-level value itself.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key => f.write_str("{key}")?,
                PathSegment::Value => f.write_str("{value}")?,
            }
        }
        Ok(())
    }
}
