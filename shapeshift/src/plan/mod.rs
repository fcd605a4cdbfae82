//! Compiled conversion plans.
//!
//! A [`ConversionPlan`] is built once per (source type, destination type,
//! options) triple by the [`PlanCompiler`](crate::PlanCompiler) and never
//! changes afterwards. Executing it walks the two values side by side through
//! pre-resolved offsets and vtables; no names are looked up and no shapes are
//! inspected at that point.

use core::fmt;
use std::sync::{Arc, OnceLock};

use shapeshift_core::{PtrConst, PtrMut, Reflect, Shape};

use crate::coerce::Coercion;
use crate::{ConvertError, FieldPath};

pub(crate) mod indirect;
pub(crate) mod map;
pub(crate) mod record;
pub(crate) mod sequence;

use indirect::IndirectStep;
use map::MapStep;
use record::RecordStep;
use sequence::SequenceStep;

/// An immutable, shareable recipe for converting one type into another.
pub struct ConversionPlan {
    src: &'static Shape,
    dst: &'static Shape,
    step: Step,
}

pub(crate) enum Step {
    Scalar(Coercion),
    Record(RecordStep),
    Sequence(SequenceStep),
    Map(MapStep),
    Indirect(IndirectStep),
}

/// What a [`ConversionPlan`] does at its top level.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PlanKind {
    /// Coerces one scalar into another.
    Scalar,
    /// Converts a struct field by field.
    Record,
    /// Rebuilds a list from another list.
    Sequence,
    /// Merges the entries of a map into another map.
    Map,
    /// Looks through an `Option` or a `Box` on either side.
    Indirect,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlanKind::Scalar => "scalar",
            PlanKind::Record => "record",
            PlanKind::Sequence => "sequence",
            PlanKind::Map => "map",
            PlanKind::Indirect => "indirect",
        })
    }
}

impl ConversionPlan {
    pub(crate) fn new(src: &'static Shape, dst: &'static Shape, step: Step) -> Self {
        Self { src, dst, step }
    }

    /// The type this plan reads from.
    pub fn source_shape(&self) -> &'static Shape {
        self.src
    }

    /// The type this plan writes into.
    pub fn destination_shape(&self) -> &'static Shape {
        self.dst
    }

    /// What this plan does at its top level.
    pub fn kind(&self) -> PlanKind {
        match self.step {
            Step::Scalar(_) => PlanKind::Scalar,
            Step::Record(_) => PlanKind::Record,
            Step::Sequence(_) => PlanKind::Sequence,
            Step::Map(_) => PlanKind::Map,
            Step::Indirect(_) => PlanKind::Indirect,
        }
    }

    /// True if the plan copies bytes instead of converting values: a scalar
    /// identity, or a list whose items have the same plain-old-data type on
    /// both sides.
    pub fn is_bitwise(&self) -> bool {
        match &self.step {
            Step::Scalar(coercion) => coercion.is_bitwise(),
            Step::Sequence(sequence) => sequence.is_bitwise(),
            _ => false,
        }
    }

    /// Converts `src` into `dst`, checking that they have the types this plan
    /// was compiled for.
    pub fn apply<S: Reflect, D: Reflect>(&self, src: &S, dst: &mut D) -> Result<(), ConvertError> {
        if S::SHAPE != self.src {
            return Err(ConvertError::WrongShape {
                expected: self.src,
                actual: S::SHAPE,
            });
        }
        if D::SHAPE != self.dst {
            return Err(ConvertError::WrongShape {
                expected: self.dst,
                actual: D::SHAPE,
            });
        }
        unsafe { self.execute(PtrConst::new(src), PtrMut::new(dst)) }
    }

    /// Converts the value at `src` into the value at `dst`.
    ///
    /// On error, whatever was converted before the failure stays converted.
    ///
    /// # Safety
    ///
    /// `src` must point to an initialized value of [`Self::source_shape`], and
    /// `dst` to an initialized value of [`Self::destination_shape`] that does
    /// not overlap it.
    pub unsafe fn execute(&self, src: PtrConst<'_>, dst: PtrMut<'_>) -> Result<(), ConvertError> {
        match &self.step {
            Step::Scalar(coercion) => unsafe { coercion.apply(src, dst) }.map_err(|failure| {
                ConvertError::Coercion {
                    failure,
                    path: FieldPath::default(),
                }
            }),
            Step::Record(record) => unsafe { record.execute(src, dst) },
            Step::Sequence(sequence) => unsafe { sequence.execute(src, dst) },
            Step::Map(map) => unsafe { map.execute(src, dst) },
            Step::Indirect(indirect) => unsafe { indirect.execute(src, dst) },
        }
    }
}

impl fmt::Debug for ConversionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionPlan")
            .field("src", &self.src.type_name())
            .field("dst", &self.dst.type_name())
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

/// A child plan: either already built, or the plan of a type pair that is
/// still being compiled further up the stack (recursive types).
#[derive(Clone)]
pub(crate) enum PlanRef {
    Ready(Arc<ConversionPlan>),
    Deferred(Arc<OnceLock<Arc<ConversionPlan>>>),
}

impl PlanRef {
    pub(crate) fn get(&self) -> Result<&ConversionPlan, ConvertError> {
        match self {
            PlanRef::Ready(plan) => Ok(plan),
            PlanRef::Deferred(slot) => slot
                .get()
                .map(|plan| &**plan)
                .ok_or(ConvertError::InvariantViolation {
                    message: "recursive plan executed before it was bound",
                }),
        }
    }

    /// # Safety
    ///
    /// Same as [`ConversionPlan::execute`].
    pub(crate) unsafe fn execute(&self, src: PtrConst<'_>, dst: PtrMut<'_>) -> Result<(), ConvertError> {
        unsafe { self.get()?.execute(src, dst) }
    }
}
