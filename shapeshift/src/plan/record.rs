//! Field-by-field struct conversion.

use shapeshift_core::{Field, PtrConst, PtrMut, Shape, StructDef};

use super::PlanRef;
use crate::compiler::Session;
use crate::options::NO_OPTIONS;
use crate::{ConvertError, FieldMappingOptions, FieldOverride, MismatchReason, PathSegment, debug, trace};

/// Destination fields in declaration order, each with where to read it from.
///
/// Destination fields that are excluded, or that have no counterpart in the
/// source, have no entry and are never written.
pub(crate) struct RecordStep {
    fields: Vec<FieldStep>,
}

struct FieldStep {
    name: &'static str,
    src_offset: usize,
    dst_offset: usize,
    action: FieldAction,
}

enum FieldAction {
    Plan(PlanRef),
    Override(FieldOverride),
}

impl RecordStep {
    /// # Safety
    ///
    /// `src` and `dst` must point to the structs the step was built for.
    pub(crate) unsafe fn execute(&self, src: PtrConst<'_>, mut dst: PtrMut<'_>) -> Result<(), ConvertError> {
        for field in &self.fields {
            // offsets were checked against both layouts when the step was built
            let field_src = unsafe { src.field(field.src_offset) };
            let field_dst = unsafe { dst.field(field.dst_offset) };
            match &field.action {
                FieldAction::Plan(plan) => unsafe { plan.execute(field_src, field_dst) }
                    .map_err(|err| err.at(PathSegment::Field(field.name)))?,
                FieldAction::Override(f) => unsafe { f.call(field_src, field_dst) },
            }
        }
        Ok(())
    }
}

pub(crate) fn build(
    session: &mut Session<'_>,
    src: &'static Shape,
    dst: &'static Shape,
    src_def: &StructDef,
    dst_def: &StructDef,
    options: &FieldMappingOptions,
) -> Result<RecordStep, ConvertError> {
    let mut fields = Vec::with_capacity(dst_def.fields.len());

    for dst_field in dst_def.fields {
        if options.is_excluded(dst_field.name) {
            trace!("{dst}: skipping excluded field `{}`", dst_field.name);
            continue;
        }

        let src_name = options.source_name(dst_field.name);
        let Some(src_field) = src_def.field(src_name) else {
            trace!("{dst}: no source field for `{}`", dst_field.name);
            continue;
        };

        let src_offset = checked_offset(src, src_field)?;
        let dst_offset = checked_offset(dst, dst_field)?;

        let action = match options.override_for(dst_field.name) {
            Some(f) => {
                if f.source_shape() != src_field.shape() || f.destination_shape() != dst_field.shape() {
                    return Err(ConvertError::mismatch(
                        src,
                        dst,
                        MismatchReason::OverrideShape {
                            field: dst_field.name,
                        },
                    ));
                }
                FieldAction::Override(f.clone())
            }
            None => {
                let plan = session
                    .child(src_field.shape(), dst_field.shape(), &NO_OPTIONS)
                    .map_err(|cause| {
                        ConvertError::mismatch(
                            src,
                            dst,
                            MismatchReason::Field {
                                name: dst_field.name,
                                cause: Box::new(cause),
                            },
                        )
                    })?;
                FieldAction::Plan(plan)
            }
        };

        fields.push(FieldStep {
            name: dst_field.name,
            src_offset,
            dst_offset,
            action,
        });
    }

    debug!(
        "{src} -> {dst}: {} of {} fields mapped",
        fields.len(),
        dst_def.fields.len()
    );
    Ok(RecordStep { fields })
}

fn checked_offset(parent: &'static Shape, field: &Field) -> Result<usize, ConvertError> {
    if field.byte_range().end > parent.layout.size() {
        return Err(ConvertError::mismatch(
            parent,
            parent,
            MismatchReason::FieldOutOfBounds { field: field.name },
        ));
    }
    Ok(field.offset)
}
