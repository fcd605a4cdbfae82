//! Map to map conversion.
//!
//! Every source entry is converted and inserted into the destination,
//! replacing the value under an equal key. Destination entries whose keys do
//! not appear in the source are kept.

use core::ops::ControlFlow;

use shapeshift_core::{MapDef, MapVTable, PtrConst, PtrMut, Shape};

use super::PlanRef;
use crate::compiler::Session;
use crate::{ConvertError, FieldMappingOptions, MismatchReason, PathSegment};

pub(crate) struct MapStep {
    src: &'static MapVTable,
    dst: &'static MapVTable,
    key: PlanRef,
    value: PlanRef,
}

impl MapStep {
    /// # Safety
    ///
    /// `src` and `dst` must point to the maps the step was built for.
    pub(crate) unsafe fn execute(&self, src: PtrConst<'_>, mut dst: PtrMut<'_>) -> Result<(), ConvertError> {
        let key = self.key.get()?;
        let value = self.value.get()?;

        if unsafe { (self.dst.len)(dst.as_const()) } == 0 {
            let additional = unsafe { (self.src.len)(src) };
            unsafe { (self.dst.reserve)(dst.reborrow(), additional) };
        }

        let mut failure = None;
        // the closures run inside this block, entries point into the two maps
        let _ = unsafe {
            (self.src.for_each)(src, &mut |src_key, src_value| {
                (self.dst.insert_with)(dst.reborrow(), &mut |dst_key, dst_value| {
                    let converted = key
                        .execute(src_key, dst_key)
                        .map_err(|err| err.at(PathSegment::Key))
                        .and_then(|()| {
                            value
                                .execute(src_value, dst_value)
                                .map_err(|err| err.at(PathSegment::Value))
                        });
                    match converted {
                        Ok(()) => ControlFlow::Continue(()),
                        Err(err) => {
                            failure = Some(err);
                            ControlFlow::Break(())
                        }
                    }
                })
            })
        };

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub(crate) fn build(
    session: &mut Session<'_>,
    src: &'static Shape,
    dst: &'static Shape,
    src_def: &MapDef,
    dst_def: &MapDef,
    options: &FieldMappingOptions,
) -> Result<MapStep, ConvertError> {
    let key = session
        .child(src_def.k(), dst_def.k(), options)
        .map_err(|cause| ConvertError::mismatch(src, dst, MismatchReason::Key(Box::new(cause))))?;
    let value = session
        .child(src_def.v(), dst_def.v(), options)
        .map_err(|cause| ConvertError::mismatch(src, dst, MismatchReason::Value(Box::new(cause))))?;

    Ok(MapStep {
        src: src_def.vtable,
        dst: dst_def.vtable,
        key,
        value,
    })
}
