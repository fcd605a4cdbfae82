//! List to list conversion.
//!
//! The destination list always ends up with exactly as many items as the
//! source: its previous items are dropped, not merged with.

use shapeshift_core::{ListDef, ListVTable, PtrConst, PtrMut, Shape};

use super::PlanRef;
use crate::compiler::Session;
use crate::{ConvertError, FieldMappingOptions, MismatchReason, PathSegment, debug};

pub(crate) struct SequenceStep {
    src: &'static ListVTable,
    dst: &'static ListVTable,
    src_stride: usize,
    dst_stride: usize,
    items: Items,
}

enum Items {
    /// Same plain-old-data item type on both sides: one block copy.
    Bitwise,
    Each(PlanRef),
}

impl SequenceStep {
    pub(crate) fn is_bitwise(&self) -> bool {
        matches!(self.items, Items::Bitwise)
    }

    /// # Safety
    ///
    /// `src` and `dst` must point to the lists the step was built for.
    pub(crate) unsafe fn execute(&self, src: PtrConst<'_>, mut dst: PtrMut<'_>) -> Result<(), ConvertError> {
        let len = unsafe { (self.src.len)(src) };
        unsafe { (self.dst.reset)(dst.reborrow(), len) };
        if len == 0 {
            return Ok(());
        }

        let from = unsafe { (self.src.as_ptr)(src) };
        let mut to = unsafe { (self.dst.as_mut_ptr)(dst) };

        match &self.items {
            Items::Bitwise => unsafe {
                core::ptr::copy_nonoverlapping(
                    from.as_byte_ptr(),
                    to.as_mut_byte_ptr(),
                    len * self.src_stride,
                );
            },
            Items::Each(plan) => {
                let plan = plan.get()?;
                for index in 0..len {
                    let item_src = unsafe { from.field(index * self.src_stride) };
                    let item_dst = unsafe { to.field(index * self.dst_stride) };
                    unsafe { plan.execute(item_src, item_dst) }
                        .map_err(|err| err.at(PathSegment::Index(index)))?;
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn build(
    session: &mut Session<'_>,
    src: &'static Shape,
    dst: &'static Shape,
    src_def: &ListDef,
    dst_def: &ListDef,
    options: &FieldMappingOptions,
) -> Result<SequenceStep, ConvertError> {
    let src_item = src_def.t();
    let dst_item = dst_def.t();

    let items = if src_item == dst_item && src_item.bitwise {
        debug!("{src} -> {dst}: items are bitwise-identical, using block copy");
        Items::Bitwise
    } else {
        let plan = session
            .child(src_item, dst_item, options)
            .map_err(|cause| ConvertError::mismatch(src, dst, MismatchReason::Element(Box::new(cause))))?;
        Items::Each(plan)
    };

    Ok(SequenceStep {
        src: src_def.vtable,
        dst: dst_def.vtable,
        src_stride: src_item.layout.size(),
        dst_stride: dst_item.layout.size(),
        items,
    })
}
