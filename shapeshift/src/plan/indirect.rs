//! Looking through `Option` and `Box`.
//!
//! An absent source leaves the destination as it is. An absent destination
//! is filled with a default value first, then converted into.

use shapeshift_core::{
    Def, OptionGetFn, OptionGetOrInsertDefaultFn, PointerBorrowFn, PointerBorrowMutFn, PtrConst,
    PtrMut, Shape,
};

use super::PlanRef;
use crate::compiler::Session;
use crate::{ConvertError, FieldMappingOptions, MismatchReason, trace};

pub(crate) struct IndirectStep {
    src: SrcAccess,
    dst: DstAccess,
    inner: PlanRef,
}

enum SrcAccess {
    Direct,
    Option(OptionGetFn),
    Pointer(PointerBorrowFn),
}

enum DstAccess {
    Direct,
    Option(OptionGetOrInsertDefaultFn),
    Pointer(PointerBorrowMutFn),
}

impl IndirectStep {
    /// # Safety
    ///
    /// `src` and `dst` must point to values of the types the step was built for.
    pub(crate) unsafe fn execute(&self, src: PtrConst<'_>, dst: PtrMut<'_>) -> Result<(), ConvertError> {
        let src = match self.src {
            SrcAccess::Direct => src,
            SrcAccess::Option(get) => match unsafe { get(src) } {
                Some(inner) => inner,
                None => return Ok(()),
            },
            SrcAccess::Pointer(borrow) => unsafe { borrow(src) },
        };
        let dst = match self.dst {
            DstAccess::Direct => dst,
            DstAccess::Option(get_or_insert_default) => unsafe { get_or_insert_default(dst) },
            DstAccess::Pointer(borrow_mut) => unsafe { borrow_mut(dst) },
        };
        unsafe { self.inner.execute(src, dst) }
    }
}

/// Peels one layer of `Option` or `Box` off each side that has one.
pub(crate) fn build(
    session: &mut Session<'_>,
    src: &'static Shape,
    dst: &'static Shape,
    options: &FieldMappingOptions,
) -> Result<IndirectStep, ConvertError> {
    let (src_access, src_inner) = match src.def {
        Def::Option(od) => (SrcAccess::Option(od.vtable.get), od.t()),
        Def::Pointer(pd) => (SrcAccess::Pointer(pd.vtable.borrow), pd.pointee()),
        _ => (SrcAccess::Direct, src),
    };
    let (dst_access, dst_inner) = match dst.def {
        Def::Option(od) => (DstAccess::Option(od.vtable.get_or_insert_default), od.t()),
        Def::Pointer(pd) => (DstAccess::Pointer(pd.vtable.borrow_mut), pd.pointee()),
        _ => (DstAccess::Direct, dst),
    };
    trace!("{src} -> {dst}: looking through to {src_inner} -> {dst_inner}");

    let inner = session
        .child(src_inner, dst_inner, options)
        .map_err(|cause| ConvertError::mismatch(src, dst, MismatchReason::Inner(Box::new(cause))))?;

    Ok(IndirectStep {
        src: src_access,
        dst: dst_access,
        inner,
    })
}
