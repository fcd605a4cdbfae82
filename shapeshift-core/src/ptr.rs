//! Opaque pointers
//!
//! Type-erased pointer helpers for working with reflected values. They are
//! thin wrappers around a non-null byte pointer plus a lifetime; nothing about
//! the pointee type is checked, which is why every accessor is `unsafe`.

use core::{fmt, marker::PhantomData, ptr::NonNull};

/// A type-erased, read-only pointer to an initialized value.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct PtrConst<'mem> {
    ptr: NonNull<u8>,
    phantom: PhantomData<&'mem ()>,
}

impl fmt::Debug for PtrConst<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ptr.as_ptr().fmt(f)
    }
}

impl<'mem> PtrConst<'mem> {
    /// Creates a pointer from a reference.
    #[inline]
    pub fn new<T: ?Sized>(value: &'mem T) -> Self {
        Self {
            ptr: NonNull::from(value).cast::<u8>(),
            phantom: PhantomData,
        }
    }

    /// Returns the underlying byte pointer.
    #[inline]
    pub const fn as_byte_ptr(self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Borrows the pointee as a `T`.
    ///
    /// # Safety
    ///
    /// The pointer must point to an initialized, properly aligned `T` that
    /// stays valid and unaliased by writers for `'mem`.
    #[inline]
    pub unsafe fn get<T>(self) -> &'mem T {
        unsafe { &*(self.ptr.as_ptr() as *const T) }
    }

    /// Returns a pointer `offset` bytes further into the same allocation.
    ///
    /// # Safety
    ///
    /// `offset` must stay within the bounds of the value this pointer points to.
    #[inline]
    pub unsafe fn field(self, offset: usize) -> Self {
        Self {
            ptr: unsafe { self.ptr.byte_add(offset) },
            phantom: PhantomData,
        }
    }
}

impl<'mem, T: ?Sized> From<&'mem T> for PtrConst<'mem> {
    #[inline]
    fn from(value: &'mem T) -> Self {
        Self::new(value)
    }
}

/// A type-erased, exclusive pointer to an initialized value.
#[repr(transparent)]
pub struct PtrMut<'mem> {
    ptr: NonNull<u8>,
    phantom: PhantomData<&'mem mut ()>,
}

impl fmt::Debug for PtrMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ptr.as_ptr().fmt(f)
    }
}

impl<'mem> PtrMut<'mem> {
    /// Creates a pointer from an exclusive reference.
    #[inline]
    pub fn new<T: ?Sized>(value: &'mem mut T) -> Self {
        Self {
            ptr: NonNull::from(value).cast::<u8>(),
            phantom: PhantomData,
        }
    }

    /// Returns the underlying byte pointer.
    #[inline]
    pub const fn as_mut_byte_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Reborrows this pointer for a shorter lifetime, leaving `self` usable
    /// once the reborrow ends.
    #[inline]
    pub fn reborrow(&mut self) -> PtrMut<'_> {
        PtrMut {
            ptr: self.ptr,
            phantom: PhantomData,
        }
    }

    /// Downgrades to a read-only pointer.
    #[inline]
    pub fn as_const(&self) -> PtrConst<'_> {
        PtrConst {
            ptr: self.ptr,
            phantom: PhantomData,
        }
    }

    /// Borrows the pointee as a `T`.
    ///
    /// # Safety
    ///
    /// The pointer must point to an initialized, properly aligned `T`.
    #[inline]
    pub unsafe fn as_mut<T>(self) -> &'mem mut T {
        unsafe { &mut *(self.ptr.as_ptr() as *mut T) }
    }

    /// Returns a pointer `offset` bytes further into the same allocation.
    ///
    /// # Safety
    ///
    /// `offset` must stay within the bounds of the value this pointer points to.
    #[inline]
    pub unsafe fn field(&mut self, offset: usize) -> PtrMut<'_> {
        PtrMut {
            ptr: unsafe { self.ptr.byte_add(offset) },
            phantom: PhantomData,
        }
    }
}

impl<'mem, T: ?Sized> From<&'mem mut T> for PtrMut<'mem> {
    #[inline]
    fn from(value: &'mem mut T) -> Self {
        Self::new(value)
    }
}
