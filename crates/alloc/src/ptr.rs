use core::{alloc::Layout, ptr::NonNull};
use std::alloc;

use bytesize::ByteSize;
use log::error;

use crate::error::AllocError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AllocInit {
    /// The new memory is left uninitialized.
    Uninitialized,
    /// The new memory is zeroed.
    Zeroed,
}

/// Returns the layout of `count` slots of `width` bytes aligned to `align`.
pub(crate) fn slots_layout(width: usize, align: usize, count: usize) -> Result<Layout, AllocError> {
    let size = width
        .checked_mul(count)
        .ok_or(AllocError::RequestTooLarge)?;
    Layout::from_size_align(size, align).map_err(|_| AllocError::RequestTooLarge)
}

fn log_refusal(layout: Layout) -> AllocError {
    error!(
        "allocator refused {} (align {})",
        ByteSize::b(layout.size() as u64).to_string_as(true),
        layout.align()
    );
    AllocError::OutOfMemory(layout)
}

/// An owned byte region from the global allocator.
///
/// The region is addressed by slot index, never through pointers stored elsewhere, so moving or
/// resizing it cannot leave anything dangling. A zero-sized region is never allocated.
pub(crate) struct RawBuf {
    ptr: NonNull<u8>,
    layout: Layout,
}

// SAFETY: `RawBuf` uniquely owns its region, like `Box<[u8]>`.
unsafe impl Send for RawBuf {}
unsafe impl Sync for RawBuf {}

impl RawBuf {
    /// An unallocated region with the given alignment.
    pub fn dangling(align: usize) -> Self {
        let layout = match Layout::from_size_align(0, align) {
            Ok(layout) => layout,
            Err(_) => Layout::new::<()>(),
        };
        Self {
            // SAFETY: alignments are non-zero
            ptr: unsafe { NonNull::new_unchecked(layout.align() as *mut u8) },
            layout,
        }
    }

    /// Allocates a region described by `layout`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the allocator cannot provide the memory.
    pub fn allocate(layout: Layout, init: AllocInit) -> Result<Self, AllocError> {
        if layout.size() == 0 {
            return Ok(Self::dangling(layout.align()));
        }

        // SAFETY: the layout has a non-zero size
        let ptr = unsafe {
            match init {
                AllocInit::Uninitialized => alloc::alloc(layout),
                AllocInit::Zeroed => alloc::alloc_zeroed(layout),
            }
        };

        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self { ptr, layout }),
            None => Err(log_refusal(layout)),
        }
    }

    /// Resizes the region to `new_size` bytes, keeping its alignment.
    ///
    /// The first `min(old, new)` bytes are preserved. The contents of any added bytes are
    /// unspecified.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the allocator cannot provide the memory. The region is left untouched.
    pub fn reallocate(&mut self, new_size: usize) -> Result<(), AllocError> {
        let new_layout = Layout::from_size_align(new_size, self.layout.align())
            .map_err(|_| AllocError::RequestTooLarge)?;

        if self.layout.size() == 0 {
            *self = Self::allocate(new_layout, AllocInit::Uninitialized)?;
            return Ok(());
        }

        if new_size == 0 {
            // dropping the old region releases it
            *self = Self::dangling(self.layout.align());
            return Ok(());
        }

        // SAFETY: the region was allocated with `self.layout`, `new_size` is non-zero and fits
        // in `isize` once rounded to the alignment (checked by `from_size_align`)
        let ptr = unsafe { alloc::realloc(self.ptr.as_ptr(), self.layout, new_size) };
        match NonNull::new(ptr) {
            Some(ptr) => {
                self.ptr = ptr;
                self.layout = new_layout;
                Ok(())
            }
            None => Err(log_refusal(new_layout)),
        }
    }

    /// Returns the start of the region.
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Returns the size of the region in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Returns the alignment of the region.
    #[inline]
    pub fn align(&self) -> usize {
        self.layout.align()
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.layout.size() != 0
    }
}

impl Drop for RawBuf {
    fn drop(&mut self) {
        if self.is_allocated() {
            // SAFETY: the region was allocated with `self.layout` and is released exactly once
            unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_regions_are_not_allocated() {
        let buf = RawBuf::allocate(Layout::from_size_align(0, 8).unwrap(), AllocInit::Zeroed)
            .unwrap();
        assert!(!buf.is_allocated());
        assert_eq!(buf.as_ptr() as usize % 8, 0);
    }

    #[test]
    fn zeroed_regions_read_as_zero() {
        let buf = RawBuf::allocate(slots_layout(4, 4, 16).unwrap(), AllocInit::Zeroed).unwrap();
        assert_eq!(buf.size(), 64);
        let bytes = unsafe { core::slice::from_raw_parts(buf.as_ptr(), buf.size()) };
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn reallocation_keeps_the_prefix() {
        let mut buf = RawBuf::allocate(slots_layout(1, 1, 4).unwrap(), AllocInit::Zeroed).unwrap();
        unsafe { core::ptr::copy_nonoverlapping([1u8, 2, 3, 4].as_ptr(), buf.as_ptr(), 4) };

        buf.reallocate(64).unwrap();
        let bytes = unsafe { core::slice::from_raw_parts(buf.as_ptr(), 4) };
        assert_eq!(bytes, [1, 2, 3, 4]);

        buf.reallocate(2).unwrap();
        let bytes = unsafe { core::slice::from_raw_parts(buf.as_ptr(), 2) };
        assert_eq!(bytes, [1, 2]);

        buf.reallocate(0).unwrap();
        assert!(!buf.is_allocated());
    }

    #[test]
    fn oversized_requests_are_rejected() {
        assert_eq!(
            slots_layout(8, 8, usize::MAX),
            Err(AllocError::RequestTooLarge)
        );
        assert_eq!(
            slots_layout(1, 1, isize::MAX as usize + 1),
            Err(AllocError::RequestTooLarge)
        );

        let mut buf = RawBuf::dangling(1);
        assert_eq!(
            buf.reallocate(usize::MAX),
            Err(AllocError::RequestTooLarge)
        );
        assert!(!buf.is_allocated());
    }
}
