use core::{ops::Range, ptr, slice};

use bytesize::ByteSize;
use log::{trace, warn};

use crate::{
    config::Policy,
    error::AllocError,
    ptr::{slots_layout, AllocInit, RawBuf},
    window::Window,
};

/// Which end of the buffer a resize applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Front,
    Back,
}

/// The untyped engine behind both vector flavors.
///
/// `RawVector` moves bytes around and keeps the [`Window`] honest. It never reads, writes, or
/// drops elements: callers initialize slots before committing them and move values out of
/// slots it hands back.
pub(crate) struct RawVector {
    buf: RawBuf,
    width: usize,
    window: Window,
    policy: Policy,
}

impl RawVector {
    pub fn new(width: usize, align: usize, policy: Policy) -> Self {
        Self {
            buf: RawBuf::dangling(align),
            width,
            window: Window::EMPTY,
            policy,
        }
    }

    /// Allocates exactly `capacity` slots with no headroom reserved and nothing live yet.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the allocator cannot provide the memory.
    pub fn with_capacity(
        width: usize,
        align: usize,
        capacity: usize,
        init: AllocInit,
        policy: Policy,
    ) -> Result<Self, AllocError> {
        let layout = slots_layout(width, align, capacity)?;
        Ok(Self {
            buf: RawBuf::allocate(layout, init)?,
            width,
            window: Window::unfilled(capacity),
            policy,
        })
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.buf.is_allocated()
    }

    /// Returns a pointer to physical slot `slot`. Only slots up to the capacity may be accessed.
    #[inline]
    pub fn slot_ptr(&self, slot: usize) -> *mut u8 {
        self.buf.as_ptr().wrapping_add(slot * self.width)
    }

    /// Returns a pointer to the first live element.
    #[inline]
    pub fn live_ptr(&self) -> *mut u8 {
        self.slot_ptr(self.window.offset())
    }

    /// Returns the start of the buffer.
    #[cfg(test)]
    pub fn origin(&self) -> *mut u8 {
        self.buf.as_ptr()
    }

    /// Returns the bytes of the live elements.
    ///
    /// # Safety
    ///
    /// Every byte of every live element must be initialized (no padding).
    pub unsafe fn live_bytes(&self) -> &[u8] {
        // SAFETY: the live window lies inside the buffer; caller guarantees initialization
        unsafe { slice::from_raw_parts(self.live_ptr(), self.window.len() * self.width) }
    }

    /// Mutable version of [`live_bytes`](Self::live_bytes).
    ///
    /// # Safety
    ///
    /// Same as [`live_bytes`](Self::live_bytes).
    pub unsafe fn live_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` makes the borrow unique
        unsafe { slice::from_raw_parts_mut(self.live_ptr(), self.window.len() * self.width) }
    }

    /// Makes sure `n` elements fit after the last live element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer had to grow and could not. Nothing changes in that case.
    pub fn reserve_back(&mut self, n: usize) -> Result<(), AllocError> {
        if n == 0 || n < self.window.headroom_back() {
            return Ok(());
        }
        let step = self.growth_step(n)?;
        self.resize(Side::Back, step, true)?;
        self.window = self.window.grown_back(step);
        Ok(())
    }

    /// Makes sure `n` elements fit before the first live element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer had to grow and could not. Nothing changes in that case.
    pub fn reserve_front(&mut self, n: usize) -> Result<(), AllocError> {
        if n <= self.window.headroom_front() {
            return Ok(());
        }
        let step = self.growth_step(n)?;
        self.resize(Side::Front, step, true)?;

        // SAFETY: the buffer now has `step` more slots, so the shifted window still fits
        unsafe {
            ptr::copy(
                self.live_ptr(),
                self.slot_ptr(self.window.offset() + step),
                self.window.len() * self.width,
            );
        }
        self.window = self.window.grown_front(step);
        Ok(())
    }

    fn growth_step(&self, n: usize) -> Result<usize, AllocError> {
        self.policy
            .growth_step(n, self.window.len())
            .ok_or(AllocError::RequestTooLarge)
    }

    /// Reallocates the buffer with `count` slots more (or fewer) than the window's capacity.
    /// The window itself is not touched.
    fn resize(&mut self, side: Side, count: usize, grow: bool) -> Result<(), AllocError> {
        let old_capacity = self.window.capacity();
        let new_capacity = if grow {
            old_capacity.checked_add(count)
        } else {
            old_capacity.checked_sub(count)
        }
        .ok_or(AllocError::RequestTooLarge)?;

        let layout = slots_layout(self.width, self.buf.align(), new_capacity)?;
        self.buf.reallocate(layout.size())?;

        trace!(
            "resized {:?}: {} -> {} slots ({})",
            side,
            old_capacity,
            new_capacity,
            ByteSize::b(layout.size() as u64).to_string_as(true)
        );
        Ok(())
    }

    /// Releases part of the trailing headroom if it has grown too large.
    fn shrink_back_if_idle(&mut self) {
        let release = self
            .policy
            .shrink_step(self.window.headroom_back(), self.width, self.window.len());
        if release == 0 {
            return;
        }
        match self.resize(Side::Back, release, false) {
            Ok(()) => self.window = self.window.shrunk_back(release),
            Err(err) => warn!("keeping {} idle trailing slots: {}", release, err),
        }
    }

    /// Releases part of the leading headroom if it has grown too large.
    fn shrink_front_if_idle(&mut self) {
        let release = self
            .policy
            .shrink_step(self.window.headroom_front(), self.width, self.window.len());
        if release == 0 {
            return;
        }

        // SAFETY: `release <= offset`, so the destination is inside the buffer
        unsafe {
            ptr::copy(
                self.live_ptr(),
                self.slot_ptr(self.window.offset() - release),
                self.window.len() * self.width,
            );
        }
        // the released slots are now at the back
        self.window = self.window.shifted_front(release);

        match self.resize(Side::Front, release, false) {
            Ok(()) => self.window = self.window.shrunk_back(release),
            Err(err) => warn!("keeping {} idle leading slots: {}", release, err),
        }
    }

    /// Marks `n` slots after the last live element as live.
    ///
    /// # Safety
    ///
    /// The slots must have been reserved and initialized.
    #[inline]
    pub unsafe fn commit_back(&mut self, n: usize) {
        self.window = self.window.pushed_back(n);
    }

    /// Marks `n` slots before the first live element as live.
    ///
    /// # Safety
    ///
    /// The slots must have been reserved and initialized.
    #[inline]
    pub unsafe fn commit_front(&mut self, n: usize) {
        self.window = self.window.pushed_front(n);
    }

    /// Takes the last element out of the window and returns its slot, or `None` if empty.
    ///
    /// The slot keeps its contents until the next call that changes the buffer.
    pub fn pop_back(&mut self) -> Option<usize> {
        if self.window.is_empty() {
            return None;
        }
        self.shrink_back_if_idle();
        self.window = self.window.popped_back();
        Some(self.window.range().end)
    }

    /// Takes the first element out of the window and returns its slot, or `None` if empty.
    ///
    /// The slot keeps its contents until the next call that changes the buffer.
    pub fn pop_front(&mut self) -> Option<usize> {
        if self.window.is_empty() {
            return None;
        }
        self.shrink_front_if_idle();
        let slot = self.window.offset();
        self.window = self.window.popped_front();
        Some(slot)
    }

    /// Closes the gap left by the element at logical `index`, moving whichever side is shorter.
    ///
    /// The element itself must already have been moved out or be trivially droppable.
    pub fn close_gap(&mut self, index: usize) {
        let len = self.window.len();
        debug_assert!(index < len);
        let offset = self.window.offset();

        if index > len / 2 {
            // SAFETY: slots `index + 1 .. len` are live and move down by one
            unsafe {
                ptr::copy(
                    self.slot_ptr(offset + index + 1),
                    self.slot_ptr(offset + index),
                    (len - index - 1) * self.width,
                );
            }
            self.window = self.window.removed(false);
        } else {
            // SAFETY: slots `0 .. index` are live and move up by one
            unsafe {
                ptr::copy(
                    self.slot_ptr(offset),
                    self.slot_ptr(offset + 1),
                    index * self.width,
                );
            }
            self.window = self.window.removed(true);
        }
    }

    /// Forgets every live element. Headroom is kept.
    pub fn clear(&mut self) {
        self.window = self.window.cleared();
    }

    /// Copies the bytes of logical elements `range` into a new, exactly sized buffer.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the allocator cannot provide the memory.
    pub fn copy_range(&self, range: Range<usize>) -> Result<Self, AllocError> {
        debug_assert!(range.start <= range.end && range.end <= self.window.len());
        let count = range.end - range.start;
        let mut copy = Self::with_capacity(
            self.width,
            self.buf.align(),
            count,
            AllocInit::Uninitialized,
            self.policy,
        )?;

        // SAFETY: both ranges are in bounds and belong to different buffers
        unsafe {
            ptr::copy_nonoverlapping(
                self.slot_ptr(self.window.offset() + range.start),
                copy.slot_ptr(0),
                count * self.width,
            );
            copy.commit_back(count);
        }
        Ok(copy)
    }
}
