use core::{fmt, ptr, slice};

use crate::{
    config::Policy,
    error::{handle_alloc_failure, AllocError, VectorError},
    ptr::AllocInit,
    raw::RawVector,
    window::Window,
};

use super::resolve_range;

/// A double-ended vector of untyped elements, each `width` bytes wide.
///
/// The element width is fixed at creation and every call that reads or writes element data
/// works in multiples of it. This is the same engine as [`Vector`](crate::Vector), for callers
/// that only know element sizes at runtime. Elements are byte-aligned.
///
/// Popped elements are returned as borrows of the vacated slot, so they stay readable until the
/// next call that needs `&mut self`.
pub struct ErasedVector {
    raw: RawVector,
}

impl ErasedVector {
    /// Constructs an empty vector of `width`-byte elements.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `width` is zero.
    pub fn new(width: usize) -> Result<Self, VectorError> {
        Self::with_policy(width, Policy::default())
    }

    /// Constructs an empty vector of `width`-byte elements that follows `policy`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `width` is zero.
    pub fn with_policy(width: usize, policy: Policy) -> Result<Self, VectorError> {
        if width == 0 {
            return Err(VectorError::ZeroWidth);
        }
        Ok(Self {
            raw: RawVector::new(width, 1, policy),
        })
    }

    /// Constructs a vector of `len` elements, copied from `values` or zero-filled if `values` is
    /// `None`. Exactly `len` slots are allocated.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `width` is zero, `values` is not `len * width` bytes long, or the
    /// allocator fails.
    pub fn create(width: usize, len: usize, values: Option<&[u8]>) -> Result<Self, VectorError> {
        if width == 0 {
            return Err(VectorError::ZeroWidth);
        }
        payload_len(width, len, values)?;

        let init = match values {
            Some(_) => AllocInit::Uninitialized,
            None => AllocInit::Zeroed,
        };
        let mut raw = RawVector::with_capacity(width, 1, len, init, Policy::default())?;
        if let Some(values) = values {
            // SAFETY: `len` slots of `width` bytes were allocated and `values` has that length
            unsafe { ptr::copy_nonoverlapping(values.as_ptr(), raw.slot_ptr(0), values.len()) };
        }
        // SAFETY: every slot was either copied into or zeroed
        unsafe { raw.commit_back(len) };
        Ok(Self { raw })
    }

    /// Returns the number of bytes per element.
    #[inline]
    pub fn width(&self) -> usize {
        self.raw.width()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.window().capacity()
    }

    #[inline]
    pub fn headroom_front(&self) -> usize {
        self.raw.window().headroom_front()
    }

    #[inline]
    pub fn headroom_back(&self) -> usize {
        self.raw.window().headroom_back()
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.raw.window()
    }

    #[inline]
    pub fn policy(&self) -> Policy {
        self.raw.policy()
    }

    /// Appends `n` elements, copied from `data` or zero-filled if `data` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `data` is not `n * width` bytes long or the buffer had to grow and
    /// could not. The vector is unchanged in either case.
    pub fn push_back(&mut self, n: usize, data: Option<&[u8]>) -> Result<(), VectorError> {
        let bytes = payload_len(self.width(), n, data)?;
        self.raw.reserve_back(n)?;

        let dst = self.raw.slot_ptr(self.raw.window().range().end);
        // SAFETY: `n` slots were reserved after the last element
        unsafe {
            fill(dst, data, bytes);
            self.raw.commit_back(n);
        }
        Ok(())
    }

    /// Prepends `n` elements, copied from `data` or zero-filled if `data` is `None`. The new
    /// elements keep their order: afterwards the vector starts with `data`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `data` is not `n * width` bytes long or the buffer had to grow and
    /// could not. The vector is unchanged in either case.
    pub fn push_front(&mut self, n: usize, data: Option<&[u8]>) -> Result<(), VectorError> {
        let bytes = payload_len(self.width(), n, data)?;
        self.raw.reserve_front(n)?;

        let dst = self.raw.slot_ptr(self.raw.window().offset() - n);
        // SAFETY: `n` slots were reserved before the first element
        unsafe {
            fill(dst, data, bytes);
            self.raw.commit_front(n);
        }
        Ok(())
    }

    /// Removes the last element and returns its bytes, or `None` if the vector is empty.
    pub fn pop_back(&mut self) -> Option<&[u8]> {
        let slot = self.raw.pop_back()?;
        Some(self.slot_bytes(slot))
    }

    /// Removes the first element and returns its bytes, or `None` if the vector is empty.
    pub fn pop_front(&mut self) -> Option<&[u8]> {
        let slot = self.raw.pop_front()?;
        Some(self.slot_bytes(slot))
    }

    fn slot_bytes(&self, slot: usize) -> &[u8] {
        // SAFETY: the slot is inside the buffer and was initialized while it was live
        unsafe { slice::from_raw_parts(self.raw.slot_ptr(slot), self.width()) }
    }

    /// Removes the element at `index`, shifting whichever side of it is shorter.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Result<(), VectorError> {
        if index >= self.len() {
            return Err(VectorError::OutOfBounds {
                index,
                len: self.len(),
            });
        }
        self.raw.close_gap(index);
        Ok(())
    }

    /// Returns the bytes of the element at `index`, or `None` if it is out of bounds.
    pub fn at(&self, index: usize) -> Option<&[u8]> {
        if index >= self.len() {
            return None;
        }
        let width = self.width();
        Some(&self.as_bytes()[index * width..(index + 1) * width])
    }

    /// Returns the bytes of the element at `index` for writing, or `None` if it is out of bounds.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if index >= self.len() {
            return None;
        }
        let width = self.width();
        Some(&mut self.as_bytes_mut()[index * width..(index + 1) * width])
    }

    /// Returns the bytes of every element, in order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: every live byte was copied in or zeroed
        unsafe { self.raw.live_bytes() }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above
        unsafe { self.raw.live_bytes_mut() }
    }

    /// Iterates over the elements as `width`-byte slices.
    pub fn iter(&self) -> slice::ChunksExact<'_, u8> {
        self.as_bytes().chunks_exact(self.width())
    }

    /// Removes every element. The buffer and its headroom are kept.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a new vector holding a copy of elements `begin..end`, with the same width and
    /// policy and its own buffer.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `begin > end`, `end > len()`, or the allocator fails.
    pub fn slice(&self, begin: usize, end: usize) -> Result<Self, VectorError> {
        let range = resolve_range(&(begin..end), self.len())?;
        Ok(Self {
            raw: self.raw.copy_range(range)?,
        })
    }

    /// Returns an independent copy of the elements. Headroom is not copied.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the allocator cannot provide the memory.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        Ok(Self {
            raw: self.raw.copy_range(0..self.len())?,
        })
    }
}

/// Checks that `data`, if any, holds exactly `n` elements of `width` bytes and returns the byte
/// count.
fn payload_len(width: usize, n: usize, data: Option<&[u8]>) -> Result<usize, VectorError> {
    let expected = width.checked_mul(n).ok_or(AllocError::RequestTooLarge)?;
    match data {
        Some(data) if data.len() != expected => Err(VectorError::WidthMismatch {
            expected,
            found: data.len(),
        }),
        _ => Ok(expected),
    }
}

/// Copies `data` to `dst`, or zeroes `bytes` bytes there if there is no data.
///
/// # Safety
///
/// `dst` must be valid for `bytes` bytes of writes and not overlap `data`.
unsafe fn fill(dst: *mut u8, data: Option<&[u8]>, bytes: usize) {
    // SAFETY: upheld by the caller
    unsafe {
        match data {
            Some(data) => ptr::copy_nonoverlapping(data.as_ptr(), dst, bytes),
            None => ptr::write_bytes(dst, 0, bytes),
        }
    }
}

impl Clone for ErasedVector {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| handle_alloc_failure(err))
    }
}

/// Two vectors are equal when they have the same width and the same live bytes, no matter how
/// much headroom either one has.
impl PartialEq for ErasedVector {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width() && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ErasedVector {}

impl fmt::Debug for ErasedVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedVector")
            .field("width", &self.width())
            .field("window", &self.window())
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
