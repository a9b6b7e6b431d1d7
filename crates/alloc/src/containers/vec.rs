use core::{
    fmt,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    marker::PhantomData,
    mem,
    ops::{Deref, DerefMut, RangeBounds},
    ptr, slice,
};

use crate::{
    config::Policy,
    error::{handle_alloc_failure, AllocError, VectorError},
    ptr::AllocInit,
    raw::RawVector,
    window::Window,
};

use super::resolve_range;

/// A contiguous growable array with amortized O(1) pushes and pops at both ends, written as
/// `Vector<T>`.
///
/// The elements live in a window inside a larger buffer. Pushing at either end only touches the
/// buffer when that end has run out of headroom, and popping only gives memory back when that
/// end has accumulated too much of it (see [`Policy`]). Unlike `VecDeque`, the elements are
/// always contiguous, so a `Vector<T>` dereferences to `[T]`.
///
/// Growing operations are fallible and leave the vector untouched when they fail.
///
/// # Examples
///
/// ```
/// use gdata_alloc::{vector, Vector};
///
/// let mut v: Vector<i32> = vector![1, 2, 3];
/// v.extend_front_from_slice(&[9, 8]).unwrap();
/// assert_eq!(v, [9, 8, 1, 2, 3]);
///
/// assert_eq!(v.pop_back(), Some(3));
/// assert_eq!(v.pop_front(), Some(9));
/// assert_eq!(v, [8, 1, 2]);
/// ```
pub struct Vector<T> {
    raw: RawVector,
    _marker: PhantomData<T>,
}

impl<T> Vector<T> {
    /// Constructs a new, empty `Vector<T>`. Nothing is allocated until the first push.
    pub fn new() -> Self {
        Self::with_policy(Policy::default())
    }

    /// Constructs a new, empty `Vector<T>` that grows and shrinks according to `policy`.
    pub fn with_policy(policy: Policy) -> Self {
        Self {
            raw: RawVector::new(mem::size_of::<T>(), mem::align_of::<T>(), policy),
            _marker: PhantomData,
        }
    }

    /// Allocates exactly `capacity` slots with nothing live.
    fn exact(capacity: usize, policy: Policy) -> Result<Self, AllocError> {
        Ok(Self {
            raw: RawVector::with_capacity(
                mem::size_of::<T>(),
                mem::align_of::<T>(),
                capacity,
                AllocInit::Uninitialized,
                policy,
            )?,
            _marker: PhantomData,
        })
    }

    /// Constructs a `Vector<T>` holding clones of `items`, with no headroom on either side.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the allocator cannot provide the memory.
    pub fn from_slice(items: &[T]) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::from_slice_with_policy(items, Policy::default())
    }

    fn from_slice_with_policy(items: &[T], policy: Policy) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut vector = Self::exact(items.len(), policy)?;
        for item in items {
            // SAFETY: exactly `items.len()` slots were allocated
            unsafe { vector.write_back(item.clone()) };
        }
        Ok(vector)
    }

    /// Constructs a `Vector<T>` of `len` default values, with no headroom on either side.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the allocator cannot provide the memory.
    pub fn with_default(len: usize) -> Result<Self, AllocError>
    where
        T: Default,
    {
        let mut vector = Self::exact(len, Policy::default())?;
        for _ in 0..len {
            // SAFETY: exactly `len` slots were allocated
            unsafe { vector.write_back(T::default()) };
        }
        Ok(vector)
    }

    /// Returns the number of elements in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the number of slots in the buffer, live or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.window().capacity()
    }

    /// Returns how many elements can be pushed to the front without touching the buffer.
    #[inline]
    pub fn headroom_front(&self) -> usize {
        self.raw.window().headroom_front()
    }

    /// Returns how many unused slots follow the last element.
    #[inline]
    pub fn headroom_back(&self) -> usize {
        self.raw.window().headroom_back()
    }

    /// Returns where the elements sit inside the buffer.
    #[inline]
    pub fn window(&self) -> Window {
        self.raw.window()
    }

    #[inline]
    pub fn policy(&self) -> Policy {
        self.raw.policy()
    }

    #[inline]
    fn slot_ptr(&self, slot: usize) -> *mut T {
        self.raw.slot_ptr(slot).cast::<T>()
    }

    /// Moves `value` into the slot after the last element.
    ///
    /// # Safety
    ///
    /// There must be at least one slot of trailing headroom.
    #[inline]
    unsafe fn write_back(&mut self, value: T) {
        let slot = self.raw.window().range().end;
        // SAFETY: the slot is inside the buffer and not live
        unsafe {
            ptr::write(self.slot_ptr(slot), value);
            self.raw.commit_back(1);
        }
    }

    /// Moves `value` into the slot before the first element.
    ///
    /// # Safety
    ///
    /// There must be at least one slot of leading headroom.
    #[inline]
    unsafe fn write_front(&mut self, value: T) {
        let slot = self.raw.window().offset() - 1;
        // SAFETY: the slot is inside the buffer and not live
        unsafe {
            ptr::write(self.slot_ptr(slot), value);
            self.raw.commit_front(1);
        }
    }

    /// Appends an element after the last one.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer had to grow and could not. The vector is unchanged.
    pub fn push_back(&mut self, value: T) -> Result<(), AllocError> {
        self.raw.reserve_back(1)?;
        // SAFETY: reserved above
        unsafe { self.write_back(value) };
        Ok(())
    }

    /// Prepends an element before the first one.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer had to grow and could not. The vector is unchanged.
    pub fn push_front(&mut self, value: T) -> Result<(), AllocError> {
        self.raw.reserve_front(1)?;
        // SAFETY: reserved above
        unsafe { self.write_front(value) };
        Ok(())
    }

    /// Appends clones of `items` after the last element, growing at most once.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer had to grow and could not. The vector is unchanged.
    pub fn extend_back_from_slice(&mut self, items: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.raw.reserve_back(items.len())?;
        for item in items {
            // SAFETY: `items.len()` slots were reserved above
            unsafe { self.write_back(item.clone()) };
        }
        Ok(())
    }

    /// Prepends clones of `items` before the first element, growing at most once.
    ///
    /// The items keep their order: afterwards the vector starts with `items`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the buffer had to grow and could not. The vector is unchanged.
    pub fn extend_front_from_slice(&mut self, items: &[T]) -> Result<(), AllocError>
    where
        T: Clone,
    {
        self.raw.reserve_front(items.len())?;
        for item in items.iter().rev() {
            // SAFETY: `items.len()` slots were reserved above
            unsafe { self.write_front(item.clone()) };
        }
        Ok(())
    }

    /// Removes the last element and returns it, or `None` if the vector is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let slot = self.raw.pop_back()?;
        // SAFETY: the slot held the last live element and is no longer live
        Some(unsafe { ptr::read(self.slot_ptr(slot)) })
    }

    /// Removes the first element and returns it, or `None` if the vector is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let slot = self.raw.pop_front()?;
        // SAFETY: the slot held the first live element and is no longer live
        Some(unsafe { ptr::read(self.slot_ptr(slot)) })
    }

    /// Removes the element at `index` and returns it, or `None` if `index` is out of bounds.
    ///
    /// Whichever side of `index` holds fewer elements is shifted to close the gap.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let slot = self.raw.window().slot(index)?;
        // SAFETY: the slot is live; closing the gap makes it unreachable
        let value = unsafe { ptr::read(self.slot_ptr(slot)) };
        self.raw.close_gap(index);
        Some(value)
    }

    /// Removes every element. The buffer and its headroom are kept.
    pub fn clear(&mut self) {
        let elems: *mut [T] = self.as_mut_slice();
        self.raw.clear();
        // SAFETY: the elements are no longer reachable through the vector
        unsafe { ptr::drop_in_place(elems) };
    }

    /// Returns a new vector holding clones of the elements in `range`.
    ///
    /// The new vector has its own buffer and the same policy.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `range` does not lie within `0..len()` or the allocator fails.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Result<Self, VectorError>
    where
        T: Clone,
    {
        let range = resolve_range(&range, self.len())?;
        Ok(Self::from_slice_with_policy(
            &self.as_slice()[range],
            self.raw.policy(),
        )?)
    }

    /// Returns an independent copy of the elements. Headroom is not copied.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the allocator cannot provide the memory.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        Self::from_slice_with_policy(self.as_slice(), self.raw.policy())
    }

    /// Extracts a slice containing the entire vector.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the live window holds `len` initialized, aligned elements
        unsafe { slice::from_raw_parts(self.raw.live_ptr().cast::<T>(), self.len()) }
    }

    /// Extracts a mutable slice of the entire vector.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and `&mut self` makes the borrow unique
        unsafe { slice::from_raw_parts_mut(self.raw.live_ptr().cast::<T>(), self.len()) }
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        // SAFETY: the live elements are dropped exactly once; `RawVector` frees the buffer
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| handle_alloc_failure(err))
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Hash> Hash for Vector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vector<U>> for Vector<T> {
    fn eq(&self, other: &Vector<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for Vector<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for Vector<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for Vector<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

/// Allocates exactly `N` slots and moves the array in.
///
/// # Panics
///
/// Aborts like `Vec` does if the allocation fails.
impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(items: [T; N]) -> Self {
        let mut vector =
            Self::exact(N, Policy::default()).unwrap_or_else(|err| handle_alloc_failure(err));
        for item in items {
            // SAFETY: exactly `N` slots were allocated
            unsafe { vector.write_back(item) };
        }
        vector
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { vector: self }
    }
}

/// An iterator that moves elements out of a [`Vector`], from either end.
#[derive(Debug)]
pub struct IntoIter<T> {
    vector: Vector<T>,
}

impl<T> IntoIter<T> {
    /// Returns the elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        self.vector.as_slice()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.vector.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.vector.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.vector.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// Creates a [`Vector`] containing the arguments, like `vec!`.
///
/// ```
/// use gdata_alloc::vector;
///
/// let v = vector![1, 2, 3];
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.capacity(), 3);
/// ```
#[macro_export]
macro_rules! vector {
    () => {
        $crate::Vector::new()
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Vector::from([$($x),+])
    };
}
