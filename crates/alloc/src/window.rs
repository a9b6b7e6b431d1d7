use core::ops::Range;

/// The live window of a vector: `len` elements starting `offset` elements into a buffer that
/// holds `capacity` elements.
///
/// A `Window` always satisfies `offset + len <= capacity`. Every transition returns a new window
/// and checks its precondition in debug builds, so the arithmetic lives here and nowhere else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Window {
    capacity: usize,
    offset: usize,
    len: usize,
}

impl Window {
    /// An empty window over an unallocated buffer.
    pub const EMPTY: Self = Self {
        capacity: 0,
        offset: 0,
        len: 0,
    };

    /// Returns a window if `offset + len` fits in `capacity`.
    pub fn new(capacity: usize, offset: usize, len: usize) -> Option<Self> {
        match offset.checked_add(len) {
            Some(end) if end <= capacity => Some(Self {
                capacity,
                offset,
                len,
            }),
            _ => None,
        }
    }

    /// A window that fills a buffer of exactly `len` elements.
    pub fn full(len: usize) -> Self {
        Self {
            capacity: len,
            offset: 0,
            len,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Unused slots before the first live element.
    #[inline]
    pub fn headroom_front(&self) -> usize {
        self.offset
    }

    /// Unused slots after the last live element.
    #[inline]
    pub fn headroom_back(&self) -> usize {
        self.capacity - self.offset - self.len
    }

    /// Physical slot indices of the live elements.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    /// Physical slot index of logical index `index`, if it is live.
    #[inline]
    pub fn slot(&self, index: usize) -> Option<usize> {
        (index < self.len).then(|| self.offset + index)
    }

    /// An empty window at the start of a buffer of `capacity` elements.
    pub fn unfilled(capacity: usize) -> Self {
        Self {
            capacity,
            offset: 0,
            len: 0,
        }
    }

    /// Re-checks the invariant. Only useful for windows built by hand or in tests.
    pub fn is_valid(&self) -> bool {
        Self::new(self.capacity, self.offset, self.len).is_some()
    }

    #[inline]
    fn checked(self) -> Self {
        debug_assert!(self.is_valid(), "window invariant broken: {self:?}");
        self
    }

    /// `n` more elements after the last one. Needs `n <= headroom_back()`.
    pub(crate) fn pushed_back(self, n: usize) -> Self {
        debug_assert!(n <= self.headroom_back());
        Self {
            len: self.len + n,
            ..self
        }
        .checked()
    }

    /// `n` more elements before the first one. Needs `n <= headroom_front()`.
    pub(crate) fn pushed_front(self, n: usize) -> Self {
        debug_assert!(n <= self.headroom_front());
        Self {
            offset: self.offset - n,
            len: self.len + n,
            ..self
        }
        .checked()
    }

    /// One element fewer at the back. Needs a non-empty window.
    pub(crate) fn popped_back(self) -> Self {
        debug_assert!(self.len > 0);
        Self {
            len: self.len - 1,
            ..self
        }
        .checked()
    }

    /// One element fewer at the front. Needs a non-empty window.
    pub(crate) fn popped_front(self) -> Self {
        debug_assert!(self.len > 0);
        Self {
            offset: self.offset + 1,
            len: self.len - 1,
            ..self
        }
        .checked()
    }

    /// `n` more slots appended to the buffer.
    pub(crate) fn grown_back(self, n: usize) -> Self {
        Self {
            capacity: self.capacity + n,
            ..self
        }
        .checked()
    }

    /// `n` more slots prepended to the buffer; the live elements keep their logical order.
    pub(crate) fn grown_front(self, n: usize) -> Self {
        Self {
            capacity: self.capacity + n,
            offset: self.offset + n,
            ..self
        }
        .checked()
    }

    /// `n` trailing slots released. Needs `n <= headroom_back()`.
    pub(crate) fn shrunk_back(self, n: usize) -> Self {
        debug_assert!(n <= self.headroom_back());
        Self {
            capacity: self.capacity - n,
            ..self
        }
        .checked()
    }

    /// The same live window with `n` of its leading headroom moved to the back.
    pub(crate) fn shifted_front(self, n: usize) -> Self {
        debug_assert!(n <= self.headroom_front());
        Self {
            offset: self.offset - n,
            ..self
        }
        .checked()
    }

    /// All elements dropped, headroom kept.
    pub(crate) fn cleared(self) -> Self {
        Self { len: 0, ..self }.checked()
    }

    /// One element removed from the middle.
    ///
    /// If `head` is true the elements before the gap moved up one slot, otherwise the elements
    /// after it moved down.
    pub(crate) fn removed(self, head: bool) -> Self {
        debug_assert!(self.len > 0);
        let offset = if head { self.offset + 1 } else { self.offset };
        Self {
            offset,
            len: self.len - 1,
            ..self
        }
        .checked()
    }
}
