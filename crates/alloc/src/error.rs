use core::alloc::Layout;

use thiserror::Error;

/// An error with allocating or reallocating memory.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AllocError {
    /// The global allocator could not satisfy the request.
    #[error("out of memory (requested {} bytes, align {})", .0.size(), .0.align())]
    OutOfMemory(Layout),
    /// The requested size overflows `usize` or exceeds `isize::MAX` bytes.
    #[error("requested capacity is too large")]
    RequestTooLarge,
}

/// An error returned by the vector containers.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum VectorError {
    /// Growing or copying the buffer failed.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// A logical index was not inside the live window.
    #[error("index {index} is out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// A `begin..end` range was reversed or reached past the live window.
    #[error("range {begin}..{end} is invalid for length {len}")]
    InvalidRange { begin: usize, end: usize, len: usize },

    /// A byte payload did not hold a whole number of elements.
    #[error("expected {expected} bytes of element data, got {found}")]
    WidthMismatch { expected: usize, found: usize },

    /// Elements of zero bytes cannot be addressed through the byte interface.
    #[error("element width must be non-zero")]
    ZeroWidth,
}

/// Turns an allocation failure into the same abort or panic the standard collections use.
pub(crate) fn handle_alloc_failure(err: AllocError) -> ! {
    match err {
        AllocError::OutOfMemory(layout) => std::alloc::handle_alloc_error(layout),
        AllocError::RequestTooLarge => panic!("capacity overflow"),
    }
}
