//! Double-ended growable vectors.
//!
//! Both [`Vector<T>`] and [`ErasedVector`] keep their elements contiguous inside a larger buffer
//! with headroom on either side, so pushing or popping at either end is amortized O(1) and the
//! elements can always be viewed as one slice. The current extent of the elements is described
//! by a [`Window`]; how much headroom is added or given back is described by a [`Policy`].
#![warn(unsafe_op_in_unsafe_fn)]

pub(crate) mod config;
pub(crate) mod containers;
pub(crate) mod error;
pub(crate) mod ptr;
pub(crate) mod raw;
pub(crate) mod window;

pub use config::{next_chunk, Policy, GROWTH_CHUNK, MAX_LATERAL_SLACK};
pub use containers::{
    erased::ErasedVector,
    vec::{IntoIter, Vector},
};
pub use error::{AllocError, VectorError};
pub use window::Window;
