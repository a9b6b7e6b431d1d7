//! Generic container primitives.
//!
//! ```
//! use gdata::{vector, ErasedVector};
//!
//! let mut v = vector![2, 3];
//! v.push_front(1).unwrap();
//! assert_eq!(v, [1, 2, 3]);
//!
//! let mut bytes = ErasedVector::new(2).unwrap();
//! bytes.push_back(2, Some(&[1, 0, 2, 0])).unwrap();
//! bytes.push_front(1, None).unwrap();
//! assert_eq!(bytes.as_bytes(), [0, 0, 1, 0, 2, 0]);
//! ```

pub use gdata_alloc::{
    next_chunk, vector, AllocError, ErasedVector, IntoIter, Policy, Vector, VectorError, Window,
    GROWTH_CHUNK, MAX_LATERAL_SLACK,
};
