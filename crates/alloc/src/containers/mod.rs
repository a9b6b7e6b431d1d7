pub(crate) mod erased;
pub(crate) mod vec;

use core::ops::{Bound, Range, RangeBounds};

use crate::error::VectorError;

/// Resolves `range` against a vector of `len` elements.
pub(crate) fn resolve_range<R: RangeBounds<usize>>(
    range: &R,
    len: usize,
) -> Result<Range<usize>, VectorError> {
    let begin = match range.start_bound() {
        Bound::Included(&begin) => Some(begin),
        Bound::Excluded(&begin) => begin.checked_add(1),
        Bound::Unbounded => Some(0),
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1),
        Bound::Excluded(&end) => Some(end),
        Bound::Unbounded => Some(len),
    };

    match (begin, end) {
        (Some(begin), Some(end)) if begin <= end && end <= len => Ok(begin..end),
        (begin, end) => Err(VectorError::InvalidRange {
            begin: begin.unwrap_or(usize::MAX),
            end: end.unwrap_or(usize::MAX),
            len,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_resolve_against_the_length() {
        assert_eq!(resolve_range(&(1..3), 4), Ok(1..3));
        assert_eq!(resolve_range(&(..), 4), Ok(0..4));
        assert_eq!(resolve_range(&(2..=3), 4), Ok(2..4));
        assert_eq!(resolve_range(&(4..), 4), Ok(4..4));
        assert_eq!(resolve_range(&(2..2), 4), Ok(2..2));
    }

    #[test]
    fn bad_ranges_are_rejected() {
        assert_eq!(
            resolve_range(&(3..2), 4),
            Err(VectorError::InvalidRange {
                begin: 3,
                end: 2,
                len: 4
            })
        );
        assert_eq!(
            resolve_range(&(0..5), 4),
            Err(VectorError::InvalidRange {
                begin: 0,
                end: 5,
                len: 4
            })
        );
        assert!(resolve_range(&(0..=usize::MAX), 4).is_err());
    }
}
