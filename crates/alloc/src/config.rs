use core::{default::Default, num::NonZeroUsize};

use num_traits::{PrimInt, Unsigned};

/// Elements added by the smallest growth step.
pub const GROWTH_CHUNK: usize = 32;
/// Idle headroom (in bytes) either side may keep no matter how small the vector is.
pub const MAX_LATERAL_SLACK: usize = 512;

const DEFAULT_GROWTH_CHUNK: NonZeroUsize = match NonZeroUsize::new(GROWTH_CHUNK) {
    Some(chunk) => chunk,
    None => panic!("GROWTH_CHUNK must be non-zero"),
};

/// Returns the first multiple of `chunk` strictly greater than `n`, or `None` on overflow.
///
/// # Panics
///
/// Panics if `chunk` is zero.
pub fn next_chunk<N: PrimInt + Unsigned>(n: N, chunk: N) -> Option<N> {
    assert!(chunk != N::zero(), "chunk size must be non-zero");
    (n / chunk).checked_add(&N::one())?.checked_mul(&chunk)
}

/// Controls how a vector trades memory for fewer reallocations.
///
/// Both ends follow the same rules. Growth happens only when a push does not fit in that side's
/// headroom. Shrinking happens only on a pop, and only when that side's headroom has become
/// large compared to both the slack allowance and the live length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Policy {
    /// Growth steps are rounded up to a multiple of this many elements.
    growth_chunk: NonZeroUsize,
    /// Idle headroom, in bytes, tolerated on one side regardless of the live length.
    max_lateral_slack: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            growth_chunk: DEFAULT_GROWTH_CHUNK,
            max_lateral_slack: MAX_LATERAL_SLACK,
        }
    }
}

impl Policy {
    pub fn growth_chunk(&self) -> usize {
        self.growth_chunk.get()
    }

    pub fn max_lateral_slack(&self) -> usize {
        self.max_lateral_slack
    }

    #[must_use]
    pub fn with_growth_chunk(mut self, chunk: NonZeroUsize) -> Self {
        self.growth_chunk = chunk;
        self
    }

    #[must_use]
    pub fn with_max_lateral_slack(mut self, bytes: usize) -> Self {
        self.max_lateral_slack = bytes;
        self
    }

    /// Returns how many elements to add to a side that cannot fit `n` more.
    ///
    /// The step is strictly greater than both `n` and `len`, so the side ends up with room to
    /// spare and the capacity at least doubles.
    pub(crate) fn growth_step(&self, n: usize, len: usize) -> Option<usize> {
        next_chunk(n.max(len), self.growth_chunk())
    }

    /// Returns how many idle elements a side may hold before a pop releases some of them.
    pub(crate) fn shrink_threshold(&self, width: usize, len: usize) -> usize {
        let slack = (self.max_lateral_slack / width.max(1)).max(1);
        slack
            .max(len.saturating_mul(2))
            .saturating_add(self.growth_chunk())
    }

    /// Returns how many elements to release from a side with `headroom` idle elements, or zero
    /// if that side should be left alone.
    pub(crate) fn shrink_step(&self, headroom: usize, width: usize, len: usize) -> usize {
        if headroom > self.shrink_threshold(width, len) {
            headroom / 3 * 2
        } else {
            0
        }
    }
}
