//! Capacity growth policy for byte buffers.

use colbuf_common::{Result, error::Error, verify_arg};

/// Default multiplier applied to the current capacity when a buffer grows.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Decides how much capacity a buffer allocates when it runs out of room.
///
/// Growth is geometric: the new capacity is the larger of the exact
/// requirement and `capacity * growth_factor`, which keeps a sequence of
/// appends amortized constant time at the price of up to `growth_factor`x
/// transient overallocation. A factor of 1 allocates exactly what is asked.
///
/// All arithmetic is checked; a computation that leaves the `usize` range is
/// reported as out-of-memory rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Multiplier applied to the current capacity on growth.
    pub growth_factor: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        GrowthPolicy {
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl GrowthPolicy {
    /// Policy that never over-allocates.
    pub fn exact() -> GrowthPolicy {
        GrowthPolicy { growth_factor: 1 }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        verify_arg!(growth_factor, self.growth_factor >= 1);
        Ok(())
    }

    /// Returns `size + additional`, the smallest capacity that satisfies a
    /// reservation.
    #[inline]
    pub fn required_capacity(size: usize, additional: usize) -> Result<usize> {
        size.checked_add(additional).ok_or_else(Error::size_overflow)
    }

    /// Computes the capacity a buffer of `size` used bytes and `capacity`
    /// allocated bytes must grow to in order to hold `additional` more bytes.
    ///
    /// Returns `Ok(None)` when the current capacity already suffices.
    pub fn grown_capacity(
        &self,
        size: usize,
        capacity: usize,
        additional: usize,
    ) -> Result<Option<usize>> {
        debug_assert!(size <= capacity);
        let required = Self::required_capacity(size, additional)?;
        if required <= capacity {
            return Ok(None);
        }
        let scaled = capacity
            .checked_mul(self.growth_factor)
            .ok_or_else(Error::size_overflow)?;
        Ok(Some(required.max(scaled)))
    }
}
