/// Aligns a number up to the next multiple of the specified alignment,
/// returning `None` when the result does not fit in `usize`.
///
/// # Examples
///
/// ```
/// use colbuf_alloc::align::checked_align_up;
///
/// assert_eq!(checked_align_up(0, 8), Some(0));
/// assert_eq!(checked_align_up(1, 8), Some(8));
/// assert_eq!(checked_align_up(8, 8), Some(8));
/// assert_eq!(checked_align_up(9, 8), Some(16));
/// assert_eq!(checked_align_up(usize::MAX, 8), None);
/// ```
///
/// # Panics
///
/// Panics in debug builds if `alignment` is zero or not a power of 2.
#[inline]
pub fn checked_align_up(n: usize, alignment: usize) -> Option<usize> {
    debug_assert_ne!(alignment, 0);
    debug_assert!(alignment.is_power_of_two());
    Some(n.checked_add(alignment - 1)? & !(alignment - 1))
}

/// Checks whether a pointer lies on an `alignment` boundary.
///
/// ```
/// use colbuf_alloc::align::is_aligned_ptr;
///
/// assert!(is_aligned_ptr(64 as *const u8, 64));
/// assert!(!is_aligned_ptr(65 as *const u8, 64));
/// ```
#[inline]
pub fn is_aligned_ptr(ptr: *const u8, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    (ptr as usize) & (alignment - 1) == 0
}
