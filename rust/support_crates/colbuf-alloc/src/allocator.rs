//! The allocation contract between a byte buffer and its memory source.

use std::ptr::NonNull;
use std::sync::{Arc, OnceLock};

use crate::heap::HeapAllocator;

/// A source of raw memory for growable byte buffers.
///
/// The implementing value is the allocator's context: pools, arenas and
/// instrumentation keep whatever state they need in `self`. A buffer binds one
/// allocator at a time and only ever hands back pointers it obtained from that
/// same instance.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - A pointer returned by `grow_or_alloc` is valid for reads and writes of
///   `new_size` bytes until it is passed back to `grow_or_alloc` or `release`.
/// - The first `min(old_size, new_size)` bytes of an existing allocation are
///   preserved by a successful `grow_or_alloc`.
/// - A failed `grow_or_alloc` (returning `None`) leaves the existing
///   allocation valid and unchanged.
pub unsafe trait BufferAllocator: Send + Sync + std::fmt::Debug {
    /// Allocates `new_size` bytes, or resizes `ptr` (of `old_size` bytes) to
    /// `new_size` bytes. Returns `None` if memory could not be obtained.
    ///
    /// # Safety
    ///
    /// - `ptr`, if present, must have been returned by this allocator and
    ///   not yet released; `old_size` must be the size it was obtained with.
    /// - When `ptr` is `None`, `old_size` is ignored.
    /// - `new_size` must be non-zero.
    /// - On success the old pointer must no longer be used.
    unsafe fn grow_or_alloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>>;

    /// Releases memory previously obtained from [`Self::grow_or_alloc`].
    ///
    /// # Safety
    ///
    /// `ptr` must come from this allocator with the given `size` and must not
    /// be used afterwards.
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize);
}

/// An allocator reference held by a buffer.
pub type SharedAllocator = Arc<dyn BufferAllocator>;

/// Returns the default allocator, backed by the global heap.
///
/// The allocator is stateless, so every call hands out a reference to the
/// same instance instead of allocating a new `Arc`.
pub fn default_allocator() -> SharedAllocator {
    static DEFAULT: OnceLock<SharedAllocator> = OnceLock::new();
    DEFAULT.get_or_init(|| Arc::new(HeapAllocator)).clone()
}
