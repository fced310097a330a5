use std::alloc::Layout;
use std::ptr::NonNull;

use crate::allocator::BufferAllocator;

/// Allocator backed by the global heap (`std::alloc`).
///
/// Every block is aligned to [`HeapAllocator::ALIGNMENT`] bytes. Requests
/// that cannot be described by a valid [`Layout`] (anything close to
/// `isize::MAX`) fail without touching the heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocator;

impl HeapAllocator {
    /// Alignment of every block handed out by this allocator.
    pub const ALIGNMENT: usize = 64;

    #[inline]
    fn layout(size: usize) -> Option<Layout> {
        Layout::from_size_align(size, Self::ALIGNMENT).ok()
    }
}

unsafe impl BufferAllocator for HeapAllocator {
    unsafe fn grow_or_alloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        if new_size == 0 {
            return None;
        }
        let new_layout = Self::layout(new_size)?;
        let new_ptr = match ptr {
            None => unsafe { std::alloc::alloc(new_layout) },
            Some(ptr) => {
                let old_layout = Self::layout(old_size)?;
                // realloc leaves the old block untouched when it returns null.
                unsafe { std::alloc::realloc(ptr.as_ptr(), old_layout, new_size) }
            }
        };
        let res = NonNull::new(new_ptr);
        if res.is_none() {
            log::debug!("heap allocation of {new_size} bytes failed");
        }
        res
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        if let Some(layout) = Self::layout(size) {
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) };
        }
    }
}
