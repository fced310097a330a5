//! Allocator serving buffers straight from anonymous memory mappings.
//!
//! Mappings are always a whole number of pages, so growing a buffer within
//! its last page is free. Growing past it maps a fresh region, copies the
//! preserved prefix and unmaps the old region. Large column buffers benefit
//! from bypassing the heap: released memory goes straight back to the OS.

use std::ptr::NonNull;

use crate::align::checked_align_up;
use crate::allocator::BufferAllocator;
use crate::mmap;

/// Allocator backed by page-granular memory mappings.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageAllocator;

impl PageAllocator {
    /// Returns the size of a memory page on the current system.
    pub fn page_size() -> usize {
        mmap::get_page_size()
    }

    /// Size of the mapping that backs a request of `size` bytes.
    #[inline]
    fn mapped_size(size: usize) -> Option<usize> {
        checked_align_up(size.max(1), Self::page_size())
    }
}

unsafe impl BufferAllocator for PageAllocator {
    unsafe fn grow_or_alloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        if new_size == 0 {
            return None;
        }
        let new_mapped = Self::mapped_size(new_size)?;
        if let Some(ptr) = ptr {
            if Self::mapped_size(old_size) == Some(new_mapped) {
                return Some(ptr);
            }
        }

        let new_ptr = match mmap::allocate(new_mapped) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("mapping {new_mapped} bytes failed: {e}");
                return None;
            }
        };

        if let Some(ptr) = ptr {
            let preserved = old_size.min(new_size);
            unsafe {
                new_ptr
                    .as_ptr()
                    .copy_from_nonoverlapping(ptr.as_ptr(), preserved);
                self.release(ptr, old_size);
            }
        }
        Some(new_ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        let Some(mapped) = Self::mapped_size(size) else {
            return;
        };
        if let Err(e) = unsafe { mmap::free(ptr, mapped) } {
            log::debug!("unmapping {mapped} bytes failed: {e}");
        }
    }
}
