use std::alloc::{Layout, alloc_zeroed, dealloc};
use std::ptr::NonNull;

/// Allocates `size` bytes of page-aligned memory (emulated on the heap).
pub fn allocate(size: usize) -> std::io::Result<NonNull<u8>> {
    let layout = Layout::from_size_align(size, get_page_size())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid layout"))?;

    let ptr = unsafe { alloc_zeroed(layout) };
    NonNull::new(ptr).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::OutOfMemory, "Failed to allocate memory")
    })
}

/// Frees memory obtained from [`allocate`].
///
/// # Safety
///
/// `ptr` must come from [`allocate`] called with the same `size`.
pub unsafe fn free(ptr: NonNull<u8>, size: usize) -> std::io::Result<()> {
    let layout = Layout::from_size_align(size, get_page_size())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid layout"))?;

    unsafe {
        dealloc(ptr.as_ptr(), layout);
    }
    Ok(())
}

/// Returns the "standard page" size in bytes.
pub fn get_page_size() -> usize {
    4 * 1024
}
