use std::ptr::NonNull;
use std::sync::OnceLock;

/// Maps `size` bytes of anonymous, private, read-write memory.
///
/// `size` must be a non-zero multiple of [`get_page_size`]. The returned
/// pointer must be released with [`free`] passing the same `size`.
pub fn allocate(size: usize) -> std::io::Result<NonNull<u8>> {
    debug_assert!(size != 0 && size.is_multiple_of(get_page_size()));
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            size,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    if ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    NonNull::new(ptr as *mut u8).ok_or_else(|| std::io::Error::other("mmap returned null"))
}

/// Unmaps memory obtained from [`allocate`].
///
/// # Safety
///
/// - `ptr` was returned by [`allocate`] and has not been freed yet
/// - `size` is the size passed to that [`allocate`] call
/// - No references into the mapping remain
pub unsafe fn free(ptr: NonNull<u8>, size: usize) -> std::io::Result<()> {
    let res = unsafe { libc::munmap(ptr.as_ptr() as *mut libc::c_void, size) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Gets the system's standard page size in bytes, cached after the first call.
///
/// Falls back to 4KB if `sysconf(_SC_PAGESIZE)` fails.
pub fn get_page_size() -> usize {
    static SIZE: OnceLock<usize> = OnceLock::new();
    *SIZE.get_or_init(|| read_page_size().unwrap_or(4 * 1024))
}

fn read_page_size() -> std::io::Result<usize> {
    let res = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if res <= 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(res as usize)
}
