use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use colbuf_alloc::{BufferAllocator, HeapAllocator};

/// Allocator whose `grow_or_alloc` always returns a new pointer.
///
/// Each call allocates a fresh heap block, copies the preserved prefix and
/// frees the old block, which makes reallocations visible to tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelocatingAllocator;

unsafe impl BufferAllocator for RelocatingAllocator {
    unsafe fn grow_or_alloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let new_ptr = unsafe { HeapAllocator.grow_or_alloc(None, 0, new_size)? };
        if let Some(ptr) = ptr {
            unsafe {
                new_ptr
                    .as_ptr()
                    .copy_from_nonoverlapping(ptr.as_ptr(), old_size.min(new_size));
                HeapAllocator.release(ptr, old_size);
            }
        }
        Some(new_ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        unsafe { HeapAllocator.release(ptr, size) }
    }
}

/// Wraps another allocator and counts the calls made through it.
#[derive(Debug, Default)]
pub struct CountingAllocator<A> {
    inner: A,
    allocations: AtomicUsize,
    reallocations: AtomicUsize,
    releases: AtomicUsize,
    failures: AtomicUsize,
    live_bytes: AtomicUsize,
}

impl<A> CountingAllocator<A> {
    pub fn new(inner: A) -> CountingAllocator<A> {
        CountingAllocator {
            inner,
            allocations: AtomicUsize::new(0),
            reallocations: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            live_bytes: AtomicUsize::new(0),
        }
    }

    /// Number of successful fresh allocations.
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Number of successful resizes of an existing allocation.
    pub fn reallocations(&self) -> usize {
        self.reallocations.load(Ordering::Relaxed)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::Relaxed)
    }

    /// Number of `grow_or_alloc` calls that returned `None`.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Bytes currently held by callers.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Relaxed)
    }
}

unsafe impl<A: BufferAllocator> BufferAllocator for CountingAllocator<A> {
    unsafe fn grow_or_alloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        let res = unsafe { self.inner.grow_or_alloc(ptr, old_size, new_size) };
        if res.is_none() {
            self.failures.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        if ptr.is_some() {
            self.reallocations.fetch_add(1, Ordering::Relaxed);
            self.live_bytes.fetch_sub(old_size, Ordering::Relaxed);
        } else {
            self.allocations.fetch_add(1, Ordering::Relaxed);
        }
        self.live_bytes.fetch_add(new_size, Ordering::Relaxed);
        res
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        self.releases.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_sub(size, Ordering::Relaxed);
        unsafe { self.inner.release(ptr, size) }
    }
}

/// Heap allocator that refuses every request once its budget of successful
/// `grow_or_alloc` calls is spent.
#[derive(Debug)]
pub struct FailingAllocator {
    remaining: AtomicUsize,
}

impl FailingAllocator {
    /// Allows `successes` calls to succeed before failing.
    pub fn new(successes: usize) -> FailingAllocator {
        FailingAllocator {
            remaining: AtomicUsize::new(successes),
        }
    }

    /// Resets the number of calls that may still succeed.
    pub fn set_remaining(&self, successes: usize) {
        self.remaining.store(successes, Ordering::Relaxed);
    }

    fn try_consume(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }
}

unsafe impl BufferAllocator for FailingAllocator {
    unsafe fn grow_or_alloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        if !self.try_consume() {
            return None;
        }
        unsafe { HeapAllocator.grow_or_alloc(ptr, old_size, new_size) }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        unsafe { HeapAllocator.release(ptr, size) }
    }
}
