use std::ptr::NonNull;

use colbuf_alloc::{SharedAllocator, default_allocator};
use colbuf_common::{Result, error::Error};

use crate::growth::GrowthPolicy;

/// A growable, contiguous region of bytes with tracked length and capacity.
///
/// The buffer owns at most one allocation, obtained from the allocator it is
/// bound to. `len() <= capacity()` always holds, and the data pointer is null
/// exactly when the capacity is zero.
///
/// # Failure semantics
/// Every fallible operation returns a [`Result`]. A failed call leaves the
/// buffer observably identical to its state before the call: same length,
/// capacity, pointer and contents. Nothing is retried internally.
///
/// # Ownership
/// Exactly one `ByteBuffer` owns a given allocation. [`ByteBuffer::take`]
/// transfers it and leaves the source indistinguishable from
/// [`ByteBuffer::new`]. The allocation is released on [`ByteBuffer::reset`]
/// or when the buffer is dropped.
pub struct ByteBuffer {
    data: Option<NonNull<u8>>,
    len: usize,
    capacity: usize,
    allocator: SharedAllocator,
    growth: GrowthPolicy,
}

// SAFETY: ByteBuffer exclusively owns its allocation, and the bound allocator
// is `Send + Sync`.
unsafe impl Send for ByteBuffer {}

// SAFETY: shared references only permit reads of the owned memory.
unsafe impl Sync for ByteBuffer {}

impl ByteBuffer {
    /// Creates an empty buffer bound to the default allocator.
    pub fn new() -> ByteBuffer {
        Self::with_allocator(default_allocator())
    }

    /// Creates an empty buffer bound to `allocator`.
    pub fn with_allocator(allocator: SharedAllocator) -> ByteBuffer {
        ByteBuffer {
            data: None,
            len: 0,
            capacity: 0,
            allocator,
            growth: GrowthPolicy::default(),
        }
    }

    /// Creates an empty buffer that grows according to `policy`.
    pub fn with_growth_policy(policy: GrowthPolicy) -> Result<ByteBuffer> {
        let mut buf = ByteBuffer::new();
        buf.set_growth_policy(policy)?;
        Ok(buf)
    }

    /// Creates an empty buffer able to hold `capacity` bytes without
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> Result<ByteBuffer> {
        let mut buf = ByteBuffer::new();
        buf.reserve(capacity)?;
        Ok(buf)
    }

    /// Creates a buffer holding a copy of `data`.
    pub fn copy_from_slice(data: &[u8]) -> Result<ByteBuffer> {
        let mut buf = ByteBuffer::new();
        buf.append(data)?;
        Ok(buf)
    }

    /// Number of valid bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the data pointer, or null when nothing is allocated.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.data.map_or(std::ptr::null(), |p| p.as_ptr() as *const u8)
    }

    /// Returns the mutable data pointer, or null when nothing is allocated.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.data.map_or(std::ptr::null_mut(), |p| p.as_ptr())
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match self.data {
            Some(p) => unsafe { std::slice::from_raw_parts(p.as_ptr(), self.len) },
            None => &[],
        }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self.data {
            Some(p) => unsafe { std::slice::from_raw_parts_mut(p.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    /// Returns the contents reinterpreted as a slice of `T`.
    ///
    /// # Panics
    ///
    /// Panics if the length is not a multiple of `size_of::<T>()` or the data
    /// is not suitably aligned for `T`.
    #[inline]
    pub fn typed_data<T>(&self) -> &[T]
    where
        T: bytemuck::AnyBitPattern,
    {
        bytemuck::cast_slice(self.as_slice())
    }

    /// The allocator this buffer's memory comes from.
    #[inline]
    pub fn allocator(&self) -> &SharedAllocator {
        &self.allocator
    }

    #[inline]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// Replaces the growth policy. Existing capacity is left as is.
    pub fn set_growth_policy(&mut self, policy: GrowthPolicy) -> Result<()> {
        policy.validate()?;
        self.growth = policy;
        Ok(())
    }

    /// Binds the buffer to a different allocator.
    ///
    /// Only allowed while nothing is allocated: memory obtained from one
    /// allocator must never be released through another.
    pub fn set_allocator(&mut self, allocator: SharedAllocator) -> Result<()> {
        if self.capacity != 0 {
            log::debug!(
                "rejecting allocator swap on a buffer holding {} bytes",
                self.capacity
            );
            return Err(Error::invalid_state(
                "set_allocator",
                format!("buffer already holds {} allocated bytes", self.capacity),
            ));
        }
        self.allocator = allocator;
        Ok(())
    }

    /// Ensures room for at least `additional` more bytes without changing the
    /// length.
    ///
    /// Capacity grows geometrically as decided by the buffer's
    /// [`GrowthPolicy`]. Fails with out-of-memory if the allocator refuses the
    /// request or the size arithmetic overflows.
    #[inline]
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        match self
            .growth
            .grown_capacity(self.len, self.capacity, additional)?
        {
            Some(new_capacity) => self.reallocate(new_capacity),
            None => Ok(()),
        }
    }

    /// Sets the length to `new_size`.
    ///
    /// - Growing past the capacity reserves through the growth policy.
    /// - Without `shrink_to_fit`, shrinking keeps the allocation untouched.
    /// - With `shrink_to_fit`, the capacity becomes exactly `new_size`;
    ///   zero releases the allocation.
    ///
    /// Bytes exposed by growing the length are zeroed. A negative target
    /// fails with invalid-argument; a target beyond `usize` fails with
    /// out-of-memory.
    pub fn resize<N>(&mut self, new_size: N, shrink_to_fit: bool) -> Result<()>
    where
        N: TryInto<usize> + PartialOrd + Default + Copy,
    {
        if new_size < N::default() {
            return Err(Error::invalid_arg(
                "new_size",
                "must be a non-negative byte count",
            ));
        }
        let new_size: usize = new_size.try_into().map_err(|_| Error::size_overflow())?;

        if shrink_to_fit {
            if new_size != self.capacity {
                self.reallocate(new_size)?;
            }
        } else if new_size > self.capacity {
            self.reserve(new_size - self.len)?;
        }

        if new_size > self.len {
            unsafe {
                self.tail_ptr().write_bytes(0, new_size - self.len);
            }
        }
        self.len = new_size;
        Ok(())
    }

    /// Appends `bytes` to the end of the buffer.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?;
        unsafe { self.append_unchecked(bytes) };
        Ok(())
    }

    /// Appends `count` copies of `value`.
    pub fn append_fill(&mut self, value: u8, count: usize) -> Result<()> {
        self.reserve(count)?;
        if count != 0 {
            unsafe {
                self.tail_ptr().write_bytes(value, count);
            }
            self.len += count;
        }
        Ok(())
    }

    /// Appends `bytes` without checking or growing the capacity.
    ///
    /// # Safety
    ///
    /// `capacity() - len() >= bytes.len()` must hold, typically established by
    /// a preceding [`Self::reserve`].
    #[inline]
    pub unsafe fn append_unchecked(&mut self, bytes: &[u8]) {
        debug_assert!(self.capacity - self.len >= bytes.len());
        if bytes.is_empty() {
            return;
        }
        unsafe {
            self.tail_ptr()
                .copy_from_nonoverlapping(bytes.as_ptr(), bytes.len());
        }
        self.len += bytes.len();
    }

    /// Moves the entire state (memory, length, capacity, allocator and growth
    /// policy) into a new buffer, leaving `self` as if freshly created.
    #[must_use = "dropping the taken buffer releases its memory"]
    pub fn take(&mut self) -> ByteBuffer {
        std::mem::take(self)
    }

    /// Moves the entire state of `self` into `dest`. Whatever `dest` held is
    /// released first.
    pub fn move_into(&mut self, dest: &mut ByteBuffer) {
        *dest = self.take();
    }

    /// Releases the allocation and returns to the empty state. The allocator
    /// binding and growth policy are kept.
    pub fn reset(&mut self) {
        if let Some(ptr) = self.data.take() {
            log::trace!("releasing {} bytes", self.capacity);
            unsafe { self.allocator.release(ptr, self.capacity) };
        }
        self.capacity = 0;
        self.len = 0;
    }

    /// Copies the contents into a new buffer with the same allocator and
    /// growth policy, allocated to exactly the current length.
    pub fn try_clone(&self) -> Result<ByteBuffer> {
        let mut buf = ByteBuffer::with_allocator(self.allocator.clone());
        buf.growth = self.growth;
        if !self.is_empty() {
            buf.reallocate(self.len)?;
            unsafe { buf.append_unchecked(self.as_slice()) };
        }
        Ok(buf)
    }
}

impl ByteBuffer {
    /// Moves the allocation to exactly `new_capacity` bytes, truncating the
    /// length if needed. On failure nothing changes.
    #[cold]
    fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity == 0 {
            self.reset();
            return Ok(());
        }
        let ptr = unsafe {
            self.allocator
                .grow_or_alloc(self.data, self.capacity, new_capacity)
        };
        let Some(ptr) = ptr else {
            log::debug!(
                "allocator failed to provide {new_capacity} bytes (capacity {})",
                self.capacity
            );
            return Err(Error::out_of_memory(new_capacity));
        };
        log::trace!(
            "reallocated buffer from {} to {new_capacity} bytes",
            self.capacity
        );
        self.data = Some(ptr);
        self.capacity = new_capacity;
        self.len = self.len.min(new_capacity);
        Ok(())
    }

    /// Pointer one past the last valid byte.
    ///
    /// Must only be called while an allocation exists.
    #[inline]
    fn tail_ptr(&mut self) -> *mut u8 {
        debug_assert!(self.data.is_some());
        unsafe { self.as_mut_ptr().add(self.len) }
    }
}

impl Drop for ByteBuffer {
    fn drop(&mut self) {
        self.reset();
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for ByteBuffer {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl std::ops::DerefMut for ByteBuffer {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl AsRef<[u8]> for ByteBuffer {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("values", &self.as_slice())
            .field("len", &self.len)
            .field("cap", &self.capacity)
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}

impl std::io::Write for ByteBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
