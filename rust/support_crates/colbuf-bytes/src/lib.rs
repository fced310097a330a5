//! Growable byte buffers backing columnar arrays: values, validity bitmaps
//! and variable-length data all end up in a [`ByteBuffer`].
//!
//! A buffer owns at most one allocation obtained from the
//! [`BufferAllocator`](colbuf_alloc::BufferAllocator) it is bound to. Every
//! capacity number is computed by [`GrowthPolicy`] with overflow checks, and
//! every fallible operation either succeeds completely or leaves the buffer
//! exactly as it was.

pub mod buffer;
pub mod growth;

mod append;

pub use buffer::ByteBuffer;
pub use growth::GrowthPolicy;
