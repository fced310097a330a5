//! Pluggable memory allocators for colbuf byte buffers.
//!
//! A buffer never talks to the heap directly: it holds a [`SharedAllocator`]
//! and routes every grow, shrink and release through it. This crate defines
//! that contract ([`BufferAllocator`]) and ships two implementations:
//!
//! - [`HeapAllocator`]: the global heap, handed out by [`default_allocator`].
//! - [`PageAllocator`]: anonymous memory mappings rounded to whole pages.

pub mod align;
pub mod allocator;
pub mod heap;
pub mod page;

#[cfg_attr(target_os = "linux", path = "mmap_linux.rs")]
#[cfg_attr(not(target_os = "linux"), path = "mmap_fallback.rs")]
mod mmap;

pub use allocator::{BufferAllocator, SharedAllocator, default_allocator};
pub use heap::HeapAllocator;
pub use page::PageAllocator;
