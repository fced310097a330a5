//! Test utilities for the colbuf crates.
//!
//! The allocators here make reallocation paths observable and deterministic:
//! - [`RelocatingAllocator`](allocators::RelocatingAllocator) moves every
//!   allocation on growth, so pointer changes reveal reallocations.
//! - [`CountingAllocator`](allocators::CountingAllocator) records every call.
//! - [`FailingAllocator`](allocators::FailingAllocator) starts refusing
//!   requests after a configurable number of successes.

pub mod allocators;
