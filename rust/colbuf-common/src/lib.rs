//! Core definitions relied upon by all colbuf-* crates: the error taxonomy
//! and the `Result` alias used by every fallible buffer operation.

pub mod error;
pub mod result;

pub use result::Result;
