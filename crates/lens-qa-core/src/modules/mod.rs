//! QA module implementations.
//!
//! Each module implements the `QaModule` trait for a specific type of quality check.

mod dirty_lens;

pub use dirty_lens::{DirtyLensConfig, DirtyLensModule};
