//! Lens QA Adapters - External adapters for lens-qa.
//!
//! This crate provides adapters for:
//! - Filesystem image source
//! - Bounded decoding straight to working resolution
//! - Request/response handling for host dispatch layers

pub mod decode;
pub mod fs;
pub mod request;

pub use decode::{decode_for_analysis, decode_with_config};
pub use fs::FsImageSource;
pub use request::{handle_request, RequestHandler};
