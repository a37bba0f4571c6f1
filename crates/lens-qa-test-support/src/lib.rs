//! Test support utilities for lens-qa.
//!
//! Provides mocks, synthetic image builders, and utilities for testing
//! the dirty-lens scoring pipeline.
//!
//! # Example
//!
//! ```
//! use lens_qa_test_support::{MockImageSource, SyntheticImageBuilder};
//!
//! // Create synthetic test images
//! let sharp = SyntheticImageBuilder::checkerboard(128, 128);
//! let hazy = SyntheticImageBuilder::hazy(128, 128, 8, 180, 0.75);
//!
//! // Create mock image source
//! let source = MockImageSource::new(vec![sharp, hazy]);
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{FailingImageSource, MockImageSource, MockProgressSink, MockResultOutput};
