//! Image source port for feeding captures into the scoring pipeline.

use crate::domain::ImageInfo;

/// Port for loading images from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over decoded images from this source.
    ///
    /// # Errors
    ///
    /// Individual items are errors if an image fails to load or decode; the
    /// remaining images are still yielded.
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<ImageInfo>> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
