use dough_gauge_core::RasterError;

/// Errors returned by the color-range segmenter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorSegmentError {
    #[error("no input image: {0}")]
    MissingImage(#[source] RasterError),
}
