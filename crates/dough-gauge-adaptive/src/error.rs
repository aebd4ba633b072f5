use dough_gauge_core::RasterError;

/// Errors returned by the adaptive-threshold segmenter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AdaptiveSegmentError {
    #[error("no input image: {0}")]
    MissingImage(#[source] RasterError),
}
