use crate::ConfigError;
use dough_gauge_adaptive::AdaptiveSegmentError;
use dough_gauge_color::ColorSegmentError;
use dough_gauge_core::RasterError;
use std::path::PathBuf;

#[cfg(feature = "image")]
use crate::CaptureError;

/// Errors produced by the high-level pipeline helpers.
#[derive(thiserror::Error, Debug)]
pub enum DoughError {
    #[cfg(feature = "image")]
    #[error("failed to load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[cfg(feature = "image")]
    #[error("failed to save image {}: {source}", path.display())]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ColorSegment(#[from] ColorSegmentError),

    #[error(transparent)]
    AdaptiveSegment(#[from] AdaptiveSegmentError),

    #[cfg(feature = "image")]
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
