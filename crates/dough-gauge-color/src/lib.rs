//! HSV color-range segmentation.
//!
//! A pixel is foreground when all three of its 8-bit HSV components fall in an
//! inclusive [`HsvRange`]. The raw in-range mask is cleaned (open, then close)
//! and summarized as pixel counts and a foreground percentage.
//!
//! [`HsvTuner`] reuses the same path for step-wise manual calibration.

mod error;
mod range;
mod segment;
mod tuner;

pub use error::ColorSegmentError;
pub use range::{HsvRange, DEFAULT_LOWER_HSV, DEFAULT_UPPER_HSV, HUE_MAX};
pub use segment::{
    ColorRangeParams, ColorRangeSegmenter, ColorReport, ColorStats, DEFAULT_COLOR_MORPHOLOGY,
};
pub use tuner::HsvTuner;
