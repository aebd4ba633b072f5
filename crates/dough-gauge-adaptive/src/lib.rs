//! Adaptive-threshold segmentation.
//!
//! The frame is reduced to luma, smoothed with a Gaussian kernel and split at a
//! single global threshold (Otsu's by default). After mask cleaning, external
//! contours are extracted and the largest one is reported as the dough
//! [`Region`].

mod error;
mod params;
mod pipeline;
mod result;

pub use error::AdaptiveSegmentError;
pub use params::{AdaptiveParams, DEFAULT_ADAPTIVE_MORPHOLOGY};
pub use pipeline::{AdaptiveThresholdSegmenter, ThresholdedMask};
pub use result::{select_region, AdaptiveSegmentation, Region, RegionSelection};
