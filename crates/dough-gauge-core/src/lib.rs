//! Core raster types and image operators for dough measurement.
//!
//! This crate is intentionally small and free of any image codec. It works on
//! borrowed row-major buffers and provides the building blocks the
//! segmenters share:
//! - color and grayscale views, HSV and luma conversion,
//! - Gaussian smoothing and Otsu thresholding,
//! - binary [`Mask`]s, morphology and the mask cleaner,
//! - external contour extraction.

mod blur;
mod color;
mod contour;
mod image;
mod logger;
mod mask;
mod morphology;
mod threshold;

pub use blur::{gaussian_blur, gaussian_kernel, sigma_for_kernel};
pub use color::{gray_from_color, hsv_from_color, luma, rgb_to_hsv, HsvImage};
pub use contour::{
    compress_chain, find_external_contours, largest_contour, polygon_area, BoundingBox, Contour,
};
pub use image::{ChannelOrder, ColorImageView, GrayImage, GrayImageView, RasterError};
pub use mask::{Mask, BACKGROUND, FOREGROUND};
pub use morphology::{clean_mask, close, dilate, erode, open, MorphologyParams};
pub use threshold::{
    binarize, histogram, otsu_threshold, otsu_threshold_from_histogram, ThresholdPolarity,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV};
