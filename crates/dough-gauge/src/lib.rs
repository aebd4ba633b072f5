//! Measure proofing dough from a single still frame.
//!
//! This crate provides:
//! - re-exports of the segmentation crates,
//! - a [`Segmenter`] enum to swap between color-range and adaptive-threshold
//!   masks,
//! - JSON configuration ([`MonitorConfig`]) and calibration ([`PixelScale`]),
//! - (feature `image`) file loading, frame acquisition and debug rasters,
//! - (feature `cli`) the `dough-gauge` binary.
//!
//! ## Quickstart
//!
//! ```no_run
//! use dough_gauge::{measure_file, MonitorConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitorConfig::load_json("dough.json")?;
//! let (_frame, measurement) = measure_file("proof.jpg", &config)?;
//! match measurement.size {
//!     Some(size) => println!("{}", size.overlay_lines().join(", ")),
//!     None => println!("no region detected"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `dough_gauge::core`: rasters, masks, morphology, contours, logger.
//! - `dough_gauge::color`: HSV range segmentation and tuning.
//! - `dough_gauge::adaptive`: Otsu segmentation and region selection.
//! - `dough_gauge::capture` (feature `image`): frame sources.
//! - `dough_gauge::debug` (feature `image`): annotated frames and panels.

pub use dough_gauge_adaptive as adaptive;
pub use dough_gauge_color as color;
pub use dough_gauge_core as core;

pub use dough_gauge_adaptive::{AdaptiveParams, Region};
pub use dough_gauge_color::{ColorReport, ColorStats, HsvRange, HsvTuner};
pub use dough_gauge_core::{ColorImageView, Mask, ThresholdPolarity};

mod calibration;
mod config;
mod error;
mod pipeline;
mod report;
mod segmenter;

pub use calibration::{PixelScale, SizeMeasurement};
pub use config::{CaptureConfig, ConfigError, MonitorConfig};
pub use error::DoughError;
pub use pipeline::{measure_size, pixel_stats, Measurement};
pub use report::{ImageStats, MeasurementReport, RegionSummary};
pub use segmenter::{SegmentedMask, Segmenter};

#[cfg(feature = "image")]
pub mod capture;
#[cfg(feature = "image")]
pub mod debug;
#[cfg(feature = "image")]
pub mod io;

#[cfg(feature = "image")]
pub use capture::CaptureError;
#[cfg(feature = "image")]
pub use io::{color_view, load_rgb};
#[cfg(feature = "image")]
pub use pipeline::measure_file;
