use crate::{DoughError, ImageStats, MeasurementReport, MonitorConfig, SizeMeasurement};
use dough_gauge_adaptive::{AdaptiveSegmentation, AdaptiveThresholdSegmenter, Region};
use dough_gauge_color::{ColorRangeSegmenter, ColorReport};
use dough_gauge_core::ColorImageView;

#[cfg(feature = "image")]
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Adaptive-path result: masks, the chosen region and its calibrated size.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub image: ImageStats,
    pub segmentation: AdaptiveSegmentation,
    /// `None` exactly when no region was detected.
    pub size: Option<SizeMeasurement>,
}

impl Measurement {
    #[inline]
    pub fn region(&self) -> Option<&Region> {
        self.segmentation.region.as_ref()
    }

    pub fn report(&self) -> MeasurementReport {
        MeasurementReport::adaptive(self.image, &self.segmentation, self.size.as_ref())
    }
}

/// Segment with the adaptive threshold and convert the dominant region to
/// physical units.
///
/// No region is a valid outcome (`size == None`), not an error.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(image, config), fields(width = image.width, height = image.height))
)]
pub fn measure_size(
    image: &ColorImageView<'_>,
    config: &MonitorConfig,
) -> Result<Measurement, DoughError> {
    let scale = config.pixel_scale()?;
    let segmentation = AdaptiveThresholdSegmenter::new(config.adaptive_params()).segment(image)?;
    let size = segmentation.region.as_ref().map(|r| scale.measure(r));
    match &size {
        Some(m) => log::info!(
            "dough area {:.2} {unit}^2, height {:.2} {unit}",
            m.physical_area,
            m.physical_height,
            unit = m.unit
        ),
        None => log::info!("no dough region detected"),
    }
    Ok(Measurement {
        image: ImageStats::from_view(image),
        segmentation,
        size,
    })
}

/// Color-range pixel statistics with the configured HSV bounds.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(image, config), fields(width = image.width, height = image.height))
)]
pub fn pixel_stats(
    image: &ColorImageView<'_>,
    config: &MonitorConfig,
) -> Result<ColorReport, DoughError> {
    let report = ColorRangeSegmenter::new(config.color_params()).segment(image)?;
    log::info!(
        "dough pixels {} / {} ({:.2}%)",
        report.foreground_pixels,
        report.total_pixels,
        report.foreground_percentage
    );
    Ok(report)
}

/// Load an image file and run [`measure_size`] on it.
#[cfg(feature = "image")]
pub fn measure_file(
    path: impl AsRef<Path>,
    config: &MonitorConfig,
) -> Result<(image::RgbImage, Measurement), DoughError> {
    let img = crate::io::load_rgb(path)?;
    let measurement = measure_size(&crate::io::color_view(&img), config)?;
    Ok((img, measurement))
}
