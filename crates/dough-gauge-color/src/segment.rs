use crate::{ColorSegmentError, HsvRange};
use dough_gauge_core::{clean_mask, hsv_from_color, ColorImageView, HsvImage, Mask, MorphologyParams};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Iterations used by the color path: HSV masks are noisier than thresholded ones.
pub const DEFAULT_COLOR_MORPHOLOGY: MorphologyParams = MorphologyParams::new(3, 2);

/// Configuration for the color-range segmenter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorRangeParams {
    pub range: HsvRange,
    #[serde(default = "default_color_morphology")]
    pub morphology: MorphologyParams,
}

fn default_color_morphology() -> MorphologyParams {
    DEFAULT_COLOR_MORPHOLOGY
}

impl Default for ColorRangeParams {
    fn default() -> Self {
        Self {
            range: HsvRange::default(),
            morphology: DEFAULT_COLOR_MORPHOLOGY,
        }
    }
}

/// Pixel statistics of the cleaned mask.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStats {
    pub total_pixels: usize,
    pub foreground_pixels: usize,
    /// `100 * foreground_pixels / total_pixels`, in `[0, 100]`.
    pub foreground_percentage: f64,
}

impl ColorStats {
    pub fn from_mask(mask: &Mask) -> Self {
        let total_pixels = mask.width() * mask.height();
        let foreground_pixels = mask.count_nonzero();
        let foreground_percentage = if total_pixels == 0 {
            0.0
        } else {
            100.0 * foreground_pixels as f64 / total_pixels as f64
        };
        Self {
            total_pixels,
            foreground_pixels,
            foreground_percentage,
        }
    }
}

/// Output of one color-range segmentation.
#[derive(Clone, Debug)]
pub struct ColorReport {
    pub total_pixels: usize,
    pub foreground_pixels: usize,
    pub foreground_percentage: f64,
    /// Direct in-range output.
    pub raw_mask: Mask,
    /// `raw_mask` after opening and closing.
    pub cleaned_mask: Mask,
}

impl ColorReport {
    fn from_masks(raw_mask: Mask, cleaned_mask: Mask) -> Self {
        let stats = ColorStats::from_mask(&cleaned_mask);
        Self {
            total_pixels: stats.total_pixels,
            foreground_pixels: stats.foreground_pixels,
            foreground_percentage: stats.foreground_percentage,
            raw_mask,
            cleaned_mask,
        }
    }

    pub fn stats(&self) -> ColorStats {
        ColorStats {
            total_pixels: self.total_pixels,
            foreground_pixels: self.foreground_pixels,
            foreground_percentage: self.foreground_percentage,
        }
    }
}

/// Segments by HSV color membership.
#[derive(Clone, Debug, Default)]
pub struct ColorRangeSegmenter {
    params: ColorRangeParams,
}

impl ColorRangeSegmenter {
    pub fn new(params: ColorRangeParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &ColorRangeParams {
        &self.params
    }

    /// Convert to HSV, test every pixel against the range and clean the mask.
    ///
    /// An image without pixels is treated as a missing input, not as an
    /// empty result.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn segment(&self, image: &ColorImageView<'_>) -> Result<ColorReport, ColorSegmentError> {
        image
            .ensure_not_empty()
            .map_err(ColorSegmentError::MissingImage)?;
        let hsv = hsv_from_color(image);
        Ok(self.segment_hsv(&hsv))
    }

    /// Same as [`segment`](Self::segment) on an already converted raster.
    pub fn segment_hsv(&self, hsv: &HsvImage) -> ColorReport {
        let raw = self.params.range.mask(hsv);
        let cleaned = clean_mask(&raw, self.params.morphology);
        let report = ColorReport::from_masks(raw, cleaned);
        log::debug!(
            "color range {:?}..{:?}: {} of {} px ({:.2}%)",
            self.params.range.lower,
            self.params.range.upper,
            report.foreground_pixels,
            report.total_pixels,
            report.foreground_percentage
        );
        report
    }
}
