use crate::{DoughError, MonitorConfig};
use dough_gauge_adaptive::{select_region, AdaptiveThresholdSegmenter, RegionSelection};
use dough_gauge_color::{ColorRangeSegmenter, ColorStats};
use dough_gauge_core::{ColorImageView, Mask};

/// Mask-producing strategy. Both variants share the mask cleaner, so their
/// output can feed either pixel statistics or region measurement.
#[derive(Clone, Debug)]
pub enum Segmenter {
    ColorRange(ColorRangeSegmenter),
    AdaptiveThreshold(AdaptiveThresholdSegmenter),
}

/// Raw and cleaned masks from one [`Segmenter`] run.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentedMask {
    pub raw: Mask,
    pub cleaned: Mask,
    /// Threshold applied by the adaptive strategy; `None` for color ranges.
    pub threshold: Option<u8>,
}

impl SegmentedMask {
    pub fn stats(&self) -> ColorStats {
        ColorStats::from_mask(&self.cleaned)
    }

    pub fn regions(&self) -> RegionSelection {
        select_region(&self.cleaned)
    }
}

impl Segmenter {
    pub fn color(config: &MonitorConfig) -> Self {
        Self::ColorRange(ColorRangeSegmenter::new(config.color_params()))
    }

    pub fn adaptive(config: &MonitorConfig) -> Self {
        Self::AdaptiveThreshold(AdaptiveThresholdSegmenter::new(config.adaptive_params()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ColorRange(_) => "color_range",
            Self::AdaptiveThreshold(_) => "adaptive_threshold",
        }
    }

    pub fn segment(&self, image: &ColorImageView<'_>) -> Result<SegmentedMask, DoughError> {
        match self {
            Self::ColorRange(s) => {
                let report = s.segment(image)?;
                Ok(SegmentedMask {
                    raw: report.raw_mask,
                    cleaned: report.cleaned_mask,
                    threshold: None,
                })
            }
            Self::AdaptiveThreshold(s) => {
                let out = s.threshold(image)?;
                Ok(SegmentedMask {
                    raw: out.raw_mask,
                    cleaned: out.cleaned_mask,
                    threshold: Some(out.threshold),
                })
            }
        }
    }
}
