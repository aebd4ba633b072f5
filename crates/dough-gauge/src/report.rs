//! Serializable single-shot results.

use crate::{DoughError, SizeMeasurement};
use dough_gauge_adaptive::{AdaptiveSegmentation, Region};
use dough_gauge_color::{ColorReport, ColorStats};
use dough_gauge_core::{BoundingBox, ColorImageView};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Basic facts about an input frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStats {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub total_pixels: usize,
}

impl ImageStats {
    pub fn from_view(image: &ColorImageView<'_>) -> Self {
        Self {
            width: image.width,
            height: image.height,
            channels: 3,
            total_pixels: image.pixel_count(),
        }
    }
}

/// Region geometry without the outline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub area: f64,
    pub pixel_count: usize,
    pub bbox: BoundingBox,
}

impl From<&Region> for RegionSummary {
    fn from(r: &Region) -> Self {
        Self {
            area: r.area,
            pixel_count: r.pixel_count,
            bbox: r.bbox,
        }
    }
}

/// JSON record written by the CLI `--report` option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasurementReport {
    /// Input path, when the frame came from a file.
    #[serde(default)]
    pub source: Option<String>,
    pub image: ImageStats,
    /// `"adaptive_threshold"` or `"color_range"`.
    pub method: String,
    #[serde(default)]
    pub threshold: Option<u8>,
    #[serde(default)]
    pub region: Option<RegionSummary>,
    #[serde(default)]
    pub measurement: Option<SizeMeasurement>,
    #[serde(default)]
    pub stats: Option<ColorStats>,
    #[serde(default)]
    pub overlay: Vec<String>,
}

impl MeasurementReport {
    pub fn adaptive(
        image: ImageStats,
        segmentation: &AdaptiveSegmentation,
        measurement: Option<&SizeMeasurement>,
    ) -> Self {
        Self {
            source: None,
            image,
            method: "adaptive_threshold".to_string(),
            threshold: Some(segmentation.threshold),
            region: segmentation.region.as_ref().map(RegionSummary::from),
            measurement: measurement.cloned(),
            stats: Some(ColorStats::from_mask(&segmentation.cleaned_mask)),
            overlay: measurement.map(|m| m.overlay_lines()).unwrap_or_default(),
        }
    }

    pub fn color(image: ImageStats, report: &ColorReport) -> Self {
        Self {
            source: None,
            image,
            method: "color_range".to_string(),
            threshold: None,
            region: None,
            measurement: None,
            stats: Some(report.stats()),
            overlay: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DoughError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| DoughError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dough_gauge_core::Mask;

    #[test]
    fn empty_adaptive_result_serializes_nulls() {
        let seg = AdaptiveSegmentation {
            threshold: 90,
            raw_mask: Mask::empty(4, 4),
            cleaned_mask: Mask::empty(4, 4),
            contours: Vec::new(),
            region: None,
        };
        let stats = ImageStats {
            width: 4,
            height: 4,
            channels: 3,
            total_pixels: 16,
        };
        let report = MeasurementReport::adaptive(stats, &seg, None);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["method"], "adaptive_threshold");
        assert_eq!(json["threshold"], 90);
        assert!(json["region"].is_null());
        assert!(json["measurement"].is_null());
        assert_eq!(json["stats"]["foreground_pixels"], 0);
    }
}
