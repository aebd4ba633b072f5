//! Pixel-to-length calibration and the size measurement built from it.

use crate::ConfigError;
use dough_gauge_adaptive::Region;
use serde::{Deserialize, Serialize};

/// Validated calibration ratio: `unit` lengths per pixel.
///
/// Deserialization goes through [`PixelScale::new`], so a stored scale is
/// checked like a constructed one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPixelScale")]
pub struct PixelScale {
    ratio: f64,
    unit: String,
}

#[derive(Deserialize)]
struct RawPixelScale {
    ratio: f64,
    unit: String,
}

impl TryFrom<RawPixelScale> for PixelScale {
    type Error = ConfigError;

    fn try_from(raw: RawPixelScale) -> Result<Self, Self::Error> {
        Self::new(raw.ratio, raw.unit)
    }
}

impl PixelScale {
    pub fn new(ratio: f64, unit: impl Into<String>) -> Result<Self, ConfigError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(ConfigError::InvalidRatio(ratio));
        }
        Ok(Self {
            ratio,
            unit: unit.into(),
        })
    }

    #[inline]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    #[inline]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Areas scale with the square of the ratio.
    #[inline]
    pub fn area(&self, pixel_area: f64) -> f64 {
        pixel_area * self.ratio * self.ratio
    }

    #[inline]
    pub fn length(&self, pixels: f64) -> f64 {
        pixels * self.ratio
    }

    /// Convert a region's area and bounding-box height to physical units.
    pub fn measure(&self, region: &Region) -> SizeMeasurement {
        let pixel_area = region.area;
        let pixel_height = region.pixel_height();
        SizeMeasurement {
            pixel_area,
            pixel_height,
            physical_area: self.area(pixel_area),
            physical_height: self.length(pixel_height as f64),
            unit: self.unit.clone(),
        }
    }
}

/// Size of the dough in pixels and in calibrated units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeMeasurement {
    pub pixel_area: f64,
    pub pixel_height: usize,
    pub physical_area: f64,
    pub physical_height: f64,
    pub unit: String,
}

impl SizeMeasurement {
    /// Text lines for an annotated frame, e.g. `Area: 12.34 cm^2`.
    pub fn overlay_lines(&self) -> Vec<String> {
        vec![
            format!("Area: {:.2} {}^2", self.physical_area, self.unit),
            format!("Height: {:.2} {}", self.physical_height, self.unit),
        ]
    }
}
