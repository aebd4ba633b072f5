//! JSON configuration for a monitoring session.

use crate::PixelScale;
use dough_gauge_adaptive::{AdaptiveParams, DEFAULT_ADAPTIVE_MORPHOLOGY};
use dough_gauge_color::{
    ColorRangeParams, HsvRange, DEFAULT_COLOR_MORPHOLOGY, DEFAULT_LOWER_HSV, DEFAULT_UPPER_HSV,
    HUE_MAX,
};
use dough_gauge_core::{MorphologyParams, ThresholdPolarity};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

const HSV_CHANNELS: [&str; 3] = ["hue", "saturation", "value"];

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("pixel_to_length_ratio must be positive and finite (got {0})")]
    InvalidRatio(f64),
    #[error("{channel} bounds are inverted: lower {lower} > upper {upper}")]
    InvertedHsv {
        channel: &'static str,
        lower: u8,
        upper: u8,
    },
    #[error("{which} hue bound {value} exceeds {max}", max = HUE_MAX)]
    HueOutOfRange { which: &'static str, value: u8 },
    #[error("{name} must be odd and at least 1 (got {value})")]
    InvalidKernel { name: &'static str, value: usize },
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Frame acquisition settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Frames read and discarded before the measured one, so exposure settles.
    pub warmup_frames: usize,
    /// Where the captured frame is persisted.
    pub snapshot_path: PathBuf,
    /// If this file exists the session runs in simulation and reads it instead of a camera.
    pub simulated_image_path: PathBuf,
    /// Still-capture command for the device, e.g. `["libcamera-still", "-n", "-o", "{output}"]`.
    ///
    /// `{output}` is replaced by `snapshot_path`.
    pub command: Option<Vec<String>>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            warmup_frames: 5,
            snapshot_path: PathBuf::from("dough_snapshot.jpg"),
            simulated_image_path: PathBuf::from("/usr/bin/sample_dough_image.jpg"),
            command: None,
        }
    }
}

/// Everything a measurement needs: HSV bounds, calibration and per-path tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub lower_hsv: [u8; 3],
    pub upper_hsv: [u8; 3],
    /// Length units per pixel.
    pub pixel_to_length_ratio: f64,
    pub length_unit: String,
    pub threshold_value: u8,
    pub use_otsu: bool,
    pub polarity: ThresholdPolarity,
    pub blur_kernel_size: usize,
    pub color_morphology: MorphologyParams,
    pub adaptive_morphology: MorphologyParams,
    pub capture: CaptureConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            lower_hsv: DEFAULT_LOWER_HSV,
            upper_hsv: DEFAULT_UPPER_HSV,
            pixel_to_length_ratio: 0.0225,
            length_unit: "cm".to_string(),
            threshold_value: 100,
            use_otsu: true,
            polarity: ThresholdPolarity::Inverted,
            blur_kernel_size: 5,
            color_morphology: DEFAULT_COLOR_MORPHOLOGY,
            adaptive_morphology: DEFAULT_ADAPTIVE_MORPHOLOGY,
            capture: CaptureConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load a JSON config from disk and validate it.
    ///
    /// Missing fields take their defaults, so `{}` is a valid file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject values no measurement could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        PixelScale::new(self.pixel_to_length_ratio, self.length_unit.clone())?;

        for (which, value) in [("lower", self.lower_hsv[0]), ("upper", self.upper_hsv[0])] {
            if value > HUE_MAX {
                return Err(ConfigError::HueOutOfRange { which, value });
            }
        }
        if let Some(c) = self.hsv_range().first_inverted_channel() {
            return Err(ConfigError::InvertedHsv {
                channel: HSV_CHANNELS[c],
                lower: self.lower_hsv[c],
                upper: self.upper_hsv[c],
            });
        }

        check_kernel("blur_kernel_size", self.blur_kernel_size)?;
        check_kernel(
            "color_morphology.kernel_size",
            self.color_morphology.kernel_size,
        )?;
        check_kernel(
            "adaptive_morphology.kernel_size",
            self.adaptive_morphology.kernel_size,
        )?;
        Ok(())
    }

    pub fn hsv_range(&self) -> HsvRange {
        HsvRange::new(self.lower_hsv, self.upper_hsv)
    }

    pub fn color_params(&self) -> ColorRangeParams {
        ColorRangeParams {
            range: self.hsv_range(),
            morphology: self.color_morphology,
        }
    }

    pub fn adaptive_params(&self) -> AdaptiveParams {
        AdaptiveParams {
            blur_kernel_size: self.blur_kernel_size,
            use_otsu: self.use_otsu,
            threshold_value: self.threshold_value,
            polarity: self.polarity,
            morphology: self.adaptive_morphology,
            ..AdaptiveParams::default()
        }
    }

    pub fn pixel_scale(&self) -> Result<PixelScale, ConfigError> {
        PixelScale::new(self.pixel_to_length_ratio, self.length_unit.clone())
    }
}

fn check_kernel(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || value % 2 == 0 {
        return Err(ConfigError::InvalidKernel { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = MonitorConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.color_params().morphology.iterations, 2);
        assert_eq!(cfg.adaptive_params().morphology.iterations, 1);
        assert_eq!(cfg.capture.warmup_frames, 5);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: MonitorConfig =
            serde_json::from_str(r#"{"pixel_to_length_ratio": 0.05, "polarity": "direct"}"#)
                .unwrap();
        assert_eq!(cfg.pixel_to_length_ratio, 0.05);
        assert_eq!(cfg.polarity, ThresholdPolarity::Direct);
        assert_eq!(cfg.lower_hsv, DEFAULT_LOWER_HSV);
        assert_eq!(cfg.capture, CaptureConfig::default());
    }

    #[test]
    fn accepts_morph_key_names_per_path() {
        let cfg: MonitorConfig = serde_json::from_str(
            r#"{
                "color_morphology": {"morph_kernel_size": 5, "morph_iterations": 3},
                "adaptive_morphology": {"morph_kernel_size": 7, "morph_iterations": 2}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.color_morphology, MorphologyParams::new(5, 3));
        assert_eq!(cfg.adaptive_params().morphology, MorphologyParams::new(7, 2));
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_bad_ratio() {
        for ratio in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = MonitorConfig {
                pixel_to_length_ratio: ratio,
                ..MonitorConfig::default()
            };
            assert!(matches!(cfg.validate(), Err(ConfigError::InvalidRatio(_))));
        }
    }

    #[test]
    fn rejects_inverted_and_out_of_range_hsv() {
        let cfg = MonitorConfig {
            lower_hsv: [0, 80, 180],
            upper_hsv: [100, 75, 255],
            ..MonitorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedHsv {
                channel: "saturation",
                lower: 80,
                upper: 75
            })
        ));

        let cfg = MonitorConfig {
            upper_hsv: [200, 75, 255],
            ..MonitorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::HueOutOfRange {
                which: "upper",
                value: 200
            })
        ));
    }

    #[test]
    fn rejects_even_or_zero_kernels() {
        let cfg = MonitorConfig {
            blur_kernel_size: 4,
            ..MonitorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidKernel {
                name: "blur_kernel_size",
                value: 4
            })
        ));

        let cfg = MonitorConfig {
            color_morphology: MorphologyParams::new(0, 2),
            ..MonitorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidKernel { value: 0, .. })
        ));
    }
}
