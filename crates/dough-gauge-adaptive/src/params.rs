use dough_gauge_core::{MorphologyParams, ThresholdPolarity};
use serde::{Deserialize, Serialize};

/// Lighter cleaning than the color path: thresholded edges are already clean.
pub const DEFAULT_ADAPTIVE_MORPHOLOGY: MorphologyParams = MorphologyParams::new(3, 1);

/// Configuration for the adaptive-threshold segmenter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveParams {
    /// Gaussian kernel side (odd). `1` disables smoothing.
    pub blur_kernel_size: usize,
    /// Gaussian sigma; `<= 0` derives it from the kernel size.
    pub blur_sigma: f64,
    /// Pick the threshold with Otsu's method. When set, `threshold_value` is ignored.
    pub use_otsu: bool,
    /// Manual threshold, used only with `use_otsu = false`.
    ///
    /// Useful on low-contrast frames where Otsu latches onto lighting gradients.
    pub threshold_value: u8,
    /// Which side of the threshold is the dough.
    pub polarity: ThresholdPolarity,
    pub morphology: MorphologyParams,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: 0.0,
            use_otsu: true,
            threshold_value: 100,
            polarity: ThresholdPolarity::Inverted,
            morphology: DEFAULT_ADAPTIVE_MORPHOLOGY,
        }
    }
}
