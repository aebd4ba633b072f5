use dough_gauge_core::{HsvImage, Mask};
use serde::{Deserialize, Serialize};

/// Largest hue value in 8-bit HSV (hue is stored halved).
pub const HUE_MAX: u8 = 179;

/// Default bounds tuned for pale dough under the proofing-box light.
pub const DEFAULT_LOWER_HSV: [u8; 3] = [0, 0, 180];
pub const DEFAULT_UPPER_HSV: [u8; 3] = [100, 75, 255];

/// Inclusive HSV box: `lower[c] <= pixel[c] <= upper[c]` for all three channels.
///
/// Bounds with `lower[c] > upper[c]` are representable and simply match
/// nothing; rejecting them is the job of configuration validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl Default for HsvRange {
    fn default() -> Self {
        Self::new(DEFAULT_LOWER_HSV, DEFAULT_UPPER_HSV)
    }
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// First channel (0 = H, 1 = S, 2 = V) whose lower bound exceeds the upper one.
    pub fn first_inverted_channel(&self) -> Option<usize> {
        (0..3).find(|&c| self.lower[c] > self.upper[c])
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }

    /// Foreground where the pixel lies inside the box on all channels.
    pub fn mask(&self, hsv: &HsvImage) -> Mask {
        Mask::from_fn(hsv.width, hsv.height, |i| self.contains(hsv.pixel(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_accepts_white_and_rejects_black() {
        let range = HsvRange::default();
        assert!(range.contains([0, 0, 255]));
        assert!(!range.contains([0, 0, 0]));
        assert!(!range.contains([0, 0, 179]));
        assert!(range.contains([100, 75, 180]));
        assert!(!range.contains([101, 75, 180]));
    }

    #[test]
    fn inverted_bounds_match_nothing() {
        let range = HsvRange::new([10, 0, 0], [5, 255, 255]);
        assert_eq!(range.first_inverted_channel(), Some(0));
        let hsv = HsvImage {
            width: 2,
            height: 1,
            data: vec![5, 10, 10, 10, 10, 10],
        };
        assert_eq!(range.mask(&hsv).count_nonzero(), 0);
    }

    #[test]
    fn serializes_as_plain_arrays() {
        let json = serde_json::to_string(&HsvRange::default()).unwrap();
        assert_eq!(json, r#"{"lower":[0,0,180],"upper":[100,75,255]}"#);
    }
}
