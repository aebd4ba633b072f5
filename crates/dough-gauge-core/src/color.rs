//! Colorspace conversions on 8-bit rasters.
//!
//! Both conversions follow the usual 8-bit conventions of machine-vision
//! libraries so that thresholds tuned elsewhere carry over:
//! - grayscale uses the BT.601 luma weights in 14-bit fixed point,
//! - HSV stores hue halved (`0..=179`), saturation and value in `0..=255`.

use crate::{ColorImageView, GrayImage};

/// Packed 3-channel HSV raster (`h, s, v` per pixel).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HsvImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>, // row-major, len = w*h*3
}

impl HsvImage {
    #[inline]
    pub fn pixel(&self, i: usize) -> [u8; 3] {
        [self.data[i * 3], self.data[i * 3 + 1], self.data[i * 3 + 2]]
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

const GRAY_SHIFT: u32 = 14;
const GRAY_R: u32 = 4899; // 0.299 * 2^14
const GRAY_G: u32 = 9617; // 0.587 * 2^14
const GRAY_B: u32 = 1868; // 0.114 * 2^14

#[inline]
pub fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb;
    let y = r as u32 * GRAY_R + g as u32 * GRAY_G + b as u32 * GRAY_B + (1 << (GRAY_SHIFT - 1));
    (y >> GRAY_SHIFT).min(255) as u8
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as i32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v == 0 {
        0
    } else {
        ((255 * diff) as f32 / v as f32).round() as i32
    };

    let h = if diff == 0 {
        0.0
    } else {
        let d = diff as f32;
        let deg = if v == r {
            60.0 * (g - b) as f32 / d
        } else if v == g {
            120.0 + 60.0 * (b - r) as f32 / d
        } else {
            240.0 + 60.0 * (r - g) as f32 / d
        };
        if deg < 0.0 {
            deg + 360.0
        } else {
            deg
        }
    };
    let mut h = (h / 2.0).round() as i32;
    if h >= 180 {
        h -= 180;
    }

    [h as u8, s.clamp(0, 255) as u8, v as u8]
}

/// Luminance-weighted grayscale conversion.
pub fn gray_from_color(src: &ColorImageView<'_>) -> GrayImage {
    let data = (0..src.pixel_count()).map(|i| luma(src.rgb_at(i))).collect();
    GrayImage {
        width: src.width,
        height: src.height,
        data,
    }
}

/// HSV conversion of the whole raster, honoring its channel order.
pub fn hsv_from_color(src: &ColorImageView<'_>) -> HsvImage {
    let mut data = Vec::with_capacity(src.pixel_count() * 3);
    for i in 0..src.pixel_count() {
        data.extend_from_slice(&rgb_to_hsv(src.rgb_at(i)));
    }
    HsvImage {
        width: src.width,
        height: src.height,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChannelOrder;

    #[test]
    fn primaries_map_to_expected_hues() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
    }

    #[test]
    fn achromatic_pixels_have_zero_hue_and_saturation() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
        assert_eq!(rgb_to_hsv([50, 50, 50]), [0, 0, 50]);
    }

    #[test]
    fn hue_wraps_below_180() {
        // Magenta-ish red just below 360 degrees.
        let [h, _, _] = rgb_to_hsv([255, 0, 1]);
        assert!(h < 180);
    }

    #[test]
    fn luma_matches_bt601_weights() {
        assert_eq!(luma([255, 255, 255]), 255);
        assert_eq!(luma([0, 0, 0]), 0);
        assert_eq!(luma([255, 0, 0]), 76);
        assert_eq!(luma([0, 255, 0]), 150);
        assert_eq!(luma([0, 0, 255]), 29);
    }

    #[test]
    fn conversions_respect_channel_order() {
        let bgr = [255u8, 0, 0]; // pure blue stored as BGR
        let view = ColorImageView::new(1, 1, ChannelOrder::Bgr, &bgr).unwrap();
        assert_eq!(hsv_from_color(&view).pixel(0), [120, 255, 255]);
        assert_eq!(gray_from_color(&view).data, vec![29]);
    }
}
