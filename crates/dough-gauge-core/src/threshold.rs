//! Global thresholding: Otsu level selection and binarization.

use crate::{GrayImageView, Mask, BACKGROUND, FOREGROUND};
use serde::{Deserialize, Serialize};

/// Which side of the threshold becomes foreground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolarity {
    /// `pixel <= t` is foreground: the subject is darker than its background.
    #[default]
    Inverted,
    /// `pixel > t` is foreground: the subject is brighter than its background.
    Direct,
}

/// 256-bin intensity histogram.
pub fn histogram(src: &GrayImageView<'_>) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &v in src.data {
        hist[v as usize] += 1;
    }
    hist
}

/// Compute the Otsu threshold of a histogram.
///
/// Returns the level `t` maximizing the between-class variance of the
/// `<= t` / `> t` split (equivalently, minimizing the intra-class variance).
/// Splits with an empty class are never chosen, so a single-level histogram
/// yields 0: a uniform frame stays background under `Inverted` polarity
/// unless it is black. An empty histogram yields 127 and two levels yield
/// their midpoint.
pub fn otsu_threshold_from_histogram(hist: &[u32; 256]) -> u8 {
    let total: u64 = hist.iter().map(|&h| h as u64).sum();
    if total == 0 {
        return 127;
    }

    let min_v = hist.iter().position(|&h| h > 0).unwrap_or(0);
    let max_v = hist.iter().rposition(|&h| h > 0).unwrap_or(255);
    if min_v == max_v {
        return 0;
    }

    let nonzero_bins = hist.iter().filter(|&&h| h > 0).count();
    if nonzero_bins <= 2 {
        return ((min_v + max_v) / 2) as u8;
    }

    let total = total as f64;
    let mut sum_total = 0f64;
    for (i, &h) in hist.iter().enumerate() {
        sum_total += (i as f64) * (h as f64);
    }

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        w_b += h as f64;
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += (t as f64) * (h as f64);
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

/// Otsu threshold of a whole grayscale raster.
pub fn otsu_threshold(src: &GrayImageView<'_>) -> u8 {
    otsu_threshold_from_histogram(&histogram(src))
}

/// Binarize `src` at `threshold` with the requested polarity.
pub fn binarize(src: &GrayImageView<'_>, threshold: u8, polarity: ThresholdPolarity) -> Mask {
    let data = src
        .data
        .iter()
        .map(|&v| {
            let above = v > threshold;
            let fg = match polarity {
                ThresholdPolarity::Direct => above,
                ThresholdPolarity::Inverted => !above,
            };
            if fg {
                FOREGROUND
            } else {
                BACKGROUND
            }
        })
        .collect();
    Mask::from_binary_unchecked(src.width, src.height, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrayImage;

    fn image_from(values: &[(u8, usize)]) -> GrayImage {
        let data: Vec<u8> = values
            .iter()
            .flat_map(|&(v, n)| std::iter::repeat(v).take(n))
            .collect();
        GrayImage {
            width: data.len(),
            height: 1,
            data,
        }
    }

    #[test]
    fn otsu_splits_two_clusters() {
        let img = image_from(&[(20, 40), (25, 30), (30, 30), (200, 50), (210, 50)]);
        let t = otsu_threshold(&img.view());
        assert!((30..200).contains(&t), "threshold {t} does not separate clusters");
    }

    #[test]
    fn otsu_degenerate_cases() {
        let hist = [0u32; 256];
        assert_eq!(otsu_threshold_from_histogram(&hist), 127);

        let img = image_from(&[(90, 10)]);
        assert_eq!(otsu_threshold(&img.view()), 0);

        let img = image_from(&[(50, 10), (150, 10)]);
        assert_eq!(otsu_threshold(&img.view()), 100);
    }

    #[test]
    fn uniform_level_is_background_when_inverted() {
        let img = image_from(&[(200, 12)]);
        let t = otsu_threshold(&img.view());
        let mask = binarize(&img.view(), t, ThresholdPolarity::Inverted);
        assert_eq!(mask.count_nonzero(), 0);

        // A black frame sits on the threshold itself and stays foreground.
        let img = image_from(&[(0, 12)]);
        let t = otsu_threshold(&img.view());
        let mask = binarize(&img.view(), t, ThresholdPolarity::Inverted);
        assert_eq!(mask.count_nonzero(), 12);
    }

    #[test]
    fn binarize_polarity() {
        let img = image_from(&[(10, 1), (100, 1), (101, 1), (250, 1)]);
        let direct = binarize(&img.view(), 100, ThresholdPolarity::Direct);
        assert_eq!(direct.as_raw(), &[0, 0, 255, 255]);
        let inverted = binarize(&img.view(), 100, ThresholdPolarity::Inverted);
        assert_eq!(inverted.as_raw(), &[255, 255, 0, 0]);
    }
}
