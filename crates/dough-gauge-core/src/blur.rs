//! Separable Gaussian smoothing for grayscale rasters.

use crate::{GrayImage, GrayImageView};

/// Sigma implied by a kernel size when the caller passes `sigma <= 0`.
pub fn sigma_for_kernel(ksize: usize) -> f64 {
    0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// 1D Gaussian weights (normalized to sum 1).
///
/// Small odd kernels with `sigma <= 0` use the binomial tables, which is what
/// the derived sigma approximates and what other vision stacks use.
pub fn gaussian_kernel(ksize: usize, sigma: f64) -> Vec<f32> {
    debug_assert!(ksize % 2 == 1, "kernel size must be odd");
    if sigma <= 0.0 {
        match ksize {
            1 => return vec![1.0],
            3 => return vec![0.25, 0.5, 0.25],
            5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
            7 => {
                return vec![
                    0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
                ]
            }
            _ => {}
        }
    }
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        sigma_for_kernel(ksize)
    };
    let half = (ksize / 2) as f64;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - half;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Mirror an out-of-range index without repeating the edge pixel (`dcb|abcd|cba`).
#[inline]
fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let mut i = i;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// Blur `src` with a `ksize × ksize` Gaussian.
///
/// `ksize` must be odd; `sigma <= 0` derives sigma from the kernel size.
/// Borders are handled by reflection without edge duplication.
pub fn gaussian_blur(src: &GrayImageView<'_>, ksize: usize, sigma: f64) -> GrayImage {
    let (w, h) = (src.width, src.height);
    if w == 0 || h == 0 || ksize <= 1 {
        return GrayImage {
            width: w,
            height: h,
            data: src.data.to_vec(),
        };
    }

    let kernel = gaussian_kernel(ksize, sigma);
    let half = (ksize / 2) as isize;

    let mut horizontal = vec![0f32; w * h];
    for y in 0..h {
        let row = &src.data[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - half, w);
                acc += weight * row[sx] as f32;
            }
            horizontal[y * w + x] = acc;
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0f32;
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - half, h);
                acc += weight * horizontal[sy * w + x];
            }
            out[y * w + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }

    GrayImage {
        width: w,
        height: h,
        data: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn derived_sigma_for_5x5() {
        assert_relative_eq!(sigma_for_kernel(5), 1.1, epsilon = 1e-12);
    }

    #[test]
    fn kernels_are_normalized() {
        for ksize in [3, 5, 9, 11] {
            let sum: f32 = gaussian_kernel(ksize, 0.0).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
        }
        let sum: f32 = gaussian_kernel(5, 2.0).iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn reflect_101_mirrors_without_edge() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 1), 0);
    }

    #[test]
    fn constant_image_is_unchanged() {
        let img = GrayImage {
            width: 8,
            height: 6,
            data: vec![77; 48],
        };
        let out = gaussian_blur(&img.view(), 5, 0.0);
        assert!(out.data.iter().all(|&v| v == 77));
    }

    #[test]
    fn single_bright_pixel_spreads_symmetrically() {
        let mut img = GrayImage::new(9, 9);
        img.data[4 * 9 + 4] = 255;
        let out = gaussian_blur(&img.view(), 5, 0.0);
        let at = |x: usize, y: usize| out.data[y * 9 + x];
        // 255 * (6/16)^2 = 35.86
        assert_eq!(at(4, 4), 36);
        assert_eq!(at(3, 4), at(5, 4));
        assert_eq!(at(4, 3), at(4, 5));
        assert_eq!(at(0, 0), 0);
    }
}
