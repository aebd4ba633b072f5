//! Binary morphology with square structuring elements, and the mask cleaner
//! built from it.
//!
//! Pixels outside the raster never take part in a min/max: erosion does not
//! eat foreground touching the frame edge and dilation does not grow from it.

use crate::{Mask, BACKGROUND, FOREGROUND};
use serde::{Deserialize, Serialize};

/// Structuring element size and repeat count for one cleaning pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyParams {
    /// Side of the square structuring element. Must be odd.
    #[serde(alias = "morph_kernel_size")]
    pub kernel_size: usize,
    /// How many times each of erosion/dilation is applied per operation.
    #[serde(alias = "morph_iterations")]
    pub iterations: usize,
}

impl MorphologyParams {
    pub const fn new(kernel_size: usize, iterations: usize) -> Self {
        Self {
            kernel_size,
            iterations,
        }
    }
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self::new(3, 1)
    }
}

#[derive(Clone, Copy)]
enum Op {
    Erode,
    Dilate,
}

/// One separable min (erode) or max (dilate) sweep along rows then columns.
fn sweep(src: &[u8], w: usize, h: usize, radius: usize, op: Op) -> Vec<u8> {
    let pick = |acc: u8, v: u8| match op {
        Op::Erode => acc.min(v),
        Op::Dilate => acc.max(v),
    };
    let seed = match op {
        Op::Erode => FOREGROUND,
        Op::Dilate => BACKGROUND,
    };

    let mut rows = vec![0u8; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(w - 1);
            rows[y * w + x] = row[lo..=hi].iter().fold(seed, |acc, &v| pick(acc, v));
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(h - 1);
        for x in 0..w {
            out[y * w + x] = (lo..=hi).fold(seed, |acc, yy| pick(acc, rows[yy * w + x]));
        }
    }
    out
}

fn repeat(mask: &Mask, params: MorphologyParams, op: Op) -> Mask {
    let (w, h) = (mask.width(), mask.height());
    if w == 0 || h == 0 || params.kernel_size <= 1 {
        return mask.clone();
    }
    let radius = params.kernel_size / 2;
    let mut data = mask.as_raw().to_vec();
    for _ in 0..params.iterations {
        data = sweep(&data, w, h, radius, op);
    }
    Mask::from_binary_unchecked(w, h, data)
}

/// Erode `iterations` times.
pub fn erode(mask: &Mask, params: MorphologyParams) -> Mask {
    repeat(mask, params, Op::Erode)
}

/// Dilate `iterations` times.
pub fn dilate(mask: &Mask, params: MorphologyParams) -> Mask {
    repeat(mask, params, Op::Dilate)
}

/// Opening: erosion followed by dilation. Removes specks smaller than the element.
pub fn open(mask: &Mask, params: MorphologyParams) -> Mask {
    dilate(&erode(mask, params), params)
}

/// Closing: dilation followed by erosion. Fills pinholes and bridges small gaps.
pub fn close(mask: &Mask, params: MorphologyParams) -> Mask {
    erode(&dilate(mask, params), params)
}

/// Suppress speckle noise, then fill small holes.
///
/// Opening runs first so isolated noise is gone before closing could merge it
/// into the foreground.
pub fn clean_mask(mask: &Mask, params: MorphologyParams) -> Mask {
    let opened = open(mask, params);
    let cleaned = close(&opened, params);
    log::debug!(
        "clean_mask: k={} it={} foreground {} -> {} -> {}",
        params.kernel_size,
        params.iterations,
        mask.count_nonzero(),
        opened.count_nonzero(),
        cleaned.count_nonzero()
    );
    cleaned
}
