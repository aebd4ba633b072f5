//! Binary foreground masks.

use crate::{GrayImageView, RasterError};

/// Value of a foreground pixel.
pub const FOREGROUND: u8 = 255;
/// Value of a background pixel.
pub const BACKGROUND: u8 = 0;

/// Single-channel raster whose pixels are either [`FOREGROUND`] or [`BACKGROUND`].
///
/// The invariant is checked on construction, so every operator that takes a
/// `Mask` can rely on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Mask {
    /// All-background mask.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![BACKGROUND; width * height],
        }
    }

    /// Build a mask from a row-major buffer, rejecting non-binary values and
    /// zero dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::Empty { width, height });
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(RasterError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        if let Some(index) = data
            .iter()
            .position(|&v| v != FOREGROUND && v != BACKGROUND)
        {
            return Err(RasterError::NonBinary {
                value: data[index],
                index,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Crate-internal constructor for buffers produced by our own operators.
    pub(crate) fn from_binary_unchecked(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        debug_assert!(data.iter().all(|&v| v == FOREGROUND || v == BACKGROUND));
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a mask by evaluating `pred` for every pixel index in row-major order.
    pub fn from_fn(width: usize, height: usize, mut pred: impl FnMut(usize) -> bool) -> Self {
        let data = (0..width * height)
            .map(|i| if pred(i) { FOREGROUND } else { BACKGROUND })
            .collect();
        Self::from_binary_unchecked(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] == FOREGROUND
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    /// Number of foreground pixels.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v == FOREGROUND).count()
    }

    /// Sum of pixel values, the way array libraries report `sum(mask)`.
    pub fn sum(&self) -> u64 {
        self.data.iter().map(|&v| v as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_gray_values() {
        let err = Mask::from_raw(2, 1, vec![255, 7]).unwrap_err();
        assert_eq!(err, RasterError::NonBinary { value: 7, index: 1 });
    }

    #[test]
    fn from_raw_rejects_dimensionless_input() {
        let err = Mask::from_raw(0, 5, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            RasterError::Empty {
                width: 0,
                height: 5
            }
        );
    }

    #[test]
    fn counts_and_sums() {
        let mask = Mask::from_raw(3, 1, vec![255, 0, 255]).unwrap();
        assert_eq!(mask.count_nonzero(), 2);
        assert_eq!(mask.sum(), 510);
        assert!(mask.is_foreground(2, 0));
        assert!(!mask.is_foreground(1, 0));
    }
}
