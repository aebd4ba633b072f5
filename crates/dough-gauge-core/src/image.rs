use serde::{Deserialize, Serialize};

/// Errors raised when a raster buffer does not describe a usable image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("raster has no pixels (width={width}, height={height})")]
    Empty { width: usize, height: usize },

    #[error("invalid raster buffer length (expected {expected} bytes, got {got})")]
    BufferLength { expected: usize, got: usize },

    #[error("mask value {value} at index {index} is not binary (expected 0 or 255)")]
    NonBinary { value: u8, index: usize },
}

fn expected_len(width: usize, height: usize, channels: usize) -> Result<usize, RasterError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(RasterError::BufferLength {
            expected: usize::MAX,
            got: 0,
        })
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// Byte order of the three channels in a packed color buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelOrder {
    /// Red, green, blue. What the `image` crate decodes to.
    #[default]
    Rgb,
    /// Blue, green, red. What most camera stacks hand out.
    Bgr,
}

/// Borrowed, packed 3-channel 8-bit raster.
#[derive(Clone, Copy, Debug)]
pub struct ColorImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub order: ChannelOrder,
    pub data: &'a [u8], // row-major, len = w*h*3
}

impl<'a> ColorImageView<'a> {
    /// Wrap a packed color buffer, checking its length.
    pub fn new(
        width: usize,
        height: usize,
        order: ChannelOrder,
        data: &'a [u8],
    ) -> Result<Self, RasterError> {
        let expected = expected_len(width, height, 3)?;
        if data.len() != expected {
            return Err(RasterError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Fail with [`RasterError::Empty`] when the view has no pixels.
    pub fn ensure_not_empty(&self) -> Result<(), RasterError> {
        if self.is_empty() {
            return Err(RasterError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Pixel `i` (row-major index) as `[r, g, b]` regardless of storage order.
    #[inline]
    pub fn rgb_at(&self, i: usize) -> [u8; 3] {
        let p = &self.data[i * 3..i * 3 + 3];
        match self.order {
            ChannelOrder::Rgb => [p[0], p[1], p[2]],
            ChannelOrder::Bgr => [p[2], p[1], p[0]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_view_rejects_short_buffer() {
        let data = vec![0u8; 10];
        let err = ColorImageView::new(2, 2, ChannelOrder::Rgb, &data).unwrap_err();
        assert_eq!(
            err,
            RasterError::BufferLength {
                expected: 12,
                got: 10
            }
        );
    }

    #[test]
    fn bgr_pixels_are_reordered() {
        let data = [10u8, 20, 30];
        let view = ColorImageView::new(1, 1, ChannelOrder::Bgr, &data).unwrap();
        assert_eq!(view.rgb_at(0), [30, 20, 10]);
    }

    #[test]
    fn empty_view_is_reported() {
        let view = ColorImageView::new(0, 0, ChannelOrder::Rgb, &[]).unwrap();
        assert!(view.is_empty());
        assert_eq!(
            view.ensure_not_empty(),
            Err(RasterError::Empty {
                width: 0,
                height: 0
            })
        );
    }
}
