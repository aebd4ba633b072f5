use crate::{select_region, AdaptiveParams, AdaptiveSegmentError, AdaptiveSegmentation};
use dough_gauge_core::{
    binarize, clean_mask, gaussian_blur, gray_from_color, otsu_threshold, ColorImageView, Mask,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Masks produced by the thresholding half of the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdedMask {
    pub threshold: u8,
    pub raw_mask: Mask,
    pub cleaned_mask: Mask,
}

/// Grayscale → blur → global threshold → clean → largest external region.
#[derive(Clone, Debug, Default)]
pub struct AdaptiveThresholdSegmenter {
    params: AdaptiveParams,
}

impl AdaptiveThresholdSegmenter {
    pub fn new(params: AdaptiveParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &AdaptiveParams {
        &self.params
    }

    /// Run steps 1–4: grayscale, smoothing, binarization and cleaning.
    ///
    /// Smoothing happens before thresholding because thresholding amplifies
    /// sensor noise into speckle.
    pub fn threshold(
        &self,
        image: &ColorImageView<'_>,
    ) -> Result<ThresholdedMask, AdaptiveSegmentError> {
        image
            .ensure_not_empty()
            .map_err(AdaptiveSegmentError::MissingImage)?;

        let gray = gray_from_color(image);
        let blurred = gaussian_blur(
            &gray.view(),
            self.params.blur_kernel_size,
            self.params.blur_sigma,
        );

        let threshold = if self.params.use_otsu {
            let t = otsu_threshold(&blurred.view());
            log::debug!(
                "otsu threshold {} (manual value {} ignored)",
                t,
                self.params.threshold_value
            );
            t
        } else {
            log::debug!("manual threshold {}", self.params.threshold_value);
            self.params.threshold_value
        };

        let raw_mask = binarize(&blurred.view(), threshold, self.params.polarity);
        let cleaned_mask = clean_mask(&raw_mask, self.params.morphology);
        Ok(ThresholdedMask {
            threshold,
            raw_mask,
            cleaned_mask,
        })
    }

    /// Full pipeline. A frame without any foreground component is a valid
    /// result with `region == None`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn segment(
        &self,
        image: &ColorImageView<'_>,
    ) -> Result<AdaptiveSegmentation, AdaptiveSegmentError> {
        let ThresholdedMask {
            threshold,
            raw_mask,
            cleaned_mask,
        } = self.threshold(image)?;
        let selection = select_region(&cleaned_mask);
        if selection.region.is_none() {
            log::info!("no region detected (threshold {})", threshold);
        }
        Ok(AdaptiveSegmentation {
            threshold,
            raw_mask,
            cleaned_mask,
            contours: selection.contours,
            region: selection.region,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dough_gauge_core::{ChannelOrder, RasterError, ThresholdPolarity};

    /// Dark disc on a light background, like dough on a bright tray.
    fn disc_image(w: usize, h: usize, r: f64, fg: u8, bg: u8) -> Vec<u8> {
        let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
        let mut data = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let v = if dx * dx + dy * dy <= r * r { fg } else { bg };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        data
    }

    #[test]
    fn finds_dark_disc_with_inverted_polarity() {
        let data = disc_image(120, 100, 25.0, 40, 210);
        let view = ColorImageView::new(120, 100, ChannelOrder::Bgr, &data).unwrap();
        let seg = AdaptiveThresholdSegmenter::default().segment(&view).unwrap();
        assert!(seg.threshold > 40 && seg.threshold < 210);
        let region = seg.region.expect("region");
        assert_eq!(seg.contours.len(), 1);
        assert!((region.pixel_height() as i64 - 50).abs() <= 2);
        assert!((region.bbox.x as i64 - 35).abs() <= 2);
    }

    #[test]
    fn direct_polarity_selects_bright_subject() {
        let data = disc_image(120, 100, 25.0, 230, 30);
        let view = ColorImageView::new(120, 100, ChannelOrder::Rgb, &data).unwrap();
        let params = AdaptiveParams {
            polarity: ThresholdPolarity::Direct,
            ..AdaptiveParams::default()
        };
        let seg = AdaptiveThresholdSegmenter::new(params)
            .segment(&view)
            .unwrap();
        let region = seg.region.expect("region");
        assert!(region.bbox.width < 60);
    }

    #[test]
    fn manual_threshold_is_used_without_otsu() {
        let data = disc_image(60, 60, 10.0, 90, 200);
        let view = ColorImageView::new(60, 60, ChannelOrder::Rgb, &data).unwrap();
        let params = AdaptiveParams {
            use_otsu: false,
            threshold_value: 100,
            ..AdaptiveParams::default()
        };
        let seg = AdaptiveThresholdSegmenter::new(params)
            .threshold(&view)
            .unwrap();
        assert_eq!(seg.threshold, 100);
        assert!(seg.cleaned_mask.count_nonzero() > 0);

        // Otsu wins over the manual value when enabled.
        let params = AdaptiveParams {
            use_otsu: true,
            threshold_value: 5,
            ..AdaptiveParams::default()
        };
        let seg = AdaptiveThresholdSegmenter::new(params)
            .threshold(&view)
            .unwrap();
        assert_ne!(seg.threshold, 5);
    }

    #[test]
    fn empty_foreground_is_not_an_error() {
        // Manual threshold below every pixel value: nothing is <= t.
        let data = vec![200u8; 30 * 20 * 3];
        let view = ColorImageView::new(30, 20, ChannelOrder::Rgb, &data).unwrap();
        let params = AdaptiveParams {
            use_otsu: false,
            threshold_value: 10,
            ..AdaptiveParams::default()
        };
        let seg = AdaptiveThresholdSegmenter::new(params)
            .segment(&view)
            .unwrap();
        assert!(seg.region.is_none());
        assert!(seg.contours.is_empty());
    }

    #[test]
    fn uniform_frame_with_otsu_has_no_region() {
        let data = vec![200u8; 100 * 80 * 3];
        let view = ColorImageView::new(100, 80, ChannelOrder::Rgb, &data).unwrap();
        let seg = AdaptiveThresholdSegmenter::default().segment(&view).unwrap();
        assert_eq!(seg.threshold, 0);
        assert_eq!(seg.raw_mask.count_nonzero(), 0);
        assert!(seg.contours.is_empty());
        assert!(seg.region.is_none());
    }

    #[test]
    fn missing_image_is_rejected() {
        let view = ColorImageView::new(0, 3, ChannelOrder::Rgb, &[]).unwrap();
        let err = AdaptiveThresholdSegmenter::default()
            .segment(&view)
            .unwrap_err();
        assert_eq!(
            err,
            AdaptiveSegmentError::MissingImage(RasterError::Empty {
                width: 0,
                height: 3
            })
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let data = disc_image(80, 80, 20.0, 60, 190);
        let view = ColorImageView::new(80, 80, ChannelOrder::Rgb, &data).unwrap();
        let segmenter = AdaptiveThresholdSegmenter::default();
        let a = segmenter.segment(&view).unwrap();
        let b = segmenter.segment(&view).unwrap();
        assert_eq!(a, b);
    }
}
