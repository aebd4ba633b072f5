//! Step-wise HSV range tuning.
//!
//! A UI shell (sliders, a key loop, a web form) owns the event loop and calls
//! [`HsvTuner::update`] whenever the operator moves a bound. The tuner keeps
//! the HSV conversion of the image so each update only re-runs the range test
//! and the mask cleaner, through the same code path as one-shot segmentation.

use crate::{ColorRangeParams, ColorRangeSegmenter, ColorReport, ColorSegmentError, HsvRange};
use dough_gauge_core::{hsv_from_color, ColorImageView, HsvImage, MorphologyParams};

type Observer<'a> = Box<dyn FnMut(usize) + 'a>;

pub struct HsvTuner<'a> {
    hsv: HsvImage,
    morphology: MorphologyParams,
    range: HsvRange,
    observer: Option<Observer<'a>>,
}

impl<'a> HsvTuner<'a> {
    /// Prepare a tuning session on `image`, starting from `initial`.
    pub fn new(
        image: &ColorImageView<'_>,
        initial: ColorRangeParams,
    ) -> Result<Self, ColorSegmentError> {
        image
            .ensure_not_empty()
            .map_err(ColorSegmentError::MissingImage)?;
        Ok(Self {
            hsv: hsv_from_color(image),
            morphology: initial.morphology,
            range: initial.range,
            observer: None,
        })
    }

    /// Register a callback receiving the foreground pixel count after each update.
    pub fn with_observer(mut self, observer: impl FnMut(usize) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Bounds of the most recent update (or the initial ones).
    #[inline]
    pub fn range(&self) -> HsvRange {
        self.range
    }

    /// Re-derive masks and statistics for new bounds.
    pub fn update(&mut self, range: HsvRange) -> ColorReport {
        self.range = range;
        let segmenter = ColorRangeSegmenter::new(ColorRangeParams {
            range,
            morphology: self.morphology,
        });
        let report = segmenter.segment_hsv(&self.hsv);
        if let Some(observer) = self.observer.as_mut() {
            observer(report.foreground_pixels);
        }
        report
    }

    /// End the session and return the final bounds.
    pub fn finish(self) -> HsvRange {
        self.range
    }
}
