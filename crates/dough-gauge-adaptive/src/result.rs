use dough_gauge_core::{find_external_contours, largest_contour, BoundingBox, Contour, Mask};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// The dominant foreground component of a cleaned mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Polygon area of the outer border, in pixel².
    pub area: f64,
    /// Foreground pixels in the component.
    pub pixel_count: usize,
    pub bbox: BoundingBox,
    /// Outer border vertices, for drawing.
    pub outline: Vec<Point2<i32>>,
}

impl Region {
    /// Bounding-box height in pixels: the height proxy for the dough.
    #[inline]
    pub fn pixel_height(&self) -> usize {
        self.bbox.height
    }
}

impl From<Contour> for Region {
    fn from(c: Contour) -> Self {
        Self {
            area: c.area,
            pixel_count: c.pixel_count,
            bbox: c.bbox,
            outline: c.points,
        }
    }
}

/// External contours of a mask and the largest of them.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionSelection {
    pub contours: Vec<Contour>,
    /// `None` when the mask has no foreground. Not an error.
    pub region: Option<Region>,
}

/// Extract external contours and keep the one with the largest area.
///
/// Ties go to the contour found first in raster order.
pub fn select_region(mask: &Mask) -> RegionSelection {
    let contours = find_external_contours(mask);
    let region = largest_contour(&contours).map(|i| Region::from(contours[i].clone()));
    match &region {
        Some(r) => log::debug!(
            "select_region: {} candidate(s), largest area={:.1} bbox={:?}",
            contours.len(),
            r.area,
            r.bbox
        ),
        None => log::debug!("select_region: no foreground component"),
    }
    RegionSelection { contours, region }
}

/// Output of one adaptive-threshold segmentation.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveSegmentation {
    /// Threshold actually applied (Otsu or manual).
    pub threshold: u8,
    pub raw_mask: Mask,
    pub cleaned_mask: Mask,
    pub contours: Vec<Contour>,
    pub region: Option<Region>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn disc_mask(size: usize, r: f64) -> Mask {
        let c = size as f64 / 2.0;
        Mask::from_fn(size, size, |i| {
            let (x, y) = ((i % size) as f64 + 0.5 - c, (i / size) as f64 + 0.5 - c);
            x * x + y * y <= r * r
        })
    }

    #[test]
    fn disc_area_tracks_pi_r_squared() {
        let sel = select_region(&disc_mask(200, 40.0));
        let region = sel.region.expect("region");
        assert_relative_eq!(
            region.area,
            std::f64::consts::PI * 40.0 * 40.0,
            max_relative = 0.05
        );
        assert_eq!(region.pixel_height(), 80);
        assert_eq!(region.outline.first(), sel.contours[0].points.first());
    }

    #[test]
    fn largest_of_two_blobs_wins() {
        let mask = Mask::from_fn(60, 30, |i| {
            let (x, y) = (i % 60, i / 60);
            (y >= 5 && y < 10 && x >= 2 && x < 7) || (y >= 10 && y < 25 && x >= 30 && x < 50)
        });
        let sel = select_region(&mask);
        assert_eq!(sel.contours.len(), 2);
        let region = sel.region.expect("region");
        assert_eq!(region.bbox, BoundingBox { x: 30, y: 10, width: 20, height: 15 });
        assert_eq!(region.pixel_count, 300);
    }

    #[test]
    fn empty_mask_has_no_region() {
        let sel = select_region(&Mask::empty(10, 10));
        assert!(sel.contours.is_empty());
        assert!(sel.region.is_none());
    }
}
