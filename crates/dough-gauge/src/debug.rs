//! Debug rasters for inspecting a measurement by eye.

use crate::io::mask_image;
use dough_gauge_adaptive::Region;
use dough_gauge_core::Mask;
use image::{imageops, DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

const OUTLINE: Rgb<u8> = Rgb([0, 255, 0]);
const BBOX: Rgb<u8> = Rgb([0, 0, 255]);

/// Copy of `image` with the region outline (green) and bounding box (blue).
pub fn annotate_region(image: &RgbImage, region: &Region) -> RgbImage {
    let mut canvas = image.clone();

    let pts = &region.outline;
    match pts.len() {
        0 => {}
        1 => {
            if let (Ok(x), Ok(y)) = (u32::try_from(pts[0].x), u32::try_from(pts[0].y)) {
                if let Some(px) = canvas.get_pixel_mut_checked(x, y) {
                    *px = OUTLINE;
                }
            }
        }
        n => {
            for i in 0..n {
                let a = pts[i];
                let b = pts[(i + 1) % n];
                draw_line_segment_mut(
                    &mut canvas,
                    (a.x as f32, a.y as f32),
                    (b.x as f32, b.y as f32),
                    OUTLINE,
                );
            }
        }
    }

    let bbox = region.bbox;
    if bbox.width > 0 && bbox.height > 0 {
        let rect = Rect::at(bbox.x as i32, bbox.y as i32)
            .of_size(bbox.width as u32, bbox.height as u32);
        draw_hollow_rect_mut(&mut canvas, rect, BBOX);
    }
    canvas
}

fn mask_rgb(mask: &Mask) -> RgbImage {
    DynamicImage::ImageLuma8(mask_image(mask)).to_rgb8()
}

/// Panels laid out left to right, all sized like the first one.
fn side_by_side(panels: &[RgbImage]) -> RgbImage {
    let (w, h) = panels
        .first()
        .map(|p| (p.width(), p.height()))
        .unwrap_or((0, 0));
    let mut canvas = RgbImage::new(w * panels.len() as u32, h);
    for (i, panel) in panels.iter().enumerate() {
        imageops::replace(&mut canvas, panel, i as i64 * w as i64, 0);
    }
    canvas
}

/// Original | raw mask | cleaned mask.
pub fn analysis_panel(image: &RgbImage, raw: &Mask, cleaned: &Mask) -> RgbImage {
    side_by_side(&[image.clone(), mask_rgb(raw), mask_rgb(cleaned)])
}

/// Original | mask | original restricted to the mask.
pub fn tuning_preview(image: &RgbImage, mask: &Mask) -> RgbImage {
    let masked = RgbImage::from_fn(image.width(), image.height(), |x, y| {
        if mask.is_foreground(x as usize, y as usize) {
            *image.get_pixel(x, y)
        } else {
            Rgb([0, 0, 0])
        }
    });
    side_by_side(&[image.clone(), mask_rgb(mask), masked])
}
