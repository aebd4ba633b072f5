//! External contour extraction from binary masks.
//!
//! Foreground is 8-connected (background therefore 4-connected). For every
//! connected component that is not enclosed by a hole of another component,
//! the outer border is traced with Suzuki–Abe border following, starting at
//! the component's first pixel in raster order. Holes and anything nested in
//! them are ignored.
//!
//! Reported quantities mirror what machine-vision users expect from an
//! "external contours, simple chain" query:
//! - `area`: polygon (shoelace) area of the traced border through pixel
//!   centers, so a single pixel or a one-pixel-wide line has area 0;
//! - `bbox`: axis-aligned bounding box of the border pixels;
//! - `points`: border with straight runs collapsed to their end points.

use crate::Mask;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in pixel units (inclusive pixel extent).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Outer border of one connected foreground component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    /// Border vertices, straight runs collapsed.
    pub points: Vec<Point2<i32>>,
    /// Polygon area enclosed by the border, in pixel².
    pub area: f64,
    /// Number of foreground pixels in the component (holes excluded).
    pub pixel_count: usize,
    pub bbox: BoundingBox,
}

// Counter-clockwise on screen (y grows downwards): E, NE, N, NW, W, SW, S, SE.
const DIRS: [(i32, i32); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
const WEST: usize = 4;

#[inline]
fn dir_index(dx: i32, dy: i32) -> usize {
    DIRS.iter()
        .position(|&d| d == (dx, dy))
        .unwrap_or(WEST)
}

struct Grid<'a> {
    mask: &'a Mask,
    w: i32,
    h: i32,
}

impl Grid<'_> {
    #[inline]
    fn fg(&self, p: Point2<i32>) -> bool {
        p.x >= 0
            && p.y >= 0
            && p.x < self.w
            && p.y < self.h
            && self.mask.is_foreground(p.x as usize, p.y as usize)
    }

    #[inline]
    fn step(p: Point2<i32>, d: usize) -> Point2<i32> {
        Point2::new(p.x + DIRS[d].0, p.y + DIRS[d].1)
    }
}

/// Follow the outer border of the component whose first raster pixel is `start`.
fn trace_outer_border(grid: &Grid<'_>, start: Point2<i32>) -> Vec<Point2<i32>> {
    // Clockwise from the (background) west neighbor for the first border pixel.
    let first = (0..8)
        .map(|k| (WEST + 8 - k) % 8)
        .map(|d| Grid::step(start, d))
        .find(|&p| grid.fg(p));
    let Some(first) = first else {
        return vec![start];
    };

    let mut points = Vec::new();
    let mut prev = first;
    let mut cur = start;
    loop {
        let back = dir_index(prev.x - cur.x, prev.y - cur.y);
        let mut next = prev;
        for k in 1..8 {
            let cand = Grid::step(cur, (back + k) % 8);
            if grid.fg(cand) {
                next = cand;
                break;
            }
        }
        points.push(cur);
        if next == start && cur == first {
            break;
        }
        prev = cur;
        cur = next;
    }
    points
}

/// Shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point2<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut acc = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        acc += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (acc as f64).abs() * 0.5
}

fn bounding_box(points: &[Point2<i32>]) -> BoundingBox {
    let (mut x0, mut y0, mut x1, mut y1) = (i32::MAX, i32::MAX, i32::MIN, i32::MIN);
    for p in points {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    if points.is_empty() {
        return BoundingBox {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        };
    }
    BoundingBox {
        x: x0 as usize,
        y: y0 as usize,
        width: (x1 - x0 + 1) as usize,
        height: (y1 - y0 + 1) as usize,
    }
}

/// Drop vertices that sit in the middle of a straight horizontal, vertical
/// or diagonal run.
pub fn compress_chain(points: &[Point2<i32>]) -> Vec<Point2<i32>> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }
    (0..n)
        .filter(|&i| {
            let p = points[(i + n - 1) % n];
            let c = points[i];
            let q = points[(i + 1) % n];
            (c.x - p.x, c.y - p.y) != (q.x - c.x, q.y - c.y)
        })
        .map(|i| points[i])
        .collect()
}

/// Label 8-connected foreground components in raster order.
///
/// Returns, per component, its first pixel in raster order and its pixel count.
fn label_components(mask: &Mask) -> Vec<(Point2<i32>, usize)> {
    let (w, h) = (mask.width(), mask.height());
    let data = mask.as_raw();
    let mut labels = vec![0u32; w * h];
    let mut comps = Vec::new();
    let mut stack = Vec::new();

    for idx in 0..w * h {
        if data[idx] == 0 || labels[idx] != 0 {
            continue;
        }
        let label = comps.len() as u32 + 1;
        labels[idx] = label;
        stack.push(idx);
        let mut count = 0usize;
        while let Some(i) = stack.pop() {
            count += 1;
            let (x, y) = ((i % w) as i32, (i / w) as i32);
            for (dx, dy) in DIRS {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                    continue;
                }
                let j = ny as usize * w + nx as usize;
                if data[j] != 0 && labels[j] == 0 {
                    labels[j] = label;
                    stack.push(j);
                }
            }
        }
        comps.push((Point2::new((idx % w) as i32, (idx / w) as i32), count));
    }
    comps
}

/// Mark background pixels 4-connected to the frame border.
fn outer_background(mask: &Mask) -> Vec<bool> {
    let (w, h) = (mask.width(), mask.height());
    let data = mask.as_raw();
    let mut outside = vec![false; w * h];
    let mut stack = Vec::new();

    let seed = |x: usize, y: usize, outside: &mut Vec<bool>, stack: &mut Vec<usize>| {
        let i = y * w + x;
        if data[i] == 0 && !outside[i] {
            outside[i] = true;
            stack.push(i);
        }
    };
    for x in 0..w {
        seed(x, 0, &mut outside, &mut stack);
        seed(x, h - 1, &mut outside, &mut stack);
    }
    for y in 0..h {
        seed(0, y, &mut outside, &mut stack);
        seed(w - 1, y, &mut outside, &mut stack);
    }

    while let Some(i) = stack.pop() {
        let (x, y) = (i % w, i / w);
        let mut visit = |j: usize| {
            if data[j] == 0 && !outside[j] {
                outside[j] = true;
                stack.push(j);
            }
        };
        if x > 0 {
            visit(i - 1);
        }
        if x + 1 < w {
            visit(i + 1);
        }
        if y > 0 {
            visit(i - w);
        }
        if y + 1 < h {
            visit(i + w);
        }
    }
    outside
}

/// Extract the outer contour of every top-level foreground component.
///
/// Contours are returned in raster order of each component's first pixel.
pub fn find_external_contours(mask: &Mask) -> Vec<Contour> {
    let (w, h) = (mask.width(), mask.height());
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let comps = label_components(mask);
    if comps.is_empty() {
        return Vec::new();
    }
    let outside = outer_background(mask);
    let grid = Grid {
        mask,
        w: w as i32,
        h: h as i32,
    };

    let mut contours = Vec::with_capacity(comps.len());
    for (start, pixel_count) in comps {
        let top_level =
            start.x == 0 || outside[start.y as usize * w + start.x as usize - 1];
        if !top_level {
            continue;
        }
        let border = trace_outer_border(&grid, start);
        contours.push(Contour {
            area: polygon_area(&border),
            bbox: bounding_box(&border),
            points: compress_chain(&border),
            pixel_count,
        });
    }
    log::debug!("find_external_contours: {} contour(s)", contours.len());
    contours
}

/// Index of the contour with the largest area; the first one wins ties.
pub fn largest_contour(contours: &[Contour]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, c) in contours.iter().enumerate() {
        match best {
            Some(b) if contours[b].area >= c.area => {}
            _ => best = Some(i),
        }
    }
    best
}
