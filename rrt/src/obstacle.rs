use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::error::MaskError;
use crate::utils::*;

/// Answers whether the straight segment between two points may be added to the tree.
///
/// The growth loop only ever talks to this trait, so any obstacle representation can be plugged in
/// when the planner is built.
pub trait CollisionOracle {
    fn is_clear(&self, a: &na::Point2<f32>, b: &na::Point2<f32>) -> bool;
}

impl<T> CollisionOracle for &T
where
    T: CollisionOracle + ?Sized,
{
    #[inline(always)]
    fn is_clear(&self, a: &na::Point2<f32>, b: &na::Point2<f32>) -> bool {
        (**self).is_clear(a, b)
    }
}

impl<T> CollisionOracle for Box<T>
where
    T: CollisionOracle + ?Sized,
{
    #[inline(always)]
    fn is_clear(&self, a: &na::Point2<f32>, b: &na::Point2<f32>) -> bool {
        (**self).is_clear(a, b)
    }
}

/// An axis aligned rectangle given by its minimum corner and its (non-negative) size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub corner: na::Point2<f32>,
    pub size: na::Vector2<f32>,
}

impl Rectangle {
    pub fn new(corner: na::Point2<f32>, size: na::Vector2<f32>) -> Self {
        Self { corner, size }
    }

    /// The rectangle spanned by two opposite corners, in any order.
    pub fn from_corners(a: na::Point2<f32>, b: na::Point2<f32>) -> Self {
        let corner = na::Point2::new(a.x.min(b.x), a.y.min(b.y));
        let size = na::Vector2::new((a.x - b.x).abs(), (a.y - b.y).abs());
        Self { corner, size }
    }

    pub fn max_corner(&self) -> na::Point2<f32> {
        self.corner + self.size
    }

    /// Containment test, inclusive on every edge.
    pub fn contains(&self, p: &na::Point2<f32>) -> bool {
        itertools::izip!(p.iter(), self.corner.iter(), self.size.iter())
            .all(|(&p_coord, &corner_coord, &sz)| (corner_coord..=corner_coord + sz).contains(&p_coord))
    }
}

/// Rectangles checked only at the segment endpoints.
///
/// A segment is blocked when either endpoint lies in some rectangle. Points between the endpoints
/// are never looked at, so a segment can cut straight through a rectangle thinner than itself and
/// still be reported clear. With the small step sizes the planner uses this is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RectangleSet {
    rects: Vec<Rectangle>,
}

impl RectangleSet {
    pub fn new(rects: Vec<Rectangle>) -> Self {
        Self { rects }
    }

    pub fn rects(&self) -> &[Rectangle] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn push(&mut self, rect: Rectangle) {
        self.rects.push(rect);
    }

    pub fn contains(&self, p: &na::Point2<f32>) -> bool {
        self.rects.iter().any(|r| r.contains(p))
    }
}

impl From<Vec<Rectangle>> for RectangleSet {
    fn from(rects: Vec<Rectangle>) -> Self {
        Self::new(rects)
    }
}

impl FromIterator<Rectangle> for RectangleSet {
    fn from_iter<I: IntoIterator<Item = Rectangle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Rectangle> for RectangleSet {
    fn extend<I: IntoIterator<Item = Rectangle>>(&mut self, iter: I) {
        self.rects.extend(iter);
    }
}

impl CollisionOracle for RectangleSet {
    fn is_clear(&self, a: &na::Point2<f32>, b: &na::Point2<f32>) -> bool {
        !self.rects.iter().any(|r| r.contains(a) || r.contains(b))
    }
}

/// A row-major grid of blocked cells. Cell `(x, y)` covers the unit square around the integer
/// coordinate `(x, y)` in planner space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyMask {
    /// A mask with every cell free.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self, MaskError> {
        let expected = width * height;
        if cells.len() != expected {
            return Err(MaskError::SizeMismatch {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self { width, height, cells })
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Marks a cell as blocked. Returns `false` if the cell is outside the mask.
    pub fn set_blocked(&mut self, x: i64, y: i64) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = true;
                true
            }
            None => false,
        }
    }

    /// Blocks every cell whose coordinate lies in `rect`, clipped to the mask.
    pub fn fill_rect(&mut self, rect: &Rectangle) {
        let max = rect.max_corner();
        let x0 = rect.corner.x.ceil().max(0.0) as i64;
        let y0 = rect.corner.y.ceil().max(0.0) as i64;
        let x1 = max.x.floor().min(self.width as f32 - 1.0) as i64;
        let y1 = max.y.floor().min(self.height as f32 - 1.0) as i64;

        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set_blocked(x, y);
            }
        }
    }

    /// Cells outside the mask have no obstacle data and count as free.
    pub fn is_blocked(&self, x: i64, y: i64) -> bool {
        self.index(x, y).map_or(false, |idx| self.cells[idx])
    }

    /// Looks up the cell nearest to `p`.
    pub fn is_blocked_at(&self, p: &na::Point2<f32>) -> bool {
        if !is_finite_point(p) {
            return false;
        }
        self.is_blocked(p.x.round() as i64, p.y.round() as i64)
    }
}

impl OccupancyMask {
    /// The range of distances along the ray `origin + t * dir` (with `t` in `0..=len`) whose
    /// nearest cell can lie inside the mask. Everything outside it reads as free.
    fn march_window(&self, origin: &na::Point2<f64>, dir: &na::Vector2<f64>, len: f64) -> Option<(f64, f64)> {
        let (mut t_min, mut t_max) = (0.0, len);

        for (p, d, size) in [(origin.x, dir.x, self.width), (origin.y, dir.y, self.height)] {
            // A coordinate rounds into the mask only inside (-0.5, size - 0.5).
            let (lo, hi) = (-1.0, size as f64);
            if d == 0.0 {
                if p < lo || p > hi {
                    return None;
                }
            } else {
                let (t0, t1) = ((lo - p) / d, (hi - p) / d);
                t_min = f64::max(t_min, t0.min(t1));
                t_max = f64::min(t_max, t0.max(t1));
            }
        }

        (t_min <= t_max).then(|| (t_min, t_max))
    }
}

impl CollisionOracle for OccupancyMask {
    /// Marches from `a` towards `b` one unit at a time and samples the mask under the cursor,
    /// stopping once the cursor is within one unit of `b`. Steps that fall outside the mask are
    /// skipped, so the work is bounded by the mask size however long the segment is.
    fn is_clear(&self, a: &na::Point2<f32>, b: &na::Point2<f32>) -> bool {
        if !(is_finite_point(a) && is_finite_point(b)) {
            return true;
        }

        // f64 keeps the length of any pair of finite f32 points finite.
        let a: na::Point2<f64> = a.cast();
        let b: na::Point2<f64> = b.cast();
        let len = na::distance(&a, &b);
        if len <= 1.0 {
            return true;
        }
        let dir = (b - a) / len;

        let (t_min, t_max) = match self.march_window(&a, &dir, len) {
            Some(window) => window,
            None => return true,
        };

        // Steps sit at whole distances from `a`.
        let first = t_min.ceil();
        if first > t_max {
            return true;
        }
        let max_steps = (self.width + self.height + 2) as f64;
        let n_steps = (t_max - first).min(max_steps) as usize;

        for i in 0..=n_steps {
            let cursor = a + dir * (first + i as f64);
            if na::distance(&cursor, &b) <= 1.0 {
                break;
            }
            if self.is_blocked_at(&cursor.cast()) {
                return false;
            }
        }

        true
    }
}

/// The obstacle representations the planner can be built with.
#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleMap {
    Rectangles(RectangleSet),
    Mask(OccupancyMask),
}

impl CollisionOracle for ObstacleMap {
    fn is_clear(&self, a: &na::Point2<f32>, b: &na::Point2<f32>) -> bool {
        match self {
            ObstacleMap::Rectangles(rects) => rects.is_clear(a, b),
            ObstacleMap::Mask(mask) => mask.is_clear(a, b),
        }
    }
}

impl From<RectangleSet> for ObstacleMap {
    fn from(rects: RectangleSet) -> Self {
        ObstacleMap::Rectangles(rects)
    }
}

impl From<OccupancyMask> for ObstacleMap {
    fn from(mask: OccupancyMask) -> Self {
        ObstacleMap::Mask(mask)
    }
}
