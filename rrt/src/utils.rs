use std::ops::Range;

use rand::Rng;
use nalgebra as na;

/// Below this magnitude a direction vector is treated as degenerate.
pub(crate) const NORMALIZE_EPS: f32 = 1e-6;

pub(crate) fn gen_random_in_range<R: Rng + ?Sized>(rng: &mut R, range: &Range<na::Point2<f32>>) -> na::Point2<f32> {
    let rand_vec: na::Vector2<f32> = rng.gen();
    let s = range.start.coords;
    let e = range.end.coords;
    na::Point2::from(s + rand_vec.component_mul(&(e - s)))
}

/// Unit vector along `v`, or the zero vector when it is too short to normalize.
#[inline]
pub(crate) fn normalize_or_zero(v: na::Vector2<f32>) -> na::Vector2<f32> {
    v.try_normalize(NORMALIZE_EPS).unwrap_or_else(na::Vector2::zeros)
}

#[inline]
pub(crate) fn is_finite_point(p: &na::Point2<f32>) -> bool {
    p.iter().all(|c| c.is_finite())
}
