use std::borrow::Borrow;

use nalgebra as na;

use crate::point::TreeNode;
use crate::tree::Tree;
use crate::utils::*;

/// Linear search for the node closest to `query`.
///
/// On exact ties the node that was added first wins, so the result only depends on insertion
/// order. The tree always holds its root, so there is always an answer.
pub fn nearest<'a>(tree: &'a Tree, query: &na::Point2<f32>) -> (usize, &'a TreeNode) {
    tree.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = na::distance_squared(&a.point(), query);
            let db = na::distance_squared(&b.point(), query);
            da.total_cmp(&db)
        })
        .unwrap_or((0, tree.root()))
}

/// Moves exactly `step_size` from `from` towards `toward`.
///
/// When the two points coincide there is no direction to move in and `from` is returned as is.
pub fn steer<P: Borrow<na::Point2<f32>>>(from: P, toward: &na::Point2<f32>, step_size: f32) -> na::Point2<f32> {
    let from = *from.borrow();
    let direction = normalize_or_zero(toward - from);
    from + direction * step_size
}
