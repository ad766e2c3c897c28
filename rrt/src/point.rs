use std::borrow::Borrow;

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// A point in the tree together with the index of the node it was grown from.
///
/// The parent is an index into the owning [`Tree`](crate::tree::Tree), never a reference, so nodes
/// can be copied and serialized freely. Only the root has no parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub(crate) p: na::Point2<f32>,
    pub(crate) connected: Option<usize>,
}

impl TreeNode {
    pub fn new_root(p: na::Point2<f32>) -> TreeNode {
        TreeNode { p, connected: None }
    }

    pub fn new_connected(p: na::Point2<f32>, parent: usize) -> TreeNode {
        TreeNode { p, connected: Some(parent) }
    }

    #[inline(always)]
    pub fn point(&self) -> na::Point2<f32> {
        self.p
    }

    #[inline(always)]
    pub fn connected(&self) -> Option<usize> {
        self.connected
    }

    #[inline(always)]
    pub fn is_root(&self) -> bool {
        self.connected.is_none()
    }
}

impl Borrow<na::Point2<f32>> for TreeNode {
    #[inline(always)]
    fn borrow(&self) -> &na::Point2<f32> { &self.p }
}

impl<'a> Borrow<na::Point2<f32>> for &'a TreeNode {
    #[inline(always)]
    fn borrow(&self) -> &na::Point2<f32> { (*self).borrow() }
}
