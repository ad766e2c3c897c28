//! Single-tree RRT planning in the plane.
//!
//! A [`RRTPlanner`] grows a [`Tree`] from the start point by sampling random points, stepping a
//! fixed distance towards each sample from the nearest node and keeping the step if the
//! [`CollisionOracle`] reports it clear. Once a new node lands within the goal tolerance the goal
//! is attached to it and the path is read back along the parent links.

pub mod builder;
pub mod config;
pub mod error;
pub mod obstacle;
pub mod planner;
pub mod point;
pub mod steer;
pub mod tree;

mod utils;

pub use builder::{RRTBuilder, RngSource, SeedRng, WithRng};
pub use config::{GoalCheck, RRTConfig};
pub use error::{BuildError, MaskError, TreeError};
pub use obstacle::{CollisionOracle, ObstacleMap, OccupancyMask, Rectangle, RectangleSet};
pub use planner::RRTPlanner;
pub use point::TreeNode;
pub use tree::Tree;

use itertools::Itertools;
use nalgebra as na;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub waypoints: Vec<na::Point2<f32>>,
}

impl Path {
    pub fn new(waypoints: Vec<na::Point2<f32>>) -> Self { Self { waypoints } }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn start(&self) -> Option<&na::Point2<f32>> {
        self.waypoints.first()
    }

    pub fn end(&self) -> Option<&na::Point2<f32>> {
        self.waypoints.last()
    }

    /// Consecutive pairs of waypoints.
    pub fn segments(&self) -> impl Iterator<Item = (&na::Point2<f32>, &na::Point2<f32>)> + '_ {
        self.waypoints.iter().tuple_windows()
    }

    /// Sum of the Euclidean lengths of all segments.
    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| na::distance(a, b)).sum()
    }
}

/// Outcome of a planning attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RRTResult {
    /// The path from start to goal, or `None` if the iteration budget ran out.
    pub result: Option<Path>,
    /// Sampling rounds used. Zero when the start was already close enough to the goal.
    pub iterations: usize,
    /// Nodes in the tree when the attempt ended, goal node included.
    pub n_points: usize,
}

impl RRTResult {
    pub fn is_found(&self) -> bool {
        self.result.is_some()
    }
}
