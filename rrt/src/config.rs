use std::ops::Range;

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Which candidates the goal proximity check looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCheck {
    /// Only candidates that were actually added to the tree can reach the goal.
    #[default]
    InsertedOnly,
    /// Every candidate is checked, even one the collision oracle rejected. A rejected candidate
    /// never enters the tree, so the goal is connected to the node it was steered from instead.
    LastCandidate,
}

/// Parameters of a planning run.
///
/// Every field has a default, so a partial YAML/serde document is enough to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RRTConfig {
    /// Distance between a new node and the node it was grown from.
    pub step_size: f32,
    /// A candidate closer than this to the goal finishes the search.
    pub goal_tolerance: f32,
    /// Sampling rounds before giving up.
    pub max_iters: usize,
    /// Region random samples are drawn from.
    pub random_range: Range<na::Point2<f32>>,
    pub goal_check: GoalCheck,
    /// Seed for the default random source. `None` seeds it from entropy.
    pub seed: Option<u64>,
}

impl RRTConfig {
    pub const DEFAULT_STEP_SIZE: f32 = 20.0;
    pub const DEFAULT_GOAL_TOLERANCE: f32 = 30.0;
    pub const DEFAULT_MAX_ITERS: usize = 10_000;
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;
}

impl Default for RRTConfig {
    fn default() -> Self {
        RRTConfig {
            step_size: Self::DEFAULT_STEP_SIZE,
            goal_tolerance: Self::DEFAULT_GOAL_TOLERANCE,
            max_iters: Self::DEFAULT_MAX_ITERS,
            random_range: Range {
                start: na::Point2::origin(),
                end: na::Point2::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT),
            },
            goal_check: GoalCheck::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_whole_workspace() {
        let config = RRTConfig::default();
        assert_eq!(config.step_size, 20.0);
        assert!(config.goal_tolerance > config.step_size);
        assert_eq!(config.max_iters, 10_000);
        assert_eq!(config.random_range.end, na::Point2::new(800.0, 600.0));
        assert_eq!(config.goal_check, GoalCheck::InsertedOnly);
        assert_eq!(config.seed, None);
    }
}
