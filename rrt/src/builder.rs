use std::ops::Range;

use nalgebra as na;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::{GoalCheck, RRTConfig};
use crate::error::BuildError;
use crate::obstacle::{CollisionOracle, Rectangle, RectangleSet};
use crate::planner::RRTPlanner;
use crate::tree::Tree;
use crate::utils::*;

/// Where a built planner gets its random numbers from.
pub trait RngSource {
    type Rng: RngCore;

    fn into_rng(self, seed: Option<u64>) -> Self::Rng;
}

/// A [`StdRng`] seeded from the config, or from the OS when no seed is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedRng;

impl RngSource for SeedRng {
    type Rng = StdRng;

    fn into_rng(self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// An injected random source. The config seed is ignored.
#[derive(Debug, Clone)]
pub struct WithRng<R>(pub R);

impl<R: RngCore> RngSource for WithRng<R> {
    type Rng = R;

    fn into_rng(self, _seed: Option<u64>) -> R {
        self.0
    }
}

pub struct RRTBuilder<O, S = SeedRng> {
    from: na::Point2<f32>,
    to: na::Point2<f32>,
    obstacles: O,
    config: RRTConfig,
    rng: S,
}

impl RRTBuilder<RectangleSet> {
    /// Starts a builder with no obstacles and the default configuration.
    pub fn new(from: na::Point2<f32>, to: na::Point2<f32>) -> RRTBuilder<RectangleSet> {
        RRTBuilder {
            from,
            to,
            obstacles: RectangleSet::default(),
            config: RRTConfig::default(),
            rng: SeedRng,
        }
    }
}

impl<S> RRTBuilder<RectangleSet, S> {
    pub fn add_obstacle(mut self, obstacle: Rectangle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn extend_obstacles(mut self, obstacles: impl IntoIterator<Item = Rectangle>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }
}

impl<O, S> RRTBuilder<O, S> {
    /// Replaces the obstacle representation, which also fixes the collision strategy.
    pub fn with_obstacles<O2: CollisionOracle>(self, obstacles: O2) -> RRTBuilder<O2, S> {
        RRTBuilder {
            from: self.from,
            to: self.to,
            obstacles,
            config: self.config,
            rng: self.rng,
        }
    }

    /// Uses `rng` as the random source instead of one seeded from the config.
    pub fn with_rng<R: RngCore>(self, rng: R) -> RRTBuilder<O, WithRng<R>> {
        RRTBuilder {
            from: self.from,
            to: self.to,
            obstacles: self.obstacles,
            config: self.config,
            rng: WithRng(rng),
        }
    }

    pub fn with_config(mut self, config: RRTConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_step_size(mut self, step_size: f32) -> Self {
        self.config.step_size = step_size;
        self
    }

    pub fn with_goal_tolerance(mut self, goal_tolerance: f32) -> Self {
        self.config.goal_tolerance = goal_tolerance;
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.config.max_iters = max_iters;
        self
    }

    pub fn with_random_range(mut self, random_range: Range<na::Point2<f32>>) -> Self {
        self.config.random_range = random_range;
        self
    }

    pub fn with_goal_check(mut self, goal_check: GoalCheck) -> Self {
        self.config.goal_check = goal_check;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed.replace(seed);
        self
    }

    pub fn get_from(&self) -> na::Point2<f32> {
        self.from
    }

    pub fn get_to(&self) -> na::Point2<f32> {
        self.to
    }

    pub fn get_obstacles(&self) -> &O {
        &self.obstacles
    }

    pub fn get_config(&self) -> &RRTConfig {
        &self.config
    }

    fn validate(&self) -> Result<(), BuildError> {
        let config = &self.config;

        if !(config.step_size.is_finite() && config.step_size > 0.0) {
            return Err(BuildError::InvalidStepSize(config.step_size));
        }

        if !(config.goal_tolerance.is_finite() && config.goal_tolerance > 0.0) {
            return Err(BuildError::InvalidGoalTolerance(config.goal_tolerance));
        }

        if config.max_iters == 0 {
            return Err(BuildError::NoIterations);
        }

        let Range { start, end } = &config.random_range;
        let non_empty = start.iter().zip(end.iter()).all(|(s, e)| s < e);
        if !(is_finite_point(start) && is_finite_point(end) && non_empty) {
            return Err(BuildError::InvalidRandomRange {
                start: [start.x, start.y],
                end: [end.x, end.y],
            });
        }

        for (which, p) in [("start", &self.from), ("goal", &self.to)] {
            if !is_finite_point(p) {
                return Err(BuildError::NonFinitePoint { which, x: p.x, y: p.y });
            }
        }

        Ok(())
    }
}

impl<O, S> RRTBuilder<O, S>
where
    O: CollisionOracle,
    S: RngSource,
{
    pub fn build(self) -> Result<RRTPlanner<O, S::Rng>, BuildError> {
        self.validate()?;

        let rng = self.rng.into_rng(self.config.seed);

        Ok(RRTPlanner {
            start: self.from,
            goal: self.to,
            oracle: self.obstacles,
            config: self.config,
            rng,
            tree: Tree::new(self.from),
        })
    }
}
