use log::{debug, trace};
use nalgebra as na;
use rand::rngs::StdRng;
use rand::RngCore;

use crate::builder::RRTBuilder;
use crate::config::{GoalCheck, RRTConfig};
use crate::error::BuildError;
use crate::obstacle::CollisionOracle;
use crate::steer::{nearest, steer};
use crate::tree::Tree;
use crate::utils::*;
use crate::RRTResult;

/// A single-tree RRT planner between a fixed start and goal.
///
/// The planner owns its tree and its random source. Every call to [`plan`](RRTPlanner::plan) or
/// [`find_path`](RRTPlanner::find_path) starts over from a tree holding only the start point; the
/// tree of the last attempt stays available through [`tree`](RRTPlanner::tree) for rendering.
#[derive(Debug)]
pub struct RRTPlanner<O, R = StdRng> {
    pub(crate) start: na::Point2<f32>,
    pub(crate) goal: na::Point2<f32>,
    pub(crate) oracle: O,
    pub(crate) config: RRTConfig,
    pub(crate) rng: R,
    pub(crate) tree: Tree,
}

impl<O: CollisionOracle> RRTPlanner<O> {
    /// A planner with the given step size and goal tolerance and defaults for everything else.
    pub fn new(
        start: na::Point2<f32>,
        goal: na::Point2<f32>,
        obstacles: O,
        step_size: f32,
        goal_tolerance: f32,
    ) -> Result<Self, BuildError> {
        RRTBuilder::new(start, goal)
            .with_obstacles(obstacles)
            .with_step_size(step_size)
            .with_goal_tolerance(goal_tolerance)
            .build()
    }
}

impl<O, R> RRTPlanner<O, R> {
    pub fn start(&self) -> na::Point2<f32> {
        self.start
    }

    pub fn goal(&self) -> na::Point2<f32> {
        self.goal
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &RRTConfig {
        &self.config
    }

    /// The tree grown by the most recent attempt.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }
}

impl<O, R> RRTPlanner<O, R>
where
    O: CollisionOracle,
    R: RngCore,
{
    /// Runs one planning attempt and returns the path, or `None` when the iteration budget ran
    /// out first.
    pub fn find_path(&mut self) -> Option<crate::Path> {
        self.plan().result
    }

    pub fn plan(&mut self) -> RRTResult {
        let step_size = self.config.step_size;
        let goal_tolerance = self.config.goal_tolerance;
        let max_iters = self.config.max_iters;

        self.tree.reset(self.start);
        debug!(
            "planning from ({}, {}) to ({}, {}) with step {} and tolerance {}",
            self.start.x, self.start.y, self.goal.x, self.goal.y, step_size, goal_tolerance,
        );

        // The root is the first candidate, so a goal already in reach needs no sampling.
        if na::distance(&self.start, &self.goal) < goal_tolerance {
            return self.reach_goal(0, 0);
        }

        for iter in 1..=max_iters {
            let rnd_point = gen_random_in_range(&mut self.rng, &self.config.random_range);

            let (nearest_idx, nearest_node) = nearest(&self.tree, &rnd_point);
            let nearest_point = nearest_node.point();

            let candidate = steer(nearest_point, &rnd_point, step_size);

            // A candidate that did not move would only duplicate its parent.
            let inserted = if candidate != nearest_point && self.oracle.is_clear(&nearest_point, &candidate) {
                let idx = self.tree.push(candidate, nearest_idx);
                trace!(
                    "sample ({}, {}), nearest ({}, {}), new node #{} at ({}, {})",
                    rnd_point.x, rnd_point.y, nearest_point.x, nearest_point.y, idx, candidate.x, candidate.y,
                );
                Some(idx)
            } else {
                None
            };

            let goal_parent = match self.config.goal_check {
                GoalCheck::InsertedOnly => inserted,
                GoalCheck::LastCandidate => Some(inserted.unwrap_or(nearest_idx)),
            };

            if let Some(parent) = goal_parent {
                if na::distance(&candidate, &self.goal) < goal_tolerance {
                    return self.reach_goal(parent, iter);
                }
            }
        }

        debug!(
            "no path after {} iterations, tree has {} nodes",
            max_iters,
            self.tree.size(),
        );

        RRTResult {
            result: None,
            iterations: max_iters,
            n_points: self.tree.size(),
        }
    }

    fn reach_goal(&mut self, parent: usize, iterations: usize) -> RRTResult {
        let goal_idx = self.tree.push(self.goal, parent);
        let result = self.tree.path_to(goal_idx);

        debug!(
            "goal reached after {} iterations, tree has {} nodes, path has {} waypoints",
            iterations,
            self.tree.size(),
            result.as_ref().map_or(0, |path| path.len()),
        );

        RRTResult {
            result,
            iterations,
            n_points: self.tree.size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::{OccupancyMask, Rectangle, RectangleSet};
    use rand::SeedableRng;

    fn point2(x: f32, y: f32) -> na::Point2<f32> {
        na::Point2::new(x, y)
    }

    fn vec2(x: f32, y: f32) -> na::Vector2<f32> {
        na::Vector2::new(x, y)
    }

    #[test]
    fn new_uses_default_budget() {
        let planner = RRTPlanner::new(point2(0.0, 0.0), point2(10.0, 0.0), RectangleSet::default(), 2.0, 3.0).unwrap();
        assert_eq!(planner.config().max_iters, RRTConfig::DEFAULT_MAX_ITERS);
        assert_eq!(planner.config().step_size, 2.0);
        assert_eq!(planner.tree().size(), 1);
    }

    #[test]
    fn planners_can_be_debug_printed() {
        let planner = RRTPlanner::new(point2(0.0, 0.0), point2(10.0, 0.0), RectangleSet::default(), 2.0, 3.0);
        let printed = format!("{:?}", planner);
        assert!(printed.starts_with("Ok(RRTPlanner"), "{}", printed);
        assert!(printed.contains("step_size: 2.0"), "{}", printed);
    }

    #[test]
    fn huge_steps_over_a_mask_use_up_the_budget() {
        let mut planner = RRTBuilder::new(point2(10.0, 10.0), point2(700.0, 500.0))
            .with_obstacles(OccupancyMask::new(800, 600))
            .with_step_size(1e20)
            .with_goal_tolerance(30.0)
            .with_max_iters(5)
            .with_seed(1)
            .build()
            .unwrap();

        let res = planner.plan();
        assert!(res.result.is_none());
        assert_eq!(res.iterations, 5);
    }

    #[test]
    fn goal_within_tolerance_of_start_needs_no_sampling() {
        let mut planner = RRTBuilder::new(point2(10.0, 10.0), point2(15.0, 10.0))
            .with_seed(1)
            .build()
            .unwrap();

        let res = planner.plan();
        assert_eq!(res.iterations, 0);
        assert_eq!(res.n_points, 2);
        assert_eq!(res.result.unwrap().waypoints, vec![point2(10.0, 10.0), point2(15.0, 10.0)]);
    }

    #[test]
    fn every_attempt_restarts_from_the_start() {
        let mut planner = RRTBuilder::new(point2(0.0, 0.0), point2(700.0, 500.0))
            .with_seed(9)
            .with_max_iters(50)
            .build()
            .unwrap();

        let first = planner.plan();
        assert_eq!(first.n_points, planner.tree().size());

        let second = planner.plan();
        assert_eq!(second.n_points, planner.tree().size());
        assert!(planner.tree().size() <= 52);
        assert!(planner.tree().root().is_root());
        assert_eq!(planner.tree().root().point(), point2(0.0, 0.0));
    }

    #[test]
    fn explicit_rng_matches_seeded_config() {
        let build = |b: RRTBuilder<RectangleSet>| b.with_max_iters(300).with_goal_tolerance(25.0);

        let mut seeded = build(RRTBuilder::new(point2(50.0, 50.0), point2(600.0, 400.0)))
            .with_seed(77)
            .build()
            .unwrap();
        let mut explicit = build(RRTBuilder::new(point2(50.0, 50.0), point2(600.0, 400.0)))
            .with_rng(StdRng::seed_from_u64(77))
            .build()
            .unwrap();

        assert_eq!(seeded.find_path(), explicit.find_path());
        assert_eq!(seeded.tree(), explicit.tree());
    }

    // The start sits left of a wall and every sample lands just past it, so each candidate is
    // steered into the wall and rejected while being well within reach of the goal.
    fn wall_in_front_of_goal(goal_check: GoalCheck) -> RRTPlanner<RectangleSet> {
        RRTBuilder::new(point2(0.0, 0.0), point2(30.0, 0.0))
            .add_obstacle(Rectangle::new(point2(15.0, -5.0), vec2(30.0, 10.0)))
            .with_step_size(20.0)
            .with_goal_tolerance(15.0)
            .with_max_iters(200)
            .with_random_range(point2(29.0, -1.0)..point2(31.0, 1.0))
            .with_goal_check(goal_check)
            .with_seed(5)
            .build()
            .unwrap()
    }

    #[test]
    fn inserted_only_ignores_rejected_candidates() {
        let mut planner = wall_in_front_of_goal(GoalCheck::InsertedOnly);
        let res = planner.plan();

        assert!(res.result.is_none());
        assert_eq!(res.iterations, 200);
        assert_eq!(planner.tree().size(), 1);
    }

    #[test]
    fn last_candidate_accepts_rejected_candidates() {
        let mut planner = wall_in_front_of_goal(GoalCheck::LastCandidate);
        let res = planner.plan();

        assert_eq!(res.iterations, 1);
        assert_eq!(res.result.unwrap().waypoints, vec![point2(0.0, 0.0), point2(30.0, 0.0)]);
    }
}
