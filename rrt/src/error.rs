use thiserror::Error;

/// Rejected planner parameters, reported by [`RRTBuilder::build`](crate::RRTBuilder::build).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("step size must be a positive finite number, but was {0}")]
    InvalidStepSize(f32),

    #[error("goal tolerance must be a positive finite number, but was {0}")]
    InvalidGoalTolerance(f32),

    #[error("the iteration budget must allow at least one iteration")]
    NoIterations,

    #[error("random range {start:?}..{end:?} is empty or not finite")]
    InvalidRandomRange { start: [f32; 2], end: [f32; 2] },

    #[error("{which} point ({x}, {y}) is not finite")]
    NonFinitePoint { which: &'static str, x: f32, y: f32 },
}

/// A node sequence that does not describe a single rooted tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("a tree needs at least a root node")]
    Empty,

    #[error("node 0 must be the root, but it is connected to {0}")]
    RootHasParent(usize),

    #[error("node {0} has no parent but is not the root")]
    Detached(usize),

    #[error("node {index} is connected to {parent}, which was not added before it")]
    ForwardParent { index: usize, parent: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    #[error("a {width}x{height} mask needs {expected} cells, but {actual} were given")]
    SizeMismatch { width: usize, height: usize, expected: usize, actual: usize },
}
