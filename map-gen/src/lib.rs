//! Obstacle maps and planning scenarios for the `rrt` planner.
//!
//! Everything here is a plain function from some description of the workspace (a rectangle list,
//! a text grid, a painted image or a YAML scenario) to the immutable obstacle data the planner is
//! built with.

pub mod error;
pub mod mask;
pub mod rect;
pub mod scenario;

pub use error::{MapError, Result};
pub use mask::{load_mask_image, mask_from_image, mask_to_image, parse_grid, rasterize, save_mask_image};
pub use rect::{parse_rectangles, rect_from_drag, write_rectangles};
pub use scenario::{ObstacleSource, RectSpec, Scenario};
