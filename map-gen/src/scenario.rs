//! Planning scenarios described in YAML.
//!
//! ```yaml
//! name: two walls
//! start: [50, 50]
//! goal: [750, 550]
//! planner:
//!   step_size: 20
//!   goal_tolerance: 30
//!   seed: 7
//! obstacles:
//!   kind: rectangles
//!   rects:
//!     - { x: 250, y: 0, width: 40, height: 400 }
//! ```
//!
//! Obstacles can also be given as a `grid` of `#`/`.` rows or as an `image` whose marker-coloured
//! pixels are blocked. Image paths are resolved relative to the scenario file.

use std::path::{Path, PathBuf};

use image::Rgb;
use log::info;
use nalgebra as na;
use serde::{Deserialize, Serialize};

use rrt::{ObstacleMap, RRTBuilder, RRTConfig, RRTPlanner, Rectangle, RectangleSet};

use crate::error::Result;
use crate::mask::{load_mask_image, parse_grid, DEFAULT_MARKER};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,

    pub start: [f32; 2],

    pub goal: [f32; 2],

    /// Planner parameters; missing fields keep their defaults.
    #[serde(default)]
    pub planner: RRTConfig,

    #[serde(default)]
    pub obstacles: ObstacleSource,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<RectSpec> for Rectangle {
    fn from(spec: RectSpec) -> Rectangle {
        let corner = na::Point2::new(spec.x, spec.y);
        Rectangle::from_corners(corner, corner + na::Vector2::new(spec.width, spec.height))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstacleSource {
    Rectangles {
        #[serde(default)]
        rects: Vec<RectSpec>,
    },
    Grid {
        rows: Vec<String>,
    },
    Image {
        path: PathBuf,
        #[serde(default = "default_marker")]
        marker: [u8; 3],
    },
}

impl Default for ObstacleSource {
    fn default() -> Self {
        ObstacleSource::Rectangles { rects: Vec::new() }
    }
}

fn default_marker() -> [u8; 3] {
    DEFAULT_MARKER.0
}

impl ObstacleSource {
    /// Builds the obstacle representation the planner checks edges against.
    pub fn build(&self) -> Result<ObstacleMap> {
        match self {
            ObstacleSource::Rectangles { rects } => Ok(ObstacleMap::Rectangles(
                rects.iter().copied().map(Rectangle::from).collect::<RectangleSet>(),
            )),
            ObstacleSource::Grid { rows } => Ok(ObstacleMap::Mask(parse_grid(rows)?)),
            ObstacleSource::Image { path, marker } => Ok(ObstacleMap::Mask(load_mask_image(path, Rgb(*marker))?)),
        }
    }
}

impl Scenario {
    pub fn from_yaml(s: &str) -> Result<Scenario> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reads a scenario file, resolving a relative image path against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Scenario> {
        let path = path.as_ref();
        let mut scenario = Scenario::from_yaml(&std::fs::read_to_string(path)?)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        if let ObstacleSource::Image { path: image_path, .. } = &mut scenario.obstacles {
            if image_path.is_relative() {
                *image_path = base_dir.join(&*image_path);
            }
        }

        info!("loaded scenario {:?} from {}", scenario.name, path.display());
        Ok(scenario)
    }

    pub fn start(&self) -> na::Point2<f32> {
        na::Point2::from(self.start)
    }

    pub fn goal(&self) -> na::Point2<f32> {
        na::Point2::from(self.goal)
    }

    pub fn into_planner(self) -> Result<RRTPlanner<ObstacleMap>> {
        let obstacles = self.obstacles.build()?;
        let planner = RRTBuilder::new(self.start(), self.goal())
            .with_config(self.planner)
            .with_obstacles(obstacles)
            .build()?;
        Ok(planner)
    }
}
