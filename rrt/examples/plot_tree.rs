use plotters::prelude::*;
use nalgebra as na;

use rrt::{obstacle as obs, ObstacleMap, RRTBuilder, RRTConfig};

fn point2(x: f32, y: f32) -> na::Point2<f32> {
    na::Point2::new(x, y)
}

fn vec2(x: f32, y: f32) -> na::Vector2<f32> {
    na::Vector2::from([x, y])
}

fn to_px(p: &na::Point2<f32>) -> (i32, i32) {
    (p.x as i32, p.y as i32)
}

/// Renders one planning attempt to `rrt_tree.png`. Pass `mask` to plan against the rasterized
/// obstacles instead of the rectangles, and a number to pick the seed.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let use_mask = args.iter().any(|a| a == "mask");
    let seed = args.iter().find_map(|a| a.parse().ok()).unwrap_or(42);

    let rects = vec![
        obs::Rectangle::new(point2(150.0, 0.0), vec2(60.0, 420.0)),
        obs::Rectangle::new(point2(380.0, 180.0), vec2(60.0, 420.0)),
        obs::Rectangle::from_corners(point2(600.0, 80.0), point2(540.0, 380.0)),
    ];

    let obstacles = if use_mask {
        let mut mask = obs::OccupancyMask::new(RRTConfig::DEFAULT_WIDTH as usize, RRTConfig::DEFAULT_HEIGHT as usize);
        for rect in &rects {
            mask.fill_rect(rect);
        }
        ObstacleMap::Mask(mask)
    } else {
        ObstacleMap::Rectangles(rects.into_iter().collect())
    };

    let start = point2(40.0, 40.0);
    let goal = point2(740.0, 540.0);

    let mut planner = RRTBuilder::new(start, goal)
        .with_obstacles(obstacles)
        .with_seed(seed)
        .build()?;

    let res = planner.plan();
    eprintln!("Used {} points in {} iterations", res.n_points, res.iterations);

    let root = BitMapBackend::new("rrt_tree.png", (800, 600)).into_drawing_area();
    root.fill(&BLACK)?;

    match planner.oracle() {
        ObstacleMap::Rectangles(rects) => {
            for rect in rects.rects() {
                root.draw(&Rectangle::new(
                    [to_px(&rect.corner), to_px(&rect.max_corner())],
                    ShapeStyle::from(&BLUE).filled(),
                ))?;
            }
        }
        ObstacleMap::Mask(mask) => {
            for y in 0..mask.height() {
                for x in 0..mask.width() {
                    if mask.is_blocked(x as i64, y as i64) {
                        root.draw_pixel((x as i32, y as i32), &BLUE)?;
                    }
                }
            }
        }
    }

    for (parent, child) in planner.tree().edges() {
        root.draw(&PathElement::new(
            vec![to_px(&parent), to_px(&child)],
            ShapeStyle::from(&WHITE).stroke_width(2),
        ))?;
    }

    for node in planner.tree() {
        root.draw(&Circle::new(
            to_px(&node.point()),
            3,
            ShapeStyle::from(&YELLOW).filled(),
        ))?;
    }

    root.draw(&Circle::new(to_px(&start), 10, ShapeStyle::from(&RED).filled()))?;
    root.draw(&Circle::new(to_px(&goal), 10, ShapeStyle::from(&GREEN).filled()))?;

    let path = match res.result {
        Some(path) => path,
        None => {
            eprintln!("No solution was found!");
            root.present()?;
            return Ok(());
        }
    };

    println!("Path with {} waypoints, length {:.1}", path.len(), path.length());

    let series: Vec<_> = path.waypoints.iter().map(to_px).collect();

    root.draw(&PathElement::new(
        series,
        ShapeStyle::from(&BLUE).stroke_width(3),
    ))?;

    root.present()?;

    Ok(())
}
