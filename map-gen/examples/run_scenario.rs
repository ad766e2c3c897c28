use map_gen::Scenario;

/// Plans the scenario given on the command line, e.g.
/// `cargo run --example run_scenario -- map-gen/scenarios/two_walls.yaml`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: run_scenario <scenario.yaml>")?;

    let scenario = Scenario::load(&path)?;
    let name = scenario.name.clone();
    let mut planner = scenario.into_planner()?;

    let res = planner.plan();
    eprintln!("{}: used {} points in {} iterations", name, res.n_points, res.iterations);

    match res.result {
        Some(path) => {
            println!("Path with {} waypoints, length {:.1}", path.len(), path.length());
            for p in &path.waypoints {
                println!("{:.2},{:.2}", p.x, p.y);
            }
        }
        None => eprintln!("No solution was found!"),
    }

    Ok(())
}
