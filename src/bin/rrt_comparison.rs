//! RRT family comparison
//!
//! Runs RRT, RRT*, RRT-Connect and RRT-Optimized on the same scene of square
//! obstacles and plots every resulting path.
//!
//! Usage: rrt_comparison [seed]

use log::warn;

use rrt_planning::common::{Point2D, RectObstacle, SamplingBasedPlanner};
use rrt_planning::path_planning::{
    RRTConfig, RRTConnect, RRTConnectConfig, RRTOptimized, RRTOptimizedConfig, RRTPlanner, RRTStar,
    RRTStarConfig,
};
use rrt_planning::utils::{colors, Visualizer};
use rrt_planning::RrtResult;

const OUTPUT_PATH: &str = "img/path_planning/rrt_comparison.png";

fn build_scene() -> Vec<RectObstacle> {
    let mut obstacles = Vec::new();

    // two staggered walls built from 20x20 squares
    for i in 0..20 {
        obstacles.push(RectObstacle::square_at(Point2D::new(250.0, 10.0 + 20.0 * i as f64), 20.0));
        obstacles.push(RectObstacle::square_at(Point2D::new(530.0, 590.0 - 20.0 * i as f64), 20.0));
    }
    // scattered blocks
    for &(x, y) in &[(120.0, 300.0), (380.0, 150.0), (400.0, 450.0), (680.0, 260.0)] {
        obstacles.push(RectObstacle::square_at(Point2D::new(x, y), 20.0));
    }
    obstacles
}

fn build_planners(
    start: Point2D,
    goal: Point2D,
    obstacles: &[RectObstacle],
    seed: Option<u64>,
) -> RrtResult<Vec<(Box<dyn SamplingBasedPlanner>, &'static str)>> {
    let rrt = RRTPlanner::new(start, goal, obstacles.to_vec(), RRTConfig { seed, ..Default::default() })?;
    let rrt_star = RRTStar::new(start, goal, obstacles.to_vec(), RRTStarConfig { seed, ..Default::default() })?;
    let rrt_connect = RRTConnect::new(start, goal, obstacles.to_vec(), RRTConnectConfig { seed, ..Default::default() })?;
    let rrt_optimized =
        RRTOptimized::new(start, goal, obstacles.to_vec(), RRTOptimizedConfig { seed, ..Default::default() })?;

    let planners: Vec<(Box<dyn SamplingBasedPlanner>, &'static str)> = vec![
        (Box::new(rrt) as Box<dyn SamplingBasedPlanner>, colors::RRT),
        (Box::new(rrt_star) as Box<dyn SamplingBasedPlanner>, colors::RRT_STAR),
        (Box::new(rrt_connect) as Box<dyn SamplingBasedPlanner>, colors::RRT_CONNECT),
        (Box::new(rrt_optimized) as Box<dyn SamplingBasedPlanner>, colors::RRT_OPTIMIZED),
    ];
    Ok(planners)
}

fn main() -> RrtResult<()> {
    env_logger::init();
    println!("RRT comparison start!!");

    let seed = std::env::args().nth(1).and_then(|s| s.parse::<u64>().ok());
    let start = Point2D::new(30.0, 30.0);
    let goal = Point2D::new(770.0, 570.0);
    let obstacles = build_scene();
    println!("Created {} obstacles", obstacles.len());

    let mut planners = build_planners(start, goal, &obstacles, seed)?;

    let mut vis = Visualizer::new();
    vis.set_title("RRT Family Comparison")
        .set_x_range(0.0, 800.0)
        .set_y_range(0.0, 600.0)
        .plot_obstacles(&obstacles);

    for (planner, color) in planners.iter_mut() {
        let color: &str = color;
        if planner.run() {
            println!(
                "{:<14} path found: {} waypoints, distance {:.2}, {} iterations",
                planner.name(),
                planner.path().len(),
                planner.path_distance(),
                planner.iterations()
            );
        } else {
            println!("{:<14} no path after {} iterations", planner.name(), planner.iterations());
        }
        // only the first planner's tree is drawn to keep the plot readable
        let with_tree = planner.name() == "RRT";
        vis.plot_planner(&**planner, color, with_tree);
    }

    vis.plot_start(start).plot_goal(goal);

    if let Some(dir) = std::path::Path::new(OUTPUT_PATH).parent() {
        std::fs::create_dir_all(dir)?;
    }
    match vis.save_png(OUTPUT_PATH, 800, 600) {
        Ok(()) => println!("Plot saved to: {}", OUTPUT_PATH),
        Err(e) => warn!("could not save plot: {}", e),
    }

    println!("RRT comparison finish!!");
    Ok(())
}
