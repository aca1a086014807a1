//! RRT (Rapidly-exploring Random Tree) path planning algorithm
//!
//! Sampling-based path planning algorithm that builds a tree by
//! randomly sampling the workspace and extending the nearest node one
//! fixed step towards each sample.

use log::{debug, info, trace};

use crate::common::{AreaBounds, Path2D, Point2D, RectObstacle, RrtResult, SamplingBasedPlanner};
use crate::geometry::{steer, CollisionCheck};
use crate::path_planning::sampling::WorkspaceSampler;
use crate::path_planning::tree::{PathCache, Tree};
use crate::path_planning::validate_inputs;

/// Configuration for RRT planner
#[derive(Debug, Clone)]
pub struct RRTConfig {
    /// Extension length per iteration; also the goal tolerance
    pub step_size: f64,
    /// Maximum iterations
    pub max_iterations: usize,
    /// Sampling area
    pub bounds: AreaBounds,
    /// Random seed (None for random)
    pub seed: Option<u64>,
}

impl Default for RRTConfig {
    fn default() -> Self {
        Self {
            step_size: 20.0,
            max_iterations: 100_000,
            bounds: AreaBounds::default(),
            seed: None,
        }
    }
}

/// RRT path planner
pub struct RRTPlanner {
    config: RRTConfig,
    start: Point2D,
    goal: Point2D,
    obstacles: Vec<RectObstacle>,
    tree: Tree,
    sampler: WorkspaceSampler,
    goal_node: Option<usize>,
    iterations: usize,
    path_cache: PathCache,
}

impl RRTPlanner {
    /// Create a new RRT planner
    pub fn new(
        start: Point2D,
        goal: Point2D,
        obstacles: Vec<RectObstacle>,
        config: RRTConfig,
    ) -> RrtResult<Self> {
        validate_inputs("RRT", start, goal, &obstacles, config.step_size, config.max_iterations, &config.bounds)?;
        let sampler = WorkspaceSampler::new(config.bounds, config.seed);
        Ok(RRTPlanner {
            config,
            start,
            goal,
            obstacles,
            tree: Tree::new(start),
            sampler,
            goal_node: None,
            iterations: 0,
            path_cache: PathCache::new(),
        })
    }

    /// Create with default configuration and the given step size
    pub fn with_step_size(
        start: Point2D,
        goal: Point2D,
        obstacles: Vec<RectObstacle>,
        step_size: f64,
    ) -> RrtResult<Self> {
        Self::new(start, goal, obstacles, RRTConfig { step_size, ..Default::default() })
    }

    pub fn config(&self) -> &RRTConfig {
        &self.config
    }

    /// Get the tree built during planning
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn goal_node(&self) -> Option<usize> {
        self.goal_node
    }

    pub fn obstacles(&self) -> &[RectObstacle] {
        &self.obstacles
    }

    fn reset(&mut self) {
        self.tree.reset();
        self.sampler.reset();
        self.goal_node = None;
        self.iterations = 0;
        self.path_cache.invalidate();
    }

    /// One greedy extension towards a random sample
    fn extend(&mut self) -> Option<usize> {
        let sample = self.sampler.sample();
        let nearest = self.tree.nearest(sample);
        let from = self.tree.node(nearest).position;

        let new_point = steer(from, sample, self.config.step_size)?;
        if !CollisionCheck::BoundingBox.is_free(from, new_point, &self.obstacles) {
            trace!("[RRT] blocked extension ({:.1},{:.1}) -> ({:.1},{:.1})", from.x, from.y, new_point.x, new_point.y);
            return None;
        }
        Some(self.tree.add_node(new_point, nearest))
    }

    fn generate_final_course(&self) -> Path2D {
        match self.goal_node {
            Some(index) => Path2D::from_points(self.tree.path_from_root(index)),
            None => Path2D::new(),
        }
    }
}

impl SamplingBasedPlanner for RRTPlanner {
    fn name(&self) -> &'static str {
        "RRT"
    }

    fn run(&mut self) -> bool {
        self.reset();

        if self.start.distance(&self.goal) < self.config.step_size {
            self.goal_node = Some(0);
            return true;
        }

        for iteration in 1..=self.config.max_iterations {
            self.iterations = iteration;

            if let Some(index) = self.extend() {
                if self.tree.node(index).position.distance(&self.goal) < self.config.step_size {
                    self.goal_node = Some(index);
                    info!(
                        "[RRT] goal reached after {} iterations, {} nodes, distance {:.2}",
                        iteration,
                        self.tree.len(),
                        self.path_distance()
                    );
                    return true;
                }
            }
        }

        debug!("[RRT] FAILED: no path within {} iterations", self.config.max_iterations);
        false
    }

    fn path(&self) -> &Path2D {
        &self.path_cache.get_or_compute(|| self.generate_final_course()).path
    }

    fn path_distance(&self) -> f64 {
        self.path_cache.get_or_compute(|| self.generate_final_course()).distance
    }

    fn tree_edges(&self) -> Vec<(Point2D, Point2D)> {
        self.tree.edges().collect()
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{PathPlanner, RrtError};
    use crate::geometry::bounding_box_blocked;

    fn open_planner(seed: u64) -> RRTPlanner {
        let config = RRTConfig {
            seed: Some(seed),
            ..Default::default()
        };
        RRTPlanner::new(Point2D::new(10.0, 10.0), Point2D::new(790.0, 590.0), Vec::new(), config).unwrap()
    }

    #[test]
    fn test_rrt_config_default() {
        let config = RRTConfig::default();
        assert_eq!(config.step_size, 20.0);
        assert_eq!(config.max_iterations, 100_000);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_rrt_rejects_bad_step() {
        let result = RRTPlanner::with_step_size(Point2D::origin(), Point2D::new(1.0, 1.0), Vec::new(), -1.0);
        assert!(matches!(result, Err(RrtError::InvalidParameter(_))));
    }

    #[test]
    fn test_rrt_rejects_overflowing_bounds() {
        let config = RRTConfig {
            bounds: AreaBounds::new(-1e308, 1e308, 0.0, 600.0),
            seed: Some(1),
            ..Default::default()
        };
        let result = RRTPlanner::new(Point2D::new(10.0, 10.0), Point2D::new(790.0, 590.0), Vec::new(), config);
        assert!(matches!(result, Err(RrtError::InvalidParameter(_))));
    }

    #[test]
    fn test_rrt_obstacle_free() {
        let mut planner = open_planner(1);
        assert!(planner.run());
        assert!(planner.iterations() <= planner.config().max_iterations);

        let path = planner.path().clone();
        let step = planner.config().step_size;
        assert_eq!(path.first(), Some(&Point2D::new(10.0, 10.0)));
        assert!(path.last().unwrap().distance(&Point2D::new(790.0, 590.0)) < step);

        let straight = Point2D::new(10.0, 10.0).distance(&Point2D::new(790.0, 590.0));
        assert!(planner.path_distance() >= straight - step);
        assert!(planner.path_distance() <= 1.5 * straight);
        assert!((planner.path_distance() - path.total_length()).abs() < 1e-9);
    }

    #[test]
    fn test_rrt_path_is_cached() {
        let mut planner = open_planner(5);
        assert!(planner.run());
        let first = planner.path().clone();
        let d1 = planner.path_distance();
        assert_eq!(planner.path(), &first);
        assert_eq!(planner.path_distance(), d1);
    }

    #[test]
    fn test_rrt_no_path_before_run() {
        let planner = open_planner(2);
        assert!(planner.path().is_empty());
        assert_eq!(planner.path_distance(), 0.0);
        assert!(planner.tree_edges().is_empty());
    }

    #[test]
    fn test_rrt_path_avoids_obstacles() {
        let obstacles = vec![
            RectObstacle::new(300.0, 0.0, 40.0, 400.0),
            RectObstacle::new(500.0, 200.0, 40.0, 400.0),
        ];
        let config = RRTConfig { seed: Some(11), ..Default::default() };
        let mut planner =
            RRTPlanner::new(Point2D::new(50.0, 50.0), Point2D::new(750.0, 550.0), obstacles.clone(), config).unwrap();

        assert!(planner.run());
        for (a, b) in planner.path().segments() {
            assert!(!bounding_box_blocked(a, b, &obstacles));
        }
        for (a, b) in planner.tree_edges() {
            assert!(!bounding_box_blocked(a, b, &obstacles));
            assert!((a.distance(&b) - 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rrt_enclosed_goal_hits_cap() {
        let obstacles = vec![RectObstacle::new(700.0, 500.0, 100.0, 100.0)];
        let config = RRTConfig {
            max_iterations: 2_000,
            seed: Some(3),
            ..Default::default()
        };
        let mut planner =
            RRTPlanner::new(Point2D::new(10.0, 10.0), Point2D::new(760.0, 560.0), obstacles, config).unwrap();

        assert!(!planner.run());
        assert_eq!(planner.iterations(), 2_000);
        assert!(planner.path().is_empty());
        assert_eq!(planner.path_distance(), 0.0);
        assert!(matches!(planner.plan(), Err(RrtError::PlanningError(_))));
    }

    #[test]
    fn test_rrt_rerun_is_reproducible_with_seed() {
        let mut planner = open_planner(9);
        assert!(planner.run());
        let first = planner.path().clone();
        assert!(planner.run());
        assert_eq!(planner.path(), &first);
    }

    #[test]
    fn test_rrt_start_near_goal() {
        let mut planner =
            RRTPlanner::with_step_size(Point2D::new(10.0, 10.0), Point2D::new(15.0, 10.0), Vec::new(), 20.0).unwrap();
        assert!(planner.run());
        assert_eq!(planner.path().len(), 1);
        assert_eq!(planner.path_distance(), 0.0);
    }
}
