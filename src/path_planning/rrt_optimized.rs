//! Goal-biased RRT with local retries
//!
//! Every iteration steers the node nearest to the goal straight at the goal.
//! When that step hits an obstacle, random integer points in a square window
//! around the contact point are tried instead, and the first one reachable
//! without a collision becomes the new node. Distances are compared squared;
//! square roots are only taken when the final path length is computed.

use log::{debug, info, trace};

use crate::common::{AreaBounds, Path2D, Point2D, RectObstacle, RrtResult, SamplingBasedPlanner};
use crate::geometry::{direction, exact_intersection};
use crate::path_planning::sampling::WorkspaceSampler;
use crate::path_planning::tree::{PathCache, Tree};
use crate::path_planning::validate_inputs;

#[derive(Debug, Clone)]
pub struct RRTOptimizedConfig {
    pub step_size: f64,
    pub max_iterations: usize,
    /// Random candidates tried around a collision before the iteration is skipped
    pub max_retries: usize,
    /// Normalise steering directions with the approximate reciprocal square root
    pub fast_normalize: bool,
    /// Retry candidates outside these bounds are rejected
    pub bounds: AreaBounds,
    pub seed: Option<u64>,
}

impl Default for RRTOptimizedConfig {
    fn default() -> Self {
        Self {
            step_size: 20.0,
            max_iterations: 100_000,
            max_retries: 1000,
            fast_normalize: true,
            bounds: AreaBounds::default(),
            seed: None,
        }
    }
}

/// Counters from the last run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryStats {
    /// Steps towards the goal that hit an obstacle
    pub collisions: usize,
    /// Collisions resolved by a retry candidate
    pub recovered: usize,
    /// Iterations skipped because every retry failed
    pub skipped: usize,
}

pub struct RRTOptimized {
    config: RRTOptimizedConfig,
    start: Point2D,
    goal: Point2D,
    obstacles: Vec<RectObstacle>,
    tree: Tree,
    sampler: WorkspaceSampler,
    goal_node: Option<usize>,
    iterations: usize,
    stats: RetryStats,
    path_cache: PathCache,
}

impl RRTOptimized {
    pub fn new(
        start: Point2D,
        goal: Point2D,
        obstacles: Vec<RectObstacle>,
        config: RRTOptimizedConfig,
    ) -> RrtResult<Self> {
        validate_inputs("RRT-Optimized", start, goal, &obstacles, config.step_size, config.max_iterations, &config.bounds)?;
        let sampler = WorkspaceSampler::new(config.bounds, config.seed);
        Ok(RRTOptimized {
            config,
            start,
            goal,
            obstacles,
            tree: Tree::new(start),
            sampler,
            goal_node: None,
            iterations: 0,
            stats: RetryStats::default(),
            path_cache: PathCache::new(),
        })
    }

    pub fn with_step_size(
        start: Point2D,
        goal: Point2D,
        obstacles: Vec<RectObstacle>,
        step_size: f64,
    ) -> RrtResult<Self> {
        Self::new(start, goal, obstacles, RRTOptimizedConfig { step_size, ..Default::default() })
    }

    pub fn config(&self) -> &RRTOptimizedConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn goal_node(&self) -> Option<usize> {
        self.goal_node
    }

    pub fn retry_stats(&self) -> RetryStats {
        self.stats
    }

    fn reset(&mut self) {
        self.tree.reset();
        self.sampler.reset();
        self.goal_node = None;
        self.iterations = 0;
        self.stats = RetryStats::default();
        self.path_cache.invalidate();
    }

    fn goal_reached(&self, p: &Point2D) -> bool {
        p.distance_squared(&self.goal) < self.config.step_size * self.config.step_size
    }

    /// First collision-free random candidate around `hit`, seen from `from`
    fn retry_around(&mut self, from: Point2D, hit: Point2D) -> Option<Point2D> {
        for _ in 0..self.config.max_retries {
            let candidate = self.sampler.sample_window(hit, self.config.step_size);
            if candidate == from || !self.config.bounds.contains(&candidate) {
                continue;
            }
            if exact_intersection(from, candidate, &self.obstacles).is_none() {
                return Some(candidate);
            }
        }
        None
    }

    /// Grow one node, or `None` if the step was blocked and no retry worked
    fn grow(&mut self) -> Option<usize> {
        let nearest = self.tree.nearest(self.goal);
        let from = self.tree.node(nearest).position;

        let dir = direction(from, self.goal, self.config.fast_normalize)?;
        let mut new_point = Point2D::from(from.to_vector() + dir * self.config.step_size);

        if let Some(hit) = exact_intersection(from, new_point, &self.obstacles) {
            self.stats.collisions += 1;
            match self.retry_around(from, hit) {
                Some(candidate) => {
                    self.stats.recovered += 1;
                    new_point = candidate;
                }
                None => {
                    self.stats.skipped += 1;
                    trace!("[RRT-Optimized] no free retry around ({:.1},{:.1})", hit.x, hit.y);
                    return None;
                }
            }
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

impl SamplingBasedPlanner for RRTOptimized {
    fn name(&self) -> &'static str {
        "RRT-Optimized"
    }

    fn run(&mut self) -> bool {
        self.reset();

        if self.goal_reached(&self.start) {
            self.goal_node = Some(0);
            return true;
        }

        for iteration in 1..=self.config.max_iterations {
            self.iterations = iteration;

            if let Some(index) = self.grow() {
                if self.goal_reached(&self.tree.node(index).position) {
                    self.goal_node = Some(index);
                    info!(
                        "[RRT-Optimized] goal reached after {} iterations, {} nodes, {} recovered collisions, distance {:.2}",
                        iteration,
                        self.tree.len(),
                        self.stats.recovered,
                        self.path_distance()
                    );
                    return true;
                }
            }
        }

        debug!(
            "[RRT-Optimized] FAILED: no path within {} iterations ({:?})",
            self.config.max_iterations, self.stats
        );
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
