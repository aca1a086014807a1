//! RRT* path planning
//!
//! RRT with cost bookkeeping: every inserted node is attached to the
//! cheapest collision-free neighbour inside `radius`. Only the new node is
//! reparented; existing neighbours keep their parents.

use log::{debug, info};

use crate::common::{AreaBounds, Path2D, Point2D, RectObstacle, RrtError, RrtResult, SamplingBasedPlanner};
use crate::geometry::{steer, CollisionCheck};
use crate::path_planning::sampling::WorkspaceSampler;
use crate::path_planning::tree::{PathCache, Tree};
use crate::path_planning::validate_inputs;

#[derive(Debug, Clone)]
pub struct RRTStarConfig {
    pub step_size: f64,
    /// Neighbourhood searched for a cheaper parent
    pub radius: f64,
    pub max_iterations: usize,
    pub bounds: AreaBounds,
    pub seed: Option<u64>,
}

impl Default for RRTStarConfig {
    fn default() -> Self {
        Self {
            step_size: 10.0,
            radius: 50.0,
            max_iterations: 100_000,
            bounds: AreaBounds::default(),
            seed: None,
        }
    }
}

pub struct RRTStar {
    config: RRTStarConfig,
    start: Point2D,
    goal: Point2D,
    obstacles: Vec<RectObstacle>,
    tree: Tree,
    sampler: WorkspaceSampler,
    goal_node: Option<usize>,
    iterations: usize,
    rewires: usize,
    path_cache: PathCache,
}

impl RRTStar {
    pub fn new(
        start: Point2D,
        goal: Point2D,
        obstacles: Vec<RectObstacle>,
        config: RRTStarConfig,
    ) -> RrtResult<Self> {
        validate_inputs("RRT*", start, goal, &obstacles, config.step_size, config.max_iterations, &config.bounds)?;
        if !(config.radius.is_finite() && config.radius >= 0.0) {
            return Err(RrtError::InvalidParameter(format!(
                "RRT*: radius must be non-negative and finite, got {}",
                config.radius
            )));
        }
        let sampler = WorkspaceSampler::new(config.bounds, config.seed);
        Ok(RRTStar {
            config,
            start,
            goal,
            obstacles,
            tree: Tree::new(start),
            sampler,
            goal_node: None,
            iterations: 0,
            rewires: 0,
            path_cache: PathCache::new(),
        })
    }

    pub fn config(&self) -> &RRTStarConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn goal_node(&self) -> Option<usize> {
        self.goal_node
    }

    /// Number of times a new node switched to a cheaper parent in the last run
    pub fn rewire_count(&self) -> usize {
        self.rewires
    }

    fn reset(&mut self) {
        self.tree.reset();
        self.sampler.reset();
        self.goal_node = None;
        self.iterations = 0;
        self.rewires = 0;
        self.path_cache.invalidate();
    }

    fn is_free(&self, from: Point2D, to: Point2D) -> bool {
        CollisionCheck::BoundingBox.is_free(from, to, &self.obstacles)
    }

    fn extend(&mut self) -> Option<usize> {
        let sample = self.sampler.sample();
        let nearest = self.tree.nearest(sample);
        let from = self.tree.node(nearest).clone();

        let new_point = steer(from.position, sample, self.config.step_size)?;
        if !self.is_free(from.position, new_point) {
            return None;
        }
        let cost = from.cost + from.position.distance(&new_point);
        let index = self.tree.add_node_with_cost(new_point, nearest, cost);
        self.choose_parent(index);
        Some(index)
    }

    /// Reparent `index` to the cheapest reachable node within `radius`
    fn choose_parent(&mut self, index: usize) {
        let position = self.tree.node(index).position;
        for near in self.tree.near(position, self.config.radius) {
            if near == index {
                continue;
            }
            let candidate = self.tree.node(near);
            let cost = candidate.cost + candidate.position.distance(&position);
            if cost < self.tree.node(index).cost && self.is_free(candidate.position, position) {
                self.tree.reparent(index, near, cost);
                self.rewires += 1;
            }
        }
    }

    fn generate_final_course(&self) -> Path2D {
        match self.goal_node {
            Some(index) => Path2D::from_points(self.tree.path_from_root(index)),
            None => Path2D::new(),
        }
    }
}

impl SamplingBasedPlanner for RRTStar {
    fn name(&self) -> &'static str {
        "RRT*"
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
                        "[RRT*] goal reached after {} iterations, {} nodes, {} rewires, cost {:.2}",
                        iteration,
                        self.tree.len(),
                        self.rewires,
                        self.tree.node(index).cost
                    );
                    return true;
                }
            }
        }

        debug!("[RRT*] FAILED: no path within {} iterations", self.config.max_iterations);
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
