//! RRT-Connect path planning
//!
//! Two trees, rooted at the start and at the goal, take turns: the active
//! tree extends one step towards a random sample, then the other tree greedily
//! steps towards the new node until it reaches it or is blocked.

use log::{debug, info, trace};

use crate::common::{AreaBounds, Path2D, Point2D, RectObstacle, RrtResult, SamplingBasedPlanner};
use crate::geometry::{steer, CollisionCheck, MIN_STEER_LENGTH};
use crate::path_planning::sampling::WorkspaceSampler;
use crate::path_planning::tree::{PathCache, Tree};
use crate::path_planning::validate_inputs;

const START_TREE: usize = 0;
const GOAL_TREE: usize = 1;

#[derive(Debug, Clone)]
pub struct RRTConnectConfig {
    pub step_size: f64,
    pub max_iterations: usize,
    pub bounds: AreaBounds,
    pub seed: Option<u64>,
}

impl Default for RRTConnectConfig {
    fn default() -> Self {
        Self {
            step_size: 10.0,
            max_iterations: 100_000,
            bounds: AreaBounds::default(),
            seed: None,
        }
    }
}

/// Indices of the meeting nodes in the start tree and the goal tree.
/// Both nodes sit at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bridge {
    pub start_node: usize,
    pub goal_node: usize,
}

pub struct RRTConnect {
    config: RRTConnectConfig,
    start: Point2D,
    goal: Point2D,
    obstacles: Vec<RectObstacle>,
    trees: [Tree; 2],
    sampler: WorkspaceSampler,
    bridge: Option<Bridge>,
    iterations: usize,
    path_cache: PathCache,
}

impl RRTConnect {
    pub fn new(
        start: Point2D,
        goal: Point2D,
        obstacles: Vec<RectObstacle>,
        config: RRTConnectConfig,
    ) -> RrtResult<Self> {
        validate_inputs("RRT-Connect", start, goal, &obstacles, config.step_size, config.max_iterations, &config.bounds)?;
        let sampler = WorkspaceSampler::new(config.bounds, config.seed);
        Ok(RRTConnect {
            config,
            start,
            goal,
            obstacles,
            trees: [Tree::new(start), Tree::new(goal)],
            sampler,
            bridge: None,
            iterations: 0,
            path_cache: PathCache::new(),
        })
    }

    pub fn config(&self) -> &RRTConnectConfig {
        &self.config
    }

    pub fn start_tree(&self) -> &Tree {
        &self.trees[START_TREE]
    }

    pub fn goal_tree(&self) -> &Tree {
        &self.trees[GOAL_TREE]
    }

    pub fn bridge(&self) -> Option<Bridge> {
        self.bridge
    }

    fn reset(&mut self) {
        for tree in self.trees.iter_mut() {
            tree.reset();
        }
        self.sampler.reset();
        self.bridge = None;
        self.iterations = 0;
        self.path_cache.invalidate();
    }

    fn is_free(&self, from: Point2D, to: Point2D) -> bool {
        CollisionCheck::BoundingBox.is_free(from, to, &self.obstacles)
    }

    /// One step of tree `t` towards `sample`
    fn extend(&mut self, t: usize, sample: Point2D) -> Option<usize> {
        let nearest = self.trees[t].nearest(sample);
        let from = self.trees[t].node(nearest).position;
        let new_point = steer(from, sample, self.config.step_size)?;
        if !self.is_free(from, new_point) {
            return None;
        }
        Some(self.trees[t].add_node(new_point, nearest))
    }

    /// Step tree `t` towards `target` until it lands on it (returns the node
    /// at `target`) or a step is blocked. Nodes added before a block stay.
    fn connect(&mut self, t: usize, target: Point2D) -> Option<usize> {
        let step = self.config.step_size;
        loop {
            let nearest = self.trees[t].nearest(target);
            let from = self.trees[t].node(nearest).position;
            let remaining = from.distance(&target);
            if remaining < MIN_STEER_LENGTH {
                return Some(nearest);
            }

            let new_point = if remaining <= step {
                target
            } else {
                steer(from, target, step)?
            };
            if !self.is_free(from, new_point) {
                trace!("[RRT-Connect] connect blocked at ({:.1},{:.1})", from.x, from.y);
                return None;
            }

            let index = self.trees[t].add_node(new_point, nearest);
            if new_point == target {
                return Some(index);
            }
        }
    }

    /// start root -> start bridge, then goal bridge's parent -> goal root
    fn generate_final_course(&self) -> Path2D {
        let bridge = match self.bridge {
            Some(bridge) => bridge,
            None => return Path2D::new(),
        };

        let mut points = self.trees[START_TREE].path_from_root(bridge.start_node);
        if let Some(parent) = self.trees[GOAL_TREE].node(bridge.goal_node).parent {
            points.extend(self.trees[GOAL_TREE].path_to_root(parent));
        }
        Path2D::from_points(points)
    }
}

impl SamplingBasedPlanner for RRTConnect {
    fn name(&self) -> &'static str {
        "RRT-Connect"
    }

    fn run(&mut self) -> bool {
        self.reset();

        let mut active = START_TREE;
        for iteration in 1..=self.config.max_iterations {
            self.iterations = iteration;
            let other = 1 - active;

            let sample = self.sampler.sample();
            if let Some(new_node) = self.extend(active, sample) {
                let target = self.trees[active].node(new_node).position;
                if let Some(reached) = self.connect(other, target) {
                    self.bridge = Some(if active == START_TREE {
                        Bridge { start_node: new_node, goal_node: reached }
                    } else {
                        Bridge { start_node: reached, goal_node: new_node }
                    });
                    info!(
                        "[RRT-Connect] trees met after {} iterations ({} + {} nodes), distance {:.2}",
                        iteration,
                        self.trees[START_TREE].len(),
                        self.trees[GOAL_TREE].len(),
                        self.path_distance()
                    );
                    return true;
                }
            }

            active = other;
        }

        debug!("[RRT-Connect] FAILED: trees did not meet within {} iterations", self.config.max_iterations);
        false
    }

    fn path(&self) -> &Path2D {
        &self.path_cache.get_or_compute(|| self.generate_final_course()).path
    }

    fn path_distance(&self) -> f64 {
        self.path_cache.get_or_compute(|| self.generate_final_course()).distance
    }

    fn tree_edges(&self) -> Vec<(Point2D, Point2D)> {
        self.trees.iter().flat_map(|tree| tree.edges()).collect()
    }

    fn iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounding_box_blocked;

    fn maze() -> Vec<RectObstacle> {
        vec![
            RectObstacle::new(200.0, 0.0, 40.0, 450.0),
            RectObstacle::new(450.0, 150.0, 40.0, 450.0),
        ]
    }

    fn planner(seed: u64, obstacles: Vec<RectObstacle>) -> RRTConnect {
        let config = RRTConnectConfig { seed: Some(seed), ..Default::default() };
        RRTConnect::new(Point2D::new(50.0, 50.0), Point2D::new(750.0, 550.0), obstacles, config).unwrap()
    }

    #[test]
    fn test_rrt_connect_path_runs_start_to_goal() {
        let obstacles = maze();
        let mut planner = planner(21, obstacles.clone());
        assert!(planner.run());

        let path = planner.path();
        assert_eq!(path.first(), Some(&Point2D::new(50.0, 50.0)));
        assert_eq!(path.last(), Some(&Point2D::new(750.0, 550.0)));
        for (a, b) in path.segments() {
            assert!(!bounding_box_blocked(a, b, &obstacles));
            assert!(a.distance(&b) <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_rrt_connect_bridge_appears_once() {
        let mut planner = planner(22, maze());
        assert!(planner.run());

        let bridge = planner.bridge().unwrap();
        let start_side = planner.start_tree().node(bridge.start_node).position;
        let goal_side = planner.goal_tree().node(bridge.goal_node).position;
        assert_eq!(start_side, goal_side);

        let path = planner.path();
        assert_eq!(path.points.iter().filter(|&&p| p == start_side).count(), 1);
        // no duplicated waypoint anywhere along the seam
        for (a, b) in path.segments() {
            assert_ne!(a, b);
        }

        let expected_len = planner.start_tree().branch(bridge.start_node).count()
            + planner.goal_tree().branch(bridge.goal_node).count()
            - 1;
        assert_eq!(path.len(), expected_len);
    }

    #[test]
    fn test_rrt_connect_open_space_direct() {
        let mut planner = planner(23, Vec::new());
        assert!(planner.run());
        // the first successful extension lets the goal tree connect straight through
        assert!(planner.iterations() <= 2);
        let straight = Point2D::new(50.0, 50.0).distance(&Point2D::new(750.0, 550.0));
        assert!(planner.path_distance() <= 1.1 * straight);
    }

    #[test]
    fn test_rrt_connect_enclosed_goal_hits_cap() {
        let obstacles = vec![RectObstacle::new(700.0, 500.0, 100.0, 100.0)];
        let config = RRTConnectConfig {
            max_iterations: 1_000,
            seed: Some(24),
            ..Default::default()
        };
        let mut planner =
            RRTConnect::new(Point2D::new(10.0, 10.0), Point2D::new(750.0, 550.0), obstacles, config).unwrap();
        assert!(!planner.run());
        assert_eq!(planner.iterations(), 1_000);
        assert!(planner.bridge().is_none());
        assert!(planner.path().is_empty());
        assert_eq!(planner.path_distance(), 0.0);
    }

    #[test]
    fn test_rrt_connect_trees_are_acyclic() {
        let mut planner = planner(25, maze());
        planner.run();
        for tree in [planner.start_tree(), planner.goal_tree()] {
            for i in 0..tree.len() {
                assert_eq!(tree.branch(i).last(), Some(0));
            }
        }
        assert_eq!(
            planner.tree_edges().len(),
            planner.start_tree().len() + planner.goal_tree().len() - 2
        );
    }

    #[test]
    fn test_rrt_connect_path_idempotent() {
        let mut planner = planner(26, maze());
        assert!(planner.run());
        let first = planner.path().clone();
        let d = planner.path_distance();
        assert_eq!(planner.path(), &first);
        assert_eq!(planner.path_distance(), d);
    }
}
