//! Common traits defining interfaces for the tree planners

use crate::common::types::*;
use crate::common::error::{RrtError, RrtResult};

/// Trait for path planning algorithms that own their start, goal and obstacles
pub trait PathPlanner {
    /// Plan a path from the configured start to the configured goal
    fn plan(&mut self) -> RrtResult<Path2D>;
}

/// Trait for sampling-based tree planners (RRT, RRT*, RRT-Connect, ...)
pub trait SamplingBasedPlanner {
    /// Short display name of the variant
    fn name(&self) -> &'static str;

    /// Grow the tree(s) until the goal is reached or the iteration cap runs out.
    /// Calling it again starts over from an empty tree.
    fn run(&mut self) -> bool;

    /// Waypoints from start to goal; empty until a goal node is recorded
    fn path(&self) -> &Path2D;

    /// Total Euclidean length of `path()`, zero if there is no path
    fn path_distance(&self) -> f64;

    /// Parent-child segments of every tree, for drawing
    fn tree_edges(&self) -> Vec<(Point2D, Point2D)>;

    /// Loop iterations spent by the last `run()`
    fn iterations(&self) -> usize;
}

impl<T: SamplingBasedPlanner> PathPlanner for T {
    fn plan(&mut self) -> RrtResult<Path2D> {
        if self.run() {
            Ok(self.path().clone())
        } else {
            Err(RrtError::PlanningError(format!(
                "{}: Cannot find path within {} iterations",
                self.name(),
                self.iterations()
            )))
        }
    }
}
