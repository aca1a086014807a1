//! rrt_planning - sampling-based tree planners in a 2D workspace
//!
//! This crate provides RRT, RRT*, RRT-Connect and a goal-biased RRT variant
//! that grow collision-free paths between a start and a goal point among
//! axis-aligned rectangular obstacles.

// Core modules
pub mod common;
pub mod geometry;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Point2D, Path2D, RectObstacle, AreaBounds};
pub use common::{PathPlanner, SamplingBasedPlanner};
pub use common::{RrtError, RrtResult};
pub use path_planning::{RRTPlanner, RRTStar, RRTConnect, RRTOptimized};
