//! Sampling-based tree planners

pub mod tree;
pub mod sampling;
pub mod rrt;
pub mod rrt_star;
pub mod rrt_connect;
pub mod rrt_optimized;

pub use tree::*;
pub use sampling::*;
pub use rrt::*;
pub use rrt_star::*;
pub use rrt_connect::*;
pub use rrt_optimized::*;

use crate::common::{AreaBounds, Point2D, RectObstacle, RrtError, RrtResult};

/// Workspace checks shared by every planner constructor
pub(crate) fn validate_inputs(
    planner: &str,
    start: Point2D,
    goal: Point2D,
    obstacles: &[RectObstacle],
    step_size: f64,
    max_iterations: usize,
    bounds: &AreaBounds,
) -> RrtResult<()> {
    let invalid = |msg: String| Err(RrtError::InvalidParameter(format!("{}: {}", planner, msg)));

    if !(step_size.is_finite() && step_size > 0.0) {
        return invalid(format!("step_size must be positive and finite, got {}", step_size));
    }
    if max_iterations == 0 {
        return invalid("max_iterations must be at least 1".to_string());
    }
    if !bounds.is_valid() {
        return invalid(format!("workspace bounds are empty or not finite: {:?}", bounds));
    }
    if !start.is_finite() || !goal.is_finite() {
        return invalid(format!("start {:?} and goal {:?} must be finite", start, goal));
    }
    if let Some(obs) = obstacles.iter().find(|o| !o.is_valid()) {
        return invalid(format!("obstacle {:?} has a negative or non-finite extent", obs));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_inputs() {
        let start = Point2D::new(10.0, 10.0);
        let goal = Point2D::new(100.0, 100.0);
        let bounds = AreaBounds::default();

        assert!(validate_inputs("RRT", start, goal, &[], 20.0, 10, &bounds).is_ok());
        assert!(validate_inputs("RRT", start, goal, &[], 0.0, 10, &bounds).is_err());
        assert!(validate_inputs("RRT", start, goal, &[], f64::NAN, 10, &bounds).is_err());
        assert!(validate_inputs("RRT", start, goal, &[], 20.0, 0, &bounds).is_err());
        assert!(validate_inputs("RRT", Point2D::new(f64::INFINITY, 0.0), goal, &[], 20.0, 10, &bounds).is_err());

        let overflowing = AreaBounds::new(-1e308, 1e308, 0.0, 600.0);
        assert!(validate_inputs("RRT", start, goal, &[], 20.0, 10, &overflowing).is_err());

        let bad = [RectObstacle::new(0.0, 0.0, -1.0, 5.0)];
        match validate_inputs("RRT", start, goal, &bad, 20.0, 10, &bounds) {
            Err(RrtError::InvalidParameter(msg)) => assert!(msg.starts_with("RRT:")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
