//! Error types for rrt_planning

use std::fmt;

/// Main error type for the planners and their plotting surface
#[derive(Debug)]
pub enum RrtError {
    /// No path was found within the iteration cap
    PlanningError(String),
    /// Invalid planner configuration or workspace input
    InvalidParameter(String),
    /// I/O error
    IoError(std::io::Error),
    /// Visualization error
    VisualizationError(String),
}

impl fmt::Display for RrtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RrtError::PlanningError(msg) => write!(f, "Planning error: {}", msg),
            RrtError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            RrtError::IoError(e) => write!(f, "I/O error: {}", e),
            RrtError::VisualizationError(msg) => write!(f, "Visualization error: {}", msg),
        }
    }
}

impl std::error::Error for RrtError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RrtError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RrtError {
    fn from(e: std::io::Error) -> Self {
        RrtError::IoError(e)
    }
}

/// Result type alias for planner operations
pub type RrtResult<T> = Result<T, RrtError>;
