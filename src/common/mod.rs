//! Common types, traits, and error definitions for rrt_planning
//!
//! This module provides the foundational building blocks shared by
//! every planner variant in this crate.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
