//! State module for tracking pipeline progress
//!
//! # Components
//!
//! - `TaskState`: lifecycle of a single URL inside the worker pool
//! - `TaskTracker`: enforces legal `TaskState` transitions
//! - `Stage`: which pipeline instance a task belongs to

mod stage;
mod task_state;

// Re-export main types
pub use stage::Stage;
pub use task_state::{TaskState, TaskTracker};
