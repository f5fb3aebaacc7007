/// Task state definitions for tracking one URL through the pipeline
///
/// Every URL submitted to the coordinator moves through
/// `Pending -> Fetching -> Extracting -> {Completed | Failed}`. A fetch failure
/// jumps straight from `Fetching` to `Failed`.
use crate::HarvestError;
use std::fmt;

/// Represents the current state of a task in the worker pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// Submitted, waiting for a worker slot
    Pending,

    /// Holding a slot, waiting on the network
    Fetching,

    /// Body received, extractor running
    Extracting,

    // ===== Terminal States =====
    /// Extractor returned records
    Completed,

    /// Transport failure, extraction failure, or extractor panic
    Failed,
}

impl TaskState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if this is an active state
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if the transition `self -> next` is part of the lifecycle
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Fetching)
                | (Self::Pending, Self::Failed)
                | (Self::Fetching, Self::Extracting)
                | (Self::Fetching, Self::Failed)
                | (Self::Extracting, Self::Completed)
                | (Self::Extracting, Self::Failed)
        )
    }

    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible task states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Extracting,
            Self::Completed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks one task's lifecycle and rejects out-of-order transitions
#[derive(Debug)]
pub struct TaskTracker {
    url: String,
    state: TaskState,
}

impl TaskTracker {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: TaskState::Pending,
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Moves to `next`, or returns `InvalidTransition` and stays put
    pub fn advance(&mut self, next: TaskState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
        Ok(())
    }
}
