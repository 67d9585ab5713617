use core::fmt;

use super::task::{TaskId, TaskState};

/// Why a task table was rejected. The scheduler is left with both
/// queues empty (or untouched, for `Empty` and `AlreadyRunning`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// No tasks supplied.
    Empty,
    /// A descriptor has no body to run.
    MissingRun(TaskId),
    /// Two descriptors share an id.
    DuplicateId(TaskId),
    /// More tasks than the scheduler has slots.
    TooManyTasks { given: usize, capacity: usize },
    /// The dispatch loop has already started.
    AlreadyRunning,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Empty => write!(f, "empty task table"),
            InitError::MissingRun(id) => write!(f, "task {} has no run function", id),
            InitError::DuplicateId(id) => write!(f, "task id {} registered twice", id),
            InitError::TooManyTasks { given, capacity } => {
                write!(f, "{} tasks exceed capacity of {}", given, capacity)
            }
            InitError::AlreadyRunning => write!(f, "scheduler already dispatching"),
        }
    }
}

/// Mark-runnable refused. Benign: typically a stale interrupt for a
/// task that is already queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    UnknownId(TaskId),
    NotBlocked { id: TaskId, state: TaskState },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::UnknownId(id) => write!(f, "no task with id {}", id),
            TransitionError::NotBlocked { id, state } => {
                write!(f, "task {} not blocked ({})", id, state)
            }
        }
    }
}
