// Cooperative scheduler core
// Single core, no preemption. A task is a callback that runs to
// completion; interrupt handlers mark tasks runnable, the dispatch
// loop runs them by priority and WFI idles the CPU in between.

pub mod error;
mod queue;
pub mod registry;
pub mod scheduler;
pub mod task;
pub mod wake;

pub use error::{InitError, TransitionError};
pub use registry::{Partition, QueueKind, QueueSnapshot};
pub use scheduler::{Dispatch, Scheduler};
pub use task::{Disposition, Priority, Task, TaskFn, TaskId, TaskState};

/// Slot capacity used by the firmware image.
pub const MAX_TASKS: usize = 8;
