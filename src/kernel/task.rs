// Task descriptors and the small value types around them
//
// A task is a callback, not a thread: no stack, no context. The
// registry is a caller-owned table of these, built once (usually in a
// static) and never changed after init.

use core::fmt;

/// Unique task identifier, stable for the program's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TaskId(u8);

impl TaskId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Dispatch rank. Lower value runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(0);
    pub const LOWEST: Priority = Priority(u8::MAX);

    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Where a task starts out after init.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Queued for dispatch straight away.
    Ready,
    /// Waits for its first mark-runnable.
    #[default]
    Blocked,
}

/// Live state of a registered task.
///
/// `Running` tasks already sit on the blocked queue: a mark-runnable
/// issued while the callback executes moves them back to ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Ready,
    Blocked,
    Running,
}

impl TaskState {
    /// True when the task is linked into the blocked queue.
    pub const fn is_blocked(self) -> bool {
        matches!(self, TaskState::Blocked | TaskState::Running)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Ready => write!(f, "Ready"),
            TaskState::Blocked => write!(f, "Blocked"),
            TaskState::Running => write!(f, "Running"),
        }
    }
}

/// Task body: zero arguments, no result, runs to completion.
///
/// `Sync` so a registry holding it can live in a `static` shared with
/// interrupt handlers.
pub type TaskFn<'a> = &'a (dyn Fn() + Sync);

/// One entry of the task registry.
#[derive(Clone, Copy)]
pub struct Task<'a> {
    id: TaskId,
    priority: Priority,
    run: Option<TaskFn<'a>>,
    disposition: Disposition,
}

impl<'a> Task<'a> {
    /// A blocked task with no body yet.
    pub const fn new(id: TaskId, priority: Priority) -> Self {
        Self {
            id,
            priority,
            run: None,
            disposition: Disposition::Blocked,
        }
    }

    pub const fn with_run(mut self, run: TaskFn<'a>) -> Self {
        self.run = Some(run);
        self
    }

    pub const fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Shorthand for `with_disposition(Disposition::Ready)`.
    pub const fn auto_run(self) -> Self {
        self.with_disposition(Disposition::Ready)
    }

    pub const fn id(&self) -> TaskId {
        self.id
    }

    pub const fn priority(&self) -> Priority {
        self.priority
    }

    pub const fn disposition(&self) -> Disposition {
        self.disposition
    }

    pub fn run_fn(&self) -> Option<TaskFn<'a>> {
        self.run
    }
}

impl fmt::Debug for Task<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("run", &self.run.is_some())
            .field("disposition", &self.disposition)
            .finish()
    }
}

impl fmt::Display for Task<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {} ({})", self.id, self.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    #[test]
    fn new_task_starts_blocked_without_body() {
        let t = Task::new(TaskId::new(3), Priority::new(2));
        assert_eq!(t.disposition(), Disposition::Blocked);
        assert!(t.run_fn().is_none());
    }

    #[test]
    fn builder_sets_body_and_disposition() {
        let t = Task::new(TaskId::new(1), Priority::HIGHEST)
            .with_run(&noop)
            .auto_run();
        assert_eq!(t.disposition(), Disposition::Ready);
        assert!(t.run_fn().is_some());
    }

    #[test]
    fn running_counts_as_blocked_queue_member() {
        assert!(TaskState::Running.is_blocked());
        assert!(TaskState::Blocked.is_blocked());
        assert!(!TaskState::Ready.is_blocked());
    }

    #[test]
    fn static_table_builds_in_const_context() {
        static TABLE: [Task<'static>; 2] = [
            Task::new(TaskId::new(1), Priority::new(1))
                .with_run(&noop)
                .auto_run(),
            Task::new(TaskId::new(2), Priority::new(1)).with_run(&noop),
        ];
        assert_eq!(TABLE[0].disposition(), Disposition::Ready);
        assert_eq!(TABLE[1].id(), TaskId::new(2));
    }
}
