// Cooperative run-to-completion scheduler
//
// One instance per firmware image, normally a `static` shared with the
// interrupt handlers. All queue mutation happens inside
// `critical_section::with`, so an ISR can never observe a task half
// moved between queues. Callbacks always run with the lock released.
//
// Dispatch round: lock -> pop ready head -> park it on blocked as
// Running -> unlock -> run -> lock -> Running becomes Blocked unless
// re-armed meanwhile -> unlock. With nothing ready, idle until an
// interrupt and poll again.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;
use log::{debug, info, trace, warn};

use super::error::{InitError, TransitionError};
use super::registry::{Partition, QueueKind, QueueSnapshot, Registry};
use super::task::{Task, TaskId, TaskState};
use super::wake::wait_for_interrupt;

/// Outcome of a single loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// This task's callback ran to completion.
    Ran(TaskId),
    /// Nothing was ready; the idle hook ran instead.
    Idle,
}

/// Priority scheduler over at most `N` tasks.
pub struct Scheduler<'a, const N: usize> {
    registry: Mutex<RefCell<Registry<'a, N>>>,
    // set once dispatch begins; riscv32imc has no atomic RMW, store only
    started: AtomicBool,
}

impl<'a, const N: usize> Scheduler<'a, N> {
    pub const fn new() -> Self {
        Self {
            registry: Mutex::new(RefCell::new(Registry::new())),
            started: AtomicBool::new(false),
        }
    }

    /// Register the task table and partition it into ready/blocked.
    ///
    /// All-or-nothing: a rejected table leaves both queues empty. An
    /// empty table, or any call once dispatching has begun, is refused
    /// without touching the current registration.
    pub fn init(&self, tasks: &'a [Task<'a>]) -> Result<Partition, InitError> {
        if self.started.load(Ordering::Acquire) {
            warn!("scheduler: init after dispatch started");
            return Err(InitError::AlreadyRunning);
        }

        let result = critical_section::with(|cs| self.registry.borrow_ref_mut(cs).load(tasks));
        match &result {
            Ok(p) => info!(
                "scheduler: {} tasks ({} ready, {} blocked)",
                tasks.len(),
                p.ready,
                p.blocked
            ),
            Err(e) => warn!("scheduler: init failed: {}", e),
        }
        result
    }

    /// Move a blocked (or currently running) task onto the ready queue.
    ///
    /// Safe from interrupt handlers and from task bodies, including a
    /// task re-arming itself. Failure means the task was already ready
    /// or the id is unknown; nothing changes in that case.
    pub fn mark_runnable(&self, id: TaskId) -> Result<(), TransitionError> {
        let result =
            critical_section::with(|cs| self.registry.borrow_ref_mut(cs).mark_runnable(id));
        match &result {
            Ok(()) => trace!("mark_runnable: {} ready", id),
            Err(e) => trace!("mark_runnable: {}", e),
        }
        result
    }

    pub fn state_of(&self, id: TaskId) -> Option<TaskState> {
        critical_section::with(|cs| self.registry.borrow_ref(cs).state_of(id))
    }

    /// Ids on one queue, head first.
    pub fn queue(&self, kind: QueueKind) -> QueueSnapshot<N> {
        critical_section::with(|cs| self.registry.borrow_ref(cs).snapshot(kind))
    }

    pub fn task_count(&self) -> usize {
        critical_section::with(|cs| self.registry.borrow_ref(cs).len())
    }

    pub fn has_ready(&self) -> bool {
        critical_section::with(|cs| self.registry.borrow_ref(cs).has_ready())
    }

    /// Run the most urgent ready task, if any. Returns its id.
    pub fn dispatch(&self) -> Option<TaskId> {
        self.started.store(true, Ordering::Release);

        let (idx, id, run) = critical_section::with(|cs| {
            let mut reg = self.registry.borrow_ref_mut(cs);
            reg.take_next().map(|(idx, run)| (idx, reg.id_at(idx), run))
        })?;

        trace!("dispatch {}", id);
        run();

        critical_section::with(|cs| self.registry.borrow_ref_mut(cs).retire(idx));
        Some(id)
    }

    /// One loop iteration: dispatch a task, or call `idle` if none is
    /// ready.
    pub fn run_once(&self, idle: &mut impl FnMut()) -> Dispatch {
        match self.dispatch() {
            Some(id) => Dispatch::Ran(id),
            None => {
                idle();
                Dispatch::Idle
            }
        }
    }

    /// The dispatch loop, idling on WFI. Never returns.
    pub fn run(&self) -> ! {
        self.run_with(wait_for_interrupt)
    }

    /// The dispatch loop with a custom idle hook. Never returns.
    pub fn run_with(&self, mut idle: impl FnMut()) -> ! {
        debug!("scheduler: entering dispatch loop");
        loop {
            self.run_once(&mut idle);
        }
    }
}

impl<const N: usize> Default for Scheduler<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
