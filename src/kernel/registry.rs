// Task registry: the caller's task table plus the slot arena and the
// ready/blocked queues built from it
//
// Plain state machine, no locking. The scheduler owns one of these
// inside its critical-section mutex and is the only thing that can
// reach it while interrupts may fire.

use core::ops::Deref;

use super::error::{InitError, TransitionError};
use super::queue::{Slot, SlotIdx, TaskQueue};
use super::task::{Disposition, Task, TaskFn, TaskId, TaskState};

/// Which queue to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    Ready,
    Blocked,
}

/// Copy of one queue's ids in dispatch order, taken under the lock.
#[derive(Debug, Clone, Copy)]
pub struct QueueSnapshot<const N: usize> {
    ids: [TaskId; N],
    len: usize,
}

impl<const N: usize> QueueSnapshot<N> {
    pub fn as_slice(&self) -> &[TaskId] {
        &self.ids[..self.len]
    }
}

impl<const N: usize> Deref for QueueSnapshot<N> {
    type Target = [TaskId];

    fn deref(&self) -> &[TaskId] {
        self.as_slice()
    }
}

/// Result of a successful load: how the table was partitioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub ready: usize,
    pub blocked: usize,
}

pub(crate) struct Registry<'a, const N: usize> {
    len: usize,
    slots: [Slot<'a>; N],
    ready: TaskQueue,
    blocked: TaskQueue,
}

impl<'a, const N: usize> Registry<'a, N> {
    // slot indices are u8
    const CAPACITY_FITS: () = assert!(N <= SlotIdx::MAX as usize + 1);

    pub const fn new() -> Self {
        let () = Self::CAPACITY_FITS;
        Self {
            len: 0,
            slots: [Slot::EMPTY; N],
            ready: TaskQueue::new(),
            blocked: TaskQueue::new(),
        }
    }

    /// Replace the table.
    ///
    /// An empty table is refused without touching the current one. Any
    /// other rejection leaves the registry empty.
    pub fn load(&mut self, tasks: &'a [Task<'a>]) -> Result<Partition, InitError> {
        if tasks.is_empty() {
            return Err(InitError::Empty);
        }

        self.reset();
        let result = self.fill(tasks);
        if result.is_err() {
            self.reset();
        }
        result
    }

    fn fill(&mut self, tasks: &'a [Task<'a>]) -> Result<Partition, InitError> {
        if tasks.len() > N {
            return Err(InitError::TooManyTasks {
                given: tasks.len(),
                capacity: N,
            });
        }

        let mut partition = Partition {
            ready: 0,
            blocked: 0,
        };
        for (i, task) in tasks.iter().enumerate() {
            let run = task.run_fn().ok_or(InitError::MissingRun(task.id()))?;
            if tasks[..i].iter().any(|t| t.id() == task.id()) {
                return Err(InitError::DuplicateId(task.id()));
            }

            let idx = i as SlotIdx;
            match task.disposition() {
                Disposition::Ready => {
                    self.slots[i] = Slot::new(task.id(), task.priority(), TaskState::Ready, run);
                    self.ready.insert(&mut self.slots, idx);
                    partition.ready += 1;
                }
                Disposition::Blocked => {
                    self.slots[i] =
                        Slot::new(task.id(), task.priority(), TaskState::Blocked, run);
                    self.blocked.insert(&mut self.slots, idx);
                    partition.blocked += 1;
                }
            }
            self.len = i + 1;
        }

        Ok(partition)
    }

    pub fn reset(&mut self) {
        self.len = 0;
        self.slots = [Slot::EMPTY; N];
        self.ready.clear();
        self.blocked.clear();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    fn slot_of(&self, id: TaskId) -> Option<SlotIdx> {
        self.slots[..self.len]
            .iter()
            .position(|s| s.id == id)
            .map(|i| i as SlotIdx)
    }

    pub fn state_of(&self, id: TaskId) -> Option<TaskState> {
        self.slot_of(id).map(|i| self.slots[i as usize].state)
    }

    /// Blocked (or running) -> ready.
    pub fn mark_runnable(&mut self, id: TaskId) -> Result<(), TransitionError> {
        let Some(idx) = self.slot_of(id) else {
            return Err(TransitionError::UnknownId(id));
        };
        let state = self.slots[idx as usize].state;
        if !state.is_blocked() {
            return Err(TransitionError::NotBlocked { id, state });
        }

        let Some(idx) = self.blocked.remove(&mut self.slots, id) else {
            return Err(TransitionError::NotBlocked { id, state });
        };
        self.slots[idx as usize].state = TaskState::Ready;
        self.ready.insert(&mut self.slots, idx);
        Ok(())
    }

    /// Pop the most urgent ready task and park it on the blocked queue
    /// as Running. Returns its slot and body.
    pub fn take_next(&mut self) -> Option<(SlotIdx, TaskFn<'a>)> {
        let idx = self.ready.pop(&mut self.slots)?;
        let slot = &mut self.slots[idx as usize];
        slot.state = TaskState::Running;
        let run = slot.run;
        self.blocked.insert(&mut self.slots, idx);
        Some((idx, run))
    }

    /// Callback returned. Unless it was re-armed meanwhile, it is now
    /// simply blocked.
    pub fn retire(&mut self, idx: SlotIdx) {
        let slot = &mut self.slots[idx as usize];
        if slot.state == TaskState::Running {
            slot.state = TaskState::Blocked;
        }
    }

    pub fn id_at(&self, idx: SlotIdx) -> TaskId {
        self.slots[idx as usize].id
    }

    pub fn has_ready(&self) -> bool {
        !self.ready.is_empty()
    }

    pub fn snapshot(&self, kind: QueueKind) -> QueueSnapshot<N> {
        let queue = match kind {
            QueueKind::Ready => &self.ready,
            QueueKind::Blocked => &self.blocked,
        };
        let mut snap = QueueSnapshot {
            ids: [TaskId::default(); N],
            len: 0,
        };
        for slot in queue.iter(&self.slots) {
            snap.ids[snap.len] = slot.id;
            snap.len += 1;
        }
        snap
    }
}
