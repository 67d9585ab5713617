// Priority-ordered task queues over a fixed slot arena
//
// Each registered task owns one slot; a queue is just a head index and
// the slots carry the `next` links. No tail pointer, no length. A slot
// is linked into at most one queue at a time, so both queues can share
// one arena without aliasing.
//
// Nothing here takes the critical section itself. The arena and queues
// only live inside the scheduler's `critical_section::Mutex`, so every
// caller already holds it.

use super::task::{Priority, TaskFn, TaskId, TaskState};

/// Index into the slot arena.
pub(crate) type SlotIdx = u8;

fn vacant() {}

#[derive(Clone, Copy)]
pub(crate) struct Slot<'a> {
    pub id: TaskId,
    pub priority: Priority,
    pub state: TaskState,
    pub run: TaskFn<'a>,
    next: Option<SlotIdx>,
}

impl<'a> Slot<'a> {
    pub const EMPTY: Slot<'a> = Slot {
        id: TaskId::new(0),
        priority: Priority::LOWEST,
        state: TaskState::Blocked,
        run: &vacant,
        next: None,
    };

    pub const fn new(id: TaskId, priority: Priority, state: TaskState, run: TaskFn<'a>) -> Self {
        Self {
            id,
            priority,
            state,
            run,
            next: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TaskQueue {
    head: Option<SlotIdx>,
}

impl TaskQueue {
    pub const fn new() -> Self {
        Self { head: None }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn clear(&mut self) {
        self.head = None;
    }

    // Link `idx` behind every entry of equal or better priority, so a
    // requeued task never jumps its peers.
    pub fn insert(&mut self, slots: &mut [Slot<'_>], idx: SlotIdx) {
        let priority = slots[idx as usize].priority;
        let mut prev: Option<SlotIdx> = None;
        let mut cur = self.head;

        while let Some(c) = cur {
            if slots[c as usize].priority > priority {
                break;
            }
            prev = Some(c);
            cur = slots[c as usize].next;
        }

        slots[idx as usize].next = cur;
        match prev {
            Some(p) => slots[p as usize].next = Some(idx),
            None => self.head = Some(idx),
        }
    }

    pub fn pop(&mut self, slots: &mut [Slot<'_>]) -> Option<SlotIdx> {
        let idx = self.head?;
        self.head = slots[idx as usize].next.take();
        Some(idx)
    }

    /// Unlink the slot carrying `id`, if this queue holds it.
    pub fn remove(&mut self, slots: &mut [Slot<'_>], id: TaskId) -> Option<SlotIdx> {
        let mut prev: Option<SlotIdx> = None;
        let mut cur = self.head;

        while let Some(c) = cur {
            if slots[c as usize].id == id {
                let next = slots[c as usize].next.take();
                match prev {
                    Some(p) => slots[p as usize].next = next,
                    None => self.head = next,
                }
                return Some(c);
            }
            prev = Some(c);
            cur = slots[c as usize].next;
        }

        None
    }

    /// Walk the queue head to tail.
    pub fn iter<'s, 'a>(&self, slots: &'s [Slot<'a>]) -> Iter<'s, 'a> {
        Iter {
            slots,
            cur: self.head,
        }
    }
}

pub(crate) struct Iter<'s, 'a> {
    slots: &'s [Slot<'a>],
    cur: Option<SlotIdx>,
}

impl<'s, 'a> Iterator for Iter<'s, 'a> {
    type Item = &'s Slot<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = &self.slots[self.cur? as usize];
        self.cur = slot.next;
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    fn arena(priorities: &[u8]) -> [Slot<'static>; 8] {
        let mut slots = [Slot::EMPTY; 8];
        for (i, p) in priorities.iter().enumerate() {
            slots[i] = Slot::new(
                TaskId::new(i as u8),
                Priority::new(*p),
                TaskState::Ready,
                &noop,
            );
        }
        slots
    }

    fn ids(q: &TaskQueue, slots: &[Slot<'_>]) -> Vec<u8> {
        q.iter(slots).map(|s| s.id.get()).collect()
    }

    #[test]
    fn insert_into_empty_queue() {
        let mut slots = arena(&[5]);
        let mut q = TaskQueue::new();
        q.insert(&mut slots, 0);
        assert_eq!(ids(&q, &slots), [0]);
    }

    #[test]
    fn equal_priorities_keep_insertion_order() {
        // priorities [3, 1, 2, 1] -> dispatch 1 (first), 1 (second), 2, 3
        let mut slots = arena(&[3, 1, 2, 1]);
        let mut q = TaskQueue::new();
        for i in 0..4 {
            q.insert(&mut slots, i);
        }
        assert_eq!(ids(&q, &slots), [1, 3, 2, 0]);

        let popped: Vec<SlotIdx> = core::iter::from_fn(|| q.pop(&mut slots)).collect();
        assert_eq!(popped, [1, 3, 2, 0]);
        assert!(q.is_empty());
    }

    #[test]
    fn insert_in_middle_keeps_tail_reachable() {
        let mut slots = arena(&[1, 4, 2, 3]);
        let mut q = TaskQueue::new();
        q.insert(&mut slots, 0);
        q.insert(&mut slots, 1);
        q.insert(&mut slots, 2);
        q.insert(&mut slots, 3);
        assert_eq!(ids(&q, &slots), [0, 2, 3, 1]);
    }

    #[test]
    fn remove_head_middle_and_tail() {
        let mut slots = arena(&[1, 2, 3, 4]);
        let mut q = TaskQueue::new();
        for i in 0..4 {
            q.insert(&mut slots, i);
        }

        assert_eq!(q.remove(&mut slots, TaskId::new(2)), Some(2));
        assert_eq!(ids(&q, &slots), [0, 1, 3]);
        assert_eq!(q.remove(&mut slots, TaskId::new(0)), Some(0));
        assert_eq!(ids(&q, &slots), [1, 3]);
        assert_eq!(q.remove(&mut slots, TaskId::new(3)), Some(3));
        assert_eq!(ids(&q, &slots), [1]);
    }

    #[test]
    fn remove_missing_id_changes_nothing() {
        let mut slots = arena(&[1, 2]);
        let mut q = TaskQueue::new();
        q.insert(&mut slots, 0);
        q.insert(&mut slots, 1);
        assert_eq!(q.remove(&mut slots, TaskId::new(7)), None);
        assert_eq!(ids(&q, &slots), [0, 1]);
    }

    #[test]
    fn unlinked_slot_can_be_requeued() {
        let mut slots = arena(&[1, 1, 1]);
        let mut q = TaskQueue::new();
        for i in 0..3 {
            q.insert(&mut slots, i);
        }
        let head = q.pop(&mut slots).unwrap();
        q.insert(&mut slots, head);
        assert_eq!(ids(&q, &slots), [1, 2, 0]);
    }

    #[test]
    fn pop_empty_queue() {
        let mut slots = arena(&[]);
        let mut q = TaskQueue::new();
        assert_eq!(q.pop(&mut slots), None);
    }
}
