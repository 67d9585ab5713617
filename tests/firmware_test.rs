//! The demo firmware wiring, run on the host: both task bodies behind
//! the scheduler, with fake hardware and "interrupts" fired from the
//! idle hook.

use std::convert::Infallible;
use std::sync::Mutex;

use embedded_hal::digital::{ErrorType, OutputPin};
use kite_os::apps::{APP_PRIORITY, BLINK_TASK, Blinker, DigitSender, SERIAL_TASK};
use kite_os::drivers::serial::ByteSink;
use kite_os::kernel::{Dispatch, QueueKind, Scheduler, Task, TaskState};

#[derive(Default)]
struct Led {
    high: bool,
    toggles: usize,
}

impl ErrorType for Led {
    type Error = Infallible;
}

impl OutputPin for Led {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        self.toggles += 1;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        self.toggles += 1;
        Ok(())
    }
}

#[derive(Default)]
struct Uart {
    enabled: bool,
    tx_armed: bool,
    wire: Vec<u8>,
}

impl ByteSink for Uart {
    type Error = Infallible;

    fn start(&mut self) {
        self.enabled = true;
    }

    fn send(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        assert!(self.enabled);
        self.wire.push(byte);
        self.tx_armed = true;
        Ok(())
    }
}

#[test]
fn serial_and_blink_share_the_cpu() {
    let sched: Scheduler<'_, 2> = Scheduler::new();
    let sender = Mutex::new(DigitSender::new(Uart::default()));
    let blinker = Mutex::new(Blinker::new(Led::default()).unwrap());

    let serial_task = || {
        sender.lock().unwrap().step().unwrap();
    };
    let blink_task = || {
        blinker.lock().unwrap().toggle().unwrap();
    };
    let tasks = [
        Task::new(SERIAL_TASK, APP_PRIORITY)
            .with_run(&serial_task)
            .auto_run(),
        Task::new(BLINK_TASK, APP_PRIORITY).with_run(&blink_task),
    ];
    sched.init(&tasks).unwrap();
    assert_eq!(sched.state_of(BLINK_TASK), Some(TaskState::Blocked));

    // every idle wake-up: TX-done if armed; timer tick every 4th
    let mut wakeups = 0usize;
    let mut idle = || {
        wakeups += 1;
        let tx_done = {
            let mut s = sender.lock().unwrap();
            std::mem::take(&mut s.sink_mut().tx_armed)
        };
        if tx_done {
            sched.mark_runnable(SERIAL_TASK).unwrap();
        }
        if wakeups % 4 == 0 {
            let _ = sched.mark_runnable(BLINK_TASK);
        }
    };

    let mut ran = Vec::new();
    for _ in 0..40 {
        if let Dispatch::Ran(id) = sched.run_once(&mut idle) {
            ran.push(id);
        }
    }

    let sender = sender.lock().unwrap();
    let wire = &sender.sink().wire;
    assert!(wire.len() >= 9);
    assert!(wire.iter().zip(b"123456789".iter().cycle()).all(|(a, b)| a == b));

    let blinks = ran.iter().filter(|id| **id == BLINK_TASK).count();
    assert!(blinks >= 4);
    // initial set_low plus one write per run
    assert_eq!(blinker.lock().unwrap().is_on(), blinks % 2 == 1);

    assert!(sched.queue(QueueKind::Ready).len() <= 2);
}
