// Task bodies for the demo firmware and their registry identities.

pub mod blink;
pub mod serial_send;

pub use blink::Blinker;
pub use serial_send::DigitSender;

use crate::kernel::{Priority, TaskId};

pub const SERIAL_TASK: TaskId = TaskId::new(1);
pub const BLINK_TASK: TaskId = TaskId::new(2);

/// Both demo tasks share one class so neither can starve the other.
pub const APP_PRIORITY: Priority = Priority::new(1);
