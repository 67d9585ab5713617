// kite-os entry point
//
// Boot sequence: scheduler -> hardware -> interrupts -> dispatch loop
//
// Two tasks, same priority:
//   serial - eligible at boot; writes one digit per run, re-armed by the
//            UART TX-done interrupt
//   blink  - blocked at boot; toggles the LED, re-armed by the periodic
//            timer interrupt
//
// Task state lives in critical-section mutexes shared with the ISRs.
// Task bodies borrow it only for the register writes of one step.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::Blocking;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::Output;
use esp_hal::timer::PeriodicTimer;
use log::{error, info, trace, warn};

use core::cell::RefCell;
use critical_section::Mutex;

use kite_os::apps::{APP_PRIORITY, BLINK_TASK, Blinker, DigitSender, SERIAL_TASK};
use kite_os::board::Board;
use kite_os::drivers::serial::SerialPort;
use kite_os::kernel::wake::wait_for_interrupt;
use kite_os::kernel::{MAX_TASKS, Scheduler, Task};

esp_bootloader_esp_idf::esp_app_desc!();

static SCHED: Scheduler<'static, MAX_TASKS> = Scheduler::new();

static TASKS: [Task<'static>; 2] = [
    Task::new(SERIAL_TASK, APP_PRIORITY)
        .with_run(&serial_task)
        .auto_run(),
    Task::new(BLINK_TASK, APP_PRIORITY).with_run(&blink_task),
];

static SENDER: Mutex<RefCell<Option<DigitSender<SerialPort>>>> = Mutex::new(RefCell::new(None));
static BLINKER: Mutex<RefCell<Option<Blinker<Output<'static>>>>> =
    Mutex::new(RefCell::new(None));
static TICK: Mutex<RefCell<Option<PeriodicTimer<'static, Blocking>>>> =
    Mutex::new(RefCell::new(None));

fn serial_task() {
    critical_section::with(|cs| {
        if let Some(sender) = SENDER.borrow_ref_mut(cs).as_mut() {
            if let Err(e) = sender.step() {
                warn!("serial: {:?}", e);
            }
        }
    });
}

fn blink_task() {
    critical_section::with(|cs| {
        if let Some(blinker) = BLINKER.borrow_ref_mut(cs).as_mut() {
            match blinker.toggle() {
                Ok(on) => trace!("led {}", if on { "on" } else { "off" }),
                Err(e) => match e {},
            }
        }
    });
}

#[esp_hal::handler(priority = esp_hal::interrupt::Priority::Priority1)]
fn tick_handler() {
    critical_section::with(|cs| {
        if let Some(timer) = TICK.borrow_ref_mut(cs).as_mut() {
            timer.clear_interrupt();
        }
    });
    let _ = SCHED.mark_runnable(BLINK_TASK);
}

#[esp_hal::handler(priority = esp_hal::interrupt::Priority::Priority1)]
fn serial_handler() {
    let tx_done = critical_section::with(|cs| {
        SENDER
            .borrow_ref_mut(cs)
            .as_mut()
            .is_some_and(|s| s.sink_mut().acknowledge())
    });
    if tx_done {
        let _ = SCHED.mark_runnable(SERIAL_TASK);
    }
}

fn halt() -> ! {
    loop {
        wait_for_interrupt();
    }
}

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("booting...");

    if let Err(e) = SCHED.init(&TASKS) {
        error!("scheduler init failed: {}", e);
        halt();
    }

    let board = match Board::init(peripherals) {
        Ok(board) => board,
        Err(e) => {
            error!("board init failed: {}", e);
            halt();
        }
    };
    let Board {
        led,
        mut serial,
        mut tick,
    } = board;

    let blinker = match Blinker::new(led) {
        Ok(b) => b,
        Err(e) => match e {},
    };

    serial.set_interrupt_handler(serial_handler);
    tick.set_interrupt_handler(tick_handler);

    critical_section::with(|cs| {
        BLINKER.borrow_ref_mut(cs).replace(blinker);
        SENDER.borrow_ref_mut(cs).replace(DigitSender::new(serial));
        tick.listen();
        TICK.borrow_ref_mut(cs).replace(tick);
    });
    info!("hardware initialized.");

    SCHED.run()
}
