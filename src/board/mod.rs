//! ESP32-C3 board support
//!
//! Maps the demo hardware (one LED, one UART transmit line, one
//! periodic timer) to named fields so the firmware entry point does not
//! need GPIO numbers or peripheral details.

pub mod config;

#[cfg(feature = "esp32c3")]
pub use hw::{Board, BoardError};

#[cfg(feature = "esp32c3")]
mod hw {
    use core::fmt;

    use esp_hal::{
        Blocking,
        gpio::{Level, Output, OutputConfig},
        peripherals::Peripherals,
        time::Duration,
        timer::{PeriodicTimer, timg::TimerGroup},
        uart::{self, Uart},
    };

    use super::config::{BLINK_PERIOD_MS, SERIAL_BAUD};
    use crate::drivers::serial::SerialPort;

    #[derive(Debug)]
    pub enum BoardError {
        Serial(uart::ConfigError),
        Timer(esp_hal::timer::Error),
    }

    impl fmt::Display for BoardError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                BoardError::Serial(e) => write!(f, "serial config: {:?}", e),
                BoardError::Timer(e) => write!(f, "timer start: {:?}", e),
            }
        }
    }

    /// Demo hardware, configured but with no interrupts enabled yet.
    pub struct Board {
        pub led: Output<'static>,
        pub serial: SerialPort,
        pub tick: PeriodicTimer<'static, Blocking>,
    }

    impl Board {
        pub fn init(p: Peripherals) -> Result<Self, BoardError> {
            // GPIO8 drives the on-board LED
            let led = Output::new(p.GPIO8, Level::Low, OutputConfig::default());

            let cfg = uart::Config::default().with_baudrate(SERIAL_BAUD);
            let uart = Uart::new(p.UART1, cfg)
                .map_err(BoardError::Serial)?
                .with_tx(p.GPIO7);

            let timg0 = TimerGroup::new(p.TIMG0);
            let mut tick = PeriodicTimer::new(timg0.timer0);
            tick.start(Duration::from_millis(BLINK_PERIOD_MS))
                .map_err(BoardError::Timer)?;

            Ok(Board {
                led,
                serial: SerialPort::new(uart),
                tick,
            })
        }
    }
}
