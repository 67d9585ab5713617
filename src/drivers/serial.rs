// Interrupt-paced serial transmit, one byte per task run
//
// The sending task never waits on the UART. It hands over one byte,
// arms the "transmitter ready" interrupt and returns; the ISR disarms
// that interrupt and marks the task runnable again.

/// Byte-oriented transmitter driven from a task body.
pub trait ByteSink {
    type Error: core::fmt::Debug;

    /// Enable the transmitter. Called once, before the first byte.
    fn start(&mut self);

    /// Queue one byte without blocking.
    ///
    /// Must leave the ready interrupt armed on both `Ok` and
    /// `WouldBlock`, otherwise nothing would wake the sender again.
    fn send(&mut self, byte: u8) -> nb::Result<(), Self::Error>;
}

#[cfg(feature = "esp32c3")]
pub use esp::SerialPort;

#[cfg(feature = "esp32c3")]
mod esp {
    use esp_hal::Blocking;
    use esp_hal::interrupt::InterruptHandler;
    use esp_hal::uart::{TxError, Uart, UartInterrupt};

    use super::ByteSink;

    /// UART transmitter paced by the TX-done interrupt.
    pub struct SerialPort {
        uart: Uart<'static, Blocking>,
    }

    impl SerialPort {
        pub fn new(uart: Uart<'static, Blocking>) -> Self {
            Self { uart }
        }

        pub fn set_interrupt_handler(&mut self, handler: InterruptHandler) {
            self.uart.set_interrupt_handler(handler);
        }

        /// ISR side: acknowledge and disarm TX-done. Returns true if it
        /// was the interrupt source.
        pub fn acknowledge(&mut self) -> bool {
            let fired = self.uart.interrupts().contains(UartInterrupt::TxDone);
            if fired {
                self.uart.clear_interrupts(UartInterrupt::TxDone.into());
                // stays quiet until the next byte is queued
                self.uart.unlisten(UartInterrupt::TxDone);
            }
            fired
        }
    }

    impl ByteSink for SerialPort {
        type Error = TxError;

        fn start(&mut self) {
            self.uart.clear_interrupts(UartInterrupt::TxDone.into());
        }

        fn send(&mut self, byte: u8) -> nb::Result<(), TxError> {
            self.uart.listen(UartInterrupt::TxDone);
            match self.uart.write(&[byte]) {
                Ok(0) => Err(nb::Error::WouldBlock),
                Ok(_) => Ok(()),
                Err(e) => Err(nb::Error::Other(e)),
            }
        }
    }
}
