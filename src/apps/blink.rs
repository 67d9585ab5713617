// LED blinker: flips the LED each time the task runs.
// Paced externally by the periodic timer interrupt.

use embedded_hal::digital::OutputPin;

pub struct Blinker<P> {
    led: P,
    on: bool,
}

impl<P: OutputPin> Blinker<P> {
    /// Takes the pin and drives it low.
    pub fn new(mut led: P) -> Result<Self, P::Error> {
        led.set_low()?;
        Ok(Self { led, on: false })
    }

    /// Flip the LED. Returns the new level.
    pub fn toggle(&mut self) -> Result<bool, P::Error> {
        let on = !self.on;
        if on {
            self.led.set_high()?;
        } else {
            self.led.set_low()?;
        }
        self.on = on;
        Ok(on)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
