// Digit streamer: writes '1'..='9' to the serial port, one byte per run,
// wrapping forever. The TX interrupt re-arms the task after each byte.

use crate::drivers::serial::ByteSink;

/// Length of the repeating digit cycle.
pub const DIGITS: u8 = 9;

pub struct DigitSender<S> {
    sink: S,
    started: bool,
    idx: u8,
}

impl<S: ByteSink> DigitSender<S> {
    pub const fn new(sink: S) -> Self {
        Self {
            sink,
            started: false,
            idx: 0,
        }
    }

    /// Send the next digit. `Ok(None)` means the sink was busy and the
    /// same digit goes out on the next run.
    pub fn step(&mut self) -> Result<Option<u8>, S::Error> {
        if !self.started {
            self.sink.start();
            self.started = true;
        }

        let byte = b'1' + self.idx;
        match self.sink.send(byte) {
            Ok(()) => {
                self.idx = (self.idx + 1) % DIGITS;
                Ok(Some(byte))
            }
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(e),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeSink {
        starts: usize,
        sent: Vec<u8>,
        busy: bool,
    }

    impl ByteSink for FakeSink {
        type Error = ();

        fn start(&mut self) {
            self.starts += 1;
        }

        fn send(&mut self, byte: u8) -> nb::Result<(), ()> {
            if self.busy {
                return Err(nb::Error::WouldBlock);
            }
            self.sent.push(byte);
            Ok(())
        }
    }

    #[test]
    fn cycles_through_nine_digits() {
        let mut s = DigitSender::new(FakeSink::default());
        for _ in 0..11 {
            s.step().unwrap();
        }
        assert_eq!(s.sink().sent, b"12345678912");
        assert_eq!(s.sink().starts, 1);
    }

    #[test]
    fn busy_sink_retries_same_digit() {
        let mut s = DigitSender::new(FakeSink::default());
        assert_eq!(s.step(), Ok(Some(b'1')));

        s.sink_mut().busy = true;
        assert_eq!(s.step(), Ok(None));

        s.sink_mut().busy = false;
        assert_eq!(s.step(), Ok(Some(b'2')));
    }
}
