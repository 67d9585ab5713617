// Board tuning constants

/// 8N1 at 9600 baud.
pub const SERIAL_BAUD: u32 = 9600;

/// LED toggle period, i.e. half the blink cycle.
pub const BLINK_PERIOD_MS: u64 = 1000;
