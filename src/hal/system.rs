//! `std` clock implementation using `Instant` and `thread::sleep`.

use crate::traits::{Clock, Delay};
use std::thread;
use std::time::{Duration, Instant};

/// Host clock.
///
/// Provides millisecond time since construction and sleeps through the OS
/// scheduler. Sleeps may overshoot but never undershoot, which is what the
/// LCD settle delays require.
///
/// # Example
///
/// ```rust
/// use master_mind::hal::SystemClock;
/// use master_mind::traits::{Clock, Delay};
///
/// let mut clock = SystemClock::new();
/// let start = clock.now_ms();
/// clock.delay_ms(2);
/// assert!(clock.now_ms() >= start + 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock whose epoch is now.
    #[inline]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

impl Delay for SystemClock {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }

    fn delay_us(&mut self, us: u32) {
        if us == 0 {
            return;
        }
        thread::sleep(Duration::from_micros(u64::from(us)));
    }
}
