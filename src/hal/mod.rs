//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `system`: `std` clock and delays (requires `std` feature)
//! - `rpi`: Memory-mapped GPIO on a Raspberry Pi (requires `rpi` feature)
//!
//! [`Board`] bundles a pin implementation with a time source so the LCD
//! driver can own both as a single value.

pub mod mock;

#[cfg(feature = "std")]
pub mod system;

#[cfg(feature = "rpi")]
pub mod rpi;

pub use mock::*;

#[cfg(feature = "std")]
pub use system::SystemClock;

#[cfg(feature = "rpi")]
pub use rpi::*;

use crate::traits::{Clock, Delay, GpioPins, Level, PinMode};

/// Pins plus time, owned together.
///
/// Implements [`GpioPins`], [`Clock`] and [`Delay`] by delegation, which is
/// everything the LCD driver, the button capture and the game loop need.
///
/// # Example
///
/// ```rust
/// use master_mind::hal::{Board, MockClock, MockGpio};
/// use master_mind::traits::{Clock, Delay, GpioPins};
///
/// let mut board = Board::new(MockGpio::new(), MockClock::new());
/// board.set_high(13);
/// board.delay_ms(200);
///
/// assert_eq!(board.now_ms(), 200);
/// assert_eq!(board.gpio.writes.len(), 1);
/// ```
#[derive(Debug)]
pub struct Board<G, C> {
    /// Pin implementation.
    pub gpio: G,
    /// Time source and delay provider.
    pub clock: C,
}

impl<G, C> Board<G, C> {
    /// Bundles `gpio` and `clock`.
    pub fn new(gpio: G, clock: C) -> Self {
        Self { gpio, clock }
    }
}

impl<G: GpioPins, C> GpioPins for Board<G, C> {
    #[inline]
    fn configure_direction(&mut self, pin: u8, mode: PinMode) {
        self.gpio.configure_direction(pin, mode);
    }

    #[inline]
    fn write_digital(&mut self, pin: u8, level: Level) {
        self.gpio.write_digital(pin, level);
    }

    #[inline]
    fn read_digital(&mut self, pin: u8) -> Level {
        self.gpio.read_digital(pin)
    }
}

impl<G, C: Clock> Clock for Board<G, C> {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

impl<G, C: Delay> Delay for Board<G, C> {
    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        self.clock.delay_ms(ms);
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        self.clock.delay_us(us);
    }
}
