//! Hardware abstraction traits for GPIO registers, pins and time.
//!
//! This module defines the seams between the game and the board so that the
//! LCD protocol, the button capture and the game loop can run against a real
//! Raspberry Pi or against the mocks in [`crate::hal::mock`].
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`RegisterBlock`] | Word-addressed access to a mapped GPIO register block |
//! | [`GpioPins`] | Pin-level direction, write and read |
//! | [`Clock`] | Monotonic millisecond time source |
//! | [`Delay`] | Blocking millisecond/microsecond waits |
//!
//! # Example
//!
//! ```rust
//! use master_mind::traits::{GpioPins, Level, PinMode};
//! use master_mind::hal::MockGpio;
//!
//! let mut gpio = MockGpio::new();
//! gpio.configure_direction(13, PinMode::Output);
//! gpio.write_digital(13, Level::High);
//!
//! assert_eq!(gpio.output_level(13), Level::High);
//! ```

/// Logic level of a GPIO line.
///
/// # Default
///
/// Defaults to [`Low`](Self::Low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Line driven or read low.
    #[default]
    Low,
    /// Line driven or read high.
    High,
}

impl Level {
    /// Returns `true` for [`Level::High`].
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Function-select value for a GPIO pin.
///
/// The discriminant is the 3-bit code written into the function-select
/// register field for the pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum PinMode {
    /// Plain input.
    Input = 0b000,
    /// Plain output.
    Output = 0b001,
    /// Alternate function 0.
    Alt0 = 0b100,
    /// Alternate function 1.
    Alt1 = 0b101,
    /// Alternate function 2.
    Alt2 = 0b110,
    /// Alternate function 3.
    Alt3 = 0b111,
    /// Alternate function 4.
    Alt4 = 0b011,
    /// Alternate function 5.
    Alt5 = 0b010,
}

impl PinMode {
    /// The 3-bit function-select code.
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Decodes a function-select field. Only the low 3 bits are looked at,
    /// and every 3-bit code names a mode.
    ///
    /// ```
    /// use master_mind::traits::PinMode;
    ///
    /// assert_eq!(PinMode::from_bits(0b001), PinMode::Output);
    /// assert_eq!(PinMode::from_bits(0b1_010), PinMode::Alt5);
    /// ```
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            0b000 => PinMode::Input,
            0b001 => PinMode::Output,
            0b100 => PinMode::Alt0,
            0b101 => PinMode::Alt1,
            0b110 => PinMode::Alt2,
            0b111 => PinMode::Alt3,
            0b011 => PinMode::Alt4,
            _ => PinMode::Alt5,
        }
    }
}

/// Word-addressed access to a memory-mapped GPIO register block.
///
/// `word` is an index into an array of 32-bit registers starting at the
/// mapped base, so byte offset `0x1C` is word `7`.
///
/// # Implementation Notes
///
/// - Real hardware implementations must use volatile accesses
/// - No bounds validation is expected; a bad index is a caller contract violation
pub trait RegisterBlock {
    /// Reads the register at `word`.
    fn read(&self, word: usize) -> u32;

    /// Writes `value` to the register at `word`.
    fn write(&mut self, word: usize, value: u32);

    /// Read-modify-write helper.
    ///
    /// Not atomic. Concurrent writers to the same word must be serialized by
    /// the caller.
    fn modify(&mut self, word: usize, f: impl FnOnce(u32) -> u32) {
        let value = self.read(word);
        self.write(word, f(value));
    }
}

/// Pin-level GPIO operations.
///
/// Implemented by [`crate::gpio::Gpio`] on top of a [`RegisterBlock`], and by
/// [`crate::hal::MockGpio`] for tests.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use master_mind::traits::{GpioPins, Level, PinMode};
///
/// struct MyPins { /* hardware handles */ }
///
/// impl GpioPins for MyPins {
///     fn configure_direction(&mut self, pin: u8, mode: PinMode) {
///         // Program the pin mux...
///     }
///
///     fn write_digital(&mut self, pin: u8, level: Level) {
///         // Drive the line...
///     }
///
///     fn read_digital(&mut self, pin: u8) -> Level {
///         // Sample the line...
///         Level::Low
///     }
/// }
/// ```
pub trait GpioPins {
    /// Sets the function of `pin`.
    fn configure_direction(&mut self, pin: u8, mode: PinMode);

    /// Drives `pin` to `level`.
    fn write_digital(&mut self, pin: u8, level: Level);

    /// Forces `pin` to input and samples its level.
    fn read_digital(&mut self, pin: u8) -> Level;

    /// Drives `pin` high.
    fn set_high(&mut self, pin: u8) {
        self.write_digital(pin, Level::High);
    }

    /// Drives `pin` low.
    fn set_low(&mut self, pin: u8) {
        self.write_digital(pin, Level::Low);
    }

    /// Configures `pin` as an output and drives it to `level`.
    fn write_output(&mut self, pin: u8, level: Level) {
        self.configure_direction(pin, PinMode::Output);
        self.write_digital(pin, level);
    }
}

/// Time source.
///
/// Provides monotonic time in milliseconds for the input capture window. On
/// Linux this wraps `std::time::Instant`; in tests use
/// [`crate::hal::MockClock`].
///
/// # Example
///
/// ```rust
/// use master_mind::traits::{Clock, Delay};
/// use master_mind::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.delay_ms(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

/// Blocking delays.
///
/// All waits in the crate go through this trait so timing can be replaced
/// in tests.
pub trait Delay {
    /// Blocks for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Blocks for at least `us` microseconds.
    fn delay_us(&mut self, us: u32);
}
