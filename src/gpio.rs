//! Register-level GPIO driver for the BCM283x GPIO block.
//!
//! [`Gpio`] turns pin operations into function-select, set, clear and level
//! register accesses on a [`RegisterBlock`]. It holds no state beyond the
//! register handle; the pin mux itself is the state.
//!
//! # Register Layout
//!
//! | Register | Byte offset | Word |
//! |----------|-------------|------|
//! | GPFSELn (pins `10n..10n+9`) | `4n` | `pin / 10` |
//! | GPSETn | `0x1C` | `7 + pin / 32` |
//! | GPCLRn | `0x28` | `10 + pin / 32` |
//! | GPLEVn | `0x34` | `13 + pin / 32` |
//!
//! # Example
//!
//! ```rust
//! use master_mind::gpio::Gpio;
//! use master_mind::hal::MockRegisters;
//! use master_mind::traits::{GpioPins, Level, PinMode};
//!
//! let mut gpio = Gpio::new(MockRegisters::new());
//! gpio.configure_direction(13, PinMode::Output);
//! gpio.write_digital(13, Level::High);
//!
//! let regs = gpio.registers();
//! assert_eq!(regs.word(1), 0b001 << 9);
//! assert_eq!(regs.last_write(), Some((7, 1 << 13)));
//! ```

use crate::traits::{GpioPins, Level, PinMode, RegisterBlock};

/// Word offsets of the GPIO registers, relative to the mapped base.
pub mod regs {
    /// First function-select register (pins 0-9).
    pub const GPFSEL0: usize = 0x00 / 4;
    /// First output-set register (pins 0-31).
    pub const GPSET0: usize = 0x1C / 4;
    /// First output-clear register (pins 0-31).
    pub const GPCLR0: usize = 0x28 / 4;
    /// First pin-level register (pins 0-31).
    pub const GPLEV0: usize = 0x34 / 4;

    /// Pins per function-select register.
    pub const PINS_PER_FSEL: u8 = 10;
    /// Width of one function-select field in bits.
    pub const FSEL_WIDTH: u32 = 3;
    /// Pins per set/clear/level register.
    pub const PINS_PER_BANK: u8 = 32;
}

/// Size of the GPIO register window in bytes.
pub const BLOCK_SIZE: usize = 4 * 1024;

/// Physical GPIO base address on a Raspberry Pi 2/3.
pub const GPIO_BASE_BCM2837: u64 = 0x3F20_0000;

/// Register-level GPIO driver.
///
/// # Type Parameter
///
/// - `R`: The register block ([`RegisterBlock`] trait)
///
/// # Thread Safety
///
/// `configure_direction` performs a read-modify-write of a function-select
/// word shared by ten pins. Only one owner may drive a `Gpio` at a time.
#[derive(Debug)]
pub struct Gpio<R: RegisterBlock> {
    regs: R,
}

impl<R: RegisterBlock> Gpio<R> {
    /// Wraps a register block.
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Shared access to the register block.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Exclusive access to the register block.
    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Reads the current function of `pin` back from the mux.
    pub fn mode(&self, pin: u8) -> PinMode {
        let (word, shift) = fsel_location(pin);
        PinMode::from_bits(self.regs.read(word) >> shift)
    }
}

/// Function-select word and bit shift for `pin`.
#[inline]
const fn fsel_location(pin: u8) -> (usize, u32) {
    let word = regs::GPFSEL0 + (pin / regs::PINS_PER_FSEL) as usize;
    let shift = (pin % regs::PINS_PER_FSEL) as u32 * regs::FSEL_WIDTH;
    (word, shift)
}

/// Bank offset and bit mask for `pin` in the set/clear/level registers.
#[inline]
const fn bank_location(pin: u8) -> (usize, u32) {
    let bank = (pin / regs::PINS_PER_BANK) as usize;
    let mask = 1u32 << (pin % regs::PINS_PER_BANK);
    (bank, mask)
}

impl<R: RegisterBlock> GpioPins for Gpio<R> {
    fn configure_direction(&mut self, pin: u8, mode: PinMode) {
        let (word, shift) = fsel_location(pin);
        self.regs
            .modify(word, |v| (v & !(0b111 << shift)) | (mode.bits() << shift));
    }

    fn write_digital(&mut self, pin: u8, level: Level) {
        let (bank, mask) = bank_location(pin);
        let word = match level {
            Level::High => regs::GPSET0,
            Level::Low => regs::GPCLR0,
        };
        // Set/clear registers are write-1-to-act; other bits are untouched.
        self.regs.write(word + bank, mask);
    }

    fn read_digital(&mut self, pin: u8) -> Level {
        self.configure_direction(pin, PinMode::Input);
        let (bank, mask) = bank_location(pin);
        Level::from(self.regs.read(regs::GPLEV0 + bank) & mask != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockRegisters;

    fn gpio() -> Gpio<MockRegisters> {
        Gpio::new(MockRegisters::new())
    }

    // =========================================================================
    // Function Select Tests
    // =========================================================================

    #[test]
    fn fsel_location_math() {
        assert_eq!(fsel_location(0), (0, 0));
        assert_eq!(fsel_location(9), (0, 27));
        assert_eq!(fsel_location(10), (1, 0));
        assert_eq!(fsel_location(13), (1, 9));
        assert_eq!(fsel_location(25), (2, 15));
    }

    #[test]
    fn configure_output_sets_field() {
        let mut gpio = gpio();
        gpio.configure_direction(13, PinMode::Output);
        assert_eq!(gpio.registers().word(1), 0b001 << 9);
        assert_eq!(gpio.mode(13), PinMode::Output);
    }

    #[test]
    fn configure_clears_previous_field() {
        let mut gpio = gpio();
        gpio.configure_direction(24, PinMode::Alt3);
        assert_eq!(gpio.registers().word(2), 0b111 << 12);

        gpio.configure_direction(24, PinMode::Output);
        assert_eq!(gpio.registers().word(2), 0b001 << 12);
    }

    #[test]
    fn mode_reads_back_every_function() {
        let mut gpio = gpio();
        let modes = [
            PinMode::Input,
            PinMode::Output,
            PinMode::Alt0,
            PinMode::Alt1,
            PinMode::Alt2,
            PinMode::Alt3,
            PinMode::Alt4,
            PinMode::Alt5,
        ];
        for (pin, mode) in (20u8..).zip(modes) {
            gpio.configure_direction(pin, mode);
        }
        for (pin, mode) in (20u8..).zip(modes) {
            assert_eq!(gpio.mode(pin), mode, "pin {}", pin);
        }
    }

    #[test]
    fn configure_preserves_neighbouring_pins() {
        let mut gpio = gpio();
        gpio.configure_direction(23, PinMode::Output);
        gpio.configure_direction(24, PinMode::Output);
        gpio.configure_direction(25, PinMode::Output);

        gpio.configure_direction(24, PinMode::Input);

        assert_eq!(gpio.mode(23), PinMode::Output);
        assert_eq!(gpio.mode(24), PinMode::Input);
        assert_eq!(gpio.mode(25), PinMode::Output);
    }

    // =========================================================================
    // Output Tests
    // =========================================================================

    #[test]
    fn write_high_uses_set_register() {
        let mut gpio = gpio();
        gpio.write_digital(13, Level::High);
        assert_eq!(gpio.registers().last_write(), Some((regs::GPSET0, 1 << 13)));
    }

    #[test]
    fn write_low_uses_clear_register() {
        let mut gpio = gpio();
        gpio.write_digital(5, Level::Low);
        assert_eq!(gpio.registers().last_write(), Some((regs::GPCLR0, 1 << 5)));
    }

    #[test]
    fn write_second_bank() {
        let mut gpio = gpio();
        gpio.write_digital(40, Level::High);
        assert_eq!(
            gpio.registers().last_write(),
            Some((regs::GPSET0 + 1, 1 << 8))
        );
    }

    // =========================================================================
    // Input Tests
    // =========================================================================

    #[test]
    fn read_forces_input_mode() {
        let mut gpio = gpio();
        gpio.configure_direction(19, PinMode::Output);
        let _ = gpio.read_digital(19);
        assert_eq!(gpio.mode(19), PinMode::Input);
    }

    #[test]
    fn read_masks_level_bit() {
        let mut gpio = gpio();
        gpio.registers_mut().set_word(regs::GPLEV0, 1 << 19);
        assert_eq!(gpio.read_digital(19), Level::High);
        assert_eq!(gpio.read_digital(18), Level::Low);
        assert_eq!(gpio.read_digital(20), Level::Low);
    }

    #[test]
    fn level_register_is_word_13() {
        assert_eq!(regs::GPLEV0, 13);
        assert_eq!(regs::GPSET0, 7);
        assert_eq!(regs::GPCLR0, 10);
    }
}
