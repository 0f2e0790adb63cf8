//! HD44780 character LCD driver over a 4-bit GPIO bus.
//!
//! [`LcdDriver`] speaks the controller protocol by toggling individual pins:
//! a register-select line, an enable (strobe) line and four data lines
//! D4..D7. Each byte goes out as two nibbles, high nibble first, each latched
//! by a strobe pulse. Nothing is read back from the panel, so correctness
//! rests on the settle delays in [`TimingConfig`].
//!
//! The driver tracks the cursor itself and implements a minimal terminal:
//! writing past the last column wraps to the start of the next row (and from
//! the last row back to the first). There is no scrolling.
//!
//! # Example
//!
//! ```rust
//! use master_mind::config::{LcdConfig, PinConfig, TimingConfig};
//! use master_mind::hal::{Board, MockClock, MockGpio};
//! use master_mind::lcd::LcdDriver;
//!
//! let pins = PinConfig::default().lcd;
//! let gpio = MockGpio::new().with_lcd(pins, 2, 16);
//! let board = Board::new(gpio, MockClock::new());
//!
//! let mut lcd = LcdDriver::new(board, pins, LcdConfig::default(), &TimingConfig::default());
//! lcd.init();
//! lcd.put_str("Welcome to");
//! lcd.set_position(1, 1);
//! lcd.put_str("MasterMind");
//!
//! let panel = lcd.bus().gpio.lcd_panel().unwrap();
//! assert_eq!(panel.text(), "Welcome to\n MasterMind");
//! ```

use crate::config::{LcdConfig, LcdPins, TimingConfig};
use crate::traits::{Delay, GpioPins, Level, PinMode};

/// HD44780 instruction set.
pub mod commands {
    /// Clear display and return home.
    pub const CLEAR: u8 = 0x01;
    /// Return home.
    pub const HOME: u8 = 0x02;
    /// Entry mode set.
    pub const ENTRY: u8 = 0x04;
    /// Display on/off control.
    pub const CTRL: u8 = 0x08;
    /// Cursor or display shift.
    pub const CDSHIFT: u8 = 0x10;
    /// Function set.
    pub const FUNC: u8 = 0x20;
    /// Set CGRAM address.
    pub const CGRAM: u8 = 0x40;
    /// Set DDRAM address.
    pub const DGRAM: u8 = 0x80;

    /// Entry mode: shift display.
    pub const ENTRY_SH: u8 = 0x01;
    /// Entry mode: increment address.
    pub const ENTRY_ID: u8 = 0x02;

    /// Control: blink on.
    pub const BLINK_CTRL: u8 = 0x01;
    /// Control: cursor on.
    pub const CURSOR_CTRL: u8 = 0x02;
    /// Control: display on.
    pub const DISPLAY_CTRL: u8 = 0x04;

    /// Function: 5x10 font.
    pub const FUNC_F: u8 = 0x04;
    /// Function: two lines.
    pub const FUNC_N: u8 = 0x08;
    /// Function: 8-bit interface.
    pub const FUNC_DL: u8 = 0x10;

    /// Shift: right/left.
    pub const CDSHIFT_RL: u8 = 0x04;

    /// DDRAM offset of the second row.
    pub const ROW_OFFSET: u8 = 0x40;
}

use commands::*;

/// A hollow box with a crossbar, for CGRAM slot 0.
pub const BOX_GLYPH: [u8; 8] = [
    0b11111, 0b10001, 0b10001, 0b10101, 0b11111, 0b10001, 0b10001, 0b11111,
];

/// Driver-side view of the panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LcdState {
    /// Cursor column.
    pub cx: u8,
    /// Cursor row.
    pub cy: u8,
    /// Display-control flags (`DISPLAY_CTRL | CURSOR_CTRL | BLINK_CTRL`).
    pub control: u8,
}

/// Settle delays the driver needs, copied out of [`TimingConfig`].
#[derive(Clone, Copy, Debug)]
struct LcdTiming {
    init_ms: u32,
    command_ms: u32,
    clear_ms: u32,
    strobe_us: u32,
}

/// HD44780 driver in 4-bit mode.
///
/// # Type Parameter
///
/// - `B`: The bus, anything with pins and delays ([`GpioPins`] + [`Delay`]).
///   The driver owns it; other users reach it through [`Self::bus_mut`].
pub struct LcdDriver<B: GpioPins + Delay> {
    bus: B,
    pins: LcdPins,
    rows: u8,
    cols: u8,
    timing: LcdTiming,
    state: LcdState,
}

impl<B: GpioPins + Delay> LcdDriver<B> {
    /// Creates a driver. Does not touch the hardware; call [`Self::init`].
    pub fn new(bus: B, pins: LcdPins, geometry: LcdConfig, timing: &TimingConfig) -> Self {
        Self {
            bus,
            pins,
            rows: geometry.rows.max(1),
            cols: geometry.cols.max(1),
            timing: LcdTiming {
                init_ms: timing.lcd_init_ms,
                command_ms: timing.lcd_command_ms,
                clear_ms: timing.lcd_clear_ms,
                strobe_us: timing.strobe_hold_us,
            },
            state: LcdState::default(),
        }
    }

    /// Cold-start handshake and default modes.
    ///
    /// Leaves the panel in 4-bit mode, two lines if `rows > 1`, display on,
    /// cursor and blink off, cleared, address auto-increment.
    pub fn init(&mut self) {
        let pins = self.pins;
        for pin in [pins.rs, pins.strobe].into_iter().chain(pins.data) {
            self.bus.write_digital(pin, Level::Low);
            self.bus.configure_direction(pin, PinMode::Output);
        }
        self.bus.delay_ms(self.timing.init_ms);

        // The controller may be in 8-bit mode or half way through a 4-bit
        // transfer; three 8-bit function sets resynchronise it either way.
        for _ in 0..3 {
            self.put4_command((FUNC | FUNC_DL) >> 4);
            self.bus.delay_ms(self.timing.init_ms);
        }
        self.put4_command(FUNC >> 4);
        self.bus.delay_ms(self.timing.init_ms);

        if self.rows > 1 {
            self.send_command(FUNC | FUNC_N);
            self.bus.delay_ms(self.timing.init_ms);
        }

        self.display(true);
        self.cursor(false);
        self.blink(false);
        self.clear();

        self.send_command(ENTRY | ENTRY_ID);
        self.send_command(CDSHIFT | CDSHIFT_RL);
        log::debug!("lcd initialised ({}x{}, 4-bit)", self.cols, self.rows);
    }

    /// Sends an instruction byte and waits for it to execute.
    pub fn send_command(&mut self, command: u8) {
        log::trace!("lcd command {:#04x}", command);
        self.bus.write_digital(self.pins.rs, Level::Low);
        self.send_byte(command);
        self.bus.delay_ms(self.timing.command_ms);
    }

    /// Sends a data byte (a character code, or a CGRAM row).
    pub fn send_data(&mut self, data: u8) {
        self.bus.write_digital(self.pins.rs, Level::High);
        self.send_byte(data);
    }

    /// Clears the screen and homes the cursor.
    pub fn clear(&mut self) {
        self.send_command(CLEAR);
        self.state.cx = 0;
        self.state.cy = 0;
        self.bus.delay_ms(self.timing.clear_ms);
    }

    /// Homes the cursor without clearing.
    pub fn home(&mut self) {
        self.send_command(HOME);
        self.state.cx = 0;
        self.state.cy = 0;
        self.bus.delay_ms(self.timing.clear_ms);
    }

    /// Moves the cursor. Positions outside the panel are ignored.
    pub fn set_position(&mut self, x: u8, y: u8) {
        if x >= self.cols || y >= self.rows {
            return;
        }
        self.send_command(ddram_address(x, y));
        self.state.cx = x;
        self.state.cy = y;
    }

    /// Writes one character at the cursor and advances it, wrapping rows.
    pub fn put_char(&mut self, c: u8) {
        self.send_data(c);

        self.state.cx += 1;
        if self.state.cx == self.cols {
            self.state.cx = 0;
            self.state.cy = (self.state.cy + 1) % self.rows;
            // Row 1 does not follow row 0 in DDRAM, so re-address explicitly.
            self.send_command(ddram_address(self.state.cx, self.state.cy));
        }
    }

    /// Writes each byte of `text` with [`Self::put_char`].
    pub fn put_str(&mut self, text: &str) {
        for c in text.bytes() {
            self.put_char(c);
        }
    }

    /// Turns the whole display on or off.
    pub fn display(&mut self, on: bool) {
        self.set_control(DISPLAY_CTRL, on);
    }

    /// Shows or hides the underline cursor.
    pub fn cursor(&mut self, on: bool) {
        self.set_control(CURSOR_CTRL, on);
    }

    /// Enables or disables the blinking block cursor.
    pub fn blink(&mut self, on: bool) {
        self.set_control(BLINK_CTRL, on);
    }

    /// Programs CGRAM glyph `slot` (0-7) from an 8-row 5-pixel bitmap.
    ///
    /// The glyph is then printable as character code `slot`. The cursor's
    /// DDRAM address is restored afterwards.
    pub fn define_char(&mut self, slot: u8, bitmap: &[u8; 8]) {
        self.send_command(CGRAM | ((slot & 0x07) << 3));
        for row in bitmap {
            self.send_data(row & 0x1F);
        }
        self.send_command(ddram_address(self.state.cx, self.state.cy));
    }

    /// Snapshot of the tracked cursor and control flags.
    pub fn state(&self) -> LcdState {
        self.state
    }

    /// Number of rows.
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Shared access to the bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Exclusive access to the bus, for the LEDs and the button.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn set_control(&mut self, flag: u8, on: bool) {
        if on {
            self.state.control |= flag;
        } else {
            self.state.control &= !flag;
        }
        self.send_command(CTRL | self.state.control);
    }

    fn send_byte(&mut self, byte: u8) {
        self.write_nibble(byte >> 4);
        self.strobe();
        self.write_nibble(byte & 0x0F);
        self.strobe();
    }

    /// A single-nibble instruction, used only during the cold start.
    fn put4_command(&mut self, nibble: u8) {
        log::trace!("lcd nibble {:#03x}", nibble);
        self.bus.write_digital(self.pins.rs, Level::Low);
        self.write_nibble(nibble);
        self.strobe();
    }

    fn write_nibble(&mut self, nibble: u8) {
        for (i, pin) in self.pins.data.iter().enumerate() {
            self.bus.write_digital(*pin, Level::from((nibble >> i) & 1 == 1));
        }
    }

    /// The controller latches on the falling edge of E.
    fn strobe(&mut self) {
        self.bus.write_digital(self.pins.strobe, Level::High);
        self.bus.delay_us(self.timing.strobe_us);
        self.bus.write_digital(self.pins.strobe, Level::Low);
        self.bus.delay_us(self.timing.strobe_us);
    }
}

/// Set-DDRAM-address instruction for column `x` of row `y`.
#[inline]
const fn ddram_address(x: u8, y: u8) -> u8 {
    x | (DGRAM | if y > 0 { ROW_OFFSET } else { 0x00 })
}
