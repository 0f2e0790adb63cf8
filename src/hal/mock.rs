//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware traits, enabling the
//! LCD protocol, the button capture and the full game loop to run on a
//! desktop without a Raspberry Pi.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockRegisters`] | [`RegisterBlock`] | Register words plus a write log |
//! | [`MockGpio`] | [`GpioPins`] | Pin levels, scripted button presses, LCD bus capture |
//! | [`MockClock`] | [`Clock`], [`Delay`] | Shared virtual time; delays return instantly |
//! | [`MockLcdPanel`] | - | HD44780 model fed by the LCD bus |
//!
//! # Example
//!
//! ```rust
//! use master_mind::hal::{MockClock, MockGpio};
//! use master_mind::traits::{Delay, GpioPins, Level};
//!
//! let mut clock = MockClock::new();
//! let mut gpio = MockGpio::new().with_clock(clock.clone());
//!
//! // Button on pin 19 held between 100ms and 150ms
//! gpio.press(19, 100, 50);
//!
//! assert_eq!(gpio.read_digital(19), Level::Low);
//! clock.delay_ms(120);
//! assert_eq!(gpio.read_digital(19), Level::High);
//! ```
//!
//! [`RegisterBlock`]: crate::traits::RegisterBlock
//! [`GpioPins`]: crate::traits::GpioPins
//! [`Clock`]: crate::traits::Clock
//! [`Delay`]: crate::traits::Delay

extern crate alloc;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::config::LcdPins;
use crate::gpio::BLOCK_SIZE;
use crate::traits::{Clock, Delay, GpioPins, Level, PinMode, RegisterBlock};

/// Number of pins tracked by [`MockGpio`].
pub const MOCK_PIN_COUNT: usize = 64;

/// Silence on the button line after which [`MockGpio::with_player`] treats
/// the next read as a new capture window.
pub const PLAYER_IDLE_GAP_MS: u64 = 900;

// ============================================================================
// Register Mocks
// ============================================================================

/// Mock GPIO register block.
///
/// Backs a [`crate::gpio::Gpio`] with plain memory and records every write so
/// tests can check which register a pin operation touched.
///
/// # Example
///
/// ```rust
/// use master_mind::hal::MockRegisters;
/// use master_mind::traits::RegisterBlock;
///
/// let mut regs = MockRegisters::new();
/// regs.write(7, 1 << 13);
///
/// assert_eq!(regs.word(7), 1 << 13);
/// assert_eq!(regs.writes, vec![(7, 1 << 13)]);
/// ```
#[derive(Debug, Clone)]
pub struct MockRegisters {
    words: Vec<u32>,
    /// Every `(word, value)` written, in order.
    pub writes: Vec<(usize, u32)>,
}

impl MockRegisters {
    /// Creates a zeroed register block the size of the GPIO window.
    pub fn new() -> Self {
        Self {
            words: vec![0; BLOCK_SIZE / 4],
            writes: Vec::new(),
        }
    }

    /// Current value of `word`.
    pub fn word(&self, word: usize) -> u32 {
        self.words[word]
    }

    /// Sets `word` without logging it (simulates the hardware changing it).
    pub fn set_word(&mut self, word: usize, value: u32) {
        self.words[word] = value;
    }

    /// The most recent write.
    pub fn last_write(&self) -> Option<(usize, u32)> {
        self.writes.last().copied()
    }
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBlock for MockRegisters {
    fn read(&self, word: usize) -> u32 {
        self.words[word]
    }

    fn write(&mut self, word: usize, value: u32) {
        self.words[word] = value;
        self.writes.push((word, value));
    }
}

// ============================================================================
// Clock Mock
// ============================================================================

/// Mock clock for testing.
///
/// Virtual time in microseconds shared by all clones, so the clock handed to
/// the board and the clock held by a test advance together. Delays return
/// immediately after advancing time.
///
/// # Example
///
/// ```rust
/// use master_mind::hal::MockClock;
/// use master_mind::traits::{Clock, Delay};
///
/// let mut clock = MockClock::new();
/// let observer = clock.clone();
///
/// clock.delay_us(1500);
/// assert_eq!(observer.now_ms(), 1);
/// assert_eq!(observer.now_us(), 1500);
///
/// clock.set(1000);
/// assert_eq!(observer.now_ms(), 1000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now_us: Rc<Cell<u64>>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: u64) {
        self.now_us.set(ms * 1000);
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance(&mut self, ms: u64) {
        self.now_us.set(self.now_us.get() + ms * 1000);
    }

    /// Current time in microseconds.
    pub fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_us.get() / 1000
    }
}

impl Delay for MockClock {
    fn delay_ms(&mut self, ms: u32) {
        self.advance(u64::from(ms));
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us.set(self.now_us.get() + u64::from(us));
    }
}

// ============================================================================
// Pin Mock
// ============================================================================

/// A scripted button press on an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedPress {
    /// Input pin.
    pub pin: u8,
    /// Time the line goes high (ms).
    pub start_ms: u64,
    /// Time the line goes low again (ms, exclusive).
    pub end_ms: u64,
}

/// A scripted player: one digit per capture window.
#[derive(Debug, Clone)]
struct ScriptedPlayer {
    pin: u8,
    digits: VecDeque<u8>,
    last_read_ms: Option<u64>,
}

/// Mock GPIO pins for testing.
///
/// Tracks pin modes and output levels, logs writes, answers reads from
/// static levels or time-scripted presses, and optionally feeds the LCD bus
/// into a [`MockLcdPanel`].
///
/// # Example
///
/// ```rust
/// use master_mind::hal::MockGpio;
/// use master_mind::traits::{GpioPins, Level, PinMode};
///
/// let mut gpio = MockGpio::new();
/// gpio.configure_direction(5, PinMode::Output);
/// gpio.set_high(5);
/// gpio.set_low(5);
///
/// assert_eq!(gpio.mode(5), Some(PinMode::Output));
/// assert_eq!(gpio.writes_to(5), vec![Level::High, Level::Low]);
/// assert_eq!(gpio.rising_edges(5), 1);
/// ```
#[derive(Debug)]
pub struct MockGpio {
    modes: [Option<PinMode>; MOCK_PIN_COUNT],
    outputs: [Level; MOCK_PIN_COUNT],
    inputs: [Level; MOCK_PIN_COUNT],
    presses: Vec<ScriptedPress>,
    clock: Option<MockClock>,
    /// Every `(pin, level)` written, in order.
    pub writes: Vec<(u8, Level)>,
    /// Number of `read_digital` calls.
    pub read_count: usize,
    lcd: Option<(LcdPins, MockLcdPanel)>,
    player: Option<ScriptedPlayer>,
}

impl MockGpio {
    /// Creates a mock with every pin unconfigured and low.
    pub fn new() -> Self {
        Self {
            modes: [None; MOCK_PIN_COUNT],
            outputs: [Level::Low; MOCK_PIN_COUNT],
            inputs: [Level::Low; MOCK_PIN_COUNT],
            presses: Vec::new(),
            clock: None,
            writes: Vec::new(),
            read_count: 0,
            lcd: None,
            player: None,
        }
    }

    /// Attaches a clock used to evaluate scripted presses.
    pub fn with_clock(mut self, clock: MockClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Attaches an HD44780 model listening on `pins`.
    pub fn with_lcd(mut self, pins: LcdPins, rows: u8, cols: u8) -> Self {
        self.lcd = Some((pins, MockLcdPanel::new(rows, cols)));
        self
    }

    /// Scripts a player who enters `digits` on `pin`, one per capture window.
    ///
    /// A window is recognised as the first read of `pin` after at least
    /// [`PLAYER_IDLE_GAP_MS`] without one. The digit is then pressed that many
    /// times, the first press 100ms into the window and one per second after,
    /// each held for 500ms. Windows beyond the script get no presses.
    /// Requires [`Self::with_clock`].
    pub fn with_player(mut self, pin: u8, digits: &[u8]) -> Self {
        self.player = Some(ScriptedPlayer {
            pin,
            digits: digits.iter().copied().collect(),
            last_read_ms: None,
        });
        self
    }

    /// Digits the scripted player has not entered yet.
    pub fn player_remaining(&self) -> usize {
        self.player.as_ref().map_or(0, |p| p.digits.len())
    }

    /// Sets the static level seen on `pin` outside scripted presses.
    pub fn set_input(&mut self, pin: u8, level: Level) {
        self.inputs[pin as usize] = level;
    }

    /// Scripts a press: `pin` reads high from `start_ms` for `duration_ms`.
    pub fn press(&mut self, pin: u8, start_ms: u64, duration_ms: u64) {
        self.presses.push(ScriptedPress {
            pin,
            start_ms,
            end_ms: start_ms + duration_ms,
        });
    }

    /// Scripts `count` presses starting at `start_ms`, one every `period_ms`.
    pub fn press_repeatedly(&mut self, pin: u8, start_ms: u64, count: usize, period_ms: u64) {
        for i in 0..count as u64 {
            self.press(pin, start_ms + i * period_ms, period_ms / 2);
        }
    }

    /// Configured mode of `pin`, if any.
    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        self.modes[pin as usize]
    }

    /// Last level written to `pin`.
    pub fn output_level(&self, pin: u8) -> Level {
        self.outputs[pin as usize]
    }

    /// All levels written to `pin`, in order.
    pub fn writes_to(&self, pin: u8) -> Vec<Level> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, l)| *l)
            .collect()
    }

    /// Number of low-to-high transitions written to `pin`.
    pub fn rising_edges(&self, pin: u8) -> usize {
        let mut last = Level::Low;
        let mut edges = 0;
        for level in self.writes_to(pin) {
            if last == Level::Low && level == Level::High {
                edges += 1;
            }
            last = level;
        }
        edges
    }

    /// The attached LCD model.
    pub fn lcd_panel(&self) -> Option<&MockLcdPanel> {
        self.lcd.as_ref().map(|(_, panel)| panel)
    }

    fn now_ms(&self) -> u64 {
        self.clock.as_ref().map(Clock::now_ms).unwrap_or(0)
    }

    fn drive_player(&mut self, pin: u8, now: u64) {
        let Some(player) = self.player.as_mut().filter(|p| p.pin == pin) else {
            return;
        };
        let new_window = player
            .last_read_ms
            .map_or(true, |last| now.saturating_sub(last) >= PLAYER_IDLE_GAP_MS);
        player.last_read_ms = Some(now);
        if !new_window {
            return;
        }
        let next = player.digits.pop_front();
        if let Some(digit) = next {
            self.press_repeatedly(pin, now + 100, usize::from(digit), 1000);
        }
    }

    fn feed_lcd(&mut self, pin: u8, level: Level) {
        let outputs = &self.outputs;
        if let Some((pins, panel)) = self.lcd.as_mut() {
            // The controller latches on the falling edge of E.
            let falling = pin == pins.strobe
                && level == Level::Low
                && outputs[pin as usize] == Level::High;
            if falling {
                let mut nibble = 0u8;
                for (i, d) in pins.data.iter().enumerate() {
                    if outputs[*d as usize].is_high() {
                        nibble |= 1 << i;
                    }
                }
                panel.latch(outputs[pins.rs as usize], nibble);
            }
        }
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPins for MockGpio {
    fn configure_direction(&mut self, pin: u8, mode: PinMode) {
        self.modes[pin as usize] = Some(mode);
    }

    fn write_digital(&mut self, pin: u8, level: Level) {
        self.feed_lcd(pin, level);
        self.outputs[pin as usize] = level;
        self.writes.push((pin, level));
    }

    fn read_digital(&mut self, pin: u8) -> Level {
        self.modes[pin as usize] = Some(PinMode::Input);
        self.read_count += 1;
        let now = self.now_ms();
        self.drive_player(pin, now);
        let pressed = self
            .presses
            .iter()
            .any(|p| p.pin == pin && p.start_ms <= now && now < p.end_ms);
        if pressed {
            Level::High
        } else {
            self.inputs[pin as usize]
        }
    }
}

// ============================================================================
// LCD Panel Model
// ============================================================================

/// Minimal HD44780 model driven by latched bus nibbles.
///
/// Starts in 8-bit mode like the real controller after power-on, switches to
/// 4-bit mode on a function-set with DL clear, then assembles nibble pairs.
/// Tracks DDRAM for a `rows x cols` panel and keeps a snapshot of the screen
/// text each time it is cleared.
#[derive(Debug, Clone)]
pub struct MockLcdPanel {
    rows: u8,
    cols: u8,
    four_bit: bool,
    pending: Option<u8>,
    address: u8,
    cgram: bool,
    ddram: Vec<u8>,
    /// Every decoded `(is_data, byte)` after the switch to 4-bit mode.
    pub bytes: Vec<(bool, u8)>,
    /// Commands received, including the 8-bit mode ones.
    pub commands: Vec<u8>,
    /// Screen text captured right before each clear (rows joined by `'\n'`).
    pub frames: Vec<String>,
    /// Last display-control flags received.
    pub control: u8,
    /// Last function-set received.
    pub function: u8,
    /// CGRAM contents (8 glyphs x 8 rows).
    pub cgram_rows: [u8; 64],
}

impl MockLcdPanel {
    /// Creates a blank panel.
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            four_bit: false,
            pending: None,
            address: 0,
            cgram: false,
            ddram: vec![b' '; 0x80],
            bytes: Vec::new(),
            commands: Vec::new(),
            frames: Vec::new(),
            control: 0,
            function: 0,
            cgram_rows: [0; 64],
        }
    }

    /// Whether the panel has been switched to 4-bit transfers.
    pub fn is_four_bit(&self) -> bool {
        self.four_bit
    }

    /// Current DDRAM (or CGRAM) address counter.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Text of one row.
    pub fn line(&self, row: u8) -> String {
        let base = if row == 0 { 0x00 } else { 0x40 };
        self.ddram[base..base + self.cols as usize]
            .iter()
            .map(|b| *b as char)
            .collect()
    }

    /// All rows joined by `'\n'`, trailing spaces trimmed per row.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for row in 0..self.rows {
            if row > 0 {
                out.push('\n');
            }
            out.push_str(self.line(row).trim_end());
        }
        out
    }

    /// Whether `needle` was on screen at any clear, or is on screen now.
    pub fn has_shown(&self, needle: &str) -> bool {
        self.frames.iter().any(|f| f.contains(needle)) || self.text().contains(needle)
    }

    fn latch(&mut self, rs: Level, nibble: u8) {
        if !self.four_bit {
            // Only D4..D7 are wired, so an 8-bit transfer carries the high nibble.
            self.execute(rs.is_high(), nibble << 4);
            return;
        }
        match self.pending.take() {
            None => self.pending = Some(nibble),
            Some(high) => {
                let byte = (high << 4) | nibble;
                self.bytes.push((rs.is_high(), byte));
                self.execute(rs.is_high(), byte);
            }
        }
    }

    fn execute(&mut self, is_data: bool, byte: u8) {
        if is_data {
            if self.cgram {
                self.cgram_rows[(self.address & 0x3F) as usize] = byte;
                self.address = (self.address + 1) & 0x3F;
            } else {
                self.ddram[(self.address & 0x7F) as usize] = byte;
                self.address = (self.address + 1) & 0x7F;
            }
            return;
        }

        self.commands.push(byte);
        if byte & 0x80 != 0 {
            self.cgram = false;
            self.address = byte & 0x7F;
        } else if byte & 0x40 != 0 {
            self.cgram = true;
            self.address = byte & 0x3F;
        } else if byte & 0x20 != 0 {
            self.function = byte;
            if byte & 0x10 == 0 {
                self.four_bit = true;
            }
        } else if byte & 0x08 != 0 {
            self.control = byte & 0x07;
        } else if byte == 0x01 {
            let frame = self.text();
            if !frame.trim().is_empty() {
                self.frames.push(frame);
            }
            self.ddram.iter_mut().for_each(|b| *b = b' ');
            self.address = 0;
            self.cgram = false;
        } else if byte & 0xFE == 0x02 {
            self.address = 0;
            self.cgram = false;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
