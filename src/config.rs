//! Game, wiring and timing configuration.
//!
//! Every pin number and every delay used by the LCD driver, the button
//! capture and the game loop comes from here, so a different wiring or a
//! slower panel only needs a different [`Config`].
//!
//! # Example
//!
//! ```rust
//! use master_mind::config::{Config, GameConfig, PinConfig, TimingConfig};
//!
//! // Use defaults (the coursework wiring on a 16x2 panel)
//! let config = Config::default();
//! assert_eq!(config.pins.button, 19);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_pins(PinConfig::default().with_button(26))
//!     .with_timing(TimingConfig::default().with_capture_window_ms(3000))
//!     .with_game(GameConfig::default().with_debug(true));
//! ```

use crate::sequence::COLS;

/// Largest supported panel width.
pub const MAX_LCD_COLS: u8 = 16;

/// Largest supported panel height.
pub const MAX_LCD_ROWS: u8 = 2;

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// GPIO wiring
    pub pins: PinConfig,
    /// LCD geometry
    pub lcd: LcdConfig,
    /// Protocol and game pacing delays
    pub timing: TimingConfig,
    /// Game rules and flags
    pub game: GameConfig,
}

impl Config {
    /// Set pin configuration
    pub fn with_pins(mut self, pins: PinConfig) -> Self {
        self.pins = pins;
        self
    }

    /// Set LCD configuration
    pub fn with_lcd(mut self, lcd: LcdConfig) -> Self {
        self.lcd = lcd;
        self
    }

    /// Set timing configuration
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set game configuration
    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }
}

// ============================================================================
// Pin Config
// ============================================================================

/// LCD control and data lines (BCM numbering).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LcdPins {
    /// Register select: low for commands, high for data
    pub rs: u8,
    /// Enable / strobe line
    pub strobe: u8,
    /// D4..D7, bit `i` of a nibble goes out on `data[i]`
    pub data: [u8; 4],
}

impl Default for LcdPins {
    fn default() -> Self {
        Self {
            rs: 25,
            strobe: 24,
            data: [23, 10, 27, 22],
        }
    }
}

/// GPIO wiring (BCM numbering)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinConfig {
    /// Green LED, used to blink counts
    pub green_led: u8,
    /// Red LED, used for separators and window ends
    pub red_led: u8,
    /// Push button, reads high while pressed
    pub button: u8,
    /// LCD lines
    pub lcd: LcdPins,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            green_led: 13,
            red_led: 5,
            button: 19,
            lcd: LcdPins::default(),
        }
    }
}

impl PinConfig {
    /// Set the green LED pin
    pub fn with_green_led(mut self, pin: u8) -> Self {
        self.green_led = pin;
        self
    }

    /// Set the red LED pin
    pub fn with_red_led(mut self, pin: u8) -> Self {
        self.red_led = pin;
        self
    }

    /// Set the button pin
    pub fn with_button(mut self, pin: u8) -> Self {
        self.button = pin;
        self
    }

    /// Set the LCD pins
    pub fn with_lcd(mut self, lcd: LcdPins) -> Self {
        self.lcd = lcd;
        self
    }
}

// ============================================================================
// LCD Config
// ============================================================================

/// Character LCD geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LcdConfig {
    /// Number of text rows (1 or 2)
    pub rows: u8,
    /// Number of columns (1 to 16)
    pub cols: u8,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            rows: MAX_LCD_ROWS,
            cols: MAX_LCD_COLS,
        }
    }
}

impl LcdConfig {
    /// Set the geometry, clamped to the supported 16x2 maximum
    pub fn with_size(mut self, rows: u8, cols: u8) -> Self {
        self.rows = rows.clamp(1, MAX_LCD_ROWS);
        self.cols = cols.clamp(1, MAX_LCD_COLS);
        self
    }
}

// ============================================================================
// Timing Config
// ============================================================================

/// Protocol delays and game pacing
///
/// The LCD values are minimums required by the controller; shortening them
/// corrupts the display rather than just speeding it up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// Settle after power-on and after each cold-start step (ms)
    pub lcd_init_ms: u32,
    /// Settle after an ordinary command (ms)
    pub lcd_command_ms: u32,
    /// Settle after clear/home (ms)
    pub lcd_clear_ms: u32,
    /// Strobe high and low hold time (µs)
    pub strobe_hold_us: u32,
    /// Input capture window (ms)
    pub capture_window_ms: u32,
    /// Button poll interval (ms)
    pub poll_interval_ms: u32,
    /// Lockout after a detected press (ms)
    pub debounce_ms: u32,
    /// How long "Button Pressed" stays on the LCD (ms)
    pub press_feedback_ms: u32,
    /// LED on and off time for one blink (ms)
    pub blink_ms: u32,
    /// Welcome and round banners (ms)
    pub banner_ms: u32,
    /// "Press the button" prompt before a window opens (ms)
    pub prompt_ms: u32,
    /// Red LED on after a window closes (ms)
    pub window_end_ms: u32,
    /// Short pause between steps (ms)
    pub pause_ms: u32,
    /// Round result hold (ms)
    pub result_ms: u32,
    /// "YOU LOSE!" hold (ms)
    pub lose_ms: u32,
    /// "Ending game" hold (ms)
    pub ending_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            lcd_init_ms: 35,
            lcd_command_ms: 2,
            lcd_clear_ms: 5,
            strobe_hold_us: 50,
            capture_window_ms: 5000,
            poll_interval_ms: 10,
            debounce_ms: 500,
            press_feedback_ms: 300,
            blink_ms: 200,
            banner_ms: 2000,
            prompt_ms: 1000,
            window_end_ms: 2000,
            pause_ms: 500,
            result_ms: 1000,
            lose_ms: 5000,
            ending_ms: 1000,
        }
    }
}

impl TimingConfig {
    /// Set the capture window
    pub fn with_capture_window_ms(mut self, ms: u32) -> Self {
        self.capture_window_ms = ms;
        self
    }

    /// Set the button poll interval (at least 1ms)
    pub fn with_poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms.max(1);
        self
    }

    /// Set the press debounce delay
    pub fn with_debounce_ms(mut self, ms: u32) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the LED blink half-period
    pub fn with_blink_ms(mut self, ms: u32) -> Self {
        self.blink_ms = ms;
        self
    }
}

// ============================================================================
// Game Config
// ============================================================================

/// Game rules and invocation flags
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Rounds before the game is lost
    pub max_attempts: u8,
    /// Press count cap per digit
    pub max_presses: u8,
    /// Extra progress output
    pub verbose: bool,
    /// Reveal the secret at game start
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            max_presses: COLS,
            verbose: false,
            debug: false,
        }
    }
}

impl GameConfig {
    /// Set the number of rounds (at least 1)
    pub fn with_max_attempts(mut self, attempts: u8) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set debug output
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
