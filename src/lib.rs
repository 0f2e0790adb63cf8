//! # master-mind
//!
//! The MasterMind code-breaking game for a Raspberry Pi with two LEDs, a push
//! button and a 16x2 HD44780 character LCD.
//!
//! ## Features
//!
//! - **GPIO register access**: function-select, set, clear and level registers
//!   behind a [`RegisterBlock`](traits::RegisterBlock) seam
//! - **HD44780 driver**: 4-bit protocol bit-banged over individual GPIO lines
//! - **Button capture**: presses counted in a fixed window, edge-triggered and debounced
//! - **Matcher**: exact / approximate counts without double counting
//! - **Game loop**: rounds and turns rendered on the LEDs and the LCD
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Register, pin and time abstractions
//! - `gpio` - Register-level pin operations
//! - `lcd` - HD44780 driver
//! - `input` - Timed button capture
//! - `matcher` - Sequence matching
//! - `game` - Round/turn controller
//! - `hal` - Concrete implementations (mock for testing, memory-mapped for the Pi)
//!
//! ## Example
//!
//! ```rust
//! use master_mind::{count_matches, MatchResult, Sequence};
//!
//! let secret = Sequence::from_code(231).unwrap();
//! let result = count_matches(&[1, 2, 3], secret.digits());
//! assert_eq!(result, MatchResult::new(0, 3));
//! assert_eq!(result.to_string(), "0 exact, 3 approximate");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Game, wiring and timing configuration.
pub mod config;
/// Error type for sequence validation.
pub mod error;
/// Round/turn state machine driving LEDs, LCD and button.
pub mod game;
/// Register-level GPIO pin operations.
pub mod gpio;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Timed button-press capture.
pub mod input;
/// HD44780 character LCD driver (4-bit mode).
pub mod lcd;
/// Exact/approximate match counting.
pub mod matcher;
/// Secret and guess sequences.
pub mod sequence;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use config::{Config, GameConfig, LcdConfig, LcdPins, PinConfig, TimingConfig};
pub use error::GameError;
pub use game::{GameController, GameOutcome, GameState, Phase, RoundState};
pub use gpio::Gpio;
pub use input::ButtonCapture;
pub use lcd::{LcdDriver, LcdState};
pub use matcher::{check_codes, count_matches, MatchResult};
pub use sequence::{Guess, Sequence, COLS, SEQL};
pub use traits::{Clock, Delay, GpioPins, Level, PinMode, RegisterBlock};
