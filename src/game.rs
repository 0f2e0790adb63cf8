//! Round and turn state machine.
//!
//! [`GameController`] runs the whole game on the board it reaches through the
//! LCD driver:
//!
//! ```text
//! Welcome -> RoundStart -> TurnInput (x SEQL) -> Scoring -+-> Win
//!                ^                                       |
//!                +---------------------------------------+-> Lose (after max_attempts)
//! ```
//!
//! Each turn captures one digit with [`ButtonCapture`], echoes it on the
//! green LED, and after the last turn the guess is matched against the
//! secret. Results are shown on the green LED (counts), the red LED
//! (separators) and the LCD. A plain-text transcript goes to the `log`
//! facade at info level.
//!
//! # Example
//!
//! ```rust
//! use master_mind::config::Config;
//! use master_mind::game::GameController;
//! use master_mind::hal::{Board, MockClock, MockGpio};
//! use master_mind::lcd::LcdDriver;
//! use master_mind::Sequence;
//!
//! let config = Config::default();
//! let clock = MockClock::new();
//! let gpio = MockGpio::new()
//!     .with_clock(clock.clone())
//!     .with_lcd(config.pins.lcd, 2, 16)
//!     .with_player(config.pins.button, &[2, 3, 1]);
//!
//! let board = Board::new(gpio, clock);
//! let mut lcd = LcdDriver::new(board, config.pins.lcd, config.lcd, &config.timing);
//! lcd.init();
//!
//! let secret = Sequence::from_code(231).unwrap();
//! let mut game = GameController::new(lcd, secret, config);
//! let outcome = game.play();
//!
//! assert!(outcome.found);
//! assert_eq!(outcome.attempts, 1);
//! ```

use core::fmt::{self, Write};

use crate::config::{Config, MAX_LCD_COLS};
use crate::input::ButtonCapture;
use crate::lcd::LcdDriver;
use crate::matcher::{count_matches, MatchResult};
use crate::sequence::{Guess, Sequence, SEQL};
use crate::traits::{Clock, Delay, GpioPins, Level, PinMode};

/// One LCD row of text.
pub type LcdLine = heapless::String<{ MAX_LCD_COLS as usize }>;

/// Formats `args` into an [`LcdLine`]; pieces that do not fit are dropped.
pub fn lcd_line(args: fmt::Arguments<'_>) -> LcdLine {
    let mut line = LcdLine::new();
    let _ = line.write_fmt(args);
    line
}

// ============================================================================
// State
// ============================================================================

/// Where the game loop is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Before the first round.
    #[default]
    Welcome,
    /// Announcing a round.
    RoundStart,
    /// Capturing a digit.
    TurnInput,
    /// Matching and showing the result.
    Scoring,
    /// Secret found.
    Win,
    /// Out of attempts.
    Lose,
}

impl Phase {
    /// Whether the game is over.
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Win | Phase::Lose)
    }
}

/// Round and turn counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundState {
    /// Rounds started so far.
    pub attempts: u8,
    /// Turn within the current round (1-based, 0 between rounds).
    pub turn: u8,
    /// Whether the secret has been found.
    pub found: bool,
}

/// Snapshot of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Current phase.
    pub phase: Phase,
    /// Counters.
    pub round: RoundState,
    /// Guess being assembled; digits are 0 until captured.
    pub guess: Guess,
    /// Result of the last scored round.
    pub last_result: Option<MatchResult>,
}

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameOutcome {
    /// Whether the secret was found.
    pub found: bool,
    /// Rounds played.
    pub attempts: u8,
    /// Result of the final round.
    pub last_result: Option<MatchResult>,
}

// ============================================================================
// Controller
// ============================================================================

/// Runs the game on an initialised LCD driver and its board.
///
/// # Type Parameter
///
/// - `B`: The board: pins, delays and a clock. LEDs and the button are
///   driven through the LCD driver's bus.
pub struct GameController<B: GpioPins + Delay + Clock> {
    lcd: LcdDriver<B>,
    capture: ButtonCapture,
    secret: Sequence,
    config: Config,
    state: GameState,
}

impl<B: GpioPins + Delay + Clock> GameController<B> {
    /// Takes ownership of an initialised LCD driver and configures the LEDs
    /// as outputs.
    pub fn new(mut lcd: LcdDriver<B>, secret: Sequence, config: Config) -> Self {
        let pins = config.pins;
        for led in [pins.green_led, pins.red_led] {
            lcd.bus_mut().configure_direction(led, PinMode::Output);
        }
        let capture = ButtonCapture::new(pins.button, &config.timing);

        if config.game.debug {
            log::info!("Secret: {}", secret);
        }

        Self {
            lcd,
            capture,
            secret,
            config,
            state: GameState::default(),
        }
    }

    /// Welcome banner: "Welcome to" / " MasterMind", then clear.
    pub fn welcome(&mut self) {
        log::debug!("printing welcome message on the LCD");
        self.state.phase = Phase::Welcome;
        self.lcd.put_str("Welcome to");
        self.lcd.set_position(1, 1);
        self.lcd.put_str("MasterMind");
        self.pause(self.config.timing.banner_ms);
        self.lcd.clear();
    }

    /// "Press enter" / "to start". Left on screen; waiting for the key is
    /// the caller's business.
    pub fn show_start_prompt(&mut self) {
        self.lcd.put_str("Press enter");
        self.lcd.set_position(0, 1);
        self.lcd.put_str("to start");
    }

    /// Plays rounds until the secret is found or the attempts run out.
    pub fn play(&mut self) -> GameOutcome {
        let pins = self.config.pins;
        self.led(pins.green_led, Level::Low);
        self.led(pins.red_led, Level::Low);

        self.state.round = RoundState::default();
        self.state.guess = [0; SEQL];
        self.state.last_result = None;

        while self.state.round.attempts < self.config.game.max_attempts {
            self.start_round();
            for turn in 1..=SEQL as u8 {
                self.take_turn(turn);
            }
            let result = self.score();
            if result.is_solved(SEQL) {
                self.state.round.found = true;
                break;
            }
            self.next_round();
        }

        if self.state.round.found {
            self.win();
        } else {
            self.lose();
        }

        GameOutcome {
            found: self.state.round.found,
            attempts: self.state.round.attempts,
            last_result: self.state.last_result,
        }
    }

    /// Snapshot of the game.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The secret.
    pub fn secret(&self) -> &Sequence {
        &self.secret
    }

    /// The LCD driver (and through it the board).
    pub fn lcd(&self) -> &LcdDriver<B> {
        &self.lcd
    }

    // ------------------------------------------------------------------------
    // Phases
    // ------------------------------------------------------------------------

    fn start_round(&mut self) {
        self.state.phase = Phase::RoundStart;
        self.state.round.attempts += 1;
        self.state.round.turn = 0;
        let attempts = self.state.round.attempts;

        self.lcd.clear();
        log::info!("Round: {}", attempts);
        self.lcd.put_str("Starting");
        self.lcd.set_position(0, 1);
        self.lcd.put_str(&lcd_line(format_args!("Round: {}", attempts)));
        self.pause(self.config.timing.banner_ms);
    }

    fn take_turn(&mut self, turn: u8) {
        let timing = self.config.timing.clone();
        let pins = self.config.pins;
        self.state.phase = Phase::TurnInput;
        self.state.round.turn = turn;

        log::info!("Turn: {}", turn);
        if self.config.game.verbose {
            log::info!("Enter a sequence of {} numbers", SEQL);
        }
        self.lcd.clear();
        self.lcd.put_str("Press the button");
        self.lcd.set_position(0, 1);
        self.lcd.put_str("now");
        self.pause(timing.prompt_ms);
        self.lcd.clear();

        let presses = self
            .capture
            .capture_digit(&mut self.lcd, self.config.game.max_presses);
        log::info!("Button pressed {} times", presses);
        self.state.guess[usize::from(turn - 1)] = presses;

        // window closed
        self.led(pins.red_led, Level::High);
        self.pause(timing.window_end_ms);
        self.led(pins.red_led, Level::Low);

        self.blink(pins.green_led, presses);
        self.pause(timing.pause_ms);

        if usize::from(turn) == SEQL {
            self.blink(pins.red_led, 2);
        }
    }

    fn score(&mut self) -> MatchResult {
        let timing = self.config.timing.clone();
        let pins = self.config.pins;
        self.state.phase = Phase::Scoring;

        let result = count_matches(&self.state.guess, self.secret.digits());
        self.state.last_result = Some(result);
        log::info!("{} exact", result.exact);
        log::info!("{} approximate", result.approximate);
        self.pause(timing.pause_ms);

        self.lcd.clear();
        self.blink(pins.green_led, result.exact);
        self.lcd.set_position(1, 0);
        self.lcd
            .put_str(&lcd_line(format_args!("{} exact", result.exact)));

        self.blink(pins.red_led, 1);

        self.blink(pins.green_led, result.approximate);
        self.lcd.set_position(1, 1);
        self.lcd
            .put_str(&lcd_line(format_args!("{} approximate", result.approximate)));

        self.pause(timing.result_ms);
        self.lcd.clear();
        result
    }

    fn next_round(&mut self) {
        let timing = self.config.timing.clone();
        self.state.guess = [0; SEQL];
        self.blink(self.config.pins.red_led, 3);
        self.pause(timing.pause_ms);
        log::info!("Starting next round");
        self.pause(timing.banner_ms);
    }

    fn win(&mut self) {
        let timing = self.config.timing.clone();
        let pins = self.config.pins;
        self.state.phase = Phase::Win;

        log::info!("SUCCESS");
        self.lcd.put_str("SUCCESS");
        self.pause(timing.pause_ms);

        self.lcd.set_position(0, 1);
        self.lcd.put_str(&lcd_line(format_args!(
            "Attempts: {}",
            self.state.round.attempts
        )));

        self.led(pins.red_led, Level::High);
        self.blink(pins.green_led, 3);
        self.pause(timing.pause_ms);
        self.lcd.clear();

        self.end_screen();
    }

    fn lose(&mut self) {
        let timing = self.config.timing.clone();
        self.state.phase = Phase::Lose;

        self.lcd.clear();
        log::info!("Sequence not found");
        self.lcd.put_str("YOU LOSE!");
        self.pause(timing.lose_ms);
        self.lcd.clear();

        self.end_screen();
    }

    fn end_screen(&mut self) {
        self.lcd.put_str("Ending game");
        self.pause(self.config.timing.ending_ms);
        self.lcd.clear();
        self.lcd
            .bus_mut()
            .write_output(self.config.pins.red_led, Level::Low);
    }

    // ------------------------------------------------------------------------
    // LEDs and pacing
    // ------------------------------------------------------------------------

    fn led(&mut self, pin: u8, level: Level) {
        self.lcd.bus_mut().write_digital(pin, level);
    }

    /// `count` blinks: on for `blink_ms`, off for `blink_ms`.
    fn blink(&mut self, pin: u8, count: u8) {
        let half = self.config.timing.blink_ms;
        for _ in 0..count {
            self.led(pin, Level::High);
            self.pause(half);
            self.led(pin, Level::Low);
            self.pause(half);
        }
    }

    fn pause(&mut self, ms: u32) {
        self.lcd.bus_mut().delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::hal::{Board, MockClock, MockGpio};

    type MockGame = GameController<Board<MockGpio, MockClock>>;

    const GREEN: u8 = 13;
    const RED: u8 = 5;
    const BUTTON: u8 = 19;

    fn game_with(config: Config, secret: u32, digits: &[u8]) -> (MockGame, MockClock) {
        let clock = MockClock::new();
        let gpio = MockGpio::new()
            .with_clock(clock.clone())
            .with_lcd(config.pins.lcd, 2, 16)
            .with_player(config.pins.button, digits);
        let board = Board::new(gpio, clock.clone());
        let mut lcd = LcdDriver::new(board, config.pins.lcd, config.lcd, &config.timing);
        lcd.init();
        let secret = Sequence::from_code(secret).unwrap();
        (GameController::new(lcd, secret, config), clock)
    }

    fn game(secret: u32, digits: &[u8]) -> (MockGame, MockClock) {
        game_with(Config::default(), secret, digits)
    }

    fn gpio(game: &MockGame) -> &MockGpio {
        &game.lcd().bus().gpio
    }

    // =========================================================================
    // Line Formatting Tests
    // =========================================================================

    #[test]
    fn lcd_line_formats() {
        assert_eq!(lcd_line(format_args!("Round: {}", 3)).as_str(), "Round: 3");
    }

    #[test]
    fn lcd_line_drops_overflow() {
        let line = lcd_line(format_args!("{}{}", "0123456789ABCDEF", "xyz"));
        assert_eq!(line.as_str(), "0123456789ABCDEF");
    }

    // =========================================================================
    // Setup Tests
    // =========================================================================

    #[test]
    fn new_configures_leds_as_outputs() {
        let (game, _) = game(231, &[]);
        assert_eq!(gpio(&game).mode(GREEN), Some(PinMode::Output));
        assert_eq!(gpio(&game).mode(RED), Some(PinMode::Output));
        assert_eq!(game.state().phase, Phase::Welcome);
    }

    #[test]
    fn welcome_shows_banner_then_clears() {
        let (mut game, clock) = game(231, &[]);
        let start = clock.now_ms();
        game.welcome();

        let panel = gpio(&game).lcd_panel().unwrap();
        assert_eq!(panel.frames.last().unwrap(), "Welcome to\n MasterMind");
        assert_eq!(panel.text(), "\n");
        assert!(clock.now_ms() - start >= 2000);
    }

    #[test]
    fn start_prompt_stays_on_screen() {
        let (mut game, _) = game(231, &[]);
        game.show_start_prompt();
        let panel = gpio(&game).lcd_panel().unwrap();
        assert_eq!(panel.text(), "Press enter\nto start");
    }

    // =========================================================================
    // Round Tests
    // =========================================================================

    #[test]
    fn win_in_first_round() {
        let (mut game, _) = game(231, &[2, 3, 1]);
        let outcome = game.play();

        assert_eq!(
            outcome,
            GameOutcome {
                found: true,
                attempts: 1,
                last_result: Some(MatchResult::new(3, 0)),
            }
        );
        assert_eq!(game.state().phase, Phase::Win);
        assert!(game.state().phase.is_finished());
        assert_eq!(game.state().guess, [2, 3, 1]);
    }

    #[test]
    fn lose_after_five_rounds() {
        let (mut game, _) = game(232, &[]);
        let outcome = game.play();

        assert!(!outcome.found);
        assert_eq!(outcome.attempts, 5);
        assert_eq!(outcome.last_result, Some(MatchResult::default()));
        assert_eq!(game.state().phase, Phase::Lose);
    }

    #[test]
    fn win_in_second_round() {
        let (mut game, _) = game(231, &[1, 2, 3, 2, 3, 1]);
        let outcome = game.play();
        assert!(outcome.found);
        assert_eq!(outcome.attempts, 2);
    }

    #[test]
    fn max_attempts_is_configurable() {
        let config =
            Config::default().with_game(GameConfig::default().with_max_attempts(2));
        let (mut game, _) = game_with(config, 111, &[]);
        assert_eq!(game.play().attempts, 2);
    }

    #[test]
    fn guess_reset_between_rounds() {
        let (mut game, _) = game(333, &[1, 1, 1]);
        let outcome = game.play();
        assert!(!outcome.found);
        // rounds after the first see no presses
        assert_eq!(game.state().guess, [0, 0, 0]);
    }

    // =========================================================================
    // Rendering Tests
    // =========================================================================

    #[test]
    fn round_banner_and_scores_on_lcd() {
        let (mut game, _) = game(231, &[1, 2, 3]);
        game.play();

        let panel = gpio(&game).lcd_panel().unwrap();
        assert!(panel.frames.iter().any(|f| f == "Starting\nRound: 1"));
        assert!(panel.frames.iter().any(|f| f == "Press the button\nnow"));
        assert!(panel.frames.iter().any(|f| f == " 0 exact\n 3 approximate"));
        assert!(panel.has_shown("YOU LOSE!"));
        assert!(panel.has_shown("Ending game"));
    }

    #[test]
    fn win_screen_shows_attempts() {
        let (mut game, _) = game(231, &[2, 3, 1]);
        game.play();

        let panel = gpio(&game).lcd_panel().unwrap();
        assert!(panel.frames.iter().any(|f| f == "SUCCESS\nAttempts: 1"));
        assert!(panel.has_shown("Ending game"));
        assert_eq!(panel.text(), "\n");
    }

    // =========================================================================
    // LED Tests
    // =========================================================================

    #[test]
    fn green_echoes_digits_and_scores() {
        let (mut game, _) = game(231, &[2, 3, 1]);
        game.play();
        // digit echoes 2+3+1, exact 3, approximate 0, win 3
        assert_eq!(gpio(&game).rising_edges(GREEN), 6 + 3 + 3);
    }

    #[test]
    fn red_marks_windows_and_separators() {
        let (mut game, _) = game(231, &[2, 3, 1]);
        game.play();
        // 3 window ends, 2 after the last turn, 1 separator, 1 held during the win
        assert_eq!(gpio(&game).rising_edges(RED), 3 + 2 + 1 + 1);
        assert_eq!(gpio(&game).output_level(RED), Level::Low);
    }

    #[test]
    fn losing_round_blinks_red_three_times() {
        let config =
            Config::default().with_game(GameConfig::default().with_max_attempts(1));
        let (mut game, _) = game_with(config, 231, &[]);
        game.play();
        // 3 window ends, 2 after the last turn, 1 separator, 3 for the miss
        assert_eq!(gpio(&game).rising_edges(RED), 3 + 2 + 1 + 3);
        assert_eq!(gpio(&game).rising_edges(GREEN), 0);
    }

    #[test]
    fn end_screen_leaves_red_output_low() {
        let config =
            Config::default().with_game(GameConfig::default().with_max_attempts(1));
        let (mut game, _) = game_with(config, 231, &[]);
        game.play();
        assert_eq!(gpio(&game).writes_to(RED).last(), Some(&Level::Low));
        assert_eq!(gpio(&game).mode(RED), Some(PinMode::Output));
        assert!(gpio(&game).lcd_panel().unwrap().has_shown("Ending game"));
    }

    #[test]
    fn button_pin_is_only_read() {
        let (mut game, _) = game(231, &[2, 3, 1]);
        game.play();
        assert!(gpio(&game).writes_to(BUTTON).is_empty());
        assert_eq!(gpio(&game).mode(BUTTON), Some(PinMode::Input));
    }
}
