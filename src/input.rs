//! Timed button capture: presses in a fixed window become one digit.
//!
//! The button line is polled, not interrupt driven. A press is a low-to-high
//! edge between two consecutive samples, so holding the button down counts
//! once. After each press the capture locks out for the debounce delay and
//! flashes "Button Pressed" on the LCD.
//!
//! The window always runs to its deadline unless the press cap is reached
//! first; an edge seen on the final poll is still counted.

use crate::config::TimingConfig;
use crate::lcd::LcdDriver;
use crate::traits::{Clock, Delay, GpioPins, Level};

/// Text flashed on the LCD after each press.
pub const PRESS_FEEDBACK: &str = "Button Pressed";

/// Counts button presses inside a capture window.
///
/// # Example
///
/// ```rust
/// use master_mind::config::{LcdConfig, PinConfig, TimingConfig};
/// use master_mind::hal::{Board, MockClock, MockGpio};
/// use master_mind::input::ButtonCapture;
/// use master_mind::lcd::LcdDriver;
///
/// let pins = PinConfig::default();
/// let timing = TimingConfig::default();
/// let clock = MockClock::new();
///
/// let mut gpio = MockGpio::new().with_clock(clock.clone()).with_lcd(pins.lcd, 2, 16);
/// gpio.press_repeatedly(pins.button, 1000, 2, 1000);
///
/// let board = Board::new(gpio, clock);
/// let mut lcd = LcdDriver::new(board, pins.lcd, LcdConfig::default(), &timing);
/// lcd.init();
///
/// let capture = ButtonCapture::new(pins.button, &timing);
/// assert_eq!(capture.capture_digit(&mut lcd, 3), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonCapture {
    pin: u8,
    window_ms: u32,
    poll_interval_ms: u32,
    debounce_ms: u32,
    feedback_ms: u32,
}

impl ButtonCapture {
    /// Capture on `pin` with the window, poll and debounce delays of `timing`.
    pub fn new(pin: u8, timing: &TimingConfig) -> Self {
        Self {
            pin,
            window_ms: timing.capture_window_ms,
            poll_interval_ms: timing.poll_interval_ms.max(1),
            debounce_ms: timing.debounce_ms,
            feedback_ms: timing.press_feedback_ms,
        }
    }

    /// Runs one capture window and returns the number of presses, at most
    /// `max_count`.
    ///
    /// The button is reached through the LCD driver's bus, which also shows
    /// the press feedback.
    pub fn capture_digit<B>(&self, lcd: &mut LcdDriver<B>, max_count: u8) -> u8
    where
        B: GpioPins + Delay + Clock,
    {
        if max_count == 0 {
            return 0;
        }

        let deadline = lcd.bus().now_ms() + u64::from(self.window_ms);
        let mut previous = lcd.bus_mut().read_digital(self.pin);
        let mut count = 0u8;

        loop {
            let level = lcd.bus_mut().read_digital(self.pin);
            if level == Level::High && previous == Level::Low {
                count += 1;
                log::debug!("press {} on pin {}", count, self.pin);

                lcd.bus_mut().delay_ms(self.debounce_ms);
                lcd.put_str(PRESS_FEEDBACK);
                lcd.bus_mut().delay_ms(self.feedback_ms);
                lcd.clear();

                if count >= max_count {
                    break;
                }
            }
            previous = level;

            if lcd.bus().now_ms() >= deadline {
                break;
            }
            lcd.bus_mut().delay_ms(self.poll_interval_ms);
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LcdConfig, PinConfig};
    use crate::hal::{Board, MockClock, MockGpio};

    const BUTTON: u8 = 19;

    type MockLcd = LcdDriver<Board<MockGpio, MockClock>>;

    fn setup(script: impl FnOnce(&mut MockGpio, u64)) -> (MockLcd, MockClock, ButtonCapture) {
        let pins = PinConfig::default();
        let timing = TimingConfig::default();
        let clock = MockClock::new();
        let gpio = MockGpio::new()
            .with_clock(clock.clone())
            .with_lcd(pins.lcd, 2, 16);
        let board = Board::new(gpio, clock.clone());
        let mut lcd = LcdDriver::new(board, pins.lcd, LcdConfig::default(), &timing);
        lcd.init();

        let now = clock.now_ms();
        script(&mut lcd.bus_mut().gpio, now);
        (lcd, clock, ButtonCapture::new(BUTTON, &timing))
    }

    // =========================================================================
    // Count Tests
    // =========================================================================

    #[test]
    fn no_presses_is_zero_after_full_window() {
        let (mut lcd, clock, capture) = setup(|_, _| {});
        let start = clock.now_ms();

        assert_eq!(capture.capture_digit(&mut lcd, 3), 0);

        let elapsed = clock.now_ms() - start;
        assert!(elapsed >= 5000, "closed early after {}ms", elapsed);
        assert!(elapsed <= 5010, "overran to {}ms", elapsed);
    }

    #[test]
    fn counts_each_press() {
        let (mut lcd, _, capture) = setup(|gpio, now| {
            gpio.press_repeatedly(BUTTON, now + 200, 2, 1000);
        });
        assert_eq!(capture.capture_digit(&mut lcd, 3), 2);
    }

    #[test]
    fn stops_at_cap() {
        let (mut lcd, clock, capture) = setup(|gpio, now| {
            gpio.press_repeatedly(BUTTON, now + 100, 5, 1000);
        });
        let start = clock.now_ms();

        assert_eq!(capture.capture_digit(&mut lcd, 3), 3);
        assert!(clock.now_ms() - start < 5000);
    }

    #[test]
    fn zero_cap_returns_immediately() {
        let (mut lcd, clock, capture) = setup(|gpio, now| {
            gpio.press(BUTTON, now, 100);
        });
        let start = clock.now_ms();
        assert_eq!(capture.capture_digit(&mut lcd, 0), 0);
        assert_eq!(clock.now_ms(), start);
    }

    #[test]
    fn presses_after_window_are_ignored() {
        let (mut lcd, _, capture) = setup(|gpio, now| {
            gpio.press(BUTTON, now + 1000, 200);
            gpio.press(BUTTON, now + 6000, 200);
        });
        assert_eq!(capture.capture_digit(&mut lcd, 3), 1);
    }

    // =========================================================================
    // Edge Detection Tests
    // =========================================================================

    #[test]
    fn held_button_counts_once() {
        let (mut lcd, _, capture) = setup(|gpio, now| {
            gpio.press(BUTTON, now + 100, 3000);
        });
        assert_eq!(capture.capture_digit(&mut lcd, 3), 1);
    }

    #[test]
    fn button_held_before_window_is_not_a_press() {
        let (mut lcd, _, capture) = setup(|gpio, _| {
            gpio.set_input(BUTTON, Level::High);
        });
        assert_eq!(capture.capture_digit(&mut lcd, 3), 0);
    }

    #[test]
    fn press_on_last_poll_counts() {
        let (mut lcd, clock, capture) = setup(|gpio, now| {
            gpio.press(BUTTON, now + 5000, 100);
        });
        let start = clock.now_ms();
        assert_eq!(capture.capture_digit(&mut lcd, 3), 1);
        assert!(clock.now_ms() - start >= 5000);
    }

    // =========================================================================
    // Feedback Tests
    // =========================================================================

    #[test]
    fn press_flashes_feedback_then_clears() {
        let (mut lcd, _, capture) = setup(|gpio, now| {
            gpio.press(BUTTON, now + 100, 200);
        });
        capture.capture_digit(&mut lcd, 3);

        let panel = lcd.bus().gpio.lcd_panel().unwrap();
        assert!(panel.frames.last().unwrap().starts_with(PRESS_FEEDBACK));
        assert_eq!(panel.text(), "\n");
    }

    #[test]
    fn reads_button_as_input() {
        let (mut lcd, _, capture) = setup(|_, _| {});
        capture.capture_digit(&mut lcd, 3);
        assert_eq!(
            lcd.bus().gpio.mode(BUTTON),
            Some(crate::traits::PinMode::Input)
        );
    }
}
