//! MasterMind on a Raspberry Pi.
//!
//! Maps the GPIO block, brings up the LCD and plays one game with the button
//! as input and the LEDs and LCD as output. The secret is random unless given
//! with `-s`.
//!
//! # Wiring (BCM numbering)
//!
//! | Part | Pin |
//! |------|-----|
//! | Green LED | 13 |
//! | Red LED | 5 |
//! | Button | 19 |
//! | LCD E / RS | 24 / 25 |
//! | LCD D4..D7 | 23, 10, 27, 22 |
//!
//! # Usage
//!
//! ```bash
//! # Play with a random secret
//! master-mind
//!
//! # Play with a fixed secret and show it at start
//! master-mind -d -s 231
//!
//! # Only run the matcher on two sequences
//! master-mind -u 123 231
//! ```
//!
//! Log output goes to stderr through `pretty_env_logger`; `RUST_LOG`
//! overrides the level picked by `-v`.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};

use master_mind::config::{Config, GameConfig};
use master_mind::game::GameController;
use master_mind::gpio::Gpio;
use master_mind::hal::rpi::GpioMem;
use master_mind::hal::{Board, SystemClock};
use master_mind::lcd::{LcdDriver, BOX_GLYPH};
use master_mind::{check_codes, Sequence};

/// MasterMind program, running on a Raspberry Pi, with connected LED, button
/// and LCD display
///
/// Use the button for input of numbers. The LCD display will show the
/// matches with the secret sequence.
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(name = "master-mind")]
#[command(version)]
#[command(override_usage = "master-mind [-h] [-v] [-d] [-u <seq1> <seq2>] [-s <secret seq>]")]
struct Options {
    /// Log the game transcript at debug level
    #[arg(short)]
    verbose: bool,

    /// Show the secret sequence at start
    #[arg(short)]
    debug: bool,

    /// Only match <seq1> against <seq2> and print the counts
    #[arg(short = 'u')]
    unit_test: bool,

    /// Secret sequence, e.g. 231
    #[arg(short, value_name = "secret seq")]
    secret: Option<u32>,

    /// Sequences for -u
    #[arg(value_name = "seq")]
    sequences: Vec<u32>,
}

impl Options {
    /// The `(guess, secret)` pair for `-u`, if it was given.
    fn match_test(&self) -> Result<Option<(u32, u32)>> {
        if !self.unit_test {
            return Ok(None);
        }
        match self.sequences.as_slice() {
            [guess, secret, ..] => Ok(Some((*guess, *secret))),
            _ => bail!("Expected 2 arguments after option -u"),
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn wait_for_enter() -> Result<()> {
    print!("Press ENTER to continue: ");
    io::stdout().flush().context("flushing stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading from stdin")?;
    Ok(())
}

fn main() -> Result<()> {
    let opts = Options::parse();
    let match_test = opts.match_test()?;

    init_logging(opts.verbose);
    debug!(
        "verbose {}, debug {}, unit test {}",
        opts.verbose, opts.debug, opts.unit_test
    );

    // =========================================================================
    // Matcher only (-u)
    // =========================================================================
    if let Some((guess, secret)) = match_test {
        info!("Testing matches function with sequences {} and {}", guess, secret);
        let result = check_codes(guess, secret)
            .with_context(|| format!("matching {} against {}", guess, secret))?;
        println!("{} exact", result.exact);
        println!("{} approximate", result.approximate);
        return Ok(());
    }

    // =========================================================================
    // Secret
    // =========================================================================
    let secret = match opts.secret {
        Some(code) => Sequence::from_code(code).context("invalid secret given with -s")?,
        None => Sequence::random(&mut rand::thread_rng()),
    };
    let config = Config::default().with_game(
        GameConfig::default()
            .with_verbose(opts.verbose)
            .with_debug(opts.debug),
    );

    // =========================================================================
    // Hardware
    // =========================================================================
    info!(
        "Raspberry Pi LCD driver, for a {}x{} display (4-bit wiring)",
        config.lcd.cols, config.lcd.rows
    );
    let mut mem = match GpioMem::open_gpiomem() {
        Ok(mem) => mem,
        Err(err) => {
            debug!("/dev/gpiomem unavailable ({}), trying /dev/mem", err);
            GpioMem::open_devmem().context("mapping the GPIO block from /dev/mem")?
        }
    };
    let gpio = Gpio::new(mem.registers());
    let board = Board::new(gpio, SystemClock::new());

    let mut lcd = LcdDriver::new(board, config.pins.lcd, config.lcd, &config.timing);
    lcd.init();
    lcd.define_char(0, &BOX_GLYPH);
    debug!(
        "LCD ready: {}x{}, {:?}",
        lcd.cols(),
        lcd.rows(),
        lcd.state()
    );

    // =========================================================================
    // Game
    // =========================================================================
    let mut game = GameController::new(lcd, secret, config);
    if opts.secret.is_some() {
        debug!("running with secret sequence {}", game.secret());
    }
    game.welcome();
    game.show_start_prompt();
    wait_for_enter()?;

    let outcome = game.play();
    match outcome.last_result {
        Some(result) if outcome.found => {
            info!("solved in {} rounds ({})", outcome.attempts, result)
        }
        Some(result) => info!("not solved, last round: {}", result),
        None => info!("no rounds played"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Options> {
        let argv = std::iter::once("master-mind").chain(args.iter().copied());
        Ok(Options::try_parse_from(argv)?)
    }

    #[test]
    fn no_args_is_default() {
        assert_eq!(parse(&[]).unwrap(), Options::default());
        assert_eq!(parse(&[]).unwrap().match_test().unwrap(), None);
    }

    #[test]
    fn flags() {
        let opts = parse(&["-v", "-d"]).unwrap();
        assert!(opts.verbose);
        assert!(opts.debug);
        assert!(!opts.unit_test);
    }

    #[test]
    fn clustered_flags() {
        let opts = parse(&["-vd"]).unwrap();
        assert!(opts.verbose);
        assert!(opts.debug);
    }

    #[test]
    fn secret_takes_value() {
        assert_eq!(parse(&["-s", "231"]).unwrap().secret, Some(231));
        assert!(parse(&["-s"]).is_err());
        assert!(parse(&["-s", "abc"]).is_err());
    }

    #[test]
    fn secret_value_can_be_attached() {
        assert_eq!(parse(&["-s231"]).unwrap().secret, Some(231));

        let opts = parse(&["-vds231"]).unwrap();
        assert!(opts.verbose);
        assert!(opts.debug);
        assert_eq!(opts.secret, Some(231));
    }

    #[test]
    fn unit_test_needs_two_operands() {
        let opts = parse(&["-u", "123", "321"]).unwrap();
        assert_eq!(opts.match_test().unwrap(), Some((123, 321)));

        let opts = parse(&["-uv", "123", "321"]).unwrap();
        assert!(opts.verbose);
        assert_eq!(opts.match_test().unwrap(), Some((123, 321)));

        assert!(parse(&["-u", "123"]).unwrap().match_test().is_err());
        assert!(parse(&["-u"]).unwrap().match_test().is_err());
    }

    #[test]
    fn operands_without_unit_test_are_ignored() {
        let opts = parse(&["123", "321"]).unwrap();
        assert_eq!(opts.match_test().unwrap(), None);
    }

    #[test]
    fn help_is_reported() {
        let err = Options::try_parse_from(["master-mind", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn unknown_option_rejected() {
        assert!(parse(&["-x"]).is_err());
    }
}
