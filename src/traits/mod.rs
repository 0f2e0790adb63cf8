//! Trait definitions for hardware abstraction.
//!
//! This module defines the core abstractions that allow master-mind to:
//! - Run on a Raspberry Pi through memory-mapped GPIO registers
//! - Run on the desktop against mock pins and a mock clock
//! - Keep every wait behind a replaceable delay
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`RegisterBlock`]: Raw 32-bit register words of the GPIO block
//! - [`GpioPins`]: Pin direction, output and input
//! - [`Clock`]: Millisecond time source for the input window
//! - [`Delay`]: Blocking settle and strobe delays

pub mod hardware;

pub use hardware::*;
