//! Raspberry Pi memory-mapped GPIO.
//!
//! [`GpioMem`] maps the GPIO register window into the process and hands out
//! [`MmioRegisters`], a volatile [`RegisterBlock`] borrowing that mapping.
//!
//! # Device Nodes
//!
//! - `/dev/gpiomem` exposes only the GPIO block at offset 0 and does not need root
//! - `/dev/mem` exposes the whole physical address space; the GPIO block sits at
//!   [`GPIO_BASE_BCM2837`] on a Pi 2/3 and needs root
//!
//! # Example
//!
//! ```ignore
//! use master_mind::gpio::Gpio;
//! use master_mind::hal::rpi::GpioMem;
//!
//! let mut mem = GpioMem::open_gpiomem()?;
//! let mut gpio = Gpio::new(mem.registers());
//! ```

use core::marker::PhantomData;
use core::ptr::NonNull;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use memmap2::{MmapMut, MmapOptions};

use crate::gpio::{BLOCK_SIZE, GPIO_BASE_BCM2837};
use crate::traits::RegisterBlock;

/// Volatile view of a mapped GPIO register block.
///
/// Borrows the mapping it points into; it does not own or unmap it.
#[derive(Debug)]
pub struct MmioRegisters<'a> {
    base: NonNull<u32>,
    words: usize,
    _mapping: PhantomData<&'a mut [u32]>,
}

impl MmioRegisters<'_> {
    /// Wraps a raw pointer to a GPIO register block.
    ///
    /// # Safety
    ///
    /// `base` must point to a mapping of at least `words` 32-bit registers
    /// that stays valid for the returned lifetime, and no other code may
    /// write those registers while this value exists.
    pub unsafe fn from_raw(base: NonNull<u32>, words: usize) -> Self {
        Self {
            base,
            words,
            _mapping: PhantomData,
        }
    }
}

impl RegisterBlock for MmioRegisters<'_> {
    #[inline]
    fn read(&self, word: usize) -> u32 {
        debug_assert!(word < self.words);
        // Safety: in bounds of the mapping per `from_raw` contract
        unsafe { self.base.as_ptr().add(word).read_volatile() }
    }

    #[inline]
    fn write(&mut self, word: usize, value: u32) {
        debug_assert!(word < self.words);
        // Safety: in bounds of the mapping per `from_raw` contract
        unsafe { self.base.as_ptr().add(word).write_volatile(value) }
    }
}

/// An owned mapping of the GPIO register window.
///
/// Unmapped on drop.
#[derive(Debug)]
pub struct GpioMem {
    map: MmapMut,
}

impl GpioMem {
    /// Maps `/dev/gpiomem`.
    pub fn open_gpiomem() -> io::Result<Self> {
        Self::open("/dev/gpiomem", 0)
    }

    /// Maps the GPIO block out of `/dev/mem` (requires root).
    pub fn open_devmem() -> io::Result<Self> {
        Self::open("/dev/mem", GPIO_BASE_BCM2837)
    }

    /// Maps [`BLOCK_SIZE`] bytes of `path` starting at `offset`.
    pub fn open(path: impl AsRef<Path>, offset: u64) -> io::Result<Self> {
        let file: File = OpenOptions::new().read(true).write(true).open(path)?;
        // Safety: device memory; nothing else in this process maps it
        let map = unsafe {
            MmapOptions::new()
                .offset(offset)
                .len(BLOCK_SIZE)
                .map_mut(&file)?
        };
        log::debug!("mapped GPIO block ({} bytes at {:#x})", BLOCK_SIZE, offset);
        Ok(Self { map })
    }

    /// Volatile register access borrowing this mapping.
    pub fn registers(&mut self) -> MmioRegisters<'_> {
        let ptr = self.map.as_mut_ptr().cast::<u32>();
        // mmap never returns null on success and the mapping is page aligned
        let base = NonNull::new(ptr).unwrap_or(NonNull::dangling());
        // Safety: the mapping is BLOCK_SIZE bytes and outlives the borrow
        unsafe { MmioRegisters::from_raw(base, BLOCK_SIZE / 4) }
    }
}
