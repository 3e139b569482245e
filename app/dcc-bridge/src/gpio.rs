// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Direct (non-IPC) access to the RP2040's single GPIO bank.
//!
//! Shaped after `drv/stm32h7-gpio-api`'s `Port`/`PinSet` split — a bitmask
//! describing a set of pins, plus operations that act on the whole set at
//! once — but with no server behind it. Spec.md §4.4 requires the DCC
//! transmitter to own `MINUS`/`PLUS` exclusively and toggle them without
//! any driver-task indirection (an IPC round trip would blow the ~58 µs
//! half-bit budget many times over), so this is a thin wrapper around raw
//! `SIO`/`IO_BANK0` register pokes, in the same style
//! `app/demo-pi-pico/src/main.rs` already uses for its own LED pin.
//!
//! The RP2040 has one flat GPIO bank (unlike the STM32H7's lettered ports),
//! so `PinSet` here is simply a 32-bit mask over that bank.

#[cfg(target_arch = "arm")]
use rp2040_pac::{IO_BANK0, RESETS, SIO};

/// A bitmask describing one or more pins in the RP2040's GPIO bank.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PinSet(u32);

impl PinSet {
    /// A `PinSet` containing only `pin`.
    pub const fn new(pin: u8) -> Self {
        PinSet(1 << pin)
    }

    /// Derives a `PinSet` by adding `pin` to the mask.
    pub const fn and(self, pin: u8) -> Self {
        PinSet(self.0 | (1 << pin))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Iterates the individual pin numbers set in a mask, least significant
/// first.
struct PinIter(u32);

impl Iterator for PinIter {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.0 == 0 {
            return None;
        }
        let pin = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(pin)
    }
}

/// Handle for direct GPIO access. Zero-sized: the RP2040's GPIO bank is a
/// process-wide singleton, and this type exists only to group the
/// operations that act on it.
#[derive(Copy, Clone, Debug, Default)]
pub struct Gpio;

#[cfg(target_arch = "arm")]
impl Gpio {
    /// Takes `pins` out of reset, selects the SIO function for each, and
    /// enables them as outputs.
    pub fn configure_output(&self, pins: PinSet) {
        let resets = unsafe { &*RESETS::ptr() };
        resets.reset.modify(|_, w| w.io_bank0().clear_bit());
        while resets.reset_done.read().io_bank0().bit_is_clear() {}

        let io_bank0 = unsafe { &*IO_BANK0::ptr() };
        for pin in PinIter(pins.bits()) {
            io_bank0.gpio[pin as usize]
                .gpio_ctrl
                .write(|w| w.funcsel().sio());
        }

        let sio = unsafe { &*SIO::ptr() };
        sio.gpio_oe_set.write(|w| unsafe { w.bits(pins.bits()) });
    }

    pub fn set(&self, pins: PinSet) {
        let sio = unsafe { &*SIO::ptr() };
        sio.gpio_out_set.write(|w| unsafe { w.bits(pins.bits()) });
    }

    pub fn clear(&self, pins: PinSet) {
        let sio = unsafe { &*SIO::ptr() };
        sio.gpio_out_clr.write(|w| unsafe { w.bits(pins.bits()) });
    }

    /// Atomically inverts every pin in `pins` through the SIO
    /// `GPIO_OUT_XOR` alias register — one bus write, so pins sharing a
    /// mask flip on the same cycle. Used for `MINUS`/`PLUS` so the
    /// antiphase drive (spec.md §4.4) never has a window where both pins
    /// read the same level.
    pub fn toggle(&self, pins: PinSet) {
        let sio = unsafe { &*SIO::ptr() };
        sio.gpio_out_xor.write(|w| unsafe { w.bits(pins.bits()) });
    }

    pub fn read(&self, pins: PinSet) -> u32 {
        let sio = unsafe { &*SIO::ptr() };
        sio.gpio_in.read().bits() & pins.bits()
    }
}
