// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host UART bring-up and byte I/O.
//!
//! Spec.md §1 lists board bring-up — "clock init, USB stack init, pin mode
//! configuration" — as an external collaborator's responsibility, assumed
//! present. This module is that collaborator for the host link specifically:
//! it brings up `UART0` on the pins broken out for the host connection and
//! exposes blocking byte I/O to [`crate::hostlink`]/[`crate::command`]. It
//! is not exercised by any test in this crate (there is no host UART to
//! simulate), matching `app/demo-pi-pico`'s own treatment of bring-up code
//! as untested glue around the tested logic.

use crate::command::HostReply;
use crate::config::HOST_BAUD;
use crate::hostlink::HostRead;

#[cfg(target_arch = "arm")]
const UART_TX_PIN: u8 = 0;
#[cfg(target_arch = "arm")]
const UART_RX_PIN: u8 = 1;

/// Blocking reader/writer over `UART0`.
pub struct Uart0;

#[cfg(target_arch = "arm")]
impl Uart0 {
    /// Selects the UART alternate function on the host-link pins and
    /// configures `UART0` for 8N1 at [`HOST_BAUD`].
    pub fn init() -> Self {
        let io_bank0 = unsafe { &*rp2040_pac::IO_BANK0::ptr() };
        io_bank0.gpio[UART_TX_PIN as usize]
            .gpio_ctrl
            .write(|w| w.funcsel().uart0_tx());
        io_bank0.gpio[UART_RX_PIN as usize]
            .gpio_ctrl
            .write(|w| w.funcsel().uart0_rx());

        let resets = unsafe { &*rp2040_pac::RESETS::ptr() };
        resets.reset.modify(|_, w| w.uart0().clear_bit());
        while resets.reset_done.read().uart0().bit_is_clear() {}

        let uart0 = unsafe { &*rp2040_pac::UART0::ptr() };
        // Peripheral clock is assumed to be running at the RP2040 default
        // of 125 MHz (see `config::CYCLES_PER_US`); baud-rate divisor
        // computation follows the PL011 integer+fractional scheme.
        let baud_rate_div = (8 * 125_000_000) / HOST_BAUD;
        let mut ibrd = baud_rate_div >> 7;
        let mut fbrd = ((baud_rate_div & 0x7F) + 1) / 2;
        if ibrd == 0 {
            ibrd = 1;
            fbrd = 0;
        }
        uart0.uartibrd.write(|w| unsafe { w.bits(ibrd) });
        uart0.uartfbrd.write(|w| unsafe { w.bits(fbrd) });
        uart0.uartlcr_h.write(|w| unsafe { w.wlen().bits(0b11) }.fen().set_bit());
        uart0.uartcr.write(|w| w.uarten().set_bit().txe().set_bit().rxe().set_bit());

        Self
    }

    fn regs(&self) -> &'static rp2040_pac::uart0::RegisterBlock {
        unsafe { &*rp2040_pac::UART0::ptr() }
    }
}

#[cfg(target_arch = "arm")]
impl HostRead for Uart0 {
    fn read_byte(&mut self) -> u8 {
        let regs = self.regs();
        while regs.uartfr.read().rxfe().bit_is_set() {}
        regs.uartdr.read().data().bits()
    }
}

#[cfg(target_arch = "arm")]
impl HostReply for Uart0 {
    fn write(&mut self, bytes: &[u8]) {
        let regs = self.regs();
        for &byte in bytes {
            while regs.uartfr.read().txff().bit_is_set() {}
            regs.uartdr.write(|w| unsafe { w.data().bits(byte) });
        }
    }
}
