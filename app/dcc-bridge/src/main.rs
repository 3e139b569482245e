// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Board bring-up and the two cores' entry points.
//!
//! Core 0 (this `main`) brings up `MINUS`/`PLUS`, launches core 1 onto the
//! host-link receiver (component A), then falls into the idle-transmit
//! outer loop (components B and C) forever. Grounded on
//! `app/demo-pi-pico/src/main.rs`'s raw `rp2040_pac` register bring-up —
//! extended here to also launch a second core, which that single-core demo
//! board never needed to do.

#![no_std]
#![no_main]

use cortex_m_rt::entry;

use dcc_bridge::command::{self, HostReply};
use dcc_bridge::config::{LED_PIN, MINUS_PIN, PLUS_PIN};
use dcc_bridge::dcc::{GpioPulseSink, Transmitter};
use dcc_bridge::gpio::{Gpio, PinSet};
use dcc_bridge::handoff::Handoff;
use dcc_bridge::hostlink;
use dcc_bridge::hostport::Uart0;
use dcc_bridge::mailbox::{self, MailboxRx, MailboxTx};
use dcc_bridge::multicore;

#[cfg(feature = "panic-halt")]
use panic_halt as _;
#[cfg(feature = "panic-semihosting")]
use panic_semihosting as _;

#[link_section = ".boot_loader"]
#[used]
pub static BOOT_LOADER: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

/// Core 1 runs entirely out of its own stack, never touching core 0's.
const CORE1_STACK_WORDS: usize = 1024;
static mut CORE1_STACK: [usize; CORE1_STACK_WORDS] = [0; CORE1_STACK_WORDS];

/// Carries the mailbox's producer half from core 0, which creates the
/// mailbox, to core 1, which is the sole producer for its whole lifetime.
static MAILBOX_TX_HANDOFF: Handoff<MailboxTx<'static>> = Handoff::new();

const SCB_VTOR: *const u32 = 0xE000_ED08 as *const u32;

#[entry]
fn main() -> ! {
    let gpio = Gpio;
    let drive_pins = PinSet::new(MINUS_PIN).and(PLUS_PIN);
    gpio.configure_output(drive_pins);
    // Initial state per spec.md §4.4: MINUS=0, PLUS=1.
    gpio.clear(PinSet::new(MINUS_PIN));
    gpio.set(PinSet::new(PLUS_PIN));

    // SAFETY: called exactly once, before core 1 is launched.
    let (mailbox_tx, mailbox_rx) = unsafe { mailbox::split() };
    MAILBOX_TX_HANDOFF.give(mailbox_tx);

    let vector_table = unsafe { core::ptr::read_volatile(SCB_VTOR) };
    let stack_pointer = unsafe { CORE1_STACK.as_ptr().add(CORE1_STACK_WORDS) as u32 };
    // SAFETY: `CORE1_STACK` is reserved for core 1 alone and `core1_main`
    // is a valid, non-returning core-1 entry point; called exactly once.
    unsafe {
        multicore::launch_core1(vector_table, stack_pointer, core1_main as u32);
    }

    let sink = GpioPulseSink::new(gpio, drive_pins);
    let mut tx = Transmitter::new(sink);
    let mut reply = Uart0::init();
    let mut mailbox_rx = mailbox_rx;
    run_idle_loop(&mut mailbox_rx, &mut tx, &mut reply)
}

fn run_idle_loop<R: HostReply>(
    mailbox_rx: &mut MailboxRx<'static>,
    tx: &mut Transmitter<GpioPulseSink>,
    reply: &mut R,
) -> ! {
    loop {
        command::send_idle(tx);
        command::dispatch(mailbox_rx, tx, reply);
    }
}

extern "C" fn core1_main() -> ! {
    let mailbox_tx = MAILBOX_TX_HANDOFF.take();
    let led = PinSet::new(LED_PIN);
    hostlink::run(Uart0::init(), mailbox_tx, Gpio, led)
}
