// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed board/timing constants.
//!
//! There is no runtime configuration surface on this firmware: no CLI, no
//! environment, no persisted state. Everything that varies between builds
//! lives here as a `const`.

/// GPIO pin driving the H-bridge "minus" leg. Idle low.
pub const MINUS_PIN: u8 = 14;
/// GPIO pin driving the H-bridge "plus" leg. Idle high, always antiphase
/// with [`MINUS_PIN`].
pub const PLUS_PIN: u8 = 15;
/// Activity LED, toggled once per enqueued host message.
pub const LED_PIN: u8 = 25;

/// Half-period, in microseconds, of a DCC `1` bit.
pub const T1_US: u32 = 58;
/// Half-period, in microseconds, of a DCC `0` bit.
pub const T0_US: u32 = 116;

/// Preamble length in one-bits before every packet.
pub const PREAMBLE_BITS: usize = 14;

/// DCC idle packet address (never a valid decoder address).
pub const IDLE_ADDRESS: u8 = 0xFF;
/// DCC idle packet instruction.
pub const IDLE_INSTRUCTION: u8 = 0x00;

/// Number of times an `EmergencyStop` command is repeated on the wire.
pub const EMERGENCY_STOP_REPEATS: usize = 5;

/// Mailbox capacity: fixed at 10 entries.
pub const MAILBOX_CAPACITY: usize = 10;

/// Host link baud rate. Bring-up of the UART itself is an external
/// collaborator's responsibility; this is the rate `hostport::init` uses.
pub const HOST_BAUD: u32 = 115_200;

/// Approximate CPU cycles per microsecond at the clock speed this firmware
/// assumes the board bring-up leaves the system running at (125 MHz, the
/// RP2040 default after `clocks_init`). Used to turn [`T0_US`]/[`T1_US`]
/// into `cortex_m::asm::delay` cycle counts.
pub const CYCLES_PER_US: u32 = 125;
