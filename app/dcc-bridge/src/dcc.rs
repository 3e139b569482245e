// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DCC packet transmitter (component C): antiphase bit-bang of a 42-bit-cell
//! packet onto `MINUS`/`PLUS`, built on [`crate::gpio`].
//!
//! The bit/byte/packet shaping logic is factored behind a small [`PulseSink`]
//! trait rather than called straight against `Gpio`, so it can be exercised
//! on a host test clock (spec.md §8, P3: "measurable within host-test clock
//! resolution") instead of only ever being verifiable on real hardware.

use crate::config::{CYCLES_PER_US, PREAMBLE_BITS, T0_US, T1_US};

/// A place DCC bit cells are emitted to: one `toggle` followed by a `hold`
/// of the bit's half-period, twice per bit (spec.md §4.4).
pub trait PulseSink {
    /// Inverts the antiphase pin pair.
    fn toggle(&mut self);
    /// Busy-waits for `half_period_us` microseconds.
    fn hold(&mut self, half_period_us: u32);
}

/// Production [`PulseSink`]: toggles `MINUS`/`PLUS` together through
/// [`crate::gpio::Gpio`] and holds using the cycle-counting delay loop
/// `app/demo-pi-pico` uses for its own timing.
pub struct GpioPulseSink {
    gpio: crate::gpio::Gpio,
    pins: crate::gpio::PinSet,
}

impl GpioPulseSink {
    pub fn new(gpio: crate::gpio::Gpio, pins: crate::gpio::PinSet) -> Self {
        Self { gpio, pins }
    }
}

#[cfg(target_arch = "arm")]
impl PulseSink for GpioPulseSink {
    fn toggle(&mut self) {
        self.gpio.toggle(self.pins);
    }

    fn hold(&mut self, half_period_us: u32) {
        cortex_m::asm::delay(half_period_us * CYCLES_PER_US);
    }
}

/// Emits DCC packets one bit cell at a time onto whatever [`PulseSink`] it
/// is given.
pub struct Transmitter<S> {
    sink: S,
}

impl<S: PulseSink> Transmitter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    fn send_bit(&mut self, bit: bool) {
        let half = if bit { T1_US } else { T0_US };
        self.sink.toggle();
        self.sink.hold(half);
        self.sink.toggle();
        self.sink.hold(half);
    }

    fn send_byte_msb_first(&mut self, byte: u8) {
        for i in (0..8).rev() {
            self.send_bit((byte >> i) & 1 != 0);
        }
    }

    /// Sends one complete packet — 14 preamble ones, a start bit, the
    /// address byte, a start bit, the instruction byte, a start bit, the
    /// XOR parity byte, and an end bit — and returns only once the last bit
    /// cell has been placed on the wire (spec.md §4.4, P1/P2).
    pub fn send_command(&mut self, address: u8, instruction: u8) {
        for _ in 0..PREAMBLE_BITS {
            self.send_bit(true);
        }
        self.send_bit(false);
        self.send_byte_msb_first(address);
        self.send_bit(false);
        self.send_byte_msb_first(instruction);
        self.send_bit(false);
        self.send_byte_msb_first(address ^ instruction);
        self.send_bit(true);
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

/// Shared test doubles for a [`PulseSink`]: a recorder that decodes its own
/// recorded events back into packet fields. Used here and from
/// `command.rs`'s tests, which exercise the dispatcher end to end.
#[cfg(test)]
pub(crate) mod test_support {
    use super::{PulseSink, T0_US, T1_US, PREAMBLE_BITS};
    use std::vec::Vec;

    #[derive(Debug, PartialEq, Eq)]
    pub(crate) enum Event {
        Toggle,
        Hold(u32),
    }

    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) events: Vec<Event>,
    }

    impl PulseSink for Recorder {
        fn toggle(&mut self) {
            self.events.push(Event::Toggle);
        }

        fn hold(&mut self, half_period_us: u32) {
            self.events.push(Event::Hold(half_period_us));
        }
    }

    pub(crate) fn bit_cells(events: &[Event]) -> Vec<(u32, u32)> {
        events
            .chunks(4)
            .map(|chunk| match chunk {
                [Event::Toggle, Event::Hold(a), Event::Toggle, Event::Hold(b)] => (*a, *b),
                _ => panic!("malformed bit cell: {chunk:?}"),
            })
            .collect()
    }

    /// Decodes the bit cells a [`Recorder`] captured back into the
    /// `(address, instruction, parity)` the packet framed, so tests can
    /// assert on frame contents rather than on raw timing alone.
    pub(crate) fn decode_packet(events: &[Event]) -> (u8, u8, u8) {
        let cells = bit_cells(events);
        let bits: Vec<bool> = cells.iter().map(|&(half, _)| half == T1_US).collect();
        let mut pos = PREAMBLE_BITS;
        assert!(!bits[pos]);
        pos += 1;
        let mut read_byte = |bits: &[bool], pos: &mut usize| -> u8 {
            let mut byte = 0u8;
            for _ in 0..8 {
                byte = (byte << 1) | (bits[*pos] as u8);
                *pos += 1;
            }
            byte
        };
        let address = read_byte(&bits, &mut pos);
        assert!(!bits[pos]);
        pos += 1;
        let instruction = read_byte(&bits, &mut pos);
        assert!(!bits[pos]);
        pos += 1;
        let parity = read_byte(&bits, &mut pos);
        assert!(bits[pos], "end bit must be a 1");
        (address, instruction, parity)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{bit_cells, decode_packet, Recorder};
    use super::*;

    /// P1: every packet is exactly 42 bit cells (14 preamble + 3 start bits
    /// + 3 data bytes + 1 end bit), each a toggle-hold-toggle-hold of equal
    /// halves.
    #[test]
    fn packet_is_exactly_42_bit_cells() {
        let mut tx = Transmitter::new(Recorder::default());
        tx.send_command(3, 0b0110_0000);
        let recorder = tx.into_inner();
        assert_eq!(recorder.events.len(), 42 * 4);
        for (a, b) in bit_cells(&recorder.events) {
            assert_eq!(a, b, "bit cell halves must be equal length");
        }
    }

    /// P2: preamble is 14 consecutive `1` bits (short half-period).
    #[test]
    fn preamble_is_fourteen_one_bits() {
        let mut tx = Transmitter::new(Recorder::default());
        tx.send_command(0, 0);
        let recorder = tx.into_inner();
        let cells = bit_cells(&recorder.events);
        for &(half, _) in &cells[..PREAMBLE_BITS] {
            assert_eq!(half, T1_US);
        }
        // immediately followed by the address-byte start bit, a `0`.
        assert_eq!(cells[PREAMBLE_BITS].0, T0_US);
    }

    /// P3: bit timing matches the two configured half-periods exactly, with
    /// no third value ever produced.
    #[test]
    fn only_configured_half_periods_are_used() {
        let mut tx = Transmitter::new(Recorder::default());
        tx.send_command(0xAA, 0x55);
        let recorder = tx.into_inner();
        for (a, _) in bit_cells(&recorder.events) {
            assert!(a == T1_US || a == T0_US);
        }
    }

    #[test]
    fn parity_byte_is_address_xor_instruction() {
        let mut tx = Transmitter::new(Recorder::default());
        tx.send_command(0x42, 0b0111_1111);
        let recorder = tx.into_inner();
        let (address, instruction, parity) = decode_packet(&recorder.events);
        assert_eq!(address, 0x42);
        assert_eq!(instruction, 0b0111_1111);
        assert_eq!(parity, 0x42 ^ 0b0111_1111);
    }

    #[test]
    fn address_and_instruction_round_trip() {
        let mut tx = Transmitter::new(Recorder::default());
        tx.send_command(0xFF, 0x00);
        let recorder = tx.into_inner();
        let (address, instruction, _) = decode_packet(&recorder.events);
        assert_eq!(address, 0xFF);
        assert_eq!(instruction, 0x00);
    }
}
