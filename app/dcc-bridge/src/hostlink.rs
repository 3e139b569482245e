// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-link receiver (component A): reads length-prefixed framed messages
//! from the host byte stream and enqueues decoded ones onto the mailbox.
//! Runs on core 1 and never returns.
//!
//! The byte-at-a-time blocking read shape follows `lib/usart/src/lib.rs`;
//! the decode-or-drop control flow (no resynchronization, no partial
//! enqueue) follows `lib/lpc55-rot-startup/src/dice_mfg_usart.rs`'s
//! hubpack decode-and-continue pattern.

use crate::diag::{HostlinkEvent, HOSTLINK_LOG};
use crate::gpio::{Gpio, PinSet};
use crate::mailbox::MailboxTx;
use crate::message;
use crate::ringbuf_entry;

/// A blocking byte source for the host link. Implemented by the real UART
/// on-target; mocked in tests.
pub trait HostRead {
    fn read_byte(&mut self) -> u8;
}

/// What happened to one framed message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Decoded and pushed onto the mailbox.
    Enqueued,
    /// Decode failed; message discarded, framing preserved (spec.md §4.1:
    /// "do NOT attempt resynchronization").
    Dropped,
    /// `length` exceeded [`message::MAX_MESSAGE_SIZE`]; the declared number
    /// of bytes was drained and discarded without attempting to decode
    /// (spec.md §4.1 "buffer sizing", recommended behavior).
    Oversize,
}

/// Reads one framed message and acts on it. Blocks on `reader` for however
/// many bytes the frame declares.
pub fn receive_one_frame<R: HostRead>(
    reader: &mut R,
    mailbox: &mut MailboxTx<'_>,
) -> FrameOutcome {
    let mut len_bytes = [0u8; message::LENGTH_PREFIX_LEN];
    for byte in len_bytes.iter_mut() {
        *byte = reader.read_byte();
    }
    let length = message::parse_length_prefix(len_bytes) as usize;

    if length > message::MAX_MESSAGE_SIZE {
        for _ in 0..length {
            let _ = reader.read_byte();
        }
        ringbuf_entry!(HOSTLINK_LOG, HostlinkEvent::OversizeFrame { length: length as u32 });
        return FrameOutcome::Oversize;
    }

    let mut buf = [0u8; message::MAX_MESSAGE_SIZE];
    for slot in buf[..length].iter_mut() {
        *slot = reader.read_byte();
    }

    match message::decode(&buf[..length]) {
        Ok(decoded) => {
            mailbox.push_blocking(decoded);
            ringbuf_entry!(HOSTLINK_LOG, HostlinkEvent::Enqueued);
            FrameOutcome::Enqueued
        }
        Err(_) => {
            ringbuf_entry!(HOSTLINK_LOG, HostlinkEvent::DecodeFailed);
            FrameOutcome::Dropped
        }
    }
}

/// Core 1 entry point: configures the activity LED, then reads and
/// dispatches framed messages forever. Never returns.
#[cfg(target_arch = "arm")]
pub fn run<R: HostRead>(mut reader: R, mut mailbox: MailboxTx<'static>, gpio: Gpio, led: PinSet) -> ! {
    gpio.configure_output(led);
    loop {
        if receive_one_frame(&mut reader, &mut mailbox) == FrameOutcome::Enqueued {
            gpio.toggle(led);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::MailboxTx as Tx;
    use crate::message::{Command, ControlPacket, Direction, Message};
    use heapless::spsc::Queue;
    use std::collections::VecDeque;

    struct MockReader(VecDeque<u8>);

    impl MockReader {
        fn from_frame(payload: &[u8]) -> Self {
            let mut bytes = VecDeque::new();
            bytes.extend(message::length_prefix(payload.len() as u32));
            bytes.extend(payload.iter().copied());
            Self(bytes)
        }
    }

    impl HostRead for MockReader {
        fn read_byte(&mut self) -> u8 {
            self.0.pop_front().expect("mock reader underrun")
        }
    }

    fn new_queue() -> Queue<Message, { crate::mailbox::QUEUE_LEN }> {
        Queue::new()
    }

    #[test]
    fn well_formed_frame_is_enqueued() {
        let msg = Message::ControlPacket(ControlPacket {
            address: 3,
            command: Command::Drive { direction: Direction::Forward, speed: 15 },
        });
        let mut buf = [0u8; message::MAX_MESSAGE_SIZE];
        let encoded = message::encode(&msg, &mut buf);
        let mut reader = MockReader::from_frame(encoded);

        let mut queue = new_queue();
        let (producer, mut consumer) = queue.split();
        let mut tx = Tx(producer);

        let outcome = receive_one_frame(&mut reader, &mut tx);
        assert_eq!(outcome, FrameOutcome::Enqueued);
        assert_eq!(consumer.dequeue(), Some(msg));
    }

    /// Scenario 6 (§8): malformed frame is dropped, framing preserved, no
    /// message reaches the mailbox.
    #[test]
    fn malformed_frame_is_dropped_without_desync() {
        let garbage = [0xFFu8; message::MAX_MESSAGE_SIZE];
        let mut reader = MockReader::from_frame(&garbage);

        let mut queue = new_queue();
        let (producer, mut consumer) = queue.split();
        let mut tx = Tx(producer);

        let outcome = receive_one_frame(&mut reader, &mut tx);
        assert_eq!(outcome, FrameOutcome::Dropped);
        assert_eq!(consumer.dequeue(), None);
    }

    #[test]
    fn oversize_frame_drains_exactly_its_declared_length() {
        let declared_len = message::MAX_MESSAGE_SIZE + 5;
        let mut bytes = VecDeque::new();
        bytes.extend(message::length_prefix(declared_len as u32));
        bytes.extend(core::iter::repeat(0u8).take(declared_len));
        // One more frame immediately after, to prove framing survives.
        let next = Message::Handshake(crate::message::Handshake {
            kind: crate::message::HandshakeType::Request,
        });
        let mut buf = [0u8; message::MAX_MESSAGE_SIZE];
        let encoded = message::encode(&next, &mut buf);
        bytes.extend(message::length_prefix(encoded.len() as u32));
        bytes.extend(encoded.iter().copied());
        let mut reader = MockReader(bytes);

        let mut queue = new_queue();
        let (producer, mut consumer) = queue.split();
        let mut tx = Tx(producer);

        let outcome = receive_one_frame(&mut reader, &mut tx);
        assert_eq!(outcome, FrameOutcome::Oversize);
        assert_eq!(consumer.dequeue(), None);

        let outcome = receive_one_frame(&mut reader, &mut tx);
        assert_eq!(outcome, FrameOutcome::Enqueued);
        assert_eq!(consumer.dequeue(), Some(next));
    }

    #[test]
    fn multiple_frames_are_enqueued_in_order() {
        let a = Message::ControlPacket(ControlPacket { address: 1, command: Command::Halt });
        let b = Message::ControlPacket(ControlPacket { address: 2, command: Command::Halt });
        let mut bytes = VecDeque::new();
        for msg in [&a, &b] {
            let mut buf = [0u8; message::MAX_MESSAGE_SIZE];
            let encoded = message::encode(msg, &mut buf);
            bytes.extend(message::length_prefix(encoded.len() as u32));
            bytes.extend(encoded.iter().copied());
        }
        let mut reader = MockReader(bytes);

        let mut queue = new_queue();
        let (producer, mut consumer) = queue.split();
        let mut tx = Tx(producer);

        receive_one_frame(&mut reader, &mut tx);
        receive_one_frame(&mut reader, &mut tx);
        assert_eq!(consumer.dequeue(), Some(a));
        assert_eq!(consumer.dequeue(), Some(b));
    }
}
