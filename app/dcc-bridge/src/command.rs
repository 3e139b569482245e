// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command → DCC instruction mapping (§4.3) and the dispatcher (component
//! B): dequeues one [`Message`] per outer-loop iteration and drives the
//! transmitter or the host-reply encoder accordingly.

use crate::config::{EMERGENCY_STOP_REPEATS, IDLE_ADDRESS, IDLE_INSTRUCTION};
use crate::dcc::{PulseSink, Transmitter};
use crate::diag::{DccEvent, DispatchEvent, DCC_LOG, DISPATCH_LOG};
use crate::mailbox::MailboxRx;
use crate::message::{
    self, Command, ControlPacket, Direction, Handshake, HandshakeType, Message,
};
use crate::{ringbuf_entry};

/// Translates a [`Command`] into its DCC instruction byte, per §4.3. The
/// idle packet's own instruction (`0x00`) is not produced by this mapping —
/// it is injected directly by the outer loop, see [`crate::config::IDLE_INSTRUCTION`].
pub fn instruction_for(command: &Command) -> u8 {
    match *command {
        Command::Drive { direction: Direction::Forward, speed } => {
            0x40 | (1 << 5) | (speed & 0x1F)
        }
        Command::Drive { direction: Direction::Backward, speed } => 0x40 | (speed & 0x1F),
        Command::Halt => 0x60,
        Command::EmergencyStop => 0x61,
        Command::Light { on: true } => 0x90,
        Command::Light { on: false } => 0x80,
    }
}

/// Sends a host reply frame (4-byte little-endian length, then payload) to
/// whatever sink the host-link output goes through. Kept generic so tests
/// can supply an in-memory sink instead of a real UART.
pub trait HostReply {
    fn write(&mut self, bytes: &[u8]);
}

/// Dequeues at most one [`Message`] from the mailbox and acts on it.
/// Returns immediately if the mailbox was empty (§4.2).
pub fn dispatch<S: PulseSink, R: HostReply>(
    rx: &mut MailboxRx<'_>,
    tx: &mut Transmitter<S>,
    reply: &mut R,
) {
    let Some(message) = rx.pop() else {
        return;
    };
    match message {
        Message::Handshake(Handshake { kind: HandshakeType::Request }) => {
            ringbuf_entry!(DISPATCH_LOG, DispatchEvent::Handshake);
            send_handshake_response(reply);
        }
        Message::Handshake(Handshake { kind: HandshakeType::Response }) => {
            // Not emitted by the host in a well-formed session; no action
            // per §4.2 "unrecognized variant: no-op" (a RESPONSE is a
            // recognized variant, just not one the device ever has to act
            // on).
        }
        Message::ControlPacket(ControlPacket { address, command }) => {
            dispatch_control_packet(address, &command, tx);
        }
    }
}

fn dispatch_control_packet<S: PulseSink>(
    address: u8,
    command: &Command,
    tx: &mut Transmitter<S>,
) {
    let instruction = instruction_for(command);
    let repeats = if matches!(command, Command::EmergencyStop) {
        EMERGENCY_STOP_REPEATS
    } else {
        1
    };
    ringbuf_entry!(DISPATCH_LOG, DispatchEvent::ControlPacket { address, instruction });
    for _ in 0..repeats {
        tx.send_command(address, instruction);
        ringbuf_entry!(DCC_LOG, DccEvent::Application { address, instruction });
    }
}

fn send_handshake_response<R: HostReply>(reply: &mut R) {
    let response = Message::Handshake(Handshake { kind: HandshakeType::Response });
    let mut buf = [0u8; message::MAX_MESSAGE_SIZE];
    let encoded = message::encode(&response, &mut buf);
    if encoded.is_empty() {
        // Encode failure: abort silently, no partial write (§4.2/§7).
        ringbuf_entry!(DISPATCH_LOG, DispatchEvent::HandshakeEncodeFailed);
        return;
    }
    let prefix = message::length_prefix(encoded.len() as u32);
    reply.write(&prefix);
    reply.write(encoded);
}

/// Emits one idle packet. Called once per outer-loop iteration on the
/// primary core before [`dispatch`] (§4.4 "idle generation").
pub fn send_idle<S: PulseSink>(tx: &mut Transmitter<S>) {
    tx.send_command(IDLE_ADDRESS, IDLE_INSTRUCTION);
    ringbuf_entry!(DCC_LOG, DccEvent::Idle);
}
