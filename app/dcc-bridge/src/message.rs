// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host message schema and length-prefixed framing.
//!
//! The wire encoding below the field level is `hubpack`'s — a fixed-layout,
//! no_std-friendly `serde` backend, the same one the teacher uses for its
//! own host/SP message schema (`lib/host-sp-messages`). This module defines
//! the schema; `hubpack` is the "schema-driven variant encoder" spec.md §1
//! treats as an external collaborator.

use crate::error::DecodeError;
use hubpack::SerializedSize;
use serde::{Deserialize, Serialize};

/// Which handshake direction a `Handshake` message carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SerializedSize)]
pub enum HandshakeType {
    Request,
    Response,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SerializedSize)]
pub struct Handshake {
    pub kind: HandshakeType,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SerializedSize)]
pub enum Direction {
    Forward,
    Backward,
}

/// The decoder-facing half of a control packet. §4.3 maps this to a DCC
/// instruction byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SerializedSize)]
pub enum Command {
    Drive {
        direction: Direction,
        /// Only the low 5 bits are significant (0..31); see §4.3.
        speed: u8,
    },
    Halt,
    EmergencyStop,
    Light {
        on: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SerializedSize)]
pub struct ControlPacket {
    pub address: u8,
    pub command: Command,
}

/// Top-level tagged union received from (and, for `Handshake`, sent to) the
/// host. Closed enumeration so an unrecognized wire variant is a decode
/// error rather than a silently-accepted default (spec.md §9 design note).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SerializedSize)]
pub enum Message {
    Handshake(Handshake),
    ControlPacket(ControlPacket),
}

/// Largest serialized `Message` the schema can produce. The host-link
/// receiver sizes its receive buffer to this and rejects longer frames
/// (spec.md §4.1 "buffer sizing").
pub const MAX_MESSAGE_SIZE: usize = Message::MAX_SIZE;

/// Number of bytes in the little-endian length prefix (spec.md §6).
pub const LENGTH_PREFIX_LEN: usize = 4;

static_assertions::const_assert_eq!(LENGTH_PREFIX_LEN, core::mem::size_of::<u32>());

pub fn length_prefix(len: u32) -> [u8; LENGTH_PREFIX_LEN] {
    len.to_le_bytes()
}

pub fn parse_length_prefix(bytes: [u8; LENGTH_PREFIX_LEN]) -> u32 {
    u32::from_le_bytes(bytes)
}

/// Decode a `Message` from exactly `payload`'s bytes (no trailing data is
/// expected or required — framing already bounded the payload to `length`
/// bytes).
pub fn decode(payload: &[u8]) -> Result<Message, DecodeError> {
    hubpack::deserialize::<Message>(payload)
        .map(|(message, _rest)| message)
        .map_err(|_| DecodeError::Malformed)
}

/// Encode `message` into `buf`, returning the written prefix.
pub fn encode<'b>(message: &Message, buf: &'b mut [u8]) -> &'b [u8] {
    let n = hubpack::serialize(buf, message).unwrap_or(0);
    &buf[..n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_round_trips() {
        let msg = Message::Handshake(Handshake { kind: HandshakeType::Response });
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let encoded = encode(&msg, &mut buf);
        assert_eq!(decode(encoded).unwrap(), msg);
    }

    #[test]
    fn control_packet_round_trips() {
        let msg = Message::ControlPacket(ControlPacket {
            address: 3,
            command: Command::Drive { direction: Direction::Forward, speed: 15 },
        });
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let encoded = encode(&msg, &mut buf);
        assert_eq!(decode(encoded).unwrap(), msg);
    }

    #[test]
    fn garbage_fails_to_decode() {
        let garbage = [0xFFu8; MAX_MESSAGE_SIZE];
        assert!(decode(&garbage).is_err());
    }

    #[test]
    fn length_prefix_is_little_endian() {
        assert_eq!(length_prefix(0x0102_0304), [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(parse_length_prefix([0x04, 0x03, 0x02, 0x01]), 0x0102_0304);
    }
}
