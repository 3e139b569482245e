// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! USB-to-DCC bridge firmware: decodes framed host commands and bit-bangs
//! DCC packets on a pair of antiphase GPIOs, continuously idling between
//! application packets.
//!
//! `src/main.rs` is the on-target binary entry point; everything else
//! lives here so it can be unit-tested on the host.

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod config;
pub mod dcc;
pub mod diag;
pub mod error;
pub mod gpio;
pub mod handoff;
pub mod hostlink;
pub mod hostport;
pub mod mailbox;
pub mod message;
pub mod multicore;
