// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat error types. No `anyhow`/`thiserror` — this is `no_std` and every
//! error here is handled locally, never bubbled up to the host (spec.md §7).
//!
//! There is no `PushError`/`Full` type: the mailbox's only producer
//! operation is a blocking push (spec.md §4.1, "Mailbox full: block until
//! space"), so there is no failure path to report. An oversize frame is
//! likewise not a `DecodeError` — it is caught before decode is even
//! attempted, by [`crate::hostlink`] comparing the length prefix against
//! [`crate::message::MAX_MESSAGE_SIZE`], and reported as
//! [`crate::hostlink::FrameOutcome::Oversize`].

/// `hubpack` rejected a framed message's payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    Malformed,
}
