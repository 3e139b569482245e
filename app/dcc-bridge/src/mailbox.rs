// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inter-core mailbox: a bounded, single-producer/single-consumer queue of
//! decoded [`Message`]s, shared between core 1 (producer, host-link
//! receiver) and core 0 (consumer, dispatcher).
//!
//! Built on `heapless::spsc::Queue`, the workspace's usual choice for
//! bounded embedded queues. Unlike a queue shared between Hubris tasks —
//! which only ever run one at a time on a single core — this one is
//! genuinely accessed by two cores simultaneously, so the split halves rely
//! on `heapless`'s own cross-core safety guarantees rather than any
//! single-core-only trick (see `DESIGN.md` for why `lib/armv6m-atomic-hack`
//! is not used here).

use crate::message::Message;
use heapless::spsc::{Consumer, Producer, Queue};

/// `heapless::spsc::Queue<T, N>` has a usable capacity of `N - 1`; spec.md
/// §3 calls for 10 usable entries.
pub(crate) const QUEUE_LEN: usize = crate::config::MAILBOX_CAPACITY + 1;

static mut QUEUE: Queue<Message, QUEUE_LEN> = Queue::new();

pub struct MailboxTx<'q>(pub(crate) Producer<'q, Message, QUEUE_LEN>);
pub struct MailboxRx<'q>(pub(crate) Consumer<'q, Message, QUEUE_LEN>);

/// Splits the process-wide mailbox into its producer and consumer halves.
///
/// # Safety
///
/// Must be called exactly once, before core 1 is launched, so that no
/// concurrent access to the backing queue is possible until the split
/// halves have been handed to their respective cores.
pub unsafe fn split() -> (MailboxTx<'static>, MailboxRx<'static>) {
    let (tx, rx) = QUEUE.split();
    (MailboxTx(tx), MailboxRx(rx))
}

impl<'q> MailboxTx<'q> {
    /// Enqueues `message`, blocking until space is available.
    ///
    /// Per spec.md §4.1: the host-link receiver is the sole producer, and a
    /// full mailbox simply stalls it (and, transitively, stalls reading
    /// from the host) rather than dropping anything.
    pub fn push_blocking(&mut self, mut message: Message) {
        loop {
            match self.0.enqueue(message) {
                Ok(()) => return,
                Err(rejected) => {
                    message = rejected;
                    core::hint::spin_loop();
                }
            }
        }
    }
}

impl<'q> MailboxRx<'q> {
    /// Non-blocking poll. Returns `None` immediately if the mailbox is
    /// empty (spec.md §4.2: the dispatcher "returns immediately" on empty).
    pub fn pop(&mut self) -> Option<Message> {
        self.0.dequeue()
    }
}
