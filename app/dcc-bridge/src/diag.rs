// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Post-mortem diagnostic ring buffers.
//!
//! There is no stdout on this target, so — like the teacher's own
//! `lib/ringbuf` — the answer to "how do you log from firmware" is a
//! static, fixed-capacity array of `Copy` entries that a debug probe can
//! read back after the fact, overwritten circularly so it never grows.
//! This is a deliberately smaller version of that crate: one entry type per
//! ring, no `counted_ringbuf!`/derive machinery (that exists upstream to
//! support cross-task introspection tooling this firmware has no use for),
//! and no dependency on `lib/static-cell`'s `armv6m-atomic-hack` — see
//! `DESIGN.md` for why that trick doesn't apply here. Each named ring below
//! is written from exactly one core, so a relaxed atomic cursor plus a
//! plain array write is sufficient; a reader racing a writer mid-update may
//! observe a torn entry, which is the same trade the upstream macro makes.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// A fixed-capacity circular log of `T`, safe to declare as a `static`.
pub struct Ringbuf<T: Copy, const N: usize> {
    entries: UnsafeCell<[T; N]>,
    cursor: AtomicUsize,
}

// SAFETY: each `Ringbuf` in this module is written from exactly one core
// (see module doc); concurrent *reads* (a debug probe) are inherently
// racy against the writer and that is accepted, not a soundness issue.
unsafe impl<T: Copy, const N: usize> Sync for Ringbuf<T, N> {}

impl<T: Copy, const N: usize> Ringbuf<T, N> {
    pub const fn new(fill: T) -> Self {
        Self { entries: UnsafeCell::new([fill; N]), cursor: AtomicUsize::new(0) }
    }

    /// Records `entry` into the next slot, overwriting the oldest one once
    /// the ring has wrapped.
    pub fn record(&self, entry: T) {
        // thumbv6m (Cortex-M0+) has no atomic read-modify-write, only
        // load/store, so the cursor advances via a load-then-store pair
        // rather than `fetch_add`; single-writer per ring (module doc)
        // makes that safe.
        let i = self.cursor.load(Ordering::Relaxed);
        self.cursor.store(i.wrapping_add(1), Ordering::Relaxed);
        let idx = i % N;
        // SAFETY: single-writer per ring (module doc); no other code ever
        // takes a `&mut` into `entries`.
        unsafe {
            (*self.entries.get())[idx] = entry;
        }
    }

    /// Snapshot of the ring's current contents, oldest-storage-order (not
    /// necessarily chronological once wrapped). Exposed only for tests; a
    /// real debug probe reads the backing memory directly.
    #[cfg(test)]
    pub fn snapshot(&self) -> [T; N] {
        unsafe { *self.entries.get() }
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

/// Declares a named static ring buffer of `$n` entries of `$ty`, filled
/// with `$fill` until first written.
#[macro_export]
macro_rules! ringbuf {
    (pub $name:ident, $ty:ty, $n:expr, $fill:expr) => {
        pub static $name: $crate::diag::Ringbuf<$ty, $n> = $crate::diag::Ringbuf::new($fill);
    };
    ($name:ident, $ty:ty, $n:expr, $fill:expr) => {
        static $name: $crate::diag::Ringbuf<$ty, $n> = $crate::diag::Ringbuf::new($fill);
    };
}

/// Records one entry into a ring declared with [`ringbuf!`].
#[macro_export]
macro_rules! ringbuf_entry {
    ($name:ident, $entry:expr) => {
        $name.record($entry)
    };
}

/// Host-link receiver (A) events: every decode attempt, success or
/// failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostlinkEvent {
    None,
    Enqueued,
    DecodeFailed,
    OversizeFrame { length: u32 },
}

/// Dispatcher (B) events: one per dequeued message acted on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DispatchEvent {
    None,
    Handshake,
    ControlPacket { address: u8, instruction: u8 },
    HandshakeEncodeFailed,
}

/// DCC transmitter (C) events: coarse accounting of idle vs. application
/// packets, not one entry per bit cell (that would overrun the ring in
/// microseconds).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DccEvent {
    None,
    Idle,
    Application { address: u8, instruction: u8 },
}

ringbuf!(pub HOSTLINK_LOG, HostlinkEvent, 32, HostlinkEvent::None);
ringbuf!(pub DISPATCH_LOG, DispatchEvent, 32, DispatchEvent::None);
ringbuf!(pub DCC_LOG, DccEvent, 32, DccEvent::None);
