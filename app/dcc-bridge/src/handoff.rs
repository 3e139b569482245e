// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A single-shot, single-producer/single-consumer handoff of one value from
//! core 0 to core 1, used to pass the mailbox's producer half across the
//! multicore launch in `main.rs`.
//!
//! Shaped after `lib/static-cell`'s single-borrow cell, but without its
//! dependency on `lib/armv6m-atomic-hack`: that crate exists to fake
//! read-modify-write atomics on ARMv6-M, which this doesn't need — `give`
//! always runs to completion on core 0 before core 1 is launched, and
//! `take` only ever runs on core 1 after launch, so a plain atomic
//! store/load pair (which the RP2040's Cortex-M0+ cores support natively)
//! is enough to order the write before the read.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicBool, Ordering};

pub struct Handoff<T> {
    ready: AtomicBool,
    value: UnsafeCell<MaybeUninit<T>>,
}

// SAFETY: `give`/`take` are each called at most once, by construction
// (single boot sequence), and `ready`'s release/acquire pair orders the
// write in `give` before the read in `take`.
unsafe impl<T: Send> Sync for Handoff<T> {}

impl<T> Handoff<T> {
    pub const fn new() -> Self {
        Self { ready: AtomicBool::new(false), value: UnsafeCell::new(MaybeUninit::uninit()) }
    }

    /// Stores `value`. Must be called at most once, before the consuming
    /// core is launched.
    pub fn give(&self, value: T) {
        unsafe {
            (*self.value.get()).write(value);
        }
        self.ready.store(true, Ordering::Release);
    }

    /// Busy-waits until a value has been given, then takes it. Must be
    /// called at most once.
    pub fn take(&self) -> T {
        while !self.ready.load(Ordering::Acquire) {
            core::hint::spin_loop();
        }
        unsafe { (*self.value.get()).as_ptr().read() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn give_then_take_round_trips_the_value() {
        let handoff: Handoff<u32> = Handoff::new();
        handoff.give(42);
        assert_eq!(handoff.take(), 42);
    }
}
