// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Launches the host-link receiver (component A) on core 1 via the
//! RP2040's inter-core FIFO handshake.
//!
//! Spec.md §9 models the auxiliary core as "one parallel task pinned to
//! core 1 via the platform's core-launch primitive". On RP2040 that
//! primitive is the documented SIO FIFO handshake: core 0 repeatedly pushes
//! a fixed six-word command sequence and requires each word to be echoed
//! back before advancing, restarting from the top on any mismatch. This is
//! the same raw-register idiom `app/demo-pi-pico/src/main.rs` uses for its
//! own core-0 bring-up, extended to the two-core case that board never
//! needed.

/// The six-word handshake core 1 must echo back, in order, before it is
/// considered launched: two zero "wake" words, a magic `1`, then the
/// vector table address, initial stack pointer, and entry point.
pub fn launch_sequence(vector_table: u32, stack_pointer: u32, entry: u32) -> [u32; 6] {
    [0, 0, 1, vector_table, stack_pointer, entry]
}

#[cfg(target_arch = "arm")]
mod hw {
    use super::launch_sequence;
    use rp2040_pac::{PSM, SIO};

    fn push_blocking(sio: &rp2040_pac::sio::RegisterBlock, word: u32) {
        while sio.fifo_st.read().rdy().bit_is_clear() {}
        sio.fifo_wr.write(|w| unsafe { w.bits(word) });
        cortex_m::asm::sev();
    }

    fn pop_blocking(sio: &rp2040_pac::sio::RegisterBlock) -> u32 {
        while sio.fifo_st.read().vld().bit_is_clear() {
            cortex_m::asm::wfe();
        }
        sio.fifo_rd.read().bits()
    }

    fn drain(sio: &rp2040_pac::sio::RegisterBlock) {
        while sio.fifo_st.read().vld().bit_is_set() {
            let _ = sio.fifo_rd.read().bits();
        }
    }

    /// Resets core 1, then runs the launch handshake until core 1 has
    /// echoed every word of [`launch_sequence`] in order. `entry` never
    /// returns once started.
    ///
    /// # Safety
    ///
    /// `stack_pointer` must point at the top of a stack region exclusively
    /// reserved for core 1, and `entry` must be a valid core-1 entry point
    /// compiled for this target. Must be called exactly once.
    pub unsafe fn launch_core1(vector_table: u32, stack_pointer: u32, entry: u32) {
        let psm = &*PSM::ptr();
        psm.frce_off.modify(|_, w| w.proc1().set_bit());
        while psm.frce_off.read().proc1().bit_is_clear() {}
        psm.frce_off.modify(|_, w| w.proc1().clear_bit());

        let sio = &*SIO::ptr();
        let sequence = launch_sequence(vector_table, stack_pointer, entry);
        let mut step = 0usize;
        while step < sequence.len() {
            let word = sequence[step];
            if word == 0 {
                drain(sio);
            }
            push_blocking(sio, word);
            let response = pop_blocking(sio);
            step = if response == word { step + 1 } else { 0 };
        }
    }
}

#[cfg(target_arch = "arm")]
pub use hw::launch_core1;
