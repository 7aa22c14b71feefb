//! Button event intake.
//!
//! Button interrupts never touch controller state. The ISR pushes a
//! timestamped event onto this lock-free ring and returns; the
//! controller drains the ring at the top of each tick. Debounce is a
//! timestamp comparison at push time; nothing ever sleeps in interrupt
//! context.
//!
//! Single producer (the ISR), single consumer (the main loop). Push
//! never blocks; events are dropped if the ring is full.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Events closer together than this are treated as contact bounce.
pub const DEBOUNCE_MS: u32 = 100;

/// Default queue depth. A human cannot outrun 8 slots between ticks.
pub const QUEUE_SIZE: usize = 8;

/// Physical button identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Button {
    Confirm,
    Select,
}

/// One debounced, timestamped button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonEvent {
    pub at_ms: u32,
    pub button: Button,
}

/// Sentinel for "no press accepted yet".
const NEVER: u32 = u32::MAX;

/// Lock-free SPSC button queue.
///
/// # Safety
///
/// Uses `UnsafeCell` internally but is safe under the architectural
/// rules: exactly one producer (ISR) and one consumer (main loop), all
/// coordination through the atomic indices. Producer releases the write
/// index after the slot write; consumer acquires it before the read.
pub struct ButtonQueue<const N: usize = QUEUE_SIZE> {
    slots: UnsafeCell<[ButtonEvent; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
    last_confirm_ms: AtomicU32,
    last_select_ms: AtomicU32,
}

// SAFETY: single producer, single consumer, atomic coordination.
unsafe impl<const N: usize> Sync for ButtonQueue<N> {}
unsafe impl<const N: usize> Send for ButtonQueue<N> {}

impl<const N: usize> ButtonQueue<N> {
    const MASK: usize = N - 1;

    /// Create an empty queue.
    ///
    /// # Panics
    ///
    /// Panics at compile time if N is not a power of 2.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Queue size must be power of 2");

        const EMPTY: ButtonEvent = ButtonEvent {
            at_ms: 0,
            button: Button::Confirm,
        };
        Self {
            slots: UnsafeCell::new([EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            last_confirm_ms: AtomicU32::new(NEVER),
            last_select_ms: AtomicU32::new(NEVER),
        }
    }

    /// Push a press from interrupt context. Never blocks.
    ///
    /// Returns `false` if the press was rejected as bounce or the ring
    /// was full (counted in [`ButtonQueue::dropped`]).
    #[inline]
    pub fn push(&self, now_ms: u32, button: Button) -> bool {
        let last = match button {
            Button::Confirm => &self.last_confirm_ms,
            Button::Select => &self.last_select_ms,
        };
        let prev = last.load(Ordering::Relaxed);
        if prev != NEVER && now_ms.wrapping_sub(prev) < DEBOUNCE_MS {
            return false;
        }

        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);
        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // Only an accepted press arms the debounce window; a press
        // dropped for a full ring must not suppress the retry.
        last.store(now_ms, Ordering::Relaxed);

        // SAFETY: single producer, slot at `write` is not visible to the
        // consumer until the index store below.
        unsafe {
            (*self.slots.get())[(write as usize) & Self::MASK] = ButtonEvent { at_ms: now_ms, button };
        }
        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Pop the oldest event (main loop only).
    #[inline]
    pub fn pop(&self) -> Option<ButtonEvent> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        if read == write {
            return None;
        }

        // SAFETY: single consumer, slot was published by the producer's
        // release store.
        let event = unsafe { (*self.slots.get())[(read as usize) & Self::MASK] };
        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(event)
    }

    /// Count of presses dropped with the ring full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Events waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for ButtonQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
