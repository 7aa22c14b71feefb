//! Fault latch.
//!
//! The scorer has no fatal conditions in normal play, but a stuck
//! transceiver or a node that can never leave a stage must be visible
//! instead of silently spinning. Any context may latch a fault; the
//! main loop drains and reports it.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Reason the apparatus flagged a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// The radio refused a frame for the whole retry budget. The message
    /// was not delivered; the match state of the two nodes may diverge.
    SendTimeout = 1,

    /// A node has sat in a stage longer than any legitimate exchange
    /// allows (e.g. Calibration with no exit signal ever arriving).
    LinkDesync = 2,

    /// GPIO or peripheral error.
    HardwareFault = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::SendTimeout,
            2 => FaultCode::LinkDesync,
            3 => FaultCode::HardwareFault,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault state.
///
/// Set from wherever the failure is detected, checked by the main loop
/// each cycle. Clearing keeps the lifetime counter for diagnostics.
pub struct FaultState {
    /// True if fault is active.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Additional data (e.g. retry count, stalled stage ordinal).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Latch a fault with its code and context data.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if a fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (meaning depends on fault code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear the active flag. The lifetime counter is preserved.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}
