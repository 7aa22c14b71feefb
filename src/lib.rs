//! # RustFencingScorer
//!
//! Scoring logic for a two-role electronic fencing-practice apparatus:
//! a referee **desk** node and one **pocket** node per fencer.
//!
//! ## Architecture
//!
//! All hardware sits behind the traits in [`hal`]. Everything above that
//! boundary is pure, tick-driven logic:
//! - Controllers advance only in `tick(now_ms)`, never by sleeping
//! - Button interrupts push events onto a lock-free queue, they never
//!   touch controller state
//! - The two nodes coordinate exclusively through 3-byte radio frames
//!
//! The whole library is `no_std` and fully testable on the host.

#![cfg_attr(not(test), no_std)]

pub mod calibrate;
pub mod desk;
pub mod detect;
pub mod event;
pub mod fault;
pub mod hal;
pub mod logging;
pub mod pocket;
pub mod protocol;
pub mod radio;
pub mod touch;
pub mod weapon;

pub use calibrate::CalibrationState;
pub use desk::DeskController;
pub use detect::{HitDetector, HitOutcome};
pub use event::{Button, ButtonQueue};
pub use fault::{FaultCode, FaultState};
pub use pocket::PocketController;
pub use protocol::{Frame, Message, Player};
pub use radio::{LinkError, RadioLink};
pub use touch::{ContactSample, ContactSampler};
pub use weapon::{Weapon, WeaponProfile};
