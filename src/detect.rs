//! Hit detection finite state machine.
//!
//! Pure logic, no hardware dependencies. Consumes per-cycle contact
//! averages, produces at most one resolved hit per trigger episode.
//! Fully testable on host.
//!
//! # Weapon rules
//!
//! Trigger (single-cycle contact test):
//! - Foil:  `average > 50` (fixed coarse threshold)
//! - Sabre: `average > trigger_limit` (calibrated)
//! - Epee:  `average < 50` (contact closes the circuit)
//!
//! Validity at resolution:
//! - Foil:  `average > trigger_limit`. Stricter than its trigger test:
//!   the raw 50 is a pre-filter, the calibrated limit decides validity.
//! - Sabre / Epee: same comparison as the trigger test.

use crate::calibrate::CalibrationState;
use crate::protocol::Player;
use crate::weapon::Weapon;

/// Fixed threshold for Foil trigger and the Epee closed-circuit test.
pub const FIXED_THRESHOLD: u32 = 50;

/// A resolved trigger episode. Produced once, serialized into a hit
/// frame, then discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitOutcome {
    pub player: Player,
    pub valid: bool,
}

/// Detector state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// No contact in progress.
    Standard,
    /// Contact seen, counting sustained cycles.
    Triggered,
}

/// Per-cycle hit decision state machine.
///
/// Call [`HitDetector::tick`] exactly once per sensing cycle with that
/// cycle's average. A contact must stay triggered for the weapon's
/// minimum cycle count before it resolves; releasing earlier discards
/// the episode entirely, so short noise bursts are never reported.
pub struct HitDetector {
    player: Player,
    state: State,
    contact_cycles: u32,
}

impl HitDetector {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            state: State::Standard,
            contact_cycles: 0,
        }
    }

    /// Single-cycle trigger test for `weapon`.
    pub fn is_triggered(weapon: Weapon, average: u32, calib: &CalibrationState) -> bool {
        match weapon {
            Weapon::Foil => average > FIXED_THRESHOLD,
            Weapon::Sabre => average > calib.trigger_limit,
            Weapon::Epee => average < FIXED_THRESHOLD,
        }
    }

    /// Validity test applied to the resolving cycle's average.
    fn is_valid(weapon: Weapon, average: u32, calib: &CalibrationState) -> bool {
        match weapon {
            Weapon::Foil => average > calib.trigger_limit,
            Weapon::Sabre => average > calib.trigger_limit,
            Weapon::Epee => average < FIXED_THRESHOLD,
        }
    }

    /// Advance one sensing cycle.
    ///
    /// Returns a resolved outcome on the cycle the contact count reaches
    /// the weapon's minimum; `None` otherwise. The arming cycle counts:
    /// a weapon with `min_contact_cycles == 1` resolves on the very
    /// first triggered cycle.
    pub fn tick(
        &mut self,
        weapon: Weapon,
        average: u32,
        calib: &CalibrationState,
    ) -> Option<HitOutcome> {
        let triggered = Self::is_triggered(weapon, average, calib);

        match self.state {
            State::Standard => {
                if triggered {
                    self.state = State::Triggered;
                    self.contact_cycles = 1;
                } else {
                    return None;
                }
            }
            State::Triggered => {
                if !triggered {
                    // Released too early: noise, start over.
                    self.reset();
                    return None;
                }
                self.contact_cycles += 1;
            }
        }

        if self.contact_cycles >= weapon.profile().min_contact_cycles {
            let outcome = HitOutcome {
                player: self.player,
                valid: Self::is_valid(weapon, average, calib),
            };
            self.reset();
            return Some(outcome);
        }
        None
    }

    /// True while a contact is being counted.
    pub fn in_contact(&self) -> bool {
        self.state == State::Triggered
    }

    /// Sustained-contact cycle count so far.
    pub fn contact_cycles(&self) -> u32 {
        self.contact_cycles
    }

    /// Discard any episode in progress.
    pub fn reset(&mut self) {
        self.state = State::Standard;
        self.contact_cycles = 0;
    }
}
