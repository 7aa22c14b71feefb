//! Trigger-threshold calibration.
//!
//! While a pocket is in its Calibration stage the trigger limit tracks
//! the ambient noise ceiling: whenever a cycle's average exceeds the
//! current limit, the limit is raised to `average - sensitivity`. The
//! ratchet is one-sided: the limit never drops on its own, so moving to
//! a quieter environment requires re-entering calibration.

/// Default trigger limit before any observation.
pub const BASELINE_TRIGGER_LIMIT: u32 = 50;

/// Sensitivity margin bounds and step; the value cycles 10 -> 15 -> 20 -> 10.
pub const SENSITIVITY_MIN: u32 = 10;
pub const SENSITIVITY_DEFAULT: u32 = 15;
pub const SENSITIVITY_MAX: u32 = 20;
pub const SENSITIVITY_STEP: u32 = 5;

/// Calibration values for one pocket session.
///
/// Created fresh on entry to the Calibration stage and kept for the rest
/// of the session (the Standard/Triggered/Waiting stages all read it).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalibrationState {
    /// Averages above this count as a (Sabre) trigger / (Foil) valid hit.
    pub trigger_limit: u32,
    /// Margin subtracted from the observed average when raising the limit.
    pub sensitivity: u32,
}

impl CalibrationState {
    pub fn begin() -> Self {
        Self {
            trigger_limit: BASELINE_TRIGGER_LIMIT,
            sensitivity: SENSITIVITY_DEFAULT,
        }
    }

    /// Cycle the sensitivity margin (select button during calibration).
    pub fn cycle_sensitivity(&mut self) {
        self.sensitivity = if self.sensitivity >= SENSITIVITY_MAX {
            SENSITIVITY_MIN
        } else {
            self.sensitivity + SENSITIVITY_STEP
        };
    }

    /// Feed one cycle's average into the ratchet.
    ///
    /// Only ever raises `trigger_limit`. An average that clears the
    /// limit by less than the sensitivity margin leaves it unchanged,
    /// keeping the ratchet strictly one-sided.
    pub fn observe(&mut self, average: u32) {
        if average > self.trigger_limit {
            let raised = average.saturating_sub(self.sensitivity);
            self.trigger_limit = self.trigger_limit.max(raised);
        }
    }
}

impl Default for CalibrationState {
    fn default() -> Self {
        Self::begin()
    }
}
