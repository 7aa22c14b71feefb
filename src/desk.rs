//! Desk (referee indicator) node controller.
//!
//! Stage machine: SelectWeapon -> Standard -> Waiting -> Standard...
//! The lock-out window and the indicator hold are deadline comparisons
//! against the caller-supplied clock; nothing in here sleeps, which is
//! what makes the timing properties host-testable.

use core::fmt::Write as _;

use heapless::String;

use crate::event::{Button, ButtonQueue};
use crate::hal::{Display, Indicators, Transceiver};
use crate::protocol::{Message, Player};
use crate::radio::{LinkError, RadioLink};
use crate::weapon::Weapon;

/// Indicators and buzzer stay on this long after the lock-out closes.
pub const INDICATOR_HOLD_MS: u32 = 5_000;

/// Buzzer cuts out halfway through the indicator hold.
pub const BUZZER_HOLD_MS: u32 = 2_500;

/// Desk node stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeskStage {
    /// Cycling weapons locally; confirm broadcasts the choice.
    SelectWeapon,
    /// Match running: polling for hit reports, scoring a cycle.
    Standard,
    /// Cycle scored; confirm broadcasts restart.
    Waiting,
}

/// Where the Standard stage is within one scoring cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScorePhase {
    /// No hit yet.
    Armed,
    /// First hit seen; frames arriving before the deadline still score.
    Lockout { deadline_ms: u32 },
    /// Window closed; lamps lit, buzzer for the first half.
    Indicating { buzzer_off_ms: u32, clear_ms: u32 },
}

/// Which lamps this cycle lights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct HitLatches {
    green_valid: bool,
    green_invalid: bool,
    red_valid: bool,
    red_invalid: bool,
}

/// Wrap-safe "has this deadline passed" for a millisecond tick counter.
#[inline]
fn deadline_passed(now_ms: u32, deadline_ms: u32) -> bool {
    now_ms.wrapping_sub(deadline_ms) < u32::MAX / 2
}

impl HitLatches {
    fn latch(&mut self, player: Player, valid: bool) {
        match (player, valid) {
            (Player::Green, true) => self.green_valid = true,
            (Player::Green, false) => self.green_invalid = true,
            (Player::Red, true) => self.red_valid = true,
            (Player::Red, false) => self.red_invalid = true,
        }
    }

    fn any(&self) -> bool {
        self.green_valid || self.green_invalid || self.red_valid || self.red_invalid
    }
}

/// State machine for the desk node.
pub struct DeskController<'a, R, D, I>
where
    R: Transceiver,
    D: Display,
    I: Indicators,
{
    stage: DeskStage,
    phase: ScorePhase,
    weapon: Weapon,
    latches: HitLatches,
    link: RadioLink<R>,
    display: D,
    indicators: I,
    buttons: &'a ButtonQueue,
    /// Send error from a button-driven broadcast, surfaced by the next tick.
    pending_error: Option<LinkError>,
}

impl<'a, R, D, I> DeskController<'a, R, D, I>
where
    R: Transceiver,
    D: Display,
    I: Indicators,
{
    pub fn new(radio: R, display: D, indicators: I, buttons: &'a ButtonQueue) -> Self {
        Self {
            stage: DeskStage::SelectWeapon,
            phase: ScorePhase::Armed,
            weapon: Weapon::Foil,
            latches: HitLatches::default(),
            link: RadioLink::new(radio),
            display,
            indicators,
            buttons,
            pending_error: None,
        }
    }

    /// Bring the radio up. Call once before the first tick.
    pub fn start(&mut self) {
        self.link.start_desk();
    }

    /// Run one main-loop cycle at `now_ms`.
    pub fn tick(&mut self, now_ms: u32) -> Result<(), LinkError> {
        while let Some(event) = self.buttons.pop() {
            self.apply_button(event.button);
        }

        match self.stage {
            DeskStage::SelectWeapon => {
                let mut text: String<48> = String::new();
                let _ = write!(text, "Weapon selecting:\n{}", self.weapon.name());
                self.display.show(&text);
            }
            DeskStage::Standard => self.run_score_cycle(now_ms),
            DeskStage::Waiting => {
                self.display.show("Press confirmation\nbutton to continue");
            }
        }

        match self.pending_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn apply_button(&mut self, button: Button) {
        match (self.stage, button) {
            (DeskStage::SelectWeapon, Button::Select) => {
                self.weapon = self.weapon.next();
            }
            (DeskStage::SelectWeapon, Button::Confirm) => {
                if let Err(err) = self.link.send(Message::SelectWeapon(self.weapon)) {
                    self.pending_error = Some(err);
                }
                self.display.show("Game is running");
                self.stage = DeskStage::Standard;
                self.phase = ScorePhase::Armed;
            }
            (DeskStage::Waiting, Button::Confirm) => {
                if let Err(err) = self.link.send(Message::Restart) {
                    self.pending_error = Some(err);
                }
                // A hit report still buffered from the finished cycle
                // must not score into the new one.
                self.link.flush_rx();
                self.display.show("Game is running");
                self.stage = DeskStage::Standard;
                self.phase = ScorePhase::Armed;
            }
            _ => {}
        }
    }

    fn run_score_cycle(&mut self, now_ms: u32) {
        match self.phase {
            ScorePhase::Armed => {
                if self.link.available() {
                    // First hit signal opens the lock-out window; the
                    // frames themselves are applied below like any other
                    // frame inside the window.
                    self.phase = ScorePhase::Lockout {
                        deadline_ms: now_ms.wrapping_add(self.weapon.profile().lockout_ms),
                    };
                    self.apply_hits();
                }
            }
            ScorePhase::Lockout { deadline_ms } => {
                if deadline_passed(now_ms, deadline_ms) {
                    // A report can land between the last in-window tick
                    // and this one; it arrived inside the window, so it
                    // still scores. Frames arriving from here on do not.
                    self.apply_hits();
                    self.light_indicators(now_ms);
                } else {
                    self.apply_hits();
                }
            }
            ScorePhase::Indicating {
                buzzer_off_ms,
                clear_ms,
            } => {
                if deadline_passed(now_ms, clear_ms) {
                    self.clear_indicators();
                    self.stage = DeskStage::Waiting;
                    self.phase = ScorePhase::Armed;
                } else if deadline_passed(now_ms, buzzer_off_ms) {
                    self.indicators.set_buzzer(false);
                }
            }
        }
    }

    fn apply_hits(&mut self) {
        for msg in self.link.receive_all() {
            if let Message::Hit { player, valid } = msg {
                self.latches.latch(player, valid);
            }
        }
    }

    fn light_indicators(&mut self, now_ms: u32) {
        self.indicators.set_valid(Player::Green, self.latches.green_valid);
        self.indicators.set_invalid(Player::Green, self.latches.green_invalid);
        self.indicators.set_valid(Player::Red, self.latches.red_valid);
        self.indicators.set_invalid(Player::Red, self.latches.red_invalid);
        self.indicators.set_buzzer(true);
        self.phase = ScorePhase::Indicating {
            buzzer_off_ms: now_ms.wrapping_add(BUZZER_HOLD_MS),
            clear_ms: now_ms.wrapping_add(INDICATOR_HOLD_MS),
        };
    }

    fn clear_indicators(&mut self) {
        self.indicators.set_valid(Player::Green, false);
        self.indicators.set_invalid(Player::Green, false);
        self.indicators.set_valid(Player::Red, false);
        self.indicators.set_invalid(Player::Red, false);
        self.indicators.set_buzzer(false);
        self.latches = HitLatches::default();
    }

    // --- Observers, used by the firmware loop and tests ---

    pub fn stage(&self) -> DeskStage {
        self.stage
    }

    pub fn weapon(&self) -> Weapon {
        self.weapon
    }

    /// True once any hit has been latched in the current cycle.
    pub fn cycle_scored(&self) -> bool {
        self.latches.any()
    }
}
