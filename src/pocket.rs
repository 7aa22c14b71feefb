//! Pocket (weapon sensor) node controller.
//!
//! Stage machine: StartConnection -> SelectWeapon -> Calibration ->
//! Standard <-> Triggered -> Waiting, with no way back to
//! StartConnection short of a power cycle. Everything happens inside
//! `tick`; button interrupts only feed the event queue.

use core::fmt::Write as _;

use heapless::String;

use crate::calibrate::CalibrationState;
use crate::detect::HitDetector;
use crate::event::{Button, ButtonQueue};
use crate::hal::{Display, TouchProbe, Transceiver, WeaponLines};
use crate::protocol::{Message, Player};
use crate::radio::{LinkError, RadioLink};
use crate::touch::ContactSampler;
use crate::weapon::Weapon;

/// Pocket node stage. Exactly one is active; all other session state is
/// scoped to the current game and reset by a restart frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PocketStage {
    /// Choosing a color; the radio is not up yet.
    StartConnection,
    /// Link up, waiting for the desk's weapon broadcast.
    SelectWeapon,
    /// Tracking ambient noise into the trigger limit.
    Calibration,
    /// Sensing, no contact in progress.
    Standard,
    /// Contact seen, counting sustained cycles.
    Triggered,
    /// Hit reported; only a radio restart releases this stage.
    Waiting,
}

/// State machine for one pocket node.
pub struct PocketController<'a, P, R, D, W>
where
    P: TouchProbe,
    R: Transceiver,
    D: Display,
    W: WeaponLines,
{
    stage: PocketStage,
    player: Player,
    weapon: Option<Weapon>,
    calib: CalibrationState,
    detector: HitDetector,
    sampler: ContactSampler<P>,
    link: RadioLink<R>,
    display: D,
    lines: W,
    buttons: &'a ButtonQueue,
    last_average: u32,
}

impl<'a, P, R, D, W> PocketController<'a, P, R, D, W>
where
    P: TouchProbe,
    R: Transceiver,
    D: Display,
    W: WeaponLines,
{
    /// Create a controller in StartConnection with the default color.
    pub fn new(probe: P, radio: R, display: D, lines: W, buttons: &'a ButtonQueue) -> Self {
        Self {
            stage: PocketStage::StartConnection,
            player: Player::Green,
            weapon: None,
            calib: CalibrationState::begin(),
            detector: HitDetector::new(Player::Green),
            sampler: ContactSampler::new(probe),
            link: RadioLink::new(radio),
            display,
            lines,
            buttons,
            last_average: 0,
        }
    }

    /// Run one main-loop cycle.
    ///
    /// Drains pending button events first, then advances the stage
    /// machine. The only error path is a radio send timeout while
    /// reporting a hit; the stage transition still completes so a
    /// restart can recover the node.
    pub fn tick(&mut self) -> Result<(), LinkError> {
        while let Some(event) = self.buttons.pop() {
            self.apply_button(event.button);
        }

        match self.stage {
            PocketStage::StartConnection => {
                self.show_player();
                Ok(())
            }
            PocketStage::SelectWeapon => {
                self.poll_weapon_broadcast();
                self.display.show("Waiting selection\nof weapon...");
                Ok(())
            }
            PocketStage::Calibration => {
                self.run_calibration_cycle();
                Ok(())
            }
            PocketStage::Standard | PocketStage::Triggered => self.run_sensing_cycle(),
            PocketStage::Waiting => {
                self.poll_restart();
                self.show_final_average();
                Ok(())
            }
        }
    }

    fn apply_button(&mut self, button: Button) {
        match (self.stage, button) {
            (PocketStage::StartConnection, Button::Select) => {
                // Color can only change before the link starts.
                self.player = self.player.toggled();
                self.detector = HitDetector::new(self.player);
            }
            (PocketStage::StartConnection, Button::Confirm) => {
                self.link.start_pocket(self.player);
                self.stage = PocketStage::SelectWeapon;
            }
            (PocketStage::Calibration, Button::Select) => {
                self.calib.cycle_sensitivity();
            }
            (PocketStage::Calibration, Button::Confirm) => {
                // Local exit; the radio end-calibration frame is the
                // other, less reliable path.
                self.stage = PocketStage::Standard;
            }
            // Waiting has no local exit; sensing stages ignore buttons.
            _ => {}
        }
    }

    fn poll_weapon_broadcast(&mut self) {
        for msg in self.link.receive_all() {
            if let Message::SelectWeapon(weapon) = msg {
                self.arm_for(weapon);
                break;
            }
        }
    }

    fn arm_for(&mut self, weapon: Weapon) {
        self.weapon = Some(weapon);
        self.lines.set_line_a(true);
        self.lines.set_line_c(weapon != Weapon::Sabre);
        self.calib = CalibrationState::begin();
        self.detector.reset();
        self.stage = PocketStage::Calibration;
    }

    fn run_calibration_cycle(&mut self) {
        let average = self.sampler.sample().average();
        self.last_average = average;
        self.calib.observe(average);
        self.show_calibration(average);

        for msg in self.link.receive_all() {
            if msg == Message::EndCalibration {
                self.stage = PocketStage::Standard;
                break;
            }
        }
    }

    fn run_sensing_cycle(&mut self) -> Result<(), LinkError> {
        let Some(weapon) = self.weapon else {
            // Cannot sense without a profile; unreachable through the
            // stage machine.
            self.stage = PocketStage::SelectWeapon;
            return Ok(());
        };

        let average = self.sampler.sample().average();
        self.last_average = average;

        let outcome = self.detector.tick(weapon, average, &self.calib);
        if let Some(outcome) = outcome {
            self.stage = PocketStage::Waiting;
            return self.link.send(Message::Hit {
                player: outcome.player,
                valid: outcome.valid,
            });
        }

        self.stage = if self.detector.in_contact() {
            PocketStage::Triggered
        } else {
            PocketStage::Standard
        };
        Ok(())
    }

    fn poll_restart(&mut self) {
        for msg in self.link.receive_all() {
            if msg == Message::Restart {
                self.reset_for_restart();
                break;
            }
        }
    }

    /// Session reset on restart-frame receipt: the contact counter is
    /// cleared, calibration survives.
    fn reset_for_restart(&mut self) {
        self.detector.reset();
        self.stage = PocketStage::Standard;
    }

    fn show_player(&mut self) {
        let mut text: String<32> = String::new();
        let _ = write!(text, "Player: {}", self.player.name());
        self.display.show(&text);
    }

    fn show_calibration(&mut self, average: u32) {
        let name = self.weapon.map(Weapon::name).unwrap_or("?");
        let mut text: String<96> = String::new();
        let _ = write!(
            text,
            "{}\ntrigger_limit: {}\naverage: {}\nsensitivity: {}",
            name, self.calib.trigger_limit, average, self.calib.sensitivity
        );
        self.display.show(&text);
    }

    fn show_final_average(&mut self) {
        let name = self.weapon.map(Weapon::name).unwrap_or("?");
        let mut text: String<64> = String::new();
        let _ = write!(text, "{}\nFinal average: {}", name, self.last_average);
        self.display.show(&text);
    }

    // --- Observers, used by the firmware loop and tests ---

    pub fn stage(&self) -> PocketStage {
        self.stage
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn weapon(&self) -> Option<Weapon> {
        self.weapon
    }

    pub fn calibration(&self) -> &CalibrationState {
        &self.calib
    }

    pub fn last_average(&self) -> u32 {
        self.last_average
    }
}
