//! Desk controller scenario tests: weapon broadcast, the lock-out
//! window, indicator timing and the restart discipline.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rust_fencing_scorer::desk::{DeskController, DeskStage, BUZZER_HOLD_MS, INDICATOR_HOLD_MS};
use rust_fencing_scorer::event::{Button, ButtonQueue};
use rust_fencing_scorer::hal::{Display, Indicators, Transceiver};
use rust_fencing_scorer::protocol::{Frame, PipeAddress, Player, PAYLOAD_LEN};
use rust_fencing_scorer::weapon::Weapon;

#[derive(Default)]
struct RadioState {
    started: bool,
    writing_pipe: Option<PipeAddress>,
    reading_pipes: Vec<(u8, PipeAddress)>,
    rx: VecDeque<Frame>,
    tx: Vec<Frame>,
}

#[derive(Clone, Default)]
struct MockRadio(Rc<RefCell<RadioState>>);

impl Transceiver for MockRadio {
    fn begin(&mut self, _channel: u8, _payload_len: usize) {
        self.0.borrow_mut().started = true;
    }
    fn open_writing_pipe(&mut self, addr: &PipeAddress) {
        self.0.borrow_mut().writing_pipe = Some(*addr);
    }
    fn open_reading_pipe(&mut self, pipe: u8, addr: &PipeAddress) {
        self.0.borrow_mut().reading_pipes.push((pipe, *addr));
    }
    fn start_listening(&mut self) {}
    fn stop_listening(&mut self) {}
    fn available(&mut self) -> bool {
        !self.0.borrow().rx.is_empty()
    }
    fn read(&mut self, buf: &mut Frame) {
        *buf = self.0.borrow_mut().rx.pop_front().unwrap_or([0; PAYLOAD_LEN]);
    }
    fn write(&mut self, buf: &Frame) -> bool {
        self.0.borrow_mut().tx.push(*buf);
        true
    }
}

#[derive(Clone, Default)]
struct MockDisplay(Rc<RefCell<String>>);

impl Display for MockDisplay {
    fn show(&mut self, text: &str) {
        *self.0.borrow_mut() = text.to_string();
    }
}

/// Lamp state snapshot: (green_valid, green_invalid, red_valid,
/// red_invalid, buzzer).
#[derive(Clone, Default)]
struct MockIndicators(Rc<RefCell<(bool, bool, bool, bool, bool)>>);

impl Indicators for MockIndicators {
    fn set_valid(&mut self, player: Player, on: bool) {
        let mut state = self.0.borrow_mut();
        match player {
            Player::Green => state.0 = on,
            Player::Red => state.2 = on,
        }
    }
    fn set_invalid(&mut self, player: Player, on: bool) {
        let mut state = self.0.borrow_mut();
        match player {
            Player::Green => state.1 = on,
            Player::Red => state.3 = on,
        }
    }
    fn set_buzzer(&mut self, on: bool) {
        self.0.borrow_mut().4 = on;
    }
}

struct Rig {
    radio: MockRadio,
    display: MockDisplay,
    indicators: MockIndicators,
}

fn rig(buttons: &ButtonQueue) -> (DeskController<'_, MockRadio, MockDisplay, MockIndicators>, Rig) {
    let radio = MockRadio::default();
    let display = MockDisplay::default();
    let indicators = MockIndicators::default();
    let mut desk = DeskController::new(radio.clone(), display.clone(), indicators.clone(), buttons);
    desk.start();
    (
        desk,
        Rig {
            radio,
            display,
            indicators,
        },
    )
}

/// Select `weapon` and confirm, leaving the desk in Standard.
fn start_game(
    desk: &mut DeskController<'_, MockRadio, MockDisplay, MockIndicators>,
    buttons: &ButtonQueue,
    weapon: Weapon,
) {
    let mut presses = 0;
    let mut cursor = Weapon::Foil;
    while cursor != weapon {
        cursor = cursor.next();
        presses += 1;
    }
    for i in 0..presses {
        buttons.push(i * 200, Button::Select);
    }
    buttons.push(1_000, Button::Confirm);
    desk.tick(1_000).unwrap();
    assert_eq!(desk.stage(), DeskStage::Standard);
}

#[test]
fn test_link_comes_up_listening_on_both_colors() {
    let buttons = ButtonQueue::new();
    let (_desk, rig) = rig(&buttons);

    let radio = rig.radio.0.borrow();
    assert!(radio.started);
    assert_eq!(radio.writing_pipe, Some(*b"00003"));
    assert_eq!(radio.reading_pipes, vec![(1, *b"00001"), (2, *b"00002")]);
}

#[test]
fn test_select_twice_then_confirm_broadcasts_epee() {
    let buttons = ButtonQueue::new();
    let (mut desk, rig) = rig(&buttons);

    assert_eq!(desk.weapon(), Weapon::Foil);
    buttons.push(0, Button::Select);
    desk.tick(0).unwrap();
    assert!(rig.display.0.borrow().contains("Sabre"));

    buttons.push(200, Button::Select);
    buttons.push(400, Button::Confirm);
    desk.tick(400).unwrap();

    assert_eq!(desk.weapon(), Weapon::Epee);
    assert_eq!(desk.stage(), DeskStage::Standard);
    assert_eq!(rig.radio.0.borrow().tx, vec![*b"eee"]);
    assert_eq!(*rig.display.0.borrow(), "Game is running");
}

#[test]
fn test_single_hit_scores_after_lockout() {
    let buttons = ButtonQueue::new();
    let (mut desk, rig) = rig(&buttons);
    start_game(&mut desk, &buttons, Weapon::Foil);

    rig.radio.0.borrow_mut().rx.push_back(*b"gvh");
    desk.tick(2_000).unwrap(); // opens the 300 ms window

    // Window still open: lamps dark.
    desk.tick(2_100).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (false, false, false, false, false));

    // Window closed: green valid lamp and buzzer on.
    desk.tick(2_300).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (true, false, false, false, true));

    // Buzzer stops halfway, lamps stay.
    desk.tick(2_300 + BUZZER_HOLD_MS).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (true, false, false, false, false));

    // Full hold elapsed: everything dark, desk waits for confirm.
    desk.tick(2_300 + INDICATOR_HOLD_MS).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (false, false, false, false, false));
    assert_eq!(desk.stage(), DeskStage::Waiting);
}

#[test]
fn test_double_hit_inside_lockout_lights_both() {
    let buttons = ButtonQueue::new();
    let (mut desk, rig) = rig(&buttons);
    start_game(&mut desk, &buttons, Weapon::Foil);

    rig.radio.0.borrow_mut().rx.push_back(*b"gvh");
    desk.tick(2_000).unwrap();

    // Second side lands 150 ms into foil's 300 ms window.
    rig.radio.0.borrow_mut().rx.push_back(*b"rih");
    desk.tick(2_150).unwrap();

    desk.tick(2_300).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (true, false, false, true, true));
}

#[test]
fn test_hit_buffered_at_window_close_still_scores() {
    let buttons = ButtonQueue::new();
    let (mut desk, rig) = rig(&buttons);
    start_game(&mut desk, &buttons, Weapon::Foil);

    rig.radio.0.borrow_mut().rx.push_back(*b"gvh");
    desk.tick(2_000).unwrap(); // 300 ms window opens
    desk.tick(2_100).unwrap(); // last tick with the window still open

    // The red report lands in the FIFO between that tick and the
    // closing one. It arrived inside the window, so it scores.
    rig.radio.0.borrow_mut().rx.push_back(*b"rvh");
    desk.tick(2_300).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (true, false, true, false, true));
}

#[test]
fn test_hit_after_lockout_window_not_applied() {
    let buttons = ButtonQueue::new();
    let (mut desk, rig) = rig(&buttons);
    start_game(&mut desk, &buttons, Weapon::Epee);

    rig.radio.0.borrow_mut().rx.push_back(*b"rvh");
    desk.tick(2_000).unwrap(); // 45 ms window opens
    desk.tick(2_045).unwrap(); // window closes, red lit
    assert_eq!(*rig.indicators.0.borrow(), (false, false, true, false, true));

    // Arrives after the window closed: ignored for this cycle.
    rig.radio.0.borrow_mut().rx.push_back(*b"gvh");
    desk.tick(2_050).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (false, false, true, false, true));

    // Still only red for the rest of the hold.
    desk.tick(2_045 + INDICATOR_HOLD_MS - 1).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (false, false, true, false, false));
}

#[test]
fn test_sabre_window_is_170_ms() {
    let buttons = ButtonQueue::new();
    let (mut desk, rig) = rig(&buttons);
    start_game(&mut desk, &buttons, Weapon::Sabre);

    rig.radio.0.borrow_mut().rx.push_back(*b"gih");
    desk.tick(2_000).unwrap();

    desk.tick(2_169).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (false, false, false, false, false));
    desk.tick(2_170).unwrap();
    assert_eq!(*rig.indicators.0.borrow(), (false, true, false, false, true));
}

#[test]
fn test_confirm_in_waiting_broadcasts_restart_and_flushes() {
    let buttons = ButtonQueue::new();
    let (mut desk, rig) = rig(&buttons);
    start_game(&mut desk, &buttons, Weapon::Foil);

    rig.radio.0.borrow_mut().rx.push_back(*b"gvh");
    desk.tick(2_000).unwrap();
    desk.tick(2_300).unwrap();
    desk.tick(2_300 + INDICATOR_HOLD_MS).unwrap();
    assert_eq!(desk.stage(), DeskStage::Waiting);

    // A late report is still sitting in the radio FIFO.
    rig.radio.0.borrow_mut().rx.push_back(*b"rvh");

    buttons.push(20_000, Button::Confirm);
    desk.tick(20_000).unwrap();
    assert_eq!(desk.stage(), DeskStage::Standard);
    assert_eq!(rig.radio.0.borrow().tx, vec![*b"fff", *b"rrr"]);
    assert!(rig.radio.0.borrow().rx.is_empty());

    // The flushed report must not open a new lock-out.
    desk.tick(20_100).unwrap();
    assert!(!desk.cycle_scored());
}

#[test]
fn test_buttons_ignored_outside_their_stage() {
    let buttons = ButtonQueue::new();
    let (mut desk, rig) = rig(&buttons);
    start_game(&mut desk, &buttons, Weapon::Foil);

    // Select does nothing once the game is running.
    buttons.push(2_000, Button::Select);
    desk.tick(2_000).unwrap();
    assert_eq!(desk.weapon(), Weapon::Foil);
    assert_eq!(rig.radio.0.borrow().tx, vec![*b"fff"]);
}
