//! Radio link layer.
//!
//! Wraps a [`Transceiver`] with the apparatus' addressing scheme and
//! delivery discipline. Addressing is asymmetric on purpose: a sender
//! targets the address its receivers listen on, so desk->pocket
//! broadcasts go out on the desk's own address (both pockets listen for
//! it) and pocket->desk reports go out on the pocket's color address
//! (the desk listens on both colors).

use heapless::Vec;

use crate::hal::Transceiver;
use crate::protocol::{
    Frame, Message, PipeAddress, Player, DESK_ADDRESS, GREEN_POCKET_ADDRESS, PAYLOAD_LEN,
    RED_POCKET_ADDRESS, RF_CHANNEL,
};

/// Upper bound on write attempts in [`RadioLink::send`].
///
/// A stuck transceiver surfaces as an error instead of hanging the
/// main loop.
pub const MAX_SEND_ATTEMPTS: u32 = 2_000;

/// Most frames one poll can return. Two pockets times a handful of
/// retransmits is well under this.
pub const DRAIN_CAPACITY: usize = 8;

/// Link-layer failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The transceiver refused the frame [`MAX_SEND_ATTEMPTS`] times.
    SendTimeout,
}

impl LinkError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::SendTimeout => "transceiver did not accept frame",
        }
    }
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<LinkError> for crate::fault::FaultCode {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::SendTimeout => crate::fault::FaultCode::SendTimeout,
        }
    }
}

/// Configured radio endpoint for one node.
pub struct RadioLink<T: Transceiver> {
    radio: T,
}

impl<T: Transceiver> RadioLink<T> {
    /// Wrap a transceiver without configuring it; call one of the
    /// `start_*` methods before use.
    pub fn new(radio: T) -> Self {
        Self { radio }
    }

    /// Bring the link up for the desk: write on the desk address, listen
    /// on both pocket colors.
    pub fn start_desk(&mut self) {
        self.start(&DESK_ADDRESS, &[&RED_POCKET_ADDRESS, &GREEN_POCKET_ADDRESS]);
    }

    /// Bring the link up for a pocket: write on the pocket's own color
    /// address, listen on the desk address.
    pub fn start_pocket(&mut self, player: Player) {
        self.start(player.pocket_address(), &[&DESK_ADDRESS]);
    }

    fn start(&mut self, writing: &PipeAddress, reading: &[&PipeAddress]) {
        self.radio.begin(RF_CHANNEL, PAYLOAD_LEN);
        self.radio.open_writing_pipe(writing);
        for (i, addr) in reading.iter().enumerate() {
            self.radio.open_reading_pipe(i as u8 + 1, addr);
        }
        self.radio.start_listening();
    }

    /// Send one message, blocking until the transceiver accepts it.
    ///
    /// Listening stops for the duration of the write and resumes before
    /// returning, success or not. Retries up to [`MAX_SEND_ATTEMPTS`]
    /// times; exhaustion means the hardware is stuck and the caller
    /// should latch a fault.
    pub fn send(&mut self, message: Message) -> Result<(), LinkError> {
        let frame = message.to_frame();
        self.radio.stop_listening();

        let mut accepted = false;
        for _ in 0..MAX_SEND_ATTEMPTS {
            if self.radio.write(&frame) {
                accepted = true;
                break;
            }
        }

        self.radio.start_listening();
        if accepted {
            Ok(())
        } else {
            Err(LinkError::SendTimeout)
        }
    }

    /// True if at least one frame is waiting.
    pub fn available(&mut self) -> bool {
        self.radio.available()
    }

    /// Drain every buffered frame, in arrival order.
    ///
    /// Frames outside the vocabulary are skipped. Callers must process
    /// all returned messages, not just the last; simultaneous-hit
    /// scoring depends on seeing every frame from one poll. If more
    /// than [`DRAIN_CAPACITY`] decodable frames are buffered, the rest
    /// stay in the transceiver for the next poll; nothing is consumed
    /// without being returned.
    pub fn receive_all(&mut self) -> Vec<Message, DRAIN_CAPACITY> {
        let mut messages: Vec<Message, DRAIN_CAPACITY> = Vec::new();
        while !messages.is_full() && self.radio.available() {
            let mut frame: Frame = [0; PAYLOAD_LEN];
            self.radio.read(&mut frame);
            if let Some(msg) = Message::from_frame(&frame) {
                let _ = messages.push(msg);
            }
        }
        messages
    }

    /// Drain and discard whatever the transceiver has buffered.
    ///
    /// Used by the desk after a restart broadcast so a late hit report
    /// cannot score into the next cycle.
    pub fn flush_rx(&mut self) {
        while self.radio.available() {
            let mut frame: Frame = [0; PAYLOAD_LEN];
            self.radio.read(&mut frame);
        }
    }
}
