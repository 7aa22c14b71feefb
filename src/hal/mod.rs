//! Hardware abstraction boundary.
//!
//! Everything above this module is pure logic; everything below it is a
//! driver. Tests implement these traits with scripted mocks.

pub mod pins;

use crate::protocol::PipeAddress;

/// Capacitive touch sensing line.
///
/// The sampler toggles the line between input (probing) and driven-low
/// output (discharge) many times per sensing cycle, so implementations
/// should keep both operations cheap.
pub trait TouchProbe {
    /// Configure the line as an input for probing.
    fn set_input(&mut self);

    /// Drive the line low as an output, discharging the electrode.
    fn set_output_low(&mut self);

    /// One probe read: true if the line currently reads logically closed.
    fn read_closed(&mut self) -> bool;
}

/// Fixed-payload packet transceiver (RF24-class radio).
///
/// Frames are exactly [`crate::protocol::PAYLOAD_LEN`] bytes. The link
/// layer gives one bit of feedback per write (accepted or not) and
/// buffers received frames until they are read.
pub trait Transceiver {
    /// Power up and apply fixed channel/payload configuration.
    fn begin(&mut self, channel: u8, payload_len: usize);

    /// Select the outbound pipe address.
    fn open_writing_pipe(&mut self, addr: &PipeAddress);

    /// Open a numbered inbound pipe.
    fn open_reading_pipe(&mut self, pipe: u8, addr: &PipeAddress);

    /// Enter receive mode.
    fn start_listening(&mut self);

    /// Leave receive mode (required before writing).
    fn stop_listening(&mut self);

    /// True if at least one received frame is buffered.
    fn available(&mut self) -> bool;

    /// Read the oldest buffered frame.
    fn read(&mut self, buf: &mut [u8; crate::protocol::PAYLOAD_LEN]);

    /// Attempt to transmit one frame. Returns false if the hardware did
    /// not accept it (channel busy, no ack).
    fn write(&mut self, buf: &[u8; crate::protocol::PAYLOAD_LEN]) -> bool;
}

/// Text display, fire-and-forget.
pub trait Display {
    fn show(&mut self, text: &str);
}

/// Desk-side hit indicators and buzzer.
pub trait Indicators {
    /// Valid-hit lamp for one side.
    fn set_valid(&mut self, player: crate::protocol::Player, on: bool);

    /// Invalid-hit (off-target) lamp for one side.
    fn set_invalid(&mut self, player: crate::protocol::Player, on: bool);

    fn set_buzzer(&mut self, on: bool);
}

/// Pocket-side weapon drive lines.
///
/// Line A is always driven high while sensing; line C is low for Sabre
/// and high otherwise (the electrical arrangement differs per weapon).
pub trait WeaponLines {
    fn set_line_a(&mut self, high: bool);
    fn set_line_c(&mut self, high: bool);
}
