//! Radio wire protocol.
//!
//! Every message is exactly one 3-byte ASCII frame with no checksum or
//! sequence number; at-least-once delivery is the link layer's problem.
//!
//! # Vocabulary
//!
//! ```text
//! "fff" / "sss" / "eee"   desk -> pockets   select Foil / Sabre / Epee
//! "rrr"                   desk -> pockets   restart, back to Standard
//! "bcc"                   desk -> pocket    end calibration
//! "gvh" / "gih"           green -> desk     valid / invalid hit
//! "rvh" / "rih"           red   -> desk     valid / invalid hit
//! ```
//!
//! Only the first byte is significant for the desk->pocket commands; the
//! hit reports are matched on all three bytes.

use crate::weapon::Weapon;

/// Fixed frame payload size in bytes.
pub const PAYLOAD_LEN: usize = 3;

/// Fixed RF channel shared by all nodes.
pub const RF_CHANNEL: u8 = 100;

/// One raw 3-byte frame.
pub type Frame = [u8; PAYLOAD_LEN];

/// 5-byte logical pipe address.
pub type PipeAddress = [u8; 5];

/// Pipe address of the red pocket (desk listens here).
pub const RED_POCKET_ADDRESS: PipeAddress = *b"00001";

/// Pipe address of the green pocket (desk listens here).
pub const GREEN_POCKET_ADDRESS: PipeAddress = *b"00002";

/// Pipe address of the desk (both pockets listen here).
pub const DESK_ADDRESS: PipeAddress = *b"00003";

/// Fencer side, one pocket node per color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    Green,
    Red,
}

impl Player {
    /// The other side.
    pub fn toggled(self) -> Self {
        match self {
            Player::Green => Player::Red,
            Player::Red => Player::Green,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Player::Green => "Green",
            Player::Red => "Red",
        }
    }

    /// The pipe address this pocket transmits on (the desk listens on it).
    pub fn pocket_address(self) -> &'static PipeAddress {
        match self {
            Player::Green => &GREEN_POCKET_ADDRESS,
            Player::Red => &RED_POCKET_ADDRESS,
        }
    }
}

/// Decoded radio message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    /// Desk broadcast: all pockets arm for this weapon.
    SelectWeapon(Weapon),
    /// Desk broadcast: leave Waiting, resume Standard sensing.
    Restart,
    /// Desk to pocket: leave the Calibration stage.
    EndCalibration,
    /// Pocket to desk: a resolved contact on `player`'s weapon.
    Hit { player: Player, valid: bool },
}

impl Message {
    /// Encode into a wire frame.
    pub fn to_frame(self) -> Frame {
        match self {
            Message::SelectWeapon(Weapon::Foil) => *b"fff",
            Message::SelectWeapon(Weapon::Sabre) => *b"sss",
            Message::SelectWeapon(Weapon::Epee) => *b"eee",
            Message::Restart => *b"rrr",
            Message::EndCalibration => *b"bcc",
            Message::Hit { player: Player::Green, valid: true } => *b"gvh",
            Message::Hit { player: Player::Green, valid: false } => *b"gih",
            Message::Hit { player: Player::Red, valid: true } => *b"rvh",
            Message::Hit { player: Player::Red, valid: false } => *b"rih",
        }
    }

    /// Decode a received frame. Returns `None` for bytes outside the
    /// vocabulary (corrupt or foreign traffic is skipped, not an error).
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        match frame {
            b"fff" => Some(Message::SelectWeapon(Weapon::Foil)),
            b"sss" => Some(Message::SelectWeapon(Weapon::Sabre)),
            b"eee" => Some(Message::SelectWeapon(Weapon::Epee)),
            b"gvh" => Some(Message::Hit { player: Player::Green, valid: true }),
            b"gih" => Some(Message::Hit { player: Player::Green, valid: false }),
            b"rvh" => Some(Message::Hit { player: Player::Red, valid: true }),
            b"rih" => Some(Message::Hit { player: Player::Red, valid: false }),
            // Restart and end-calibration are matched on the first
            // byte only.
            [b'r', _, _] => Some(Message::Restart),
            [b'b', _, _] => Some(Message::EndCalibration),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_vocabulary() {
        let all = [
            Message::SelectWeapon(Weapon::Foil),
            Message::SelectWeapon(Weapon::Sabre),
            Message::SelectWeapon(Weapon::Epee),
            Message::Restart,
            Message::EndCalibration,
            Message::Hit { player: Player::Green, valid: true },
            Message::Hit { player: Player::Green, valid: false },
            Message::Hit { player: Player::Red, valid: true },
            Message::Hit { player: Player::Red, valid: false },
        ];
        for msg in all {
            assert_eq!(Message::from_frame(&msg.to_frame()), Some(msg));
        }
    }

    #[test]
    fn test_first_byte_commands() {
        assert_eq!(Message::from_frame(b"rxx"), Some(Message::Restart));
        assert_eq!(Message::from_frame(b"b\0\0"), Some(Message::EndCalibration));
    }

    #[test]
    fn test_unknown_frames_rejected() {
        assert_eq!(Message::from_frame(b"xyz"), None);
        assert_eq!(Message::from_frame(b"gxh"), None);
        assert_eq!(Message::from_frame(b"\0\0\0"), None);
    }

    #[test]
    fn test_addresses_are_distinct() {
        assert_ne!(RED_POCKET_ADDRESS, GREEN_POCKET_ADDRESS);
        assert_ne!(GREEN_POCKET_ADDRESS, DESK_ADDRESS);
        assert_ne!(RED_POCKET_ADDRESS, DESK_ADDRESS);
    }
}
