//! Payload interpretation
//!
//! Turns the reported payload of a frame (checksum already removed) into a
//! human-readable description, based on the LINAK layout of each command.
//! Anything that does not match a known layout yields an empty string.

use byteorder::{ByteOrder, LittleEndian};
use std::ops::RangeInclusive;

/// Accepted payload lengths for `RefN Position and status` frames
const POSITION_FRAME_LEN: RangeInclusive<usize> = 2..=6;
/// Accepted payload lengths for `RefN Input` frames
const INPUT_FRAME_LEN: RangeInclusive<usize> = 2..=3;
/// Accepted payload lengths for `Request power` frames
const POWER_FRAME_LEN: RangeInclusive<usize> = 1..=2;

const PID_REQUEST_POWER: i64 = 36;

/// Motion request carried by a `RefN Input` frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    MoveDown,
    MoveUp,
    Hold,
    /// Absolute target in 0.1 mm units
    MoveTo(u16),
}

impl MotionCommand {
    pub const RAW_MOVE_DOWN: u16 = 0x7FFF;
    pub const RAW_MOVE_UP: u16 = 0x8000;
    pub const RAW_HOLD: u16 = 0x8001;

    pub fn from_raw(raw: u16) -> Self {
        match raw {
            Self::RAW_MOVE_DOWN => MotionCommand::MoveDown,
            Self::RAW_MOVE_UP => MotionCommand::MoveUp,
            Self::RAW_HOLD => MotionCommand::Hold,
            position => MotionCommand::MoveTo(position),
        }
    }
}

/// Payload interpreter - stateless, one entry point per frame
pub struct PayloadInterpreter;

impl PayloadInterpreter {
    /// Describe the payload of a frame with protected identifier `pid`
    ///
    /// # Arguments
    /// * `pid` - Protected identifier of the frame
    /// * `payload` - Reported payload bytes (without checksum)
    ///
    /// # Returns
    /// * The description, or an empty string if the identifier has no known
    ///   layout or the payload length does not fit it
    pub fn interpret(pid: i64, payload: &[u8]) -> String {
        let text = match pid {
            0..=7 => Self::position(pid + 1, payload),
            10..=13 => Self::motion(pid - 9, payload),
            PID_REQUEST_POWER => Self::power_request(payload),
            37 | 38 => Self::handset_command(pid - 36, payload),
            39 | 40 => Self::handset_sequence(pid - 38, payload),
            _ => None,
        };
        text.unwrap_or_default()
    }

    /// `RefN Position and status`: current position in the first two bytes
    fn position(reference: i64, payload: &[u8]) -> Option<String> {
        if !POSITION_FRAME_LEN.contains(&payload.len()) {
            log::trace!("Ref{} position frame has unexpected length {}", reference, payload.len());
            return None;
        }

        let position = LittleEndian::read_u16(&payload[0..2]);
        Some(format!("Ref{} position: {}mm", reference, format_tenths(position)))
    }

    /// `RefN Input`: motion request or absolute target position
    fn motion(reference: i64, payload: &[u8]) -> Option<String> {
        if !INPUT_FRAME_LEN.contains(&payload.len()) {
            log::trace!("Ref{} input frame has unexpected length {}", reference, payload.len());
            return None;
        }

        let command = MotionCommand::from_raw(LittleEndian::read_u16(&payload[0..2]));
        let text = match command {
            MotionCommand::MoveDown => format!("Ref{} move down", reference),
            MotionCommand::MoveUp => format!("Ref{} move up", reference),
            MotionCommand::Hold => format!("Ref{} do not move", reference),
            MotionCommand::MoveTo(target) => {
                format!("Ref{} move to position: {}mm", reference, format_tenths(target))
            }
        };
        Some(text)
    }

    /// `Request power`: the payload content is not interpreted
    fn power_request(payload: &[u8]) -> Option<String> {
        POWER_FRAME_LEN
            .contains(&payload.len())
            .then(|| "Power requested on".to_string())
    }

    /// `Handset N command`: action count and button flags
    fn handset_command(handset: i64, payload: &[u8]) -> Option<String> {
        let (action, flags) = match payload {
            [action, flags, ..] => (*action, *flags),
            _ => return None,
        };
        Some(format!("Handset {} action {} flags 0x{:02x}", handset, action, flags))
    }

    /// `Handset N safety sequence`: the counter is reported, not validated
    fn handset_sequence(handset: i64, payload: &[u8]) -> Option<String> {
        let counter = payload.first()?;
        Some(format!("Handset {} sequence {}", handset, counter))
    }
}

/// Interpret a frame payload (see [`PayloadInterpreter::interpret`])
pub fn interpret(pid: i64, payload: &[u8]) -> String {
    PayloadInterpreter::interpret(pid, payload)
}

/// Render a value in 0.1 units with exactly one decimal digit
fn format_tenths(value: u16) -> String {
    format!("{}.{}", value / 10, value % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        assert_eq!(interpret(5, &[0x64, 0x00]), "Ref6 position: 10.0mm");
        assert_eq!(interpret(0, &[0xD2, 0x04, 0x00, 0x00, 0x00]), "Ref1 position: 123.4mm");
        assert_eq!(interpret(7, &[0x03, 0x00, 1, 2, 3, 4]), "Ref8 position: 0.3mm");
        assert_eq!(interpret(0, &[0xFF, 0xFF]), "Ref1 position: 6553.5mm");
    }

    #[test]
    fn test_position_length_mismatch() {
        assert_eq!(interpret(0, &[0x64]), "");
        assert_eq!(interpret(0, &[]), "");
        assert_eq!(interpret(0, &[0; 7]), "");
    }

    #[test]
    fn test_motion_special_values() {
        assert_eq!(interpret(10, &[0xFF, 0x7F]), "Ref1 move down");
        assert_eq!(interpret(10, &[0x00, 0x80]), "Ref1 move up");
        assert_eq!(interpret(10, &[0x01, 0x80]), "Ref1 do not move");
        assert_eq!(interpret(13, &[0x01, 0x80, 0x00]), "Ref4 do not move");
    }

    #[test]
    fn test_motion_target_position() {
        assert_eq!(interpret(10, &[0xE8, 0x03]), "Ref1 move to position: 100.0mm");
        assert_eq!(interpret(11, &[0x05, 0x00, 0x00]), "Ref2 move to position: 0.5mm");
        assert_eq!(interpret(12, &[0x02, 0x80]), "Ref3 move to position: 3277.0mm");
        assert_eq!(interpret(10, &[0xE8]), "");
        assert_eq!(interpret(10, &[0xE8, 0x03, 0x00, 0x00]), "");
    }

    #[test]
    fn test_motion_command_from_raw() {
        assert_eq!(MotionCommand::from_raw(0x7FFF), MotionCommand::MoveDown);
        assert_eq!(MotionCommand::from_raw(0x8000), MotionCommand::MoveUp);
        assert_eq!(MotionCommand::from_raw(0x8001), MotionCommand::Hold);
        assert_eq!(MotionCommand::from_raw(0x7FFE), MotionCommand::MoveTo(0x7FFE));
    }

    #[test]
    fn test_power_request() {
        assert_eq!(interpret(36, &[0x01, 0x00]), "Power requested on");
        assert_eq!(interpret(36, &[0xAA]), "Power requested on");
        assert_eq!(interpret(36, &[0x01, 0x00, 0x00]), "");
    }

    #[test]
    fn test_handset_command() {
        assert_eq!(interpret(37, &[3, 0x1F]), "Handset 1 action 3 flags 0x1f");
        assert_eq!(interpret(38, &[0, 0x00, 0xFF, 0xFF]), "Handset 2 action 0 flags 0x00");
        assert_eq!(interpret(37, &[3]), "");
    }

    #[test]
    fn test_handset_sequence() {
        assert_eq!(interpret(39, &[63]), "Handset 1 sequence 63");
        assert_eq!(interpret(40, &[223, 0]), "Handset 2 sequence 223");
        assert_eq!(interpret(40, &[]), "");
    }

    #[test]
    fn test_uninterpreted_identifiers() {
        for pid in [8, 9, 14, 35, 41, 44, 45, -1, 1000] {
            assert_eq!(interpret(pid, &[0x01, 0x02, 0x03]), "", "pid {}", pid);
        }
    }

    #[test]
    fn test_little_endian_u16_all_pairs() {
        for lo in 0..=u8::MAX {
            for hi in 0..=u8::MAX {
                let value = LittleEndian::read_u16(&[lo, hi]);
                assert_eq!(u32::from(value), u32::from(hi) * 256 + u32::from(lo));
            }
        }
    }
}
