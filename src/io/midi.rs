//! Channel-voice MIDI messages decoded from raw status/data bytes.

pub const NOTE_OFF: u8 = 0x8;
pub const NOTE_ON: u8 = 0x9;
pub const CONTROL_CHANGE: u8 = 0xB;
pub const PROGRAM_CHANGE: u8 = 0xC;
pub const PITCH_BEND: u8 = 0xE;

/// Controller number of the "All Notes Off" channel-mode message.
pub const CC_ALL_NOTES_OFF: u8 = 123;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode a three-byte channel message. Unrecognised statuses yield `None`.
    ///
    /// A note-on with zero velocity is reported as a note-off.
    pub fn from_bytes(status: u8, data1: u8, data2: u8) -> Option<Self> {
        let channel = status & 0x0F;
        let key = data1 & 0x7F;
        let value = data2 & 0x7F;

        match status >> 4 {
            NOTE_ON if value > 0 => Some(Self::NoteOn {
                channel,
                key,
                velocity: value,
            }),
            NOTE_ON | NOTE_OFF => Some(Self::NoteOff {
                channel,
                key,
                velocity: value,
            }),
            CONTROL_CHANGE => Some(Self::ControlChange {
                channel,
                controller: key,
                value,
            }),
            PROGRAM_CHANGE => Some(Self::ProgramChange {
                channel,
                program: key,
            }),
            PITCH_BEND => {
                let raw = ((value as i16) << 7) | key as i16;
                Some(Self::PitchBend {
                    channel,
                    value: raw - 8192,
                })
            }
            _ => None,
        }
    }

    pub fn is_all_notes_off(&self) -> bool {
        matches!(
            self,
            Self::ControlChange {
                controller: CC_ALL_NOTES_OFF,
                ..
            }
        )
    }
}
