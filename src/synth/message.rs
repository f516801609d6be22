#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::{engine::scheduler::TimedMidi, params::ParamId};

/// Commands sent from a control thread to the audio thread.
#[derive(Debug, Copy, Clone)]
pub enum ControlMessage {
    SetParameter { id: ParamId, value: f32 },
    Midi(TimedMidi),
    Reset,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}

/// Control-thread end of a lock-free message channel into the engine.
#[cfg(feature = "rtrb")]
pub struct ControlHandle {
    tx: Producer<ControlMessage>,
}

#[cfg(feature = "rtrb")]
impl ControlHandle {
    /// Create a handle and the receiver the audio thread drains.
    pub fn channel(capacity: usize) -> (Self, Consumer<ControlMessage>) {
        let (tx, rx) = RingBuffer::new(capacity);
        (Self { tx }, rx)
    }

    pub fn set_parameter(&mut self, id: ParamId, value: f32) -> Result<(), PushError<ControlMessage>> {
        self.tx.push(ControlMessage::SetParameter { id, value })
    }

    /// Queue a raw MIDI message for the start of the next block.
    pub fn midi(&mut self, status: u8, data1: u8, data2: u8) -> Result<(), PushError<ControlMessage>> {
        self.tx
            .push(ControlMessage::Midi(TimedMidi::new(status, data1, data2, 0)))
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), PushError<ControlMessage>> {
        self.midi(0x90, note, velocity)
    }

    pub fn note_off(&mut self, note: u8) -> Result<(), PushError<ControlMessage>> {
        self.midi(0x80, note, 0)
    }

    pub fn reset(&mut self) -> Result<(), PushError<ControlMessage>> {
        self.tx.push(ControlMessage::Reset)
    }
}
