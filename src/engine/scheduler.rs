use thiserror::Error;

/// A raw MIDI message stamped with the sample it must take effect on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedMidi {
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
    /// Frame index within the block being rendered.
    pub offset: u32,
}

impl TimedMidi {
    pub fn new(status: u8, data1: u8, data2: u8, offset: u32) -> Self {
        Self {
            status,
            data1,
            data2,
            offset,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("midi queue is full ({capacity} events); size it to the host block size")]
    Full { capacity: usize },
}

/// Bounded, offset-ordered queue of MIDI events for the current block.
///
/// Storage is reserved up front by [`resize`](Scheduler::resize) on the
/// control path; enqueueing and draining never allocate.
pub struct Scheduler {
    events: Vec<TimedMidi>,
    read: usize,
    capacity: usize,
}

impl Scheduler {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            read: 0,
            capacity,
        }
    }

    /// Grow storage to hold at least `capacity` events. Never shrinks.
    pub fn resize(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.events.reserve_exact(capacity - self.events.len());
            self.capacity = capacity;
        }
    }

    /// Insert an event, keeping the queue sorted by offset.
    ///
    /// Events with equal offsets keep arrival order.
    pub fn enqueue(&mut self, event: TimedMidi) -> Result<(), QueueError> {
        if self.events.len() >= self.capacity {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }

        match self.events.last() {
            Some(last) if last.offset > event.offset => {
                let pending = &self.events[self.read..];
                let at = self.read + pending.partition_point(|e| e.offset <= event.offset);
                self.events.insert(at, event);
            }
            _ => self.events.push(event),
        }
        Ok(())
    }

    pub fn peek(&self) -> Option<&TimedMidi> {
        self.events.get(self.read)
    }

    /// Pop the next event if it is due at or before `offset`.
    pub fn pop_due(&mut self, offset: u32) -> Option<TimedMidi> {
        let event = *self.peek()?;
        if event.offset > offset {
            return None;
        }
        self.read += 1;
        Some(event)
    }

    /// Offset of the next pending event, capped at `frames`.
    pub fn next_offset(&self, frames: u32) -> u32 {
        self.peek().map_or(frames, |e| e.offset.min(frames))
    }

    /// Finish a block of `frames` samples.
    ///
    /// Consumed events are dropped; events aimed past the block are kept and
    /// re-based onto the next block.
    pub fn flush(&mut self, frames: u32) {
        self.events.drain(..self.read);
        self.read = 0;
        for event in &mut self.events {
            event.offset = event.offset.saturating_sub(frames);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len() - self.read
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
