use super::event::{Event, EventKind, Mode};

/// Append-only event sequence with a play-head.
///
/// Invariant: once non-empty, `0 <= index <= len - 1`.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<Event>,
    index: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Current play-head position.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Whether the play-head sits on the newest entry.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.events.is_empty() || self.index == self.events.len() - 1
    }

    /// Appends `event`, discarding the redo branch first.
    ///
    /// The redo branch starts at the play-head: after an undo the head rests on
    /// the undone unit's checkpoint, which goes together with what follows it.
    pub fn push(&mut self, event: Event) {
        if !self.at_end() {
            log::trace!("discarding {} redo entries", self.events.len() - self.index);
            self.events.truncate(self.index);
        }
        self.events.push(event);
        self.index = self.events.len() - 1;
    }

    /// Steps the head back until it lands on `kind` or reaches 0. Emits nothing.
    fn seek_backward(&mut self, kind: EventKind) {
        while self.index > 0 {
            self.index -= 1;
            if self.events[self.index].is(kind) {
                break;
            }
        }
    }
}

/// Undo/redo over an [`EventLog`] by replaying events from the last reset.
///
/// No raster snapshots are kept. Undo clears the canvas and re-emits everything
/// from the nearest preceding `Clear` up to the checkpoint of the most recent
/// unit; redo re-emits forward up to the next checkpoint. Replay is driven
/// through the `emit` callback, which must route back into the same code path
/// as live input, with [`Mode::Replay`].
#[derive(Debug, Default)]
pub struct History {
    log: EventLog,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Records `event` when `mode` is [`Mode::Record`]; replayed events are only observed.
    pub fn record(&mut self, event: &Event, mode: Mode) {
        if mode.is_recording() {
            self.log.push(*event);
        }
    }

    /// Reverts the most recent undoable unit. Returns the number of log events replayed.
    ///
    /// Emits a synthetic `Clear` first, then the log range `[anchor, last)` where
    /// `last` is the nearest preceding checkpoint and `anchor` the nearest `Clear`
    /// before it (or the start of the log). No-op on an empty log.
    pub fn undo<F>(&mut self, mut emit: F) -> usize
    where
        F: FnMut(&Event),
    {
        if self.log.is_empty() {
            return 0;
        }

        emit(&Event::Clear);

        self.log.seek_backward(EventKind::Checkpoint);
        let last = self.log.index;
        self.log.seek_backward(EventKind::Clear);

        let mut replayed = 0;
        while self.log.index < last {
            emit(&self.log.events[self.log.index]);
            self.log.index += 1;
            replayed += 1;
        }

        log::debug!("undo: replayed {replayed} events, head at {}", self.log.index);
        replayed
    }

    /// Re-applies the next undone unit. Returns the number of events replayed.
    ///
    /// Stops on (without emitting) the next checkpoint; at the end of the log
    /// this is a no-op.
    pub fn redo<F>(&mut self, mut emit: F) -> usize
    where
        F: FnMut(&Event),
    {
        let mut replayed = 0;
        while self.log.index + 1 < self.log.len() {
            self.log.index += 1;
            let event = &self.log.events[self.log.index];
            if event.is(EventKind::Checkpoint) {
                break;
            }
            emit(event);
            replayed += 1;
        }

        log::debug!("redo: replayed {replayed} events, head at {}", self.log.index);
        replayed
    }
}
