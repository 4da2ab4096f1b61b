use std::fmt;

use crate::sample::PointerSample;

/// Semantic editing event.
///
/// Only `Move` and `Stroke` carry parameters. `Checkpoint` delimits one
/// undoable unit; `Clear` is a full canvas reset and serves as the replay anchor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Event {
    Move(PointerSample),
    Stroke(PointerSample),
    Checkpoint,
    Clear,
}

/// Discriminant of an [`Event`], used for log scans and telemetry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    Move,
    Stroke,
    Checkpoint,
    Clear,
}

impl EventKind {
    pub const ALL: [EventKind; 4] =
        [EventKind::Move, EventKind::Stroke, EventKind::Checkpoint, EventKind::Clear];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Move => "move",
            EventKind::Stroke => "stroke",
            EventKind::Checkpoint => "checkpoint",
            EventKind::Clear => "clear",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Event {
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Move(_) => EventKind::Move,
            Event::Stroke(_) => EventKind::Stroke,
            Event::Checkpoint => EventKind::Checkpoint,
            Event::Clear => EventKind::Clear,
        }
    }

    #[inline]
    pub fn is(&self, kind: EventKind) -> bool {
        self.kind() == kind
    }
}

/// Whether an event comes from live input or from history replay.
///
/// Passed alongside every dispatched event; history only appends `Record`
/// events, so replay can never re-log itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    Record,
    Replay,
}

impl Mode {
    #[inline]
    pub fn is_recording(self) -> bool {
        self == Mode::Record
    }
}
