//! Event-sourced undo/redo.
//!
//! Edits are recorded as a flat [`EventLog`]; undo rebuilds the canvas by
//! replaying the log from the last `Clear` through the same path live input
//! takes. Observers hook in through [`Dispatcher`].

mod dispatch;
mod event;
mod timeline;

pub use dispatch::{Dispatcher, EventStats, Subscriber};
pub use event::{Event, EventKind, Mode};
pub use timeline::{EventLog, History};
