use std::cell::RefCell;
use std::rc::Rc;

use super::event::{Event, EventKind, Mode};

/// Observer of dispatched events.
///
/// Subscribers see live events with [`Mode::Record`] and replayed events with
/// [`Mode::Replay`], in dispatch order.
pub trait Subscriber {
    fn on_event(&mut self, event: &Event, mode: Mode);
}

impl<T: Subscriber> Subscriber for Rc<RefCell<T>> {
    fn on_event(&mut self, event: &Event, mode: Mode) {
        self.borrow_mut().on_event(event, mode);
    }
}

/// Fans each event out to every registered subscriber, in registration order.
#[derive(Default)]
pub struct Dispatcher {
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<S: Subscriber + 'static>(&mut self, subscriber: S) {
        self.subscribers.push(Box::new(subscriber));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn emit(&mut self, event: &Event, mode: Mode) {
        for s in &mut self.subscribers {
            s.on_event(event, mode);
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("subscribers", &self.subscribers.len()).finish()
    }
}

/// Per-kind event counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventStats {
    recorded: [u64; EventKind::ALL.len()],
    replayed: u64,
}

impl EventStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live events of `kind` seen so far.
    #[inline]
    pub fn recorded(&self, kind: EventKind) -> u64 {
        self.recorded[kind.index()]
    }

    /// Total events seen in replay mode.
    #[inline]
    pub fn replayed(&self) -> u64 {
        self.replayed
    }

    pub fn total_recorded(&self) -> u64 {
        self.recorded.iter().sum()
    }
}

impl Subscriber for EventStats {
    fn on_event(&mut self, event: &Event, mode: Mode) {
        match mode {
            Mode::Record => self.recorded[event.kind().index()] += 1,
            Mode::Replay => self.replayed += 1,
        }
    }
}

impl std::fmt::Display for EventStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for kind in EventKind::ALL {
            write!(f, "{}={} ", kind, self.recorded(kind))?;
        }
        write!(f, "replayed={}", self.replayed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::PointerSample;

    struct Tag {
        id: u32,
        order: Rc<RefCell<Vec<u32>>>,
    }

    impl Subscriber for Tag {
        fn on_event(&mut self, _: &Event, _: Mode) {
            self.order.borrow_mut().push(self.id);
        }
    }

    #[test]
    fn fans_out_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut d = Dispatcher::new();
        for id in 0..3 {
            d.subscribe(Tag { id, order: Rc::clone(&order) });
        }
        d.emit(&Event::Checkpoint, Mode::Record);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn stats_split_record_and_replay() {
        let stats = Rc::new(RefCell::new(EventStats::new()));
        let mut d = Dispatcher::new();
        d.subscribe(Rc::clone(&stats));

        let s = PointerSample::new(1.0, 1.0);
        d.emit(&Event::Move(s), Mode::Record);
        d.emit(&Event::Stroke(s), Mode::Record);
        d.emit(&Event::Stroke(s), Mode::Record);
        d.emit(&Event::Stroke(s), Mode::Replay);

        let stats = stats.borrow();
        assert_eq!(stats.recorded(EventKind::Move), 1);
        assert_eq!(stats.recorded(EventKind::Stroke), 2);
        assert_eq!(stats.recorded(EventKind::Clear), 0);
        assert_eq!(stats.total_recorded(), 3);
        assert_eq!(stats.replayed(), 1);
    }

    #[test]
    fn stats_display_lists_every_kind() {
        let text = EventStats::new().to_string();
        for kind in EventKind::ALL {
            assert!(text.contains(kind.name()), "{text}");
        }
    }
}
