use crate::batch::StampSink;
use crate::config::BrushConfig;
use crate::history::{Dispatcher, Event, History, Mode, Subscriber};
use crate::sample::PointerSample;
use crate::sampler::{StampRequest, StrokeSampler};

/// Document facade: brush settings, stroke sampling and history behind one API.
///
/// Every edit, live or replayed, goes through the same apply path, so undo
/// reproduces the canvas exactly. The caller supplies the [`StampSink`] on each
/// call; the painter never owns GPU state.
#[derive(Debug)]
pub struct Painter {
    config: BrushConfig,
    sampler: StrokeSampler,
    history: History,
    dispatcher: Dispatcher,
    scratch: Vec<StampRequest>,
}

impl Default for Painter {
    fn default() -> Self {
        Self::new(BrushConfig::default())
    }
}

impl Painter {
    pub fn new(config: BrushConfig) -> Self {
        Self {
            config,
            sampler: StrokeSampler::new(),
            history: History::new(),
            dispatcher: Dispatcher::new(),
            scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &BrushConfig {
        &self.config
    }

    /// Live brush settings. Changes apply to the next stamp, replay included.
    #[inline]
    pub fn config_mut(&mut self) -> &mut BrushConfig {
        &mut self.config
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    pub fn sampler(&self) -> &StrokeSampler {
        &self.sampler
    }

    /// Registers an observer for every dispatched event.
    pub fn subscribe<T: Subscriber + 'static>(&mut self, subscriber: T) {
        self.dispatcher.subscribe(subscriber);
    }

    // ── live input ────────────────────────────────────────────────────────

    /// Starts a stroke at `sample`.
    pub fn move_to<S: StampSink + ?Sized>(&mut self, sample: PointerSample, sink: &mut S) {
        self.dispatch(Event::Move(sample), sink);
    }

    /// Continues the stroke. Returns the number of stamps emitted.
    pub fn stroke_to<S: StampSink + ?Sized>(&mut self, sample: PointerSample, sink: &mut S) -> usize {
        self.dispatch(Event::Stroke(sample), sink)
    }

    /// Opens a new undoable unit.
    pub fn checkpoint<S: StampSink + ?Sized>(&mut self, sink: &mut S) {
        self.dispatch(Event::Checkpoint, sink);
    }

    /// Resets the canvas. Recorded, so it can be undone.
    pub fn clear<S: StampSink + ?Sized>(&mut self, sink: &mut S) {
        self.dispatch(Event::Clear, sink);
    }

    // ── history ───────────────────────────────────────────────────────────

    /// Reverts the most recent unit by clearing and replaying. Returns the
    /// number of log events replayed.
    pub fn undo<S: StampSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let Self { config, sampler, history, dispatcher, scratch } = self;
        history.undo(|event| {
            perform(config, sampler, scratch, event, &mut *sink);
            dispatcher.emit(event, Mode::Replay);
        })
    }

    /// Re-applies the next undone unit. Returns the number of events replayed.
    pub fn redo<S: StampSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let Self { config, sampler, history, dispatcher, scratch } = self;
        history.redo(|event| {
            perform(config, sampler, scratch, event, &mut *sink);
            dispatcher.emit(event, Mode::Replay);
        })
    }

    fn dispatch<S: StampSink + ?Sized>(&mut self, event: Event, sink: &mut S) -> usize {
        let emitted = perform(&self.config, &mut self.sampler, &mut self.scratch, &event, sink);
        self.history.record(&event, Mode::Record);
        self.dispatcher.emit(&event, Mode::Record);
        emitted
    }
}

/// Applies one event to the sampler and sink. Shared by live input and replay.
fn perform<S: StampSink + ?Sized>(
    config: &BrushConfig,
    sampler: &mut StrokeSampler,
    scratch: &mut Vec<StampRequest>,
    event: &Event,
    sink: &mut S,
) -> usize {
    match *event {
        Event::Move(sample) => {
            sampler.move_to(sample, config);
            0
        }
        Event::Stroke(sample) => {
            scratch.clear();
            let emitted = sampler.stroke_to(sample, config, scratch);
            for stamp in scratch.iter() {
                sink.append(stamp);
            }
            emitted
        }
        Event::Checkpoint => 0,
        // A cleared canvas has no stroke to continue, live or replayed.
        Event::Clear => {
            sampler.reset();
            sink.clear();
            0
        }
    }
}
