//! Typed lifecycle events and the change notification bus.
//!
//! The bus fans out to registered consumers in registration order. Delivery
//! is synchronous: a slow consumer blocks the ones behind it, which is
//! acceptable because the UI thread is the only caller. Consumers pull
//! fresh data themselves after notification; the event carries no payload
//! beyond the kind and an optional changed-measurement hint.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use tracing::debug;

/// The three lifecycle events consumers can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A new measurement set was loaded.
    Loaded,
    /// The measurement set was cleared; consumers drop their rendered
    /// artifacts.
    Cleared,
    /// Derived data changed (windowing, smoothing, modal or normalisation
    /// edits all surface as this one kind).
    Analysed,
}

/// A lifecycle event plus an optional changed-measurement index hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Index of the single changed measurement, when only one changed.
    pub changed_index: Option<usize>,
}

impl Event {
    /// An event with no changed-index hint.
    pub fn all(kind: EventKind) -> Self {
        Self {
            kind,
            changed_index: None,
        }
    }
}

/// A consumer of model change events.
pub trait EventSink {
    /// Name used in dispatch logging.
    fn name(&self) -> &str;

    /// React to a model change. Implementations pull whatever derived data
    /// they need after being told.
    fn on_event(&mut self, event: Event);
}

/// Fan-out of lifecycle events to registered consumers.
#[derive(Default)]
pub struct NotificationBus {
    sinks: Vec<Rc<RefCell<dyn EventSink>>>,
}

impl NotificationBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a consumer. Dispatch order follows registration order.
    pub fn register(&mut self, sink: Rc<RefCell<dyn EventSink>>) {
        self.sinks.push(sink);
    }

    /// Number of registered consumers.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True when no consumers are registered.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Deliver `event` to every consumer, synchronously and in order.
    pub fn dispatch(&self, event: Event) {
        for sink in &self.sinks {
            let start = Instant::now();
            let mut sink = sink.borrow_mut();
            sink.on_event(event);
            debug!(
                target: "polarmap::event",
                "propagated {:?} to {} in {}ms",
                event.kind,
                sink.name(),
                start.elapsed().as_millis()
            );
        }
    }
}
