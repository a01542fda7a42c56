//! Synchronous in-process publish/subscribe for search events.
//!
//! Callbacks run on the caller's thread, in registration order, while the
//! orchestrator is inside its loop. They observe the search but cannot
//! change it.

use crate::outcome::Outcome;
use crate::select::SegmentSnapshot;
use crate::state::SolutionState;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Events published by the orchestrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    OnBest,
    OnBetter,
    OnAccepted,
    OnRejected,
    /// A destroy/repair pair was chosen.
    OnSelect,
    /// Adaptive weights were updated at the end of a segment.
    OnSelectUpdate,
    OnEnd,
    /// Registration alias for the four outcome events.
    OnAnyOutcome,
}

impl Event {
    pub const OUTCOMES: [Event; 4] = [
        Event::OnBest,
        Event::OnBetter,
        Event::OnAccepted,
        Event::OnRejected,
    ];

    /// Event published for `outcome`, if any.
    pub fn for_outcome(outcome: Outcome) -> Option<Event> {
        match outcome {
            Outcome::Best => Some(Event::OnBest),
            Outcome::Better => Some(Event::OnBetter),
            Outcome::Accepted => Some(Event::OnAccepted),
            Outcome::Rejected => Some(Event::OnRejected),
            Outcome::NewBetter | Outcome::NewAccepted => None,
        }
    }
}

/// Data handed to callbacks.
#[derive(Debug, Clone, Copy)]
pub enum EventPayload<'a> {
    Outcome {
        outcome: Outcome,
        /// The evaluated candidate.
        solution: &'a SolutionState,
        iteration: u64,
        elapsed: Duration,
        /// Name of the repair operator that produced the candidate.
        operator: &'a str,
    },
    Select {
        destroy: usize,
        repair: usize,
        iteration: u64,
    },
    SelectUpdate(&'a SegmentSnapshot),
    End {
        iteration: u64,
        elapsed: Duration,
    },
}

/// Boxed event callback.
pub type Callback = Box<dyn FnMut(&EventPayload<'_>)>;

/// Registry of callbacks keyed by [`Event`].
#[derive(Default)]
pub struct EventHandler {
    listeners: HashMap<Event, Vec<Callback>>,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `callback` to `event`. Registering for [`Event::OnAnyOutcome`]
    /// subscribes a shared callback to all four outcome events.
    pub fn register<F>(&mut self, event: Event, callback: F)
    where
        F: FnMut(&EventPayload<'_>) + 'static,
    {
        if event == Event::OnAnyOutcome {
            let shared = Rc::new(RefCell::new(callback));
            for outcome_event in Event::OUTCOMES {
                let shared = Rc::clone(&shared);
                self.add_listener(
                    outcome_event,
                    Box::new(move |payload: &EventPayload<'_>| {
                        (&mut *shared.borrow_mut())(payload)
                    }),
                );
            }
            return;
        }
        self.add_listener(event, Box::new(callback));
    }

    fn add_listener(&mut self, event: Event, callback: Callback) {
        self.listeners.entry(event).or_default().push(callback);
    }

    /// Invokes every callback registered for `event`.
    pub fn trigger(&mut self, event: Event, payload: &EventPayload<'_>) {
        if let Some(callbacks) = self.listeners.get_mut(&event) {
            for callback in callbacks.iter_mut() {
                callback(payload);
            }
        }
    }

    /// Publishes the event matching `outcome`.
    pub fn on_outcome(
        &mut self,
        outcome: Outcome,
        solution: &SolutionState,
        iteration: u64,
        elapsed: Duration,
        operator: &str,
    ) {
        if let Some(event) = Event::for_outcome(outcome) {
            let payload = EventPayload::Outcome {
                outcome,
                solution,
                iteration,
                elapsed,
                operator,
            };
            self.trigger(event, &payload);
        }
    }

    /// True when nothing listens to `event`.
    pub fn is_empty(&self, event: Event) -> bool {
        self.listener_count(event) == 0
    }

    pub fn listener_count(&self, event: Event) -> usize {
        self.listeners.get(&event).map_or(0, Vec::len)
    }

    pub fn unregister_all(&mut self) {
        self.listeners.clear();
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&Event, usize> =
            self.listeners.iter().map(|(e, cbs)| (e, cbs.len())).collect();
        f.debug_struct("EventHandler").field("listeners", &counts).finish()
    }
}
