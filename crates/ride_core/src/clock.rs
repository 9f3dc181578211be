//! Event clock driving the scripted ride lifecycle.
//!
//! The original demo advanced a ride with wall-clock timers; here the same
//! script runs on a simulated clock so tests and the demo binary can step
//! through it deterministically.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

pub const ONE_SEC_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    RideAccepted,
    DriverArriving,
    TripStarted,
    TripCompleted,
    RideCancel,
    MoveStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    /// Ride entity the event refers to, if any.
    pub subject: Option<Entity>,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.subject.cmp(&other.subject))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being processed by the schedule.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, event: Event) {
        debug_assert!(
            event.timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        self.events.push(event);
    }

    pub fn schedule_at(&mut self, timestamp: u64, kind: EventKind, subject: Option<Entity>) {
        self.schedule(Event {
            timestamp,
            kind,
            subject,
        });
    }

    pub fn schedule_at_secs(&mut self, secs: u64, kind: EventKind, subject: Option<Entity>) {
        self.schedule_at(secs * ONE_SEC_MS, kind, subject);
    }

    /// Schedule `kind` at `delay_ms` past the current time.
    pub fn schedule_in(&mut self, delay_ms: u64, kind: EventKind, subject: Option<Entity>) {
        self.schedule_at(self.now + delay_ms, kind, subject);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(10, EventKind::MoveStep, None);
        clock.schedule_at(5, EventKind::RideAccepted, None);
        clock.schedule_at(20, EventKind::TripCompleted, None);

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5);
        assert_eq!(clock.now(), 5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10);
        assert_eq!(clock.now(), 10);

        let third = clock.pop_next().expect("third event");
        assert_eq!(third.timestamp, 20);
        assert_eq!(clock.now(), 20);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn schedule_in_is_relative_to_now() {
        let mut clock = SimulationClock::default();
        clock.schedule_at(100, EventKind::MoveStep, None);
        clock.pop_next();
        clock.schedule_in(50, EventKind::MoveStep, None);
        assert_eq!(clock.next_event_time(), Some(150));
    }

    #[test]
    fn subject_is_preserved() {
        let mut clock = SimulationClock::default();
        let ride = Entity::from_raw(7);
        clock.schedule_at_secs(1, EventKind::RideCancel, Some(ride));
        let event = clock.pop_next().expect("event");
        assert_eq!(event.subject, Some(ride));
        assert_eq!(event.timestamp, ONE_SEC_MS);
    }
}
