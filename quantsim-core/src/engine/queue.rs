//! Event queue — the single authoritative ordering of "what happens next".
//!
//! Ordering key is `(timestamp, insertion sequence)`: earliest timestamp
//! first, and FIFO within a timestamp. The sequence counter is assigned on
//! push, so two runs that push the same events in the same order drain
//! identically. No component mutates shared state except by going through
//! this queue.

use crate::domain::Event;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Scheduled {
    timestamp: DateTime<Utc>,
    seq: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap, we want the earliest entry on top.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.timestamp, other.seq).cmp(&(self.timestamp, self.seq))
    }
}

/// Time-ordered event queue with FIFO tie-breaking.
#[derive(Default)]
pub struct EventQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, preserving `(timestamp, insertion order)`.
    pub fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled {
            timestamp: event.timestamp(),
            seq,
            event,
        });
    }

    /// Remove and return the earliest pending event.
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|s| s.event)
    }

    /// Timestamp of the earliest pending event, if any.
    pub fn peek_timestamp(&self) -> Option<DateTime<Utc>> {
        self.heap.peek().map(|s| s.timestamp)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SignalDirection, SignalEvent};
    use chrono::TimeZone;

    fn signal_at(day: u32, symbol: &str) -> Event {
        Event::Signal(SignalEvent {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 21, 0, 0).unwrap(),
            symbol: symbol.into(),
            direction: SignalDirection::Long,
            strength: None,
        })
    }

    #[test]
    fn pops_in_timestamp_order() {
        let mut queue = EventQueue::new();
        queue.push(signal_at(5, "A"));
        queue.push(signal_at(2, "B"));
        queue.push(signal_at(9, "C"));

        assert_eq!(queue.pop().unwrap().symbol(), "B");
        assert_eq!(queue.pop().unwrap().symbol(), "A");
        assert_eq!(queue.pop().unwrap().symbol(), "C");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn equal_timestamps_drain_fifo() {
        let mut queue = EventQueue::new();
        for symbol in ["first", "second", "third"] {
            queue.push(signal_at(2, symbol));
        }
        assert_eq!(queue.pop().unwrap().symbol(), "first");
        assert_eq!(queue.pop().unwrap().symbol(), "second");
        assert_eq!(queue.pop().unwrap().symbol(), "third");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut queue = EventQueue::new();
        queue.push(signal_at(3, "A"));
        let ts = queue.peek_timestamp().unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 3, 21, 0, 0).unwrap());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn fifo_holds_after_interleaved_pops() {
        let mut queue = EventQueue::new();
        queue.push(signal_at(2, "a1"));
        queue.push(signal_at(1, "early"));
        assert_eq!(queue.pop().unwrap().symbol(), "early");
        queue.push(signal_at(2, "a2"));
        assert_eq!(queue.pop().unwrap().symbol(), "a1");
        assert_eq!(queue.pop().unwrap().symbol(), "a2");
    }
}
