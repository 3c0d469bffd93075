use super::event::Pulse;
use std::collections::VecDeque;

/// FIFO queue of pending pulses for a single trigger.
///
/// Pulses are delivered strictly in the order they were scheduled, which
/// makes propagation breadth first.
#[derive(Debug, Default)]
pub struct PulseScheduler {
    queue: VecDeque<Pulse>,
    dispatched: usize,
}

impl PulseScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler holding a single seed pulse
    pub fn seeded(pulse: Pulse) -> Self {
        let mut scheduler = Self::new();
        scheduler.schedule(pulse);
        scheduler
    }

    pub fn schedule(&mut self, pulse: Pulse) {
        self.queue.push_back(pulse);
    }

    /// Schedule pulses preserving their iteration order
    pub fn schedule_all(&mut self, pulses: impl IntoIterator<Item = Pulse>) {
        self.queue.extend(pulses);
    }

    /// Dequeue the oldest pending pulse
    pub fn next_pulse(&mut self) -> Option<Pulse> {
        let pulse = self.queue.pop_front()?;
        self.dispatched += 1;
        Some(pulse)
    }

    /// Number of pending pulses
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of pulses dequeued so far
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }
}
