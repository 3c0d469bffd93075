use super::config::SimulationConfig;
use crate::core::builder::{Destination, Network};
use crate::core::errors::{Result, SimError};
use crate::core::event::Pulse;
use crate::core::event_scheduler::PulseScheduler;
use crate::core::types::Level;
use log::{debug, trace, warn};

/// Observer trait for pulses flowing through a press
pub trait PulseObserver {
    /// Called for every pulse, in dispatch order
    fn on_pulse(&mut self, press: u64, pulse: &Pulse);

    /// Called once the press has drained its queue
    fn on_trigger_complete(&mut self, _press: u64, _pulses: usize) {}
}

/// Drives button presses against a network it owns exclusively.
///
/// Module state persists between presses; each press runs until its queue
/// is empty or its pulse budget is spent before the next one can start.
pub struct Simulator {
    network: Network,
    config: SimulationConfig,
    presses: u64,
}

impl Simulator {
    pub fn new(network: Network, config: SimulationConfig) -> Self {
        Self {
            network,
            config,
            presses: 0,
        }
    }

    /// Start one press and return the pulses it produces.
    ///
    /// The returned iterator borrows the network mutably until dropped. If it
    /// is dropped early the remaining pulses are still dispatched, up to
    /// `max_pulses_per_press`; a press that would exceed the budget stops
    /// there and reports it through [`Trigger::exceeded_budget`].
    pub fn trigger(&mut self) -> Trigger<'_> {
        self.presses += 1;
        let seed = Pulse::new(
            Level::Low,
            self.config.button_source.clone(),
            self.config.entry_module.clone(),
        );
        Trigger {
            network: &mut self.network,
            scheduler: PulseScheduler::seeded(seed),
            press: self.presses,
            budget: self.config.max_pulses_per_press,
            exceeded: false,
        }
    }

    /// Run one full press, reporting every pulse to `observer`.
    ///
    /// Returns the number of pulses dispatched, or
    /// [`SimError::PulseBudgetExceeded`] when the press did not drain within
    /// `max_pulses_per_press`.
    pub fn press_with(&mut self, observer: &mut dyn PulseObserver) -> Result<usize> {
        let mut trigger = self.trigger();
        let press = trigger.press();
        for pulse in trigger.by_ref() {
            observer.on_pulse(press, &pulse);
        }
        if trigger.exceeded_budget() {
            return Err(SimError::PulseBudgetExceeded {
                press,
                budget: trigger.budget,
            });
        }
        let pulses = trigger.dispatched();
        observer.on_trigger_complete(press, pulses);
        Ok(pulses)
    }

    /// Number of presses started so far
    pub fn presses(&self) -> u64 {
        self.presses
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Restore the network to its initial state and zero the press counter
    pub fn reset(&mut self) {
        self.network.reset();
        self.presses = 0;
    }

    pub fn into_network(self) -> Network {
        self.network
    }
}

/// A single in-flight press: a lazy sequence of dispatched pulses, at most
/// `max_pulses_per_press` long
pub struct Trigger<'a> {
    network: &'a mut Network,
    scheduler: PulseScheduler,
    press: u64,
    budget: usize,
    exceeded: bool,
}

impl Trigger<'_> {
    /// 1-based index of this press
    pub fn press(&self) -> u64 {
        self.press
    }

    /// Number of pulses dequeued so far
    pub fn dispatched(&self) -> usize {
        self.scheduler.dispatched()
    }

    /// Whether the press stopped with pulses still pending
    pub fn exceeded_budget(&self) -> bool {
        self.exceeded
    }

    fn dispatch(&mut self, pulse: &Pulse) {
        trace!("{}", pulse);
        if let Destination::Module(module) = self.network.resolve(&pulse.destination) {
            if let Some(level) = module.receive(pulse.level, &pulse.source) {
                self.scheduler.schedule_all(module.fan_out(level));
            }
        }
    }
}

impl Iterator for Trigger<'_> {
    type Item = Pulse;

    fn next(&mut self) -> Option<Pulse> {
        if self.exceeded {
            return None;
        }
        if self.scheduler.dispatched() >= self.budget && !self.scheduler.is_empty() {
            warn!(
                "Press {} abandoned after {} pulses with {} pending",
                self.press,
                self.scheduler.dispatched(),
                self.scheduler.len()
            );
            self.exceeded = true;
            return None;
        }
        let pulse = self.scheduler.next_pulse()?;
        self.dispatch(&pulse);
        if self.scheduler.is_empty() {
            debug!(
                "Press {} complete after {} pulses",
                self.press,
                self.scheduler.dispatched()
            );
        }
        Some(pulse)
    }
}

impl Drop for Trigger<'_> {
    fn drop(&mut self) {
        while self.next().is_some() {}
    }
}
