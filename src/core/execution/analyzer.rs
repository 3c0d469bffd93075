use super::config::AnalysisMode;
use super::simulation_engine::{PulseObserver, Simulator};
use crate::core::builder::Network;
use crate::core::errors::{Result, SimError};
use crate::core::event::Pulse;
use crate::core::types::{Level, ModuleId};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// LOW/HIGH pulse counts accumulated over one or more presses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseTally {
    pub low: u64,
    pub high: u64,
}

impl PulseTally {
    pub fn record(&mut self, level: Level) {
        match level {
            Level::Low => self.low += 1,
            Level::High => self.high += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.low + self.high
    }

    pub fn product(&self) -> Result<u64> {
        self.low
            .checked_mul(self.high)
            .ok_or(SimError::PulseCountOverflow {
                low: self.low,
                high: self.high,
            })
    }
}

impl PulseObserver for PulseTally {
    fn on_pulse(&mut self, _press: u64, pulse: &Pulse) {
        self.record(pulse.level);
    }
}

/// Aggregate questions answered by pressing the button repeatedly
pub struct Analyzer<'a> {
    simulator: &'a mut Simulator,
}

impl<'a> Analyzer<'a> {
    pub fn new(simulator: &'a mut Simulator) -> Self {
        Self { simulator }
    }

    /// Answer the question selected by `mode`
    pub fn run(&mut self, mode: &AnalysisMode) -> Result<u64> {
        match mode {
            AnalysisMode::PulseProduct { presses } => self.pulse_product(*presses),
            AnalysisMode::FirstLowAtSink { sink } => self.presses_until_sink_low(sink),
        }
    }

    /// Count LOW and HIGH pulses over `presses` presses
    pub fn tally_presses(&mut self, presses: u64) -> Result<PulseTally> {
        let mut tally = PulseTally::default();
        for _ in 0..presses {
            self.simulator.press_with(&mut tally)?;
        }
        debug!(
            "Tallied {} low / {} high pulses over {} presses",
            tally.low, tally.high, presses
        );
        Ok(tally)
    }

    pub fn pulse_product(&mut self, presses: u64) -> Result<u64> {
        self.tally_presses(presses)?.product()
    }

    /// Pulse product over the configured default number of presses
    pub fn default_pulse_product(&mut self) -> Result<u64> {
        let presses = self.simulator.config().default_presses;
        self.pulse_product(presses)
    }

    /// Number of presses, counted from the current state, until `sink`
    /// first receives a LOW pulse.
    ///
    /// The sink must be fed by a single conjunction whose inputs each send it
    /// HIGH with a fixed period, first at the period itself. Periods are
    /// confirmed by their second occurrence and combined with `lcm`. A LOW
    /// reaching the sink while periods are still being measured is returned
    /// as is. Anything else is reported as
    /// [`SimError::UnresolvableCycleAssumption`].
    pub fn presses_until_sink_low(&mut self, sink: &str) -> Result<u64> {
        let (conjunction, inputs) = watched_conjunction(self.simulator.network(), sink)?;
        debug!(
            "Watching {} inputs of '{}' feeding sink '{}'",
            inputs.len(),
            conjunction,
            sink
        );

        let max_presses = self.simulator.config().max_presses;
        let mut watch = FeederWatch::new(sink, conjunction, inputs, self.simulator.presses());

        for _ in 0..max_presses {
            self.simulator.press_with(&mut watch)?;

            if let Some(reason) = watch.violation.take() {
                return Err(SimError::unresolvable(sink, reason));
            }
            if let Some(press) = watch.sink_low_at {
                info!("Sink '{}' received low at press {}", sink, press);
                return Ok(press);
            }
            if let Some(periods) = watch.confirmed_periods() {
                return lcm_of(sink, &periods);
            }
        }

        Err(SimError::unresolvable(
            sink,
            format!(
                "periods of {} not confirmed within {} presses",
                watch.pending().join(", "),
                max_presses
            ),
        ))
    }
}

/// Find the conjunction feeding `sink` and the names of its inputs
fn watched_conjunction(network: &Network, sink: &str) -> Result<(ModuleId, Vec<ModuleId>)> {
    if network.contains(sink) {
        return Err(SimError::unresolvable(sink, "name belongs to a module, not a sink"));
    }

    let feeders = network.feeders_of(sink);
    let [feeder] = feeders.as_slice() else {
        return Err(SimError::unresolvable(
            sink,
            format!("expected exactly one feeder, found {}", feeders.len()),
        ));
    };

    let module = network
        .get(feeder)
        .ok_or_else(|| SimError::unresolvable(sink, format!("feeder '{}' is missing", feeder)))?;
    let inputs = module.input_levels().ok_or_else(|| {
        SimError::unresolvable(sink, format!("feeder '{}' is not a conjunction", feeder))
    })?;
    if module.outputs().len() != 1 {
        return Err(SimError::unresolvable(
            sink,
            format!("conjunction '{}' has outputs besides the sink", feeder),
        ));
    }
    if inputs.is_empty() {
        return Err(SimError::unresolvable(
            sink,
            format!("conjunction '{}' has no inputs", feeder),
        ));
    }

    let mut names: Vec<ModuleId> = inputs.keys().cloned().collect();
    names.sort_unstable();
    Ok((feeder.to_string(), names))
}

fn lcm_of(sink: &str, periods: &[u64]) -> Result<u64> {
    periods.iter().try_fold(1u64, |acc, &period| {
        let gcd = num_integer::gcd(acc, period);
        (acc / gcd)
            .checked_mul(period)
            .ok_or_else(|| SimError::unresolvable(sink, "least common multiple overflows u64"))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    Unseen,
    /// First HIGH observed at this press
    Seen(u64),
    Confirmed(u64),
}

/// Tracks when each input of the watched conjunction sends it HIGH
struct FeederWatch {
    sink: ModuleId,
    conjunction: ModuleId,
    periods: BTreeMap<ModuleId, Period>,
    start: u64,
    sink_low_at: Option<u64>,
    violation: Option<String>,
}

impl FeederWatch {
    fn new(sink: &str, conjunction: ModuleId, inputs: Vec<ModuleId>, start: u64) -> Self {
        Self {
            sink: sink.to_string(),
            conjunction,
            periods: inputs.into_iter().map(|name| (name, Period::Unseen)).collect(),
            start,
            sink_low_at: None,
            violation: None,
        }
    }

    fn confirmed_periods(&self) -> Option<Vec<u64>> {
        self.periods
            .values()
            .map(|period| match period {
                Period::Confirmed(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn pending(&self) -> Vec<&str> {
        self.periods
            .iter()
            .filter(|(_, period)| !matches!(period, Period::Confirmed(_)))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl PulseObserver for FeederWatch {
    fn on_pulse(&mut self, press: u64, pulse: &Pulse) {
        let press = press - self.start;

        if pulse.level.is_low() && pulse.destination == self.sink {
            self.sink_low_at.get_or_insert(press);
            return;
        }
        if !pulse.level.is_high() || pulse.destination != self.conjunction {
            return;
        }
        let Some(period) = self.periods.get_mut(&pulse.source) else {
            return;
        };

        match *period {
            Period::Unseen => {
                debug!("'{}' first sent high at press {}", pulse.source, press);
                *period = Period::Seen(press);
            }
            Period::Seen(first) if press == first => {}
            Period::Seen(first) if press == 2 * first => {
                info!("'{}' confirmed with period {}", pulse.source, first);
                *period = Period::Confirmed(first);
            }
            Period::Seen(first) => {
                if self.violation.is_none() {
                    self.violation = Some(format!(
                        "input '{}' sent high at press {} then {}, expected {}",
                        pulse.source,
                        first,
                        press,
                        2 * first
                    ));
                }
            }
            Period::Confirmed(_) => {}
        }
    }
}
